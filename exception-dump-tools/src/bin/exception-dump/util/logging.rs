use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// Configures tracing and sets up the logging facility.
///
/// Log messages go to stderr so they never mix with the report on stdout. The level is taken
/// from `RUST_LOG` and falls back to `WARN`.
pub fn setup_logging() {
    let stderr_subscriber = tracing_subscriber::fmt::layer()
        .compact()
        .without_time()
        .with_writer(std::io::stderr)
        .with_filter(
            EnvFilter::builder()
                .with_default_directive(tracing::level_filters::LevelFilter::WARN.into())
                .from_env_lossy(),
        );

    tracing_subscriber::registry()
        .with(stderr_subscriber)
        .init();
}
