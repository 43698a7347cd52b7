mod util;

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use exception_dump::{read_dump_file, ExceptionDump, Report};

use crate::util::logging::setup_logging;

/// Renders a binary ARM9/ARM11 exception dump as a human readable report.
#[derive(clap::Parser)]
#[clap(
    name = "exception-dump",
    about = "Parse ARM9/ARM11 exception dumps",
    version
)]
struct Cli {
    /// Path of the dump file written by the exception handler
    path: PathBuf,
}

impl Cli {
    /// Loads and renders the dump. Nothing is printed unless the whole report could be rendered.
    fn run(&self) -> Result<String> {
        let data = read_dump_file(&self.path)
            .with_context(|| format!("Failed to read dump file {}", self.path.display()))?;
        tracing::info!("Loaded {} bytes from {}", data.len(), self.path.display());

        let dump = ExceptionDump::parse(&data)?;
        let report = Report::new(&dump)?;

        Ok(report.render())
    }
}

/// Prints the outcome of [`Cli::run`] and returns the process exit status.
///
/// The report goes to `stdout`, errors go to `stderr` as a single line.
fn emit(result: Result<String>, stdout: &mut impl Write, stderr: &mut impl Write) -> i32 {
    match result {
        Ok(report) => match stdout
            .write_all(report.as_bytes())
            .and_then(|_| stdout.flush())
        {
            Ok(()) => 0,
            Err(error) => {
                tracing::error!("Failed to write report: {}", error);
                1
            }
        },
        Err(error) => {
            let _ = writeln!(stderr, "{error:#}");
            1
        }
    }
}

fn main() {
    let cli = Cli::parse();

    setup_logging();

    let status = emit(
        cli.run(),
        &mut std::io::stdout().lock(),
        &mut std::io::stderr().lock(),
    );
    std::process::exit(status);
}
