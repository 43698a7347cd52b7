/// The errors that can occur while decoding or rendering an exception dump.
#[derive(Debug, thiserror::Error, docsplay::Display, PartialEq, Eq)]
pub enum DumpError {
    /// Invalid file format
    InvalidFormat,

    /// The dump is truncated: {field} needs {needed} bytes at offset {offset:#x}, but only {available} bytes are available.
    TruncatedData {
        /// The field that could not be read.
        field: &'static str,
        /// Offset of the field inside the dump.
        offset: usize,
        /// Number of bytes the field occupies.
        needed: usize,
        /// Number of bytes left in the dump at `offset`.
        available: usize,
    },

    /// The dump holds no value for register {name} (index {index}).
    MissingRegister {
        /// Name of the register.
        name: &'static str,
        /// Position of the register in the register array.
        index: usize,
    },

    /// Register {index} has no known name.
    UnnamedRegister {
        /// Position of the register in the register array.
        index: usize,
    },
}
