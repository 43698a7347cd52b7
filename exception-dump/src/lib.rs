//! # exception-dump
//!
//! Decoding and text rendering of the crash dumps written by the ARM9 and ARM11 exception
//! handlers of a 3DS style firmware.
//!
//! A dump is parsed in one pass with [`ExceptionDump::parse`], which borrows the loaded file,
//! and turned into the human readable report with [`Report`]:
//!
//! ```no_run
//! use exception_dump::{read_dump_file, ExceptionDump, Report};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let data = read_dump_file("crash_dump_00000000.dmp")?;
//! let dump = ExceptionDump::parse(&data)?;
//! print!("{}", Report::new(&dump)?);
//! # Ok(())
//! # }
//! ```

mod error;

pub mod dump;
pub mod hexdump;
pub mod registers;
pub mod report;

pub use crate::dump::{read_dump_file, DumpHeader, ExceptionDump, ExceptionType, Processor};
pub use crate::error::DumpError;
pub use crate::hexdump::{hexdump, Hexdump, HexdumpOptions};
pub use crate::registers::RegisterSet;
pub use crate::report::Report;
