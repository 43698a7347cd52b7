//! Decoding of the binary dump written by the ARM9/ARM11 exception handlers.
//!
//! All fields are little-endian 32 bit words:
//!
//! | Offset | Field |
//! |---|---|
//! | 0 | magic `0xDEADC0DE` |
//! | 4 | magic `0xDEADCAFE` |
//! | 12 | processor id |
//! | 16 | exception type |
//! | 20 | reserved |
//! | 24 | size of the register array in bytes |
//! | 28 | size of the code dump |
//! | 32 | size of the stack dump |
//! | 40 | register array, followed by the code dump and the stack dump |

use std::fmt;
use std::path::Path;

use scroll::{Pread, LE};

use crate::registers::RegisterSet;
use crate::DumpError;

/// The two words every dump starts with.
pub const MAGIC: [u32; 2] = [0xDEAD_C0DE, 0xDEAD_CAFE];

/// [`MAGIC`] as it appears at the start of the file.
const MAGIC_BYTES: [u8; 8] = {
    let first = MAGIC[0].to_le_bytes();
    let second = MAGIC[1].to_le_bytes();
    [
        first[0], first[1], first[2], first[3], second[0], second[1], second[2], second[3],
    ]
};

/// Offset of the first header field after the magic.
const HEADER_FIELDS_OFFSET: usize = 12;

/// Offset of the register array.
pub const REGISTERS_OFFSET: usize = 40;

/// Processor id the ARM9 handler writes.
const ARM9_PROCESSOR_ID: u32 = 9;

/// The fixed-size part of a dump that follows the magic words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpHeader {
    pub processor_id: u32,
    pub exception_type: u32,
    pub reserved: u32,
    /// Size of the register array in bytes.
    pub register_byte_count: u32,
    pub code_dump_size: u32,
    pub stack_dump_size: u32,
}

impl DumpHeader {
    /// Number of whole registers in the register array.
    ///
    /// A byte count that is not a multiple of four is truncated.
    pub fn register_count(&self) -> usize {
        (self.register_byte_count / 4) as usize
    }

    /// The processor that took the exception.
    pub fn processor(&self) -> Processor {
        Processor::from_id(self.processor_id)
    }

    /// The class of exception that was taken.
    pub fn exception_type(&self) -> ExceptionType {
        ExceptionType::from(self.exception_type)
    }
}

/// The processor that wrote the dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Processor {
    Arm9,
    /// One of the ARM11 MPCore cores. The core number lives in the upper half of the id.
    Arm11 { core: u32 },
}

impl Processor {
    pub fn from_id(id: u32) -> Self {
        if id == ARM9_PROCESSOR_ID {
            Processor::Arm9
        } else {
            Processor::Arm11 { core: id >> 16 }
        }
    }
}

impl fmt::Display for Processor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Processor::Arm9 => write!(f, "ARM9"),
            Processor::Arm11 { core } => write!(f, "ARM11 (core {core})"),
        }
    }
}

/// The ARM exception the handler caught.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionType {
    Fiq,
    UndefinedInstruction,
    PrefetchAbort,
    DataAbort,
    Unknown(u32),
}

impl From<u32> for ExceptionType {
    fn from(value: u32) -> Self {
        match value {
            0 => ExceptionType::Fiq,
            1 => ExceptionType::UndefinedInstruction,
            2 => ExceptionType::PrefetchAbort,
            3 => ExceptionType::DataAbort,
            other => ExceptionType::Unknown(other),
        }
    }
}

impl fmt::Display for ExceptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ExceptionType::Fiq => "FIQ",
            ExceptionType::UndefinedInstruction => "undefined instruction",
            ExceptionType::PrefetchAbort => "prefetch abort",
            ExceptionType::DataAbort => "data abort",
            ExceptionType::Unknown(_) => "unknown",
        };
        f.write_str(name)
    }
}

/// A decoded exception dump. The code and stack dumps borrow from the loaded file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionDump<'a> {
    pub header: DumpHeader,
    pub registers: RegisterSet,
    pub code: &'a [u8],
    pub stack: &'a [u8],
}

impl<'a> ExceptionDump<'a> {
    /// Decodes a complete dump from `data`.
    ///
    /// Fails with [`DumpError::InvalidFormat`] if `data` does not start with the magic words
    /// (an empty buffer included) and with [`DumpError::TruncatedData`] if `data` ends before
    /// one of the fields it describes.
    pub fn parse(data: &'a [u8]) -> Result<Self, DumpError> {
        let prefix = &data[..data.len().min(MAGIC_BYTES.len())];
        if prefix.is_empty() || prefix != &MAGIC_BYTES[..prefix.len()] {
            tracing::debug!("Unexpected magic {:02x?}", prefix);
            return Err(DumpError::InvalidFormat);
        }
        check_extent(data, 0, MAGIC_BYTES.len(), "magic")?;

        // The register array starts after the padding that ends the header.
        check_extent(data, 0, REGISTERS_OFFSET, "header")?;

        let mut fields = [0u32; 6];
        for (i, field) in fields.iter_mut().enumerate() {
            *field = read_u32(data, HEADER_FIELDS_OFFSET + 4 * i, "header")?;
        }
        let [processor_id, exception_type, reserved, register_byte_count, code_dump_size, stack_dump_size] =
            fields;

        let header = DumpHeader {
            processor_id,
            exception_type,
            reserved,
            register_byte_count,
            code_dump_size,
            stack_dump_size,
        };
        tracing::debug!("Dump header: {:x?}", header);

        if register_byte_count % 4 != 0 {
            tracing::warn!(
                "Register array size {} is not a multiple of 4, ignoring the trailing bytes",
                register_byte_count
            );
        }

        let register_count = header.register_count();
        let registers_len = register_count * 4;
        check_extent(data, REGISTERS_OFFSET, registers_len, "registers")?;
        let registers = (0..register_count)
            .map(|i| read_u32(data, REGISTERS_OFFSET + 4 * i, "registers"))
            .collect::<Result<Vec<_>, _>>()?;

        let code_offset = REGISTERS_OFFSET + registers_len;
        let code = slice(data, code_offset, code_dump_size as usize, "code dump")?;

        let stack_offset = code_offset + code.len();
        let stack = slice(data, stack_offset, stack_dump_size as usize, "stack dump")?;

        tracing::debug!(
            "{} registers, code dump at {:#x} ({} bytes), stack dump at {:#x} ({} bytes)",
            register_count,
            code_offset,
            code.len(),
            stack_offset,
            stack.len()
        );

        Ok(ExceptionDump {
            header,
            registers: RegisterSet::new(registers),
            code,
            stack,
        })
    }

    pub fn processor(&self) -> Processor {
        self.header.processor()
    }

    pub fn exception_type(&self) -> ExceptionType {
        self.header.exception_type()
    }

    /// Address of the first byte of the code dump.
    ///
    /// The handler dumps the bytes leading up to the faulting instruction, so this is derived
    /// from the saved `pc`. Returns `None` if the dump does not contain `pc`.
    pub fn code_dump_address(&self) -> Option<u32> {
        self.registers
            .pc()
            .map(|pc| pc.wrapping_sub(self.header.code_dump_size).wrapping_add(2))
    }

    /// Address of the first byte of the stack dump, which is the saved `sp`.
    pub fn stack_dump_address(&self) -> Option<u32> {
        self.registers.sp()
    }
}

/// Reads a whole dump file into memory.
pub fn read_dump_file(path: impl AsRef<Path>) -> std::io::Result<Vec<u8>> {
    let path = path.as_ref();
    tracing::debug!("Reading dump from {}", path.display());
    std::fs::read(path)
}

fn check_extent(
    data: &[u8],
    offset: usize,
    len: usize,
    field: &'static str,
) -> Result<(), DumpError> {
    let available = data.len().saturating_sub(offset);
    if offset > data.len() || len > available {
        return Err(DumpError::TruncatedData {
            field,
            offset,
            needed: len,
            available,
        });
    }
    Ok(())
}

fn slice<'a>(
    data: &'a [u8],
    offset: usize,
    len: usize,
    field: &'static str,
) -> Result<&'a [u8], DumpError> {
    check_extent(data, offset, len, field)?;
    Ok(&data[offset..offset + len])
}

fn read_u32(data: &[u8], offset: usize, field: &'static str) -> Result<u32, DumpError> {
    data.pread_with::<u32>(offset, LE)
        .map_err(|_| DumpError::TruncatedData {
            field,
            offset,
            needed: 4,
            available: data.len().saturating_sub(offset),
        })
}
