//! Classic hex + ASCII rendering of memory contents.

use std::fmt::{self, Write as _};

/// Layout of a hex dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexdumpOptions {
    /// Number of bytes shown per row.
    pub bytes_per_row: usize,
    /// Shown in the ASCII column in place of bytes that are not printable.
    pub substitute: char,
}

impl Default for HexdumpOptions {
    fn default() -> Self {
        Self {
            bytes_per_row: 16,
            substitute: '.',
        }
    }
}

/// Renders `bytes` as rows of
///
/// ```text
/// 00100000:  00 01 02 03 04 05 06 07  08 09 0a 0b 0c 0d 0e 0f   |................|
/// ```
///
/// where the first column is the address of the row's first byte, counted from `base`.
pub struct Hexdump<'a> {
    base: u32,
    bytes: &'a [u8],
    options: HexdumpOptions,
}

impl<'a> Hexdump<'a> {
    pub fn new(base: u32, bytes: &'a [u8]) -> Self {
        Self::with_options(base, bytes, HexdumpOptions::default())
    }

    pub fn with_options(base: u32, bytes: &'a [u8], options: HexdumpOptions) -> Self {
        Self {
            base,
            bytes,
            options,
        }
    }

    fn row_width(&self) -> usize {
        self.options.bytes_per_row.max(1)
    }

    fn write_row(&self, f: &mut fmt::Formatter<'_>, address: u32, row: &[u8]) -> fmt::Result {
        let row_width = self.row_width();
        // Only rows with an even width get the gap in the middle.
        let middle = (row_width % 2 == 0).then_some(row_width / 2);

        let mut hex = String::with_capacity(row_width * 3 + 1);
        for (index, byte) in row.iter().enumerate() {
            if Some(index) == middle {
                hex.push(' ');
            }
            write!(hex, "{byte:02x} ")?;
        }
        let hex = hex.trim_matches(' ');

        let ascii = row
            .iter()
            .map(|&byte| {
                if (0x20..0x7f).contains(&byte) {
                    byte as char
                } else {
                    self.options.substitute
                }
            })
            .collect::<String>();

        write!(
            f,
            "{address:08X}:  {hex:<width$}  |{ascii}|",
            width = row_width * 3 + 1
        )
    }
}

impl fmt::Display for Hexdump<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let row_width = self.row_width();
        // Addresses are 32 bit and wrap around, so only the low 32 bits of the step matter.
        let step = row_width as u32;
        let mut address = self.base;
        for (index, row) in self.bytes.chunks(row_width).enumerate() {
            if index > 0 {
                f.write_char('\n')?;
            }
            self.write_row(f, address, row)?;
            address = address.wrapping_add(step);
        }
        Ok(())
    }
}

/// Renders `bytes` starting at address `base`. Rows are separated by newlines, the last row
/// has no trailing newline.
pub fn hexdump(base: u32, bytes: &[u8], options: &HexdumpOptions) -> String {
    Hexdump::with_options(base, bytes, *options).to_string()
}
