//! Text rendering of a decoded [`ExceptionDump`].

use std::fmt;

use crate::dump::ExceptionDump;
use crate::hexdump::{Hexdump, HexdumpOptions};
use crate::registers::{register_name, RegisterSet, PC_INDEX, REGISTER_NAMES, SP_INDEX};
use crate::DumpError;

const NAME_WIDTH: usize = 15;
const VALUE_WIDTH: usize = 20;

/// `Processor: ...` line of the report.
pub fn processor_line(dump: &ExceptionDump<'_>) -> String {
    format!("Processor: {}", dump.processor())
}

/// `Exception type: ...` line of the report.
pub fn exception_line(dump: &ExceptionDump<'_>) -> String {
    format!("Exception type: {}", dump.exception_type())
}

/// Renders the registers two per line, each line terminated by a newline.
///
/// With an odd number of registers the last value is printed on its own line. That line is
/// always labelled with the second to last entry of [`REGISTER_NAMES`] (`cpsr`), whatever the
/// position of the value is.
///
/// This is the whole register section of the report and can be rendered for any number of
/// registers, e.g. three registers give one `r0`/`r1` line and a `cpsr` line. A complete
/// [`Report`] additionally needs `sp` and `pc`, so dumps with fewer than 16 registers only go
/// through this function.
pub fn register_table(registers: &RegisterSet) -> Result<String, DumpError> {
    let values = registers.values();
    let paired = values.len() - values.len() % 2;

    let mut table = String::new();
    for (index, pair) in values[..paired].chunks_exact(2).enumerate() {
        let index = index * 2;
        table.push_str(&column(name(index)?, pair[0]));
        table.push_str(&column(name(index + 1)?, pair[1]));
        table.push('\n');
    }

    if let Some(&last) = values.get(paired) {
        table.push_str(&column(REGISTER_NAMES[REGISTER_NAMES.len() - 2], last));
        table.push('\n');
    }

    Ok(table)
}

fn name(index: usize) -> Result<&'static str, DumpError> {
    register_name(index).ok_or(DumpError::UnnamedRegister { index })
}

fn column(name: &str, value: u32) -> String {
    format!(
        "{:<name_width$}{:<value_width$}",
        name,
        format!("{value:08x}"),
        name_width = NAME_WIDTH,
        value_width = VALUE_WIDTH
    )
}

fn missing_register(index: usize) -> DumpError {
    DumpError::MissingRegister {
        name: REGISTER_NAMES[index],
        index,
    }
}

/// The complete human readable report for one dump.
///
/// Everything that can fail is checked in [`Report::new`], so formatting the report always
/// produces the full text.
#[derive(Debug)]
pub struct Report<'a> {
    dump: &'a ExceptionDump<'a>,
    registers: String,
    code_address: u32,
    stack_address: u32,
    options: HexdumpOptions,
}

impl<'a> Report<'a> {
    pub fn new(dump: &'a ExceptionDump<'a>) -> Result<Self, DumpError> {
        Self::with_options(dump, HexdumpOptions::default())
    }

    pub fn with_options(
        dump: &'a ExceptionDump<'a>,
        options: HexdumpOptions,
    ) -> Result<Self, DumpError> {
        let registers = register_table(&dump.registers)?;

        let code_address = dump
            .code_dump_address()
            .ok_or_else(|| missing_register(PC_INDEX))?;
        let stack_address = dump
            .stack_dump_address()
            .ok_or_else(|| missing_register(SP_INDEX))?;

        tracing::debug!(
            "Code dump at {:#010x}, stack dump at {:#010x}",
            code_address,
            stack_address
        );

        Ok(Self {
            dump,
            registers,
            code_address,
            stack_address,
            options,
        })
    }

    /// Renders the report into a string.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Report<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        tracing::trace!("Rendering header");
        writeln!(f, "{}", processor_line(self.dump))?;
        writeln!(f, "{}", exception_line(self.dump))?;

        tracing::trace!("Rendering {} registers", self.dump.registers.len());
        writeln!(f, "\nRegister dump:\n")?;
        f.write_str(&self.registers)?;

        tracing::trace!("Rendering {} bytes of code", self.dump.code.len());
        writeln!(f, "\nCode dump:\n")?;
        writeln!(
            f,
            "{}",
            Hexdump::with_options(self.code_address, self.dump.code, self.options)
        )?;

        tracing::trace!("Rendering {} bytes of stack", self.dump.stack.len());
        writeln!(f, "\nStack dump:\n")?;
        writeln!(
            f,
            "{}",
            Hexdump::with_options(self.stack_address, self.dump.stack, self.options)
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dump::DumpHeader;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    fn dump_with(processor_id: u32, exception_type: u32) -> ExceptionDump<'static> {
        ExceptionDump {
            header: DumpHeader {
                processor_id,
                exception_type,
                reserved: 0,
                register_byte_count: 0,
                code_dump_size: 0,
                stack_dump_size: 0,
            },
            registers: RegisterSet::default(),
            code: &[],
            stack: &[],
        }
    }

    #[test_case(9, "Processor: ARM9")]
    #[test_case(0x0002_0000, "Processor: ARM11 (core 2)")]
    #[test_case(0, "Processor: ARM11 (core 0)")]
    fn processor(id: u32, expected: &str) {
        assert_eq!(processor_line(&dump_with(id, 0)), expected);
    }

    #[test_case(0, "Exception type: FIQ")]
    #[test_case(1, "Exception type: undefined instruction")]
    #[test_case(2, "Exception type: prefetch abort")]
    #[test_case(3, "Exception type: data abort")]
    #[test_case(4, "Exception type: unknown")]
    #[test_case(99, "Exception type: unknown")]
    fn exception(exception_type: u32, expected: &str) {
        assert_eq!(exception_line(&dump_with(9, exception_type)), expected);
    }

    #[test]
    fn register_pairs() {
        let registers = RegisterSet::new(vec![0, 0xdeadbeef, 0x1f, 0xffffffff]);

        assert_eq!(
            register_table(&registers).unwrap(),
            concat!(
                "r0             00000000            r1             deadbeef            \n",
                "r2             0000001f            r3             ffffffff            \n",
            )
        );
    }

    #[test]
    fn odd_register_count_uses_fixed_label() {
        let registers = RegisterSet::new(vec![1, 2, 3]);

        assert_eq!(
            register_table(&registers).unwrap(),
            concat!(
                "r0             00000001            r1             00000002            \n",
                "cpsr           00000003            \n",
            )
        );
    }

    #[test]
    fn no_registers() {
        assert_eq!(register_table(&RegisterSet::default()).unwrap(), "");
    }

    #[test]
    fn full_register_set() {
        let registers = RegisterSet::new((0..18).collect());

        let table = register_table(&registers).unwrap();
        let last = table.lines().last().unwrap();

        assert_eq!(table.lines().count(), 9);
        assert_eq!(
            last,
            "cpsr           00000010            fpexc          00000011            "
        );
    }

    #[test]
    fn registers_past_the_name_table() {
        let registers = RegisterSet::new(vec![0; 20]);

        assert_eq!(
            register_table(&registers),
            Err(DumpError::UnnamedRegister { index: 18 })
        );
    }

    #[test]
    fn report_needs_pc_and_sp() {
        let mut dump = dump_with(9, 0);
        dump.registers = RegisterSet::new(vec![1, 2, 3]);

        assert_eq!(
            Report::new(&dump).unwrap_err(),
            DumpError::MissingRegister {
                name: "pc",
                index: PC_INDEX,
            }
        );
    }
}
