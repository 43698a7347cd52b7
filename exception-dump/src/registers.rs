//! Register naming for the ARM9/ARM11 register snapshot stored in a dump.

/// Names of the registers in the order the exception handler stores them.
pub static REGISTER_NAMES: [&str; 18] = [
    "r0", "r1", "r2", "r3", "r4", "r5", "r6", "r7", "r8", "r9", "r10", "r11", "r12", "sp", "lr",
    "pc", "cpsr", "fpexc",
];

/// Index of the stack pointer.
pub const SP_INDEX: usize = 13;
/// Index of the link register.
pub const LR_INDEX: usize = 14;
/// Index of the program counter.
pub const PC_INDEX: usize = 15;
/// Index of the current program status register.
pub const CPSR_INDEX: usize = 16;
/// Index of the floating-point exception register. Only some handlers store it.
pub const FPEXC_INDEX: usize = 17;

/// Returns the name of the register stored at `index`, if it has one.
pub fn register_name(index: usize) -> Option<&'static str> {
    REGISTER_NAMES.get(index).copied()
}

/// The register values captured by the exception handler, in storage order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterSet {
    values: Vec<u32>,
}

impl RegisterSet {
    /// Wraps already decoded register values.
    pub fn new(values: Vec<u32>) -> Self {
        Self { values }
    }

    /// Number of registers in the set.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if the dump carried no registers at all.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value of the register at `index`.
    pub fn get(&self, index: usize) -> Option<u32> {
        self.values.get(index).copied()
    }

    pub fn sp(&self) -> Option<u32> {
        self.get(SP_INDEX)
    }

    pub fn lr(&self) -> Option<u32> {
        self.get(LR_INDEX)
    }

    pub fn pc(&self) -> Option<u32> {
        self.get(PC_INDEX)
    }

    pub fn cpsr(&self) -> Option<u32> {
        self.get(CPSR_INDEX)
    }

    pub fn fpexc(&self) -> Option<u32> {
        self.get(FPEXC_INDEX)
    }

    /// The raw values, in storage order.
    pub fn values(&self) -> &[u32] {
        &self.values
    }

    /// Iterates over `(name, value)` pairs. Registers past the name table have no name.
    pub fn iter(&self) -> impl Iterator<Item = (Option<&'static str>, u32)> + '_ {
        self.values
            .iter()
            .enumerate()
            .map(|(index, value)| (register_name(index), *value))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;
    use test_case::test_case;

    #[test_case(0, Some("r0"))]
    #[test_case(12, Some("r12"))]
    #[test_case(SP_INDEX, Some("sp"))]
    #[test_case(LR_INDEX, Some("lr"))]
    #[test_case(PC_INDEX, Some("pc"))]
    #[test_case(CPSR_INDEX, Some("cpsr"))]
    #[test_case(FPEXC_INDEX, Some("fpexc"))]
    #[test_case(18, None; "past the name table")]
    fn names(index: usize, expected: Option<&str>) {
        assert_eq!(register_name(index), expected);
    }

    #[test]
    fn role_accessors() {
        let registers = RegisterSet::new((0..17).map(|i| 0x1000 + i).collect());

        assert_eq!(registers.sp(), Some(0x100d));
        assert_eq!(registers.lr(), Some(0x100e));
        assert_eq!(registers.pc(), Some(0x100f));
        assert_eq!(registers.cpsr(), Some(0x1010));
        assert_eq!(registers.fpexc(), None);
    }

    #[test]
    fn iter_pairs_names_with_values() {
        let registers = RegisterSet::new(vec![7, 8]);

        let pairs = registers.iter().collect::<Vec<_>>();

        assert_eq!(pairs, vec![(Some("r0"), 7), (Some("r1"), 8)]);
    }
}
