use crate::{bits, constants};

/// Bit widths of the instruction fields, computed from the machine
/// configuration. Every cell in the memory pool is `word_bits` wide.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct InstructionLayout {
    /// Width of the machine operation field.
    pub operation_bits: u32,
    /// Width of the addressing mode field.
    pub mode_bits: u32,
    /// Width of each of the two signed operand fields.
    pub operand_bits: u32,
    /// Total instruction width: `operation + mode + 2 * operand`.
    pub word_bits: u32,
}

impl InstructionLayout {
    /// Computes the widths for a machine with at least `memory` addressable
    /// cells and `registers` general purpose registers.
    ///
    /// The operand field must reach every memory cell and every register
    /// (general plus special purpose), whichever set is larger, and carries
    /// a sign bit on top.
    pub fn new(memory: i64, registers: i64) -> InstructionLayout {
        let operation_bits = bits::number_of_bits(constants::INSTRUCTION_COUNT);
        let mode_bits = bits::number_of_bits(constants::ADDRESSING_MODE_COUNT);

        let total_registers = registers + constants::SPECIAL_REGISTER_COUNT;
        let operand_bits = bits::number_of_bits(memory.max(total_registers)) + 1;

        InstructionLayout {
            operation_bits,
            mode_bits,
            operand_bits,
            word_bits: operation_bits + mode_bits + 2 * operand_bits,
        }
    }

    /// Number of memory cells the machine actually provides: the requested
    /// minimum rounded up to the full range of a non-negative operand, so
    /// every address an operand can encode targets a valid cell.
    pub fn cell_count(&self) -> i64 {
        1 << (self.operand_bits - 1)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn default_configuration_widths() {
        let layout = InstructionLayout::new(100, 10);

        assert_eq!(layout.operation_bits, 5);
        assert_eq!(layout.mode_bits, 3);
        assert_eq!(layout.operand_bits, 8);
        assert_eq!(layout.word_bits, 24);
        assert_eq!(layout.cell_count(), 128);
    }

    #[test]
    fn register_bank_can_dominate_the_operand_width() {
        let small_memory = InstructionLayout::new(16, 100);
        assert_eq!(small_memory.operand_bits, bits::number_of_bits(104) + 1);
    }
}
