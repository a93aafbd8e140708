use std::collections::HashMap;

use crate::constants;
use crate::layout::InstructionLayout;

/// The unified memory and register pool.
///
/// Memory cells sit at non-negative keys, registers at negative ones:
/// general purpose register `k` is key `-k`, the special purpose registers
/// follow behind the general bank (see [`SpecialRegister::key`]). Every
/// cell holds a bit string of the instruction width.
///
/// [`SpecialRegister::key`]: ../enum.SpecialRegister.html#method.key
#[derive(Clone, Debug)]
pub struct MemoryPool {
    cells: HashMap<i64, String>,
    cell_count: i64,
}

impl MemoryPool {
    /// Creates a pool with every memory cell and register zeroed.
    pub fn new(layout: &InstructionLayout, registers: i64) -> MemoryPool {
        let zero = "0".repeat(layout.word_bits as usize);
        let cell_count = layout.cell_count();
        let total_registers = registers + constants::SPECIAL_REGISTER_COUNT;

        let mut cells = HashMap::with_capacity((cell_count + total_registers) as usize);

        for address in 0..cell_count {
            cells.insert(address, zero.clone());
        }

        for register in 1..=total_registers {
            cells.insert(-register, zero.clone());
        }

        MemoryPool { cells, cell_count }
    }

    /// Number of addressable memory cells (registers not included).
    pub fn cell_count(&self) -> i64 {
        self.cell_count
    }

    pub fn get(&self, key: i64) -> Option<&str> {
        self.cells.get(&key).map(String::as_str)
    }

    /// Overwrites the cell at `key`. Returns `false` if no such cell
    /// exists; the pool never grows after construction.
    pub fn set(&mut self, key: i64, value: String) -> bool {
        match self.cells.get_mut(&key) {
            Some(cell) => {
                *cell = value;
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn registers_and_memory_share_the_pool_without_overlap() {
        let layout = InstructionLayout::new(100, 10);
        let mut pool = MemoryPool::new(&layout, 10);

        assert!(pool.set(1, "1".repeat(24)));
        assert_eq!(pool.get(-1), Some("0".repeat(24).as_str()));
        assert_eq!(pool.get(1), Some("1".repeat(24).as_str()));
    }

    #[test]
    fn pool_covers_the_rounded_up_cell_count() {
        let layout = InstructionLayout::new(100, 10);
        let pool = MemoryPool::new(&layout, 10);

        assert_eq!(pool.cell_count(), 128);
        assert!(pool.get(127).is_some());
        assert!(pool.get(128).is_none());
        // 10 general + 4 special purpose registers
        assert!(pool.get(-14).is_some());
        assert!(pool.get(-15).is_none());
    }
}
