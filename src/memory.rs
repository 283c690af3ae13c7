//! Sparse, word-addressed main memory.

use std::collections::HashMap;

/// A partial function from byte address to 32-bit word, defaulting unset addresses to zero.
///
/// No alignment or bounds checking is performed: addresses are used exactly as given, matching
/// the rest of this instruction set's "no traps, no privilege levels" design.
#[derive(Clone, Default)]
pub struct Memory {
    words: HashMap<i32, i32>,
}

impl Memory {
    pub fn new() -> Memory {
        Memory {
            words: HashMap::new(),
        }
    }

    /// Reads the word stored at `address`, or `0` if nothing was ever written there.
    pub fn read(&self, address: i32) -> i32 {
        *self.words.get(&address).unwrap_or(&0)
    }

    /// Writes `value` at `address`, returning the word that was previously stored there.
    pub fn write(&mut self, address: i32, value: i32) -> i32 {
        self.words.insert(address, value).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unwritten_address_reads_zero() {
        let memory = Memory::new();
        assert_eq!(memory.read(0), 0);
        assert_eq!(memory.read(-4), 0);
        assert_eq!(memory.read(1_000_000), 0);
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut memory = Memory::new();
        let previous = memory.write(8, 35);
        assert_eq!(previous, 0);
        assert_eq!(memory.read(8), 35);
    }

    #[test]
    fn write_returns_previous_value() {
        let mut memory = Memory::new();
        memory.write(4, 7);
        let previous = memory.write(4, 99);
        assert_eq!(previous, 7);
    }
}
