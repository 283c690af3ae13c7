//! Canonical register names and the 32-register architectural file.

use crate::constants::REGISTER_COUNT;
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use util::{EnumFromStr, ParseEnumError};
use util_derive::EnumFromStr;

/// The 32 general purpose registers of the supported MIPS-I subset, in index order.
#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive, EnumFromStr)]
pub enum RegisterId {
    ZERO,
    AT,
    V0,
    V1,
    A0,
    A1,
    A2,
    A3,
    T0,
    T1,
    T2,
    T3,
    T4,
    T5,
    T6,
    T7,
    S0,
    S1,
    S2,
    S3,
    S4,
    S5,
    S6,
    S7,
    T8,
    T9,
    K0,
    K1,
    GP,
    SP,
    FP,
    RA,
}

impl std::fmt::Display for RegisterId {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

/// Returns the architectural index (0..31) of a register.
#[inline]
pub fn register_index(id: RegisterId) -> usize {
    id.to_u32().unwrap() as usize
}

/// Returns the register occupying a given architectural index, if any.
#[inline]
pub fn register_by_index(index: u32) -> Option<RegisterId> {
    RegisterId::from_u32(index)
}

/// Resolves a register operand written in assembly source: either `$<0..31>` or `$<name>`.
///
/// Returns `None` if `token` is not a `$`-prefixed register reference, or refers to an index
/// or name outside the architectural set.
pub fn resolve(token: &str) -> Option<RegisterId> {
    let name = token.strip_prefix('$')?;

    if let Ok(index) = name.parse::<u32>() {
        return register_by_index(index);
    }

    EnumFromStr::from_str(&name.to_ascii_uppercase()).ok()
}

impl From<ParseEnumError> for crate::error::Error {
    fn from(err: ParseEnumError) -> crate::error::Error {
        crate::error::Error::InvalidArgument {
            msg: err.to_string(),
            line: 0,
        }
    }
}

/// The 32-register architectural file.
///
/// `$0` always reads as zero: writes to it are accepted (and stored) but never observable, per
/// the MIPS convention that register zero is hardwired.
#[derive(Clone)]
pub struct RegisterFile {
    slots: [i32; REGISTER_COUNT],
}

impl RegisterFile {
    pub fn new() -> RegisterFile {
        RegisterFile {
            slots: [0; REGISTER_COUNT],
        }
    }

    pub fn size(&self) -> usize {
        self.slots.len()
    }

    pub fn get(&self, index: usize) -> i32 {
        if index == 0 {
            0
        } else {
            self.slots[index]
        }
    }

    pub fn set(&mut self, index: usize, value: i32) {
        self.slots[index] = value;
    }

    /// Snapshot of all 32 registers, with index 0 forced to zero.
    pub fn all(&self) -> [i32; REGISTER_COUNT] {
        let mut out = self.slots;
        out[0] = 0;
        out
    }
}

impl Default for RegisterFile {
    fn default() -> RegisterFile {
        RegisterFile::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_register_reads_zero_even_after_write() {
        let mut regs = RegisterFile::new();
        regs.set(0, 42);
        assert_eq!(regs.get(0), 0);
    }

    #[test]
    fn ordinary_register_round_trips() {
        let mut regs = RegisterFile::new();
        regs.set(register_index(RegisterId::T0), 106);
        assert_eq!(regs.get(register_index(RegisterId::T0)), 106);
    }

    #[test]
    fn resolve_numeric_form() {
        assert_eq!(resolve("$0"), Some(RegisterId::ZERO));
        assert_eq!(resolve("$31"), Some(RegisterId::RA));
        assert_eq!(resolve("$32"), None);
    }

    #[test]
    fn resolve_name_form_is_case_insensitive() {
        assert_eq!(resolve("$t0"), Some(RegisterId::T0));
        assert_eq!(resolve("$T0"), Some(RegisterId::T0));
        assert_eq!(resolve("$ra"), Some(RegisterId::RA));
        assert_eq!(resolve("t0"), None);
        assert_eq!(resolve("$bogus"), None);
    }
}
