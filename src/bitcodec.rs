//! Fixed-width integer <-> bit-string conversions, sign/zero extension, and hex-word framing.
//!
//! Arithmetic throughout the rest of the crate is ordinary 32-bit wrapping arithmetic; the
//! conversions here exist at the boundary between instruction fields (which only ever occupy a
//! handful of bits) and the words those fields are packed into.

use crate::constants::{HEX_WORD_DIGITS, WORD_WIDTH};
use crate::error::Error;

/// Checks that `v` fits in a two's-complement field of `n` bits, i.e. `|v| < 2^n`.
///
/// Note this rejects `-2^n` (the one value a signed `n`-bit field *could* represent but which
/// this instruction set's range check does not allow) while accepting `2^n - 1`.
pub fn fit_signed(v: i64, n: u32) -> Result<i32, Error> {
    let bound = 1i64 << n;
    if v.abs() < bound {
        Ok(v as i32)
    } else {
        Err(Error::Syntax {
            msg: format!("value {} does not fit in {} bits", v, n),
            line: None,
        })
    }
}

/// Renders the low `n` bits of `v` as a binary string, zero-padded on the left to width `n`.
pub fn to_bits(v: u32, n: u32) -> String {
    let masked = v & low_bits_mask(n);
    format!("{:0width$b}", masked, width = n as usize)
}

/// Interprets a string of exactly `n` binary digits as a two's-complement integer of width `n`.
pub fn from_bits_signed(s: &str, n: u32) -> Result<i32, Error> {
    if s.len() != n as usize || !s.bytes().all(|b| b == b'0' || b == b'1') {
        return Err(Error::Syntax {
            msg: format!("expected exactly {} binary digits, got {:?}", n, s),
            line: None,
        });
    }
    let unsigned = u32::from_str_radix(s, 2).unwrap();
    Ok(sign_extend(unsigned, n))
}

/// Sign-extends the low `n` bits of `v` to a full 32-bit value.
pub fn sign_extend(v: u32, n: u32) -> i32 {
    let shift = WORD_WIDTH - n;
    (((v << shift) as i32) >> shift) as i32
}

/// Zero-extends (masks) the low `n` bits of `v`.
pub fn zero_extend(v: u32, n: u32) -> u32 {
    v & low_bits_mask(n)
}

fn low_bits_mask(n: u32) -> u32 {
    if n >= WORD_WIDTH {
        u32::MAX
    } else {
        (1u32 << n) - 1
    }
}

/// Parses exactly 8 lowercase-or-uppercase hex digits into a 32-bit word.
pub fn hex_to_word(hex: &str) -> Result<u32, Error> {
    if hex.len() != HEX_WORD_DIGITS || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(Error::InvalidInstruction {
            hex: hex.to_string(),
            line: None,
        });
    }
    u32::from_str_radix(hex, 16).map_err(|_| Error::InvalidInstruction {
        hex: hex.to_string(),
        line: None,
    })
}

/// Renders a 32-bit word as 8 zero-padded lowercase hex digits.
pub fn word_to_hex(word: u32) -> String {
    format!("{:08x}", word)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_signed_boundaries() {
        assert_eq!(fit_signed(32767, 16).unwrap(), 32767);
        assert!(fit_signed(-32768, 16).is_err());
        assert!(fit_signed(32768, 16).is_err());
        assert_eq!(fit_signed(-32767, 16).unwrap(), -32767);
    }

    #[test]
    fn sign_extend_negative_and_positive() {
        assert_eq!(sign_extend(0xFFFF, 16), -1);
        assert_eq!(sign_extend(0x7FFF, 16), 32767);
        assert_eq!(sign_extend(0, 16), 0);
    }

    #[test]
    fn zero_extend_masks_only() {
        assert_eq!(zero_extend(0xFFFF, 16), 0xFFFF);
        assert_eq!(zero_extend(0x1_FFFF, 16), 0xFFFF);
    }

    #[test]
    fn hex_word_width_and_case() {
        let hex = word_to_hex(0x2002FFFF);
        assert_eq!(hex.len(), 8);
        assert_eq!(hex, "2002ffff");
        assert!(hex.chars().all(|c| !c.is_ascii_uppercase()));
    }

    #[test]
    fn hex_to_word_rejects_bad_length() {
        assert!(hex_to_word("abc").is_err());
        assert!(hex_to_word("zzzzzzzz").is_err());
        assert_eq!(hex_to_word("2002ffff").unwrap(), 0x2002FFFF);
    }

    #[test]
    fn bits_round_trip() {
        let bits = to_bits(0xFFFE, 16);
        assert_eq!(bits.len(), 16);
        assert_eq!(from_bits_signed(&bits, 16).unwrap(), -2);
    }
}
