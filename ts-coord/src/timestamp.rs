//! Fixed-width timestamp values: hex codec, zero handling, total order.
//!
//! A timestamp is an unsigned integer of fixed byte width `W`, stored
//! big-endian so that byte-lexicographic order equals numeric order and the
//! derived `Ord`/`PartialOrd` impls are correct for free. Zero is the
//! sentinel "unset" value and is never a legal client-supplied timestamp.

use crate::error::{CResult, Error};
use std::fmt;

/// The default timestamp width, matching a typical 8-byte build.
pub const DEFAULT_WIDTH: usize = 8;

/// A fixed-width timestamp value.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp<const W: usize>([u8; W]);

/// The timestamp width used by the rest of the coordinator.
pub type Timestamp8 = Timestamp<DEFAULT_WIDTH>;

impl<const W: usize> Timestamp<W> {
    /// The sentinel "unset" value. Never a legal client-supplied timestamp.
    pub const ZERO: Self = Timestamp([0u8; W]);

    /// Build a timestamp from its big-endian byte representation.
    pub fn from_be_bytes(bytes: [u8; W]) -> Self {
        Timestamp(bytes)
    }

    /// The big-endian byte representation.
    pub fn to_be_bytes(self) -> [u8; W] {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }

    /// Hex-encode this timestamp. `is_zero` yields the literal `"0"`;
    /// otherwise lowercase hex with leading zeros stripped (but never an
    /// empty string).
    pub fn to_hex(&self) -> String {
        if self.is_zero() {
            return "0".to_string();
        }
        let mut hex = String::with_capacity(2 * W);
        for byte in self.0 {
            hex.push_str(&format!("{byte:02x}"));
        }
        let trimmed = hex.trim_start_matches('0');
        trimmed.to_string()
    }

    /// Parse a hex literal for a field named `name` (used in error messages).
    ///
    /// Rejects inputs longer than `2*W` hex digits, rejects non-hex
    /// characters, and rejects an all-zero result ("zero not permitted").
    /// An empty string decodes to zero, so callers that treat "not supplied"
    /// as an empty string should check `cval.is_empty()` before calling this
    /// (see [`Self::from_hex_allow_empty`]).
    pub fn from_hex(name: &str, input: &str) -> CResult<Self> {
        let ts = Self::from_hex_allow_empty(name, input)?;
        if ts.is_zero() {
            return Err(Error::Invalid(format!(
                "{name} timestamp '{input}': zero not permitted"
            )));
        }
        Ok(ts)
    }

    /// Like [`Self::from_hex`] but an empty string decodes to
    /// [`Self::ZERO`] instead of erroring — used when parsing an optional
    /// config field that defaults to "not supplied".
    pub fn from_hex_allow_empty(name: &str, input: &str) -> CResult<Self> {
        if input.len() > 2 * W {
            return Err(Error::Invalid(format!(
                "{name} timestamp too long '{input}'"
            )));
        }
        if input.is_empty() {
            return Ok(Self::ZERO);
        }
        if !input.bytes().all(|b| (b as char).is_ascii_hexdigit()) {
            return Err(Error::Invalid(format!(
                "Failed to parse {name} timestamp '{input}'"
            )));
        }

        // Left-pad to an even number of digits so every pair decodes to a
        // whole byte, then right-align the decoded bytes into the W-byte
        // buffer (multi-word path from spec.md §4.1).
        let padded;
        let digits: &str = if input.len() % 2 == 1 {
            padded = format!("0{input}");
            &padded
        } else {
            input
        };

        let mut buf = [0u8; W];
        let decoded_len = digits.len() / 2;
        let offset = W - decoded_len;
        for i in 0..decoded_len {
            let byte_str = &digits[i * 2..i * 2 + 2];
            let byte = u8::from_str_radix(byte_str, 16).map_err(|_| {
                Error::Invalid(format!("Failed to parse {name} timestamp '{input}'"))
            })?;
            buf[offset + i] = byte;
        }
        Ok(Timestamp(buf))
    }

    /// One past this value, saturating at the maximum representable in `W`
    /// bytes. Not exposed as a timestamp-minting API; exists so tests and
    /// doc examples can build adjacent timestamps without spelling out a
    /// second hex literal.
    pub(crate) fn saturating_add_one(&self) -> Self {
        let mut bytes = self.0;
        for byte in bytes.iter_mut().rev() {
            if *byte == u8::MAX {
                *byte = 0;
            } else {
                *byte += 1;
                return Timestamp(bytes);
            }
        }
        Timestamp([u8::MAX; W])
    }
}

impl<const W: usize> fmt::Debug for Timestamp<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.to_hex())
    }
}

impl<const W: usize> fmt::Display for Timestamp<W> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_is_the_sentinel() {
        assert!(Timestamp8::ZERO.is_zero());
        assert_eq!(Timestamp8::ZERO.to_hex(), "0");
    }

    #[test]
    fn roundtrip_hex() {
        let ts = Timestamp8::from_hex("test", "ff").unwrap();
        assert_eq!(ts.to_hex(), "ff");

        let ts = Timestamp8::from_hex("test", "1a2b3c").unwrap();
        assert_eq!(ts.to_hex(), "1a2b3c");
    }

    #[test]
    fn odd_length_is_left_padded() {
        let odd = Timestamp8::from_hex("test", "abc").unwrap();
        let even = Timestamp8::from_hex("test", "0abc").unwrap();
        assert_eq!(odd, even);
    }

    #[test]
    fn case_insensitive() {
        let lower = Timestamp8::from_hex("test", "ab12").unwrap();
        let upper = Timestamp8::from_hex("test", "AB12").unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn empty_is_zero_but_rejected_as_a_client_timestamp() {
        assert!(Timestamp8::from_hex_allow_empty("test", "").unwrap().is_zero());
        let err = Timestamp8::from_hex("test", "").unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
        assert!(err.to_string().contains("zero not permitted"));
    }

    #[test]
    fn all_zero_input_is_rejected() {
        let err = Timestamp8::from_hex("test", "0000").unwrap_err();
        assert!(err.to_string().contains("zero not permitted"));
    }

    #[test]
    fn rejects_non_hex() {
        let err = Timestamp8::from_hex("test", "G0").unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn rejects_too_long() {
        let too_long = "1".repeat(17);
        let err = Timestamp8::from_hex("test", &too_long).unwrap_err();
        assert!(err.to_string().contains("too long"));
    }

    #[test]
    fn ordering_matches_numeric_order() {
        let five = Timestamp8::from_hex("t", "5").unwrap();
        let ten = Timestamp8::from_hex("t", "a").unwrap();
        let big = Timestamp8::from_hex("t", "ffffffffffffffff").unwrap();
        assert!(five < ten);
        assert!(ten < big);
    }

    #[test]
    fn hex_roundtrip_identity_on_nonzero_values() {
        for literal in ["1", "ff", "100", "deadbeef", "ffffffffffffffff"] {
            let ts = Timestamp8::from_hex("t", literal).unwrap();
            let back = Timestamp8::from_hex("t", &ts.to_hex()).unwrap();
            assert_eq!(ts, back);
            assert_eq!(ts.to_hex(), literal.trim_start_matches('0'));
        }
    }

    #[test]
    fn saturating_add_one_steps_by_one() {
        let five = Timestamp8::from_hex("t", "5").unwrap();
        let six = Timestamp8::from_hex("t", "6").unwrap();
        assert_eq!(five.saturating_add_one(), six);

        let max = Timestamp8::from_hex("t", &"f".repeat(16)).unwrap();
        assert_eq!(max.saturating_add_one(), max);
    }

    #[test]
    fn sixteen_byte_width_also_works() {
        type Timestamp16 = Timestamp<16>;
        let ts = Timestamp16::from_hex("t", "ff").unwrap();
        assert_eq!(ts.to_hex(), "ff");
        let max = "f".repeat(32);
        let ts = Timestamp16::from_hex("t", &max).unwrap();
        assert_eq!(ts.to_hex(), max);
        assert!(Timestamp16::from_hex("t", &"1".repeat(33)).is_err());
    }
}
