use std::fmt;
use std::str::FromStr;

use crate::error::WireError;

/// Byte order of every fixed-width integer in a record stream.
///
/// The stream carries no marker saying which order it was written in, so
/// producer and consumer must agree out of band. Big endian is the default
/// because it is what timeline servers emit unless configured otherwise.
///
/// ```text
///   i64 = 0x0102_0304_0506_0708
///
///   Big:    01 02 03 04 05 06 07 08
///   Little: 08 07 06 05 04 03 02 01
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Most significant byte first.
    #[default]
    Big,
    /// Least significant byte first.
    Little,
}

impl ByteOrder {
    /// Both orders, in a stable order. Handy for tests that sweep them.
    pub const ALL: [Self; 2] = [Self::Big, Self::Little];

    /// Interpret eight bytes as a signed 64-bit integer.
    #[must_use]
    pub fn decode_i64(self, bytes: [u8; 8]) -> i64 {
        match self {
            Self::Big => i64::from_be_bytes(bytes),
            Self::Little => i64::from_le_bytes(bytes),
        }
    }

    /// Encode a signed 64-bit integer as eight bytes.
    #[must_use]
    pub fn encode_i64(self, value: i64) -> [u8; 8] {
        match self {
            Self::Big => value.to_be_bytes(),
            Self::Little => value.to_le_bytes(),
        }
    }

    /// Read an `i64` starting at `offset`.
    ///
    /// # Errors
    ///
    /// [`WireError::UnexpectedEof`] if fewer than eight bytes remain at
    /// `offset` (including when `offset` is past the end of `buf`).
    pub fn read_i64(self, buf: &[u8], offset: usize) -> Result<i64, WireError> {
        let eof = || WireError::UnexpectedEof {
            offset,
            needed: 8,
            available: buf.len().saturating_sub(offset),
        };

        let end = offset.checked_add(8).ok_or_else(eof)?;
        let field: [u8; 8] = buf
            .get(offset..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(eof)?;

        Ok(self.decode_i64(field))
    }

    /// Canonical lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Big => "big",
            Self::Little => "little",
        }
    }
}

impl fmt::Display for ByteOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-endian", self.name())
    }
}

impl FromStr for ByteOrder {
    type Err = WireError;

    /// Parse a byte order name, case-insensitively.
    ///
    /// Accepted: `big`, `be`, `big-endian`, `little`, `le`, `little-endian`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "big" | "be" | "big-endian" => Ok(Self::Big),
            "little" | "le" | "little-endian" => Ok(Self::Little),
            _ => Err(WireError::UnknownByteOrder {
                value: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn big_endian_layout() {
        assert_eq!(
            ByteOrder::Big.encode_i64(0x0102_0304_0506_0708),
            [1, 2, 3, 4, 5, 6, 7, 8]
        );
    }

    #[test]
    fn little_endian_layout() {
        assert_eq!(
            ByteOrder::Little.encode_i64(0x0102_0304_0506_0708),
            [8, 7, 6, 5, 4, 3, 2, 1]
        );
    }

    #[test]
    fn negative_values_survive_both_orders() {
        for order in ByteOrder::ALL {
            for v in [-1_i64, i64::MIN, i64::MAX, -42] {
                assert_eq!(order.decode_i64(order.encode_i64(v)), v, "{order} {v}");
            }
        }
    }

    #[test]
    fn read_at_offset() {
        let mut buf = vec![0xAA, 0xBB];
        buf.extend_from_slice(&ByteOrder::Big.encode_i64(42));
        assert_eq!(ByteOrder::Big.read_i64(&buf, 2).unwrap(), 42);
    }

    #[test]
    fn read_short_buffer_reports_available() {
        let buf = [0u8; 11];
        let err = ByteOrder::Big.read_i64(&buf, 5).unwrap_err();
        assert!(matches!(
            err,
            WireError::UnexpectedEof {
                offset: 5,
                needed: 8,
                available: 6
            }
        ));
    }

    #[test]
    fn read_past_end_does_not_panic() {
        let err = ByteOrder::Little.read_i64(&[1, 2, 3], 10).unwrap_err();
        assert!(matches!(err, WireError::UnexpectedEof { available: 0, .. }));

        let err = ByteOrder::Little.read_i64(&[1, 2, 3], usize::MAX).unwrap_err();
        assert!(matches!(err, WireError::UnexpectedEof { .. }));
    }

    #[test]
    fn parse_names() {
        assert_eq!("big".parse::<ByteOrder>().unwrap(), ByteOrder::Big);
        assert_eq!("BE".parse::<ByteOrder>().unwrap(), ByteOrder::Big);
        assert_eq!(" Little-Endian ".parse::<ByteOrder>().unwrap(), ByteOrder::Little);
        assert_eq!("le".parse::<ByteOrder>().unwrap(), ByteOrder::Little);
    }

    #[test]
    fn parse_unknown_name_fails_loudly() {
        let err = "middle".parse::<ByteOrder>().unwrap_err();
        assert!(matches!(err, WireError::UnknownByteOrder { ref value } if value == "middle"));
        assert_eq!(err.to_string(), "unknown byte order \"middle\": expected big|little");
    }

    #[test]
    fn parse_accepts_only_the_documented_names() {
        for name in ["bigendian", "littleendian", "big_endian", "b", "l"] {
            assert!(
                matches!(name.parse::<ByteOrder>(), Err(WireError::UnknownByteOrder { .. })),
                "{name}"
            );
        }
    }

    #[test]
    fn display_and_name_roundtrip() {
        for order in ByteOrder::ALL {
            assert_eq!(order.name().parse::<ByteOrder>().unwrap(), order);
        }
        assert_eq!(ByteOrder::Big.to_string(), "big-endian");
        assert_eq!(ByteOrder::Little.to_string(), "little-endian");
    }
}
