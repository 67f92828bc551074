use std::borrow::Cow;

use bytes::Bytes;

use crate::record_frame::RECORD_HEADER_LEN;

/// One decoded timeline record: a timestamp and an opaque value.
///
/// The value is [`Bytes`], so a record either owns its bytes or shares an
/// immutable, reference-counted buffer. It can never alias memory the
/// caller may still mutate.
///
/// No text encoding is implied. Callers that want text pick one
/// explicitly; [`value_lossy`](Self::value_lossy) is UTF-8 with
/// replacement characters.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Record {
    /// Signed 64-bit timestamp exactly as it appeared on the wire.
    pub timestamp: i64,

    /// Value payload, zero or more bytes.
    pub value: Bytes,
}

impl Record {
    /// Build a record from a timestamp and anything convertible to [`Bytes`].
    #[must_use]
    pub fn new(timestamp: i64, value: impl Into<Bytes>) -> Self {
        Self {
            timestamp,
            value: value.into(),
        }
    }

    /// The value decoded as UTF-8, invalid sequences replaced by U+FFFD.
    #[must_use]
    pub fn value_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.value)
    }

    /// Bytes this record occupies on the wire (both int64 fields + value).
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        RECORD_HEADER_LEN + self.value.len()
    }
}
