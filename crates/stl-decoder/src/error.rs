/// Why a decode ended before the input was exhausted.
///
/// None of these are failures from the caller's point of view: records
/// decoded before the stop are kept, and the incomplete record is dropped
/// whole. Timeline buffers are routinely cut at capture boundaries, so a
/// stop is reported as a diagnostic, never raised.
///
/// ```text
///   SoftStop
///   ├── TruncatedPayloadSize  ← 1-7 bytes where payload_size should be
///   ├── TruncatedTimestamp    ← payload_size read, timestamp cut short
///   ├── InvalidPayloadSize    ← payload_size < 8 (negative value length)
///   └── TruncatedValue        ← fewer value bytes than payload_size says
/// ```
///
/// Offsets are byte positions from the start of the input.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum SoftStop {
    #[error("truncated payload_size at offset {offset}: {available} of 8 bytes present")]
    TruncatedPayloadSize { offset: usize, available: usize },

    #[error("truncated timestamp at offset {offset}: {available} of 8 bytes present")]
    TruncatedTimestamp { offset: usize, available: usize },

    /// `offset` points at the `payload_size` field that held the bad value.
    #[error("invalid payload_size {payload_size} at offset {offset}: must be at least 8")]
    InvalidPayloadSize { offset: usize, payload_size: i64 },

    #[error("truncated value at offset {offset}: expected {expected} bytes, {available} present")]
    TruncatedValue {
        offset: usize,
        expected: u64,
        available: usize,
    },
}

impl SoftStop {
    /// Wire name of the field that was short or invalid.
    #[must_use]
    pub fn field(&self) -> &'static str {
        match self {
            Self::TruncatedPayloadSize { .. } | Self::InvalidPayloadSize { .. } => "payload_size",
            Self::TruncatedTimestamp { .. } => "timestamp",
            Self::TruncatedValue { .. } => "value",
        }
    }

    /// Byte offset of the offending field.
    #[must_use]
    pub fn offset(&self) -> usize {
        match *self {
            Self::TruncatedPayloadSize { offset, .. }
            | Self::TruncatedTimestamp { offset, .. }
            | Self::InvalidPayloadSize { offset, .. }
            | Self::TruncatedValue { offset, .. } => offset,
        }
    }
}

/// Errors from the streaming decoder's underlying reader.
///
/// Malformed or truncated data never produces a `DecodeError`; see
/// [`SoftStop`]. This only covers the transport failing underneath.
#[derive(Debug, thiserror::Error)]
pub enum DecodeError {
    /// An I/O error other than end-of-file.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
