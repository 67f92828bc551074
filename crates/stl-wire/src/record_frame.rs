use crate::byte_order::ByteOrder;
use crate::error::WireError;

/// Width of the leading `payload_size` field.
pub const PAYLOAD_SIZE_LEN: usize = 8;

/// Width of the `timestamp` field.
pub const TIMESTAMP_LEN: usize = 8;

/// [`TIMESTAMP_LEN`] in the signed domain of `payload_size`.
const TIMESTAMP_LEN_I64: i64 = 8;

/// Fixed bytes before the value: `payload_size` + `timestamp`.
pub const RECORD_HEADER_LEN: usize = PAYLOAD_SIZE_LEN + TIMESTAMP_LEN;

/// Value length implied by a declared `payload_size`.
///
/// `payload_size` counts the timestamp and the value, so the value is
/// `payload_size - 8` bytes. Anything below 8 is corruption and yields
/// `None`; callers must never attempt a read in that case.
#[must_use]
pub fn value_len(payload_size: i64) -> Option<u64> {
    payload_size
        .checked_sub(TIMESTAMP_LEN_I64)
        .and_then(|len| u64::try_from(len).ok())
}

/// `payload_size` to declare for a value of `len` bytes.
///
/// # Errors
///
/// [`WireError::ValueTooLarge`] if `8 + len` overflows `i64`.
pub fn payload_size_for(len: usize) -> Result<i64, WireError> {
    len.checked_add(TIMESTAMP_LEN)
        .and_then(|size| i64::try_from(size).ok())
        .ok_or(WireError::ValueTooLarge { len })
}

/// A record as it is laid out on the wire, borrowing its value.
///
/// ```text
/// ┌──────────────────────────────────────────────────┐
/// │ payload_size (int64) = 8 + value.len()           │
/// │ timestamp    (int64)                             │
/// │ value        [payload_size - 8 bytes]            │
/// └──────────────────────────────────────────────────┘
/// ```
///
/// There is no magic, padding, or checksum; records are simply
/// concatenated. Reading is done field by field by the decoders so that a
/// short read can be attributed to the exact field that was cut off.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordFrame<'a> {
    pub timestamp: i64,
    pub value: &'a [u8],
}

impl RecordFrame<'_> {
    /// Write this frame in the given byte order.
    ///
    /// # Returns
    ///
    /// Total number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`WireError::ValueTooLarge`] if the value cannot be described by
    ///   an int64 `payload_size`. Nothing is written in that case.
    /// - [`WireError::Io`] if the writer fails.
    pub fn write_to(
        &self,
        w: &mut impl std::io::Write,
        order: ByteOrder,
    ) -> Result<usize, WireError> {
        let payload_size = payload_size_for(self.value.len())?;

        w.write_all(&order.encode_i64(payload_size))?;
        w.write_all(&order.encode_i64(self.timestamp))?;
        w.write_all(self.value)?;

        Ok(RECORD_HEADER_LEN + self.value.len())
    }
}
