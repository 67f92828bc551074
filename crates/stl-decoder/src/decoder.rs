use std::ops::Range;

use bytes::Bytes;
use stl_wire::record_frame::{PAYLOAD_SIZE_LEN, TIMESTAMP_LEN, value_len};
use stl_wire::{ByteOrder, Record};
use tracing::warn;

use crate::error::SoftStop;

/// The result of decoding a record stream.
///
/// ```text
/// ┌──────────────────────────────────────────────────────────┐
/// │ DecodedStream                                            │
/// │   records:  Vec<Record>      ← complete records, in order │
/// │   consumed: usize            ← bytes covered by records   │
/// │   stop:     Option<SoftStop> ← why decoding ended early   │
/// └──────────────────────────────────────────────────────────┘
/// ```
///
/// `stop` is `None` exactly when `consumed` equals the input length.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DecodedStream {
    pub records: Vec<Record>,
    pub consumed: usize,
    pub stop: Option<SoftStop>,
}

impl DecodedStream {
    /// `true` if every input byte belonged to a complete record.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.stop.is_none()
    }

    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

/// Synchronous record stream decoder over an in-memory buffer.
///
/// One decoder covers both byte orders; the order is chosen at
/// construction and applies to every int64 field in the stream. The
/// decoder holds nothing but that choice, so it is `Copy` and a single
/// instance may be shared freely across threads.
///
/// Each record is read field by field with a bounds check before every
/// read:
///
///   1. `payload_size` (8 bytes). Short → [`SoftStop::TruncatedPayloadSize`].
///   2. `timestamp` (8 bytes). Short → [`SoftStop::TruncatedTimestamp`].
///   3. `value_len = payload_size - 8`. Negative →
///      [`SoftStop::InvalidPayloadSize`], and no read is attempted.
///   4. `value` (`value_len` bytes). Short → [`SoftStop::TruncatedValue`].
///
/// The first stop ends decoding. Everything decoded before it is
/// returned, the partial record is dropped, and a `warn!` diagnostic
/// names the field. Malformed input never produces an error.
///
/// # Example
///
/// ```rust
/// use stl_decoder::{ByteOrder, RecordDecoder};
///
/// let mut buf = Vec::new();
/// buf.extend_from_slice(&10_i64.to_be_bytes()); // payload_size
/// buf.extend_from_slice(&42_i64.to_be_bytes()); // timestamp
/// buf.extend_from_slice(b"hi");
///
/// let decoded = RecordDecoder::new(ByteOrder::Big).decode(&buf);
/// assert_eq!(decoded.records.len(), 1);
/// assert_eq!(decoded.records[0].timestamp, 42);
/// assert_eq!(&decoded.records[0].value[..], b"hi");
/// assert!(decoded.is_complete());
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RecordDecoder {
    byte_order: ByteOrder,
}

impl RecordDecoder {
    #[must_use]
    pub const fn new(byte_order: ByteOrder) -> Self {
        Self { byte_order }
    }

    #[must_use]
    pub fn byte_order(self) -> ByteOrder {
        self.byte_order
    }

    /// Decode a borrowed buffer.
    ///
    /// Each value is copied out, so the result does not borrow `buf` and
    /// the caller may reuse or free it immediately.
    #[must_use]
    pub fn decode(self, buf: &[u8]) -> DecodedStream {
        self.decode_with(buf, |range| Bytes::copy_from_slice(&buf[range]))
    }

    /// Decode a shared, immutable buffer without copying values.
    ///
    /// Each value is a [`Bytes::slice`] of `buf`, keeping the underlying
    /// allocation alive for as long as any record does.
    #[must_use]
    pub fn decode_bytes(self, buf: &Bytes) -> DecodedStream {
        self.decode_with(buf, |range| buf.slice(range))
    }

    /// Shared decode loop. `extract` turns a value's byte range into the
    /// stored `Bytes`.
    fn decode_with(
        self,
        buf: &[u8],
        mut extract: impl FnMut(Range<usize>) -> Bytes,
    ) -> DecodedStream {
        let mut cursor = 0;
        let mut records = Vec::new();

        let stop = loop {
            if cursor >= buf.len() {
                break None;
            }

            match self.read_frame(buf, cursor) {
                Ok((timestamp, value)) => {
                    cursor = value.end;
                    records.push(Record {
                        timestamp,
                        value: extract(value),
                    });
                }
                Err(stop) => break Some(stop),
            }
        };

        if let Some(stop) = &stop {
            warn!(
                field = stop.field(),
                offset = stop.offset(),
                records = records.len(),
                "record stream ended early: {stop}"
            );
        }

        DecodedStream {
            records,
            consumed: cursor,
            stop,
        }
    }

    /// Read one frame starting at `start`.
    ///
    /// Returns the timestamp and the byte range of the value. Nothing is
    /// allocated until the whole frame is known to be present.
    fn read_frame(self, buf: &[u8], start: usize) -> Result<(i64, Range<usize>), SoftStop> {
        let order = self.byte_order;

        let payload_size =
            order
                .read_i64(buf, start)
                .map_err(|_| SoftStop::TruncatedPayloadSize {
                    offset: start,
                    available: buf.len() - start,
                })?;

        let ts_offset = start + PAYLOAD_SIZE_LEN;
        let timestamp =
            order
                .read_i64(buf, ts_offset)
                .map_err(|_| SoftStop::TruncatedTimestamp {
                    offset: ts_offset,
                    available: buf.len() - ts_offset,
                })?;

        let len = value_len(payload_size).ok_or(SoftStop::InvalidPayloadSize {
            offset: start,
            payload_size,
        })?;

        // Both int64 fields were present, so value_offset <= buf.len().
        let value_offset = ts_offset + TIMESTAMP_LEN;
        let available = buf.len() - value_offset;
        let end = usize::try_from(len)
            .ok()
            .filter(|&len| len <= available)
            .map(|len| value_offset + len)
            .ok_or(SoftStop::TruncatedValue {
                offset: value_offset,
                expected: len,
                available,
            })?;

        Ok((timestamp, value_offset..end))
    }
}

/// Decode `buf` and return only the records.
///
/// Convenience over [`RecordDecoder::decode`] for callers that do not care
/// why decoding stopped (the reason is still logged).
#[must_use]
pub fn decode(buf: &[u8], byte_order: ByteOrder) -> Vec<Record> {
    RecordDecoder::new(byte_order).decode(buf).into_records()
}
