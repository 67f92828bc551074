use bytes::Bytes;
use stl_wire::{ByteOrder, Record, RecordFrame, WireError};

use crate::error::EncodeError;

/// Record stream encoder, the inverse of `stl_decoder::RecordDecoder`.
///
/// Records are appended with [`add_record`](Self::add_record) (or
/// [`add`](Self::add) for an existing [`Record`]) and serialized in
/// insertion order by [`encode`](Self::encode):
///
/// ```text
/// ┌──────────────┬──────────────────────────────────────────┐
/// │ [16 + n0]    │ Record 0 (payload_size, timestamp, value) │
/// │ [16 + n1]    │ Record 1                                  │
/// │ ...          │                                           │
/// └──────────────┴──────────────────────────────────────────┘
/// ```
///
/// There is no header or trailer, so an encoder with no records produces
/// an empty buffer, which decodes to zero records.
///
/// # Usage
///
/// ```rust
/// use stl_encoder::{ByteOrder, RecordEncoder};
///
/// let payload = RecordEncoder::new(ByteOrder::Big)
///     .add_record(1_700_000_000_000, "cpu=0.42")
///     .add_record(1_700_000_001_000, "cpu=0.40")
///     .encode()
///     .unwrap();
///
/// assert_eq!(payload.len(), 2 * (16 + 8));
/// ```
#[derive(Clone, Debug, Default)]
pub struct RecordEncoder {
    byte_order: ByteOrder,
    records: Vec<Record>,
}

impl RecordEncoder {
    #[must_use]
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            records: Vec::new(),
        }
    }

    /// Append a record built from a timestamp and a value.
    pub fn add_record(&mut self, timestamp: i64, value: impl Into<Bytes>) -> &mut Self {
        self.records.push(Record::new(timestamp, value));
        self
    }

    /// Append an existing record.
    pub fn add(&mut self, record: Record) -> &mut Self {
        self.records.push(record);
        self
    }

    #[must_use]
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Exact size of the encoded stream in bytes.
    #[must_use]
    pub fn encoded_len(&self) -> usize {
        self.records.iter().map(Record::encoded_len).sum()
    }

    /// Serialize all records into a new buffer.
    ///
    /// # Errors
    ///
    /// [`EncodeError::ValueTooLarge`] if a value is too long to describe
    /// with an int64 `payload_size`.
    pub fn encode(&self) -> Result<Vec<u8>, EncodeError> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_to(&mut buf)?;
        Ok(buf)
    }

    /// Serialize all records into `w`.
    ///
    /// # Returns
    ///
    /// Total number of bytes written.
    ///
    /// # Errors
    ///
    /// - [`EncodeError::ValueTooLarge`] as for [`encode`](Self::encode).
    /// - [`EncodeError::Wire`] if the writer fails.
    pub fn encode_to(&self, w: &mut impl std::io::Write) -> Result<usize, EncodeError> {
        let mut written = 0;

        for (index, record) in self.records.iter().enumerate() {
            let frame = RecordFrame {
                timestamp: record.timestamp,
                value: &record.value,
            };
            written += frame
                .write_to(&mut *w, self.byte_order)
                .map_err(|e| match e {
                    WireError::ValueTooLarge { len } => EncodeError::ValueTooLarge { index, len },
                    other => EncodeError::Wire(other),
                })?;
        }

        Ok(written)
    }
}

impl Extend<Record> for RecordEncoder {
    fn extend<I: IntoIterator<Item = Record>>(&mut self, iter: I) {
        self.records.extend(iter);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stl_decoder::RecordDecoder;

    #[test]
    fn empty_encoder_produces_empty_stream() {
        let enc = RecordEncoder::new(ByteOrder::Big);
        assert!(enc.is_empty());
        assert!(enc.encode().unwrap().is_empty());
    }

    #[test]
    fn big_endian_layout() {
        let payload = RecordEncoder::new(ByteOrder::Big)
            .add_record(42, "hi")
            .encode()
            .unwrap();

        assert_eq!(&payload[..8], &10_i64.to_be_bytes());
        assert_eq!(&payload[8..16], &42_i64.to_be_bytes());
        assert_eq!(&payload[16..], b"hi");
    }

    #[test]
    fn little_endian_layout() {
        let payload = RecordEncoder::new(ByteOrder::Little)
            .add_record(42, "hi")
            .encode()
            .unwrap();

        assert_eq!(&payload[..8], &10_i64.to_le_bytes());
        assert_eq!(&payload[8..16], &42_i64.to_le_bytes());
    }

    #[test]
    fn encoded_len_matches_output() {
        let mut enc = RecordEncoder::new(ByteOrder::Little);
        enc.add_record(1, "abc")
            .add_record(2, Bytes::new())
            .add(Record::new(3, vec![0u8; 300]));

        assert_eq!(enc.len(), 3);
        assert_eq!(enc.encode().unwrap().len(), enc.encoded_len());
        assert_eq!(enc.encoded_len(), 16 * 3 + 3 + 300);
    }

    #[test]
    fn encode_to_reports_bytes_written() {
        let mut enc = RecordEncoder::new(ByteOrder::Big);
        enc.extend([Record::new(5, "five"), Record::new(6, "six")]);

        let mut out = Vec::new();
        let n = enc.encode_to(&mut out).unwrap();
        assert_eq!(n, out.len());
        assert_eq!(n, 16 + 4 + 16 + 3);
    }

    #[test]
    fn decodes_back_in_both_orders() {
        for order in ByteOrder::ALL {
            let mut enc = RecordEncoder::new(order);
            enc.add_record(i64::MIN, "min")
                .add_record(0, Bytes::new())
                .add_record(i64::MAX, vec![0xFF_u8, 0x00, 0x7F]);

            let payload = enc.encode().unwrap();
            let decoded = RecordDecoder::new(order).decode(&payload);
            assert!(decoded.is_complete());
            assert_eq!(decoded.consumed, payload.len());
            assert_eq!(decoded.records, enc.records);
        }
    }

    #[test]
    fn writer_failure_is_a_wire_error() {
        struct Full;
        impl std::io::Write for Full {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Err(std::io::Error::new(std::io::ErrorKind::WriteZero, "full"))
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let err = RecordEncoder::new(ByteOrder::Big)
            .add_record(1, "x")
            .encode_to(&mut Full)
            .unwrap_err();
        assert!(matches!(err, EncodeError::Wire(WireError::Io(_))));
    }
}
