use bytes::Bytes;
use stl_wire::record_frame::{PAYLOAD_SIZE_LEN, RECORD_HEADER_LEN, value_len};
use stl_wire::{ByteOrder, Record};
use tokio::io::{AsyncRead, AsyncReadExt};
use tracing::warn;

use crate::decoder::DecodedStream;
use crate::error::{DecodeError, SoftStop};

/// Asynchronous record decoder, yielding one record at a time from
/// any `AsyncRead` source without buffering the whole stream.
///
/// This is the counterpart of [`RecordDecoder`](crate::RecordDecoder)
/// for timeline responses read off a socket or file. It applies the
/// same field order and the same soft-stop rules:
///
/// ```text
///   EOF at a record boundary   → clean end, stop() == None
///   EOF inside payload_size    → TruncatedPayloadSize
///   EOF inside timestamp       → TruncatedTimestamp
///   payload_size < 8           → InvalidPayloadSize
///   EOF inside value           → TruncatedValue
/// ```
///
/// A partially read record is never yielded. After the stream ends,
/// for whatever reason, [`next`](Self::next) keeps returning `None`.
///
/// Only a genuine I/O failure of the reader is returned as `Err`; it
/// also ends the stream.
///
/// # Example
///
/// ```rust,no_run
/// use stl_decoder::{ByteOrder, StreamingDecoder};
/// use tokio::io::AsyncRead;
///
/// async fn print_records(reader: impl AsyncRead + Unpin) {
///     let mut stream = StreamingDecoder::new(reader, ByteOrder::Big);
///     while let Some(record) = stream.next().await.transpose().unwrap() {
///         println!("{} {:?}", record.timestamp, record.value_lossy());
///     }
///     if let Some(stop) = stream.stop() {
///         eprintln!("stream cut short: {stop}");
///     }
/// }
/// ```
pub struct StreamingDecoder<R> {
  reader: R,
  byte_order: ByteOrder,
  state: StreamState,
  /// Bytes covered by the records yielded so far.
  consumed: usize,
  records: usize,
  stop: Option<SoftStop>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StreamState {
  ReadRecords,
  Done,
}

impl<R: AsyncRead + Unpin> StreamingDecoder<R> {
  #[must_use]
  pub fn new(reader: R, byte_order: ByteOrder) -> Self {
    Self {
      reader,
      byte_order,
      state: StreamState::ReadRecords,
      consumed: 0,
      records: 0,
      stop: None,
    }
  }

  /// Read the next record.
  ///
  /// Returns `Some(Ok(record))` for each complete record, `None` once
  /// the stream has ended (cleanly or by soft stop), or `Some(Err)` if
  /// the reader itself failed.
  pub async fn next(&mut self) -> Option<Result<Record, DecodeError>> {
    if self.state == StreamState::Done {
      return None;
    }

    match self.read_next_record().await {
      Ok(Some(record)) => {
        self.records += 1;
        Some(Ok(record))
      }
      Ok(None) => {
        self.state = StreamState::Done;
        None
      }
      Err(e) => {
        self.state = StreamState::Done;
        Some(Err(e))
      }
    }
  }

  /// Drain the stream into a [`DecodedStream`], like the synchronous
  /// decoder would have produced for the same bytes.
  ///
  /// # Errors
  ///
  /// [`DecodeError::Io`] if the reader fails.
  pub async fn read_all(mut self) -> Result<DecodedStream, DecodeError> {
    let mut records = Vec::new();
    while let Some(record) = self.next().await {
      records.push(record?);
    }
    Ok(DecodedStream {
      records,
      consumed: self.consumed,
      stop: self.stop,
    })
  }

  /// Why the stream ended early, if it did.
  #[must_use]
  pub fn stop(&self) -> Option<&SoftStop> {
    self.stop.as_ref()
  }

  /// Bytes covered by the records yielded so far.
  #[must_use]
  pub fn consumed(&self) -> usize {
    self.consumed
  }

  #[must_use]
  pub fn byte_order(&self) -> ByteOrder {
    self.byte_order
  }

  /// Give back the underlying reader.
  pub fn into_inner(self) -> R {
    self.reader
  }

  /// Read one complete record, or `Ok(None)` at a clean end or a soft
  /// stop (in which case `self.stop` is set).
  async fn read_next_record(&mut self) -> Result<Option<Record>, DecodeError> {
    let start = self.consumed;
    let mut field = [0u8; 8];

    let filled = self.read_field(&mut field).await?;
    if filled == 0 {
      return Ok(None);
    }
    if filled < field.len() {
      return Ok(self.soft_stop(SoftStop::TruncatedPayloadSize {
        offset: start,
        available: filled,
      }));
    }
    let payload_size = self.byte_order.decode_i64(field);

    let filled = self.read_field(&mut field).await?;
    if filled < field.len() {
      return Ok(self.soft_stop(SoftStop::TruncatedTimestamp {
        offset: start + PAYLOAD_SIZE_LEN,
        available: filled,
      }));
    }
    let timestamp = self.byte_order.decode_i64(field);

    let Some(len) = value_len(payload_size) else {
      return Ok(self.soft_stop(SoftStop::InvalidPayloadSize {
        offset: start,
        payload_size,
      }));
    };

    // Bounded read: a forged payload_size cannot force a huge allocation
    // up front, the buffer only grows as bytes actually arrive.
    let mut value = Vec::new();
    (&mut self.reader).take(len).read_to_end(&mut value).await?;
    if (value.len() as u64) < len {
      return Ok(self.soft_stop(SoftStop::TruncatedValue {
        offset: start + RECORD_HEADER_LEN,
        expected: len,
        available: value.len(),
      }));
    }

    self.consumed = start + RECORD_HEADER_LEN + value.len();
    Ok(Some(Record {
      timestamp,
      value: Bytes::from(value),
    }))
  }

  /// Fill `field` from the reader, returning how many bytes arrived
  /// before EOF.
  async fn read_field(&mut self, field: &mut [u8; 8]) -> Result<usize, DecodeError> {
    let mut filled = 0;
    while filled < field.len() {
      let n = self.reader.read(&mut field[filled..]).await?;
      if n == 0 {
        break;
      }
      filled += n;
    }
    Ok(filled)
  }

  fn soft_stop(&mut self, stop: SoftStop) -> Option<Record> {
    warn!(
      field = stop.field(),
      offset = stop.offset(),
      records = self.records,
      "record stream ended early: {stop}"
    );
    self.stop = Some(stop);
    None
  }
}
