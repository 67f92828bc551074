//! Log output of the decoder, captured through a `tracing-subscriber` fmt
//! layer writing into memory.
//!
//! Kept to a single test so that one scoped subscriber sees every callsite
//! in this binary. Only a soft stop may produce output, at any level.

use std::io;
use std::sync::{Arc, Mutex};

use stl_decoder::{ByteOrder, DecodedStream, RecordDecoder, StreamingDecoder};
use stl_encoder::RecordEncoder;
use tracing::Level;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Captured {
    fn take(&self) -> String {
        let mut buf = self.0.lock().unwrap();
        let text = String::from_utf8_lossy(&buf).into_owned();
        buf.clear();
        text
    }
}

impl io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Drain `payload` through the async decoder on a local runtime.
fn stream_all(payload: &[u8], order: ByteOrder) -> DecodedStream {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(StreamingDecoder::new(payload, order).read_all())
        .unwrap()
}

#[test]
fn only_soft_stops_are_logged() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();

    let mut payload = RecordEncoder::new(ByteOrder::Big)
        .add_record(1, "ok")
        .encode()
        .unwrap();

    tracing::subscriber::with_default(subscriber, || {
        // Empty and clean buffers produce no output at any level.
        let decoded = RecordDecoder::new(ByteOrder::Big).decode(&[]);
        assert!(decoded.records.is_empty());
        assert_eq!(captured.take(), "");

        let decoded = RecordDecoder::new(ByteOrder::Big).decode(&payload);
        assert!(decoded.is_complete());
        assert_eq!(captured.take(), "");

        assert!(stream_all(&[], ByteOrder::Big).is_complete());
        assert_eq!(captured.take(), "");

        assert!(stream_all(&payload, ByteOrder::Big).is_complete());
        assert_eq!(captured.take(), "");

        // A cut-off value is reported once, naming the field and offset.
        payload.extend(ByteOrder::Big.encode_i64(20));
        payload.extend(ByteOrder::Big.encode_i64(2));
        payload.extend(b"short");

        let decoded = RecordDecoder::new(ByteOrder::Big).decode(&payload);
        assert_eq!(decoded.records.len(), 1);
        assert_stop_logged(&captured.take());

        let streamed = stream_all(&payload, ByteOrder::Big);
        assert_eq!(streamed, decoded);
        assert_stop_logged(&captured.take());
    });
}

fn assert_stop_logged(logs: &str) {
    assert_eq!(logs.lines().count(), 1, "{logs}");
    assert!(logs.contains("WARN"), "{logs}");
    assert!(logs.contains("truncated value at offset 34: expected 12 bytes, 5 present"), "{logs}");
    assert!(logs.contains("field=\"value\""), "{logs}");
    assert!(logs.contains("records=1"), "{logs}");
}
