#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use stl_decoder::{ByteOrder, RecordDecoder};
use stl_encoder::RecordEncoder;

#[derive(Debug, Arbitrary)]
struct FuzzRecord {
    timestamp: i64,
    value: Vec<u8>,
}

#[derive(Debug, Arbitrary)]
struct FuzzInput {
    records: Vec<FuzzRecord>,
    little_endian: bool,
    /// Bytes to cut off the end of the encoded stream.
    cut: u16,
}

// Fuzz target: RecordEncoder -> RecordDecoder roundtrip, optionally
// truncated.
//
// The full stream must decode back to the input. Cutting any bytes off
// the end must leave a strict prefix of the records.
fuzz_target!(|data: &[u8]| {
    let mut u = Unstructured::new(data);
    let Ok(input) = FuzzInput::arbitrary(&mut u) else {
        return;
    };

    let order = if input.little_endian { ByteOrder::Little } else { ByteOrder::Big };
    let record_count = input.records.len().min(64);

    let mut encoder = RecordEncoder::new(order);
    for record in &input.records[..record_count] {
        encoder.add_record(record.timestamp, record.value.clone());
    }
    let payload = encoder.encode().unwrap();

    let decoded = RecordDecoder::new(order).decode(&payload);
    assert!(decoded.is_complete());
    assert_eq!(decoded.records.len(), record_count);
    for (got, want) in decoded.records.iter().zip(&input.records) {
        assert_eq!(got.timestamp, want.timestamp);
        assert_eq!(&got.value[..], want.value.as_slice());
    }

    let cut = usize::from(input.cut).min(payload.len());
    if cut > 0 {
        let truncated = RecordDecoder::new(order).decode(&payload[..payload.len() - cut]);
        assert!(truncated.records.len() < record_count);
        assert_eq!(truncated.records[..], decoded.records[..truncated.records.len()]);
    }
});
