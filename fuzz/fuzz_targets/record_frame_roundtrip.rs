#![no_main]

use libfuzzer_sys::fuzz_target;
use stl_decoder::{ByteOrder, RecordDecoder};
use stl_wire::RecordFrame;

// Fuzz target: RecordFrame write->decode roundtrip.
//
// Input format:
//   byte 0:     byte order (even = big, odd = little)
//   bytes 1..9: timestamp
//   bytes 9..:  value
fuzz_target!(|data: &[u8]| {
    if data.len() < 9 {
        return;
    }

    let order = if data[0] % 2 == 0 { ByteOrder::Big } else { ByteOrder::Little };
    let mut ts = [0u8; 8];
    ts.copy_from_slice(&data[1..9]);
    let frame = RecordFrame {
        timestamp: i64::from_le_bytes(ts),
        value: &data[9..],
    };

    let mut wire = Vec::new();
    let written = frame.write_to(&mut wire, order).unwrap();
    assert_eq!(written, wire.len());

    let decoded = RecordDecoder::new(order).decode(&wire);
    assert!(decoded.is_complete());
    assert_eq!(decoded.records.len(), 1);
    assert_eq!(decoded.records[0].timestamp, frame.timestamp);
    assert_eq!(&decoded.records[0].value[..], frame.value);
});
