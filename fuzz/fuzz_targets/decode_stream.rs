#![no_main]

use libfuzzer_sys::fuzz_target;
use stl_decoder::{ByteOrder, RecordDecoder};
use stl_encoder::RecordEncoder;

// Fuzz target: RecordDecoder on arbitrary bytes, in both byte orders.
//
// Catches bugs in:
// - Offset arithmetic near the end of the buffer
// - Negative and huge payload_size values
// - A stop being reported (or missed) at the wrong point
fuzz_target!(|data: &[u8]| {
    for order in ByteOrder::ALL {
        let decoded = RecordDecoder::new(order).decode(data);

        assert!(decoded.consumed <= data.len());
        assert_eq!(decoded.stop.is_none(), decoded.consumed == data.len());

        // The decoded records are exactly the bytes they came from.
        let mut encoder = RecordEncoder::new(order);
        encoder.extend(decoded.records.iter().cloned());
        let reencoded = encoder.encode().unwrap();
        assert_eq!(reencoded.as_slice(), &data[..decoded.consumed]);
    }
});
