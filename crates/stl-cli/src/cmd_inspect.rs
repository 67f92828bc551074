//! Implementation of `stl inspect`.
//!
//! Decodes a record stream and prints one line per complete record with
//! its byte offset, followed by how the stream ended.
//!
//! # Output format
//!
//! ```text
//! Stream: 3 records, big-endian, 69 of 74 bytes decoded
//! Record 0 @0: ts=1700000000000 len=8 "cpu=0.42"
//! Record 1 @24: ts=1700000001000 len=0 ""
//! Record 2 @40: ts=1700000002000 len=13 "{\"temp\":21.5}"
//! ---
//! Stopped: truncated payload_size at offset 69: 5 of 8 bytes present
//! ```
use anyhow::Result;
use stl_decoder::{DecodedStream, RecordDecoder};

use crate::InspectArgs;
use crate::input;

/// Longest value preview, in characters.
const PREVIEW_CHARS: usize = 60;

/// Run the `stl inspect` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or base64-decoded.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes = input::read_stream(&args.source)?;
    let decoded = RecordDecoder::new(args.source.byte_order).decode_bytes(&bytes);

    for line in render(&decoded, args.source.byte_order, bytes.len(), args.show_hex) {
        println!("{line}");
    }
    Ok(())
}

fn render(
    decoded: &DecodedStream,
    byte_order: stl_decoder::ByteOrder,
    total: usize,
    show_hex: bool,
) -> Vec<String> {
    let count = decoded.records.len();
    let mut lines = vec![format!(
        "Stream: {count} record{}, {byte_order}, {} of {total} bytes decoded",
        if count == 1 { "" } else { "s" },
        decoded.consumed,
    )];

    let mut offset = 0;
    for (idx, record) in decoded.records.iter().enumerate() {
        lines.push(format!(
            "Record {idx} @{offset}: ts={} len={} {:?}",
            record.timestamp,
            record.value.len(),
            preview(&record.value_lossy()),
        ));
        if show_hex {
            lines.extend(hex_dump(&record.value));
        }
        offset += record.encoded_len();
    }

    lines.push("---".to_string());
    match &decoded.stop {
        Some(stop) => lines.push(format!("Stopped: {stop}")),
        None => lines.push(format!("Clean end at offset {}", decoded.consumed)),
    }
    lines
}

fn preview(text: &str) -> String {
    if text.chars().count() > PREVIEW_CHARS {
        let mut short: String = text.chars().take(PREVIEW_CHARS).collect();
        short.push('…');
        short
    } else {
        text.to_string()
    }
}

/// 16 bytes per line: offset, hex pairs, printable ASCII.
fn hex_dump(value: &[u8]) -> Vec<String> {
    value
        .chunks(16)
        .enumerate()
        .map(|(i, chunk)| {
            let pairs = hex::encode(chunk)
                .as_bytes()
                .chunks(2)
                .map(|pair| String::from_utf8_lossy(pair).into_owned())
                .collect::<Vec<_>>()
                .join(" ");
            let ascii: String = chunk
                .iter()
                .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
                .collect();
            format!("    {:04x}  {pairs:<47}  {ascii}", i * 16)
        })
        .collect()
}
