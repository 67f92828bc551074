//! Golden fixture generator for the STL conformance test suite.
//!
//! This binary creates all fixture files under `tests/golden/`. Run it once
//! after making wire-format changes to regenerate the committed binary
//! payloads.
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin generate_golden -p stl-tests
//! ```
//!
//! # Generated fixtures
//!
//! | Directory                          | Contents                                      |
//! |------------------------------------|-----------------------------------------------|
//! | single_record                      | One big-endian record: 42, "hi"               |
//! | multi_record                       | Three big-endian records, one with empty value |
//! | little_endian                      | Same records as multi_record, little-endian   |
//! | edge_cases/truncated_payload_size  | multi_record + 5 stray bytes                  |
//! | edge_cases/truncated_timestamp     | multi_record + payload_size + 3 timestamp bytes |
//! | edge_cases/truncated_value         | multi_record + header claiming 8 value bytes, 2 present |
//! | edge_cases/invalid_payload_size    | single_record + record with payload_size 4    |
//! | edge_cases/negative_payload_size   | payload_size -1 followed by 16 bytes          |
//!
//! Each directory also gets a `manifest.json` describing the well-formed
//! prefix in the `stl encode` manifest format.

#![allow(clippy::pedantic)]

use std::path::Path;

use stl_encoder::RecordEncoder;
use stl_wire::ByteOrder;

/// Records shared by `multi_record`, `little_endian`, and the truncation
/// fixtures.
const MULTI_RECORDS: [(i64, &str); 3] = [
    (1_700_000_000_000, "cpu=0.42"),
    (1_700_000_001_000, ""),
    (1_700_000_002_000, r#"{"temp":21.5}"#),
];

const MULTI_MANIFEST: &str = r#"  "records": [
    { "timestamp": 1700000000000, "value": "cpu=0.42" },
    { "timestamp": 1700000001000, "value": "" },
    { "timestamp": 1700000002000, "value": "{\"temp\":21.5}" }
  ]"#;

fn main() {
    let manifest_dir = std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let golden_dir = manifest_dir.join("tests/golden");

    generate_single_record(&golden_dir);
    generate_multi_record(&golden_dir);
    generate_little_endian(&golden_dir);
    generate_edge_cases(&golden_dir);

    println!("All golden fixtures written to {}", golden_dir.display());
}

// ── Helpers ──────────────────────────────────────────────────────────────────

fn write_file(path: &Path, data: &[u8]) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("create_dir_all");
    }
    std::fs::write(path, data).expect("write_file");
    println!("  wrote {}", path.display());
}

fn write_manifest(dir: &Path, description: &str, records: &str) {
    let json = format!("{{\n  \"description\": {description:?},\n{records}\n}}\n");
    write_file(&dir.join("manifest.json"), json.as_bytes());
}

fn payload_path(dir: &Path) -> std::path::PathBuf {
    dir.join("payload.stl")
}

fn encode(order: ByteOrder, records: &[(i64, &str)]) -> Vec<u8> {
    let mut encoder = RecordEncoder::new(order);
    for &(timestamp, value) in records {
        encoder.add_record(timestamp, value.as_bytes().to_vec());
    }
    encoder.encode().expect("encode records")
}

// ── Fixture generators ────────────────────────────────────────────────────────

fn generate_single_record(golden: &Path) {
    let dir = golden.join("single_record");
    write_manifest(
        &dir,
        "One big-endian record: timestamp 42, value \"hi\" (payload_size 10).",
        r#"  "records": [
    { "timestamp": 42, "value": "hi" }
  ]"#,
    );
    write_file(&payload_path(&dir), &encode(ByteOrder::Big, &[(42, "hi")]));
}

fn generate_multi_record(golden: &Path) {
    let dir = golden.join("multi_record");
    write_manifest(
        &dir,
        "Three big-endian records; the second has an empty value.",
        MULTI_MANIFEST,
    );
    write_file(&payload_path(&dir), &encode(ByteOrder::Big, &MULTI_RECORDS));
}

fn generate_little_endian(golden: &Path) {
    let dir = golden.join("little_endian");
    write_manifest(
        &dir,
        "The multi_record records encoded little-endian.",
        MULTI_MANIFEST,
    );
    write_file(&payload_path(&dir), &encode(ByteOrder::Little, &MULTI_RECORDS));
}

fn generate_edge_cases(golden: &Path) {
    generate_edge_truncated_payload_size(golden);
    generate_edge_truncated_timestamp(golden);
    generate_edge_truncated_value(golden);
    generate_edge_invalid_payload_size(golden);
    generate_edge_negative_payload_size(golden);
}

fn generate_edge_truncated_payload_size(golden: &Path) {
    let dir = golden.join("edge_cases/truncated_payload_size");
    write_manifest(
        &dir,
        "multi_record followed by 5 zero bytes: a payload_size cut off after 5 of 8 bytes.",
        MULTI_MANIFEST,
    );

    let mut payload = encode(ByteOrder::Big, &MULTI_RECORDS);
    payload.extend_from_slice(&[0; 5]);
    write_file(&payload_path(&dir), &payload);
}

fn generate_edge_truncated_timestamp(golden: &Path) {
    let dir = golden.join("edge_cases/truncated_timestamp");
    write_manifest(
        &dir,
        "multi_record, then payload_size 12 and only 3 timestamp bytes.",
        MULTI_MANIFEST,
    );

    let mut payload = encode(ByteOrder::Big, &MULTI_RECORDS);
    payload.extend_from_slice(&ByteOrder::Big.encode_i64(12));
    payload.extend_from_slice(&[0, 0, 1]);
    write_file(&payload_path(&dir), &payload);
}

fn generate_edge_truncated_value(golden: &Path) {
    let dir = golden.join("edge_cases/truncated_value");
    write_manifest(
        &dir,
        "multi_record, then payload_size 16, timestamp 99 and 2 of 8 value bytes (\"hi\").",
        MULTI_MANIFEST,
    );

    let mut payload = encode(ByteOrder::Big, &MULTI_RECORDS);
    payload.extend_from_slice(&ByteOrder::Big.encode_i64(16));
    payload.extend_from_slice(&ByteOrder::Big.encode_i64(99));
    payload.extend_from_slice(b"hi");
    write_file(&payload_path(&dir), &payload);
}

fn generate_edge_invalid_payload_size(golden: &Path) {
    let dir = golden.join("edge_cases/invalid_payload_size");
    write_manifest(
        &dir,
        "single_record, then payload_size 4 with timestamp 7 and 8 bytes of junk.",
        r#"  "records": [
    { "timestamp": 42, "value": "hi" }
  ]"#,
    );

    let mut payload = encode(ByteOrder::Big, &[(42, "hi")]);
    payload.extend_from_slice(&ByteOrder::Big.encode_i64(4));
    payload.extend_from_slice(&ByteOrder::Big.encode_i64(7));
    payload.extend_from_slice(b"junkjunk");
    write_file(&payload_path(&dir), &payload);
}

fn generate_edge_negative_payload_size(golden: &Path) {
    let dir = golden.join("edge_cases/negative_payload_size");
    write_manifest(
        &dir,
        "payload_size -1 (all 0xFF) followed by 16 bytes. No record decodes.",
        r#"  "records": []"#,
    );

    let mut payload = ByteOrder::Big.encode_i64(-1).to_vec();
    payload.extend_from_slice(&[0xAB; 16]);
    write_file(&payload_path(&dir), &payload);
}
