//! Implementation of `stl encode`.
//!
//! Parses a JSON manifest of records and serializes them into a record
//! stream with `RecordEncoder`. The manifest path is the sole positional
//! argument; the output file is required via `-o`.
//!
//! # Manifest format
//!
//! ```json
//! {
//!   "records": [
//!     { "timestamp": 1700000000000, "value": "cpu=0.42" },
//!     { "timestamp": 1700000001000, "value_hex": "00ff7f" },
//!     { "timestamp": 1700000002000, "value_file": "blobs/frame.bin" }
//!   ]
//! }
//! ```
//!
//! A bare array of records is accepted as well. Each record carries
//! exactly one value source:
//!
//! ```text
//! ┌────────────┬──────────────────────────────────────────────────────┐
//! │ Key        │ Value bytes                                          │
//! ├────────────┼──────────────────────────────────────────────────────┤
//! │ value      │ the string's UTF-8 encoding                          │
//! │ value_hex  │ hex-decoded string (case-insensitive)                │
//! │ value_file │ file contents, path relative to the manifest's dir   │
//! └────────────┴──────────────────────────────────────────────────────┘
//! ```
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use bytes::Bytes;
use stl_encoder::RecordEncoder;

use crate::EncodeArgs;

// ── Manifest serde types ──────────────────────────────────────────────────────

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum Manifest {
    Bare(Vec<ManifestRecord>),
    Wrapped { records: Vec<ManifestRecord> },
}

impl Manifest {
    fn into_records(self) -> Vec<ManifestRecord> {
        match self {
            Self::Bare(records) | Self::Wrapped { records } => records,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestRecord {
    timestamp: i64,
    value: Option<String>,
    value_hex: Option<String>,
    value_file: Option<String>,
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Run the `stl encode` command.
///
/// Prints a one-line summary (`Wrote N bytes (M records) to <path>`) on
/// success.
///
/// # Errors
///
/// Returns an error if the manifest cannot be read or parsed, a record has
/// zero or several value sources, a `value_hex` string is not valid hex, a
/// `value_file` cannot be read, or the output cannot be written.
pub fn run(args: &EncodeArgs) -> Result<()> {
    let manifest_src = fs::read_to_string(&args.input)
        .with_context(|| format!("cannot read {}", args.input.display()))?;

    let manifest: Manifest = serde_json::from_str(&manifest_src)
        .with_context(|| format!("failed to parse manifest {}", args.input.display()))?;

    let manifest_dir = args.input.parent().unwrap_or_else(|| Path::new("."));

    let mut encoder = RecordEncoder::new(args.byte_order);
    for (idx, record) in manifest.into_records().iter().enumerate() {
        let value = resolve_value(record, manifest_dir)
            .with_context(|| format!("record {idx}: cannot resolve value"))?;
        encoder.add_record(record.timestamp, value);
    }

    let bytes = encoder.encode().context("cannot encode records")?;

    fs::write(&args.output, &bytes)
        .with_context(|| format!("cannot write {}", args.output.display()))?;

    tracing::debug!(byte_order = args.byte_order.name(), "encoded manifest");
    println!(
        "Wrote {} bytes ({} records) to {}",
        bytes.len(),
        encoder.len(),
        args.output.display()
    );
    Ok(())
}

// ── Value resolution ──────────────────────────────────────────────────────────

/// Produce the value bytes from whichever single source the record names.
fn resolve_value(record: &ManifestRecord, manifest_dir: &Path) -> Result<Bytes> {
    match (&record.value, &record.value_hex, &record.value_file) {
        (Some(text), None, None) => Ok(Bytes::from(text.clone().into_bytes())),
        (None, Some(hex_str), None) => {
            let raw = hex::decode(hex_str.trim()).context("value_hex is not valid hex")?;
            Ok(Bytes::from(raw))
        }
        (None, None, Some(file)) => {
            let path = manifest_dir.join(file);
            let raw = fs::read(&path).with_context(|| format!("cannot read {}", path.display()))?;
            Ok(Bytes::from(raw))
        }
        (None, None, None) => bail!("one of value, value_hex or value_file is required"),
        _ => bail!("value, value_hex and value_file are mutually exclusive"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stl_decoder::{ByteOrder, Record, RecordDecoder};

    fn parse(src: &str) -> Vec<ManifestRecord> {
        serde_json::from_str::<Manifest>(src).unwrap().into_records()
    }

    #[test]
    fn accepts_bare_and_wrapped_manifests() {
        let bare = parse(r#"[{"timestamp": 1, "value": "a"}]"#);
        let wrapped = parse(r#"{"records": [{"timestamp": 1, "value": "a"}]}"#);
        assert_eq!(bare.len(), 1);
        assert_eq!(wrapped.len(), 1);
        assert_eq!(wrapped[0].timestamp, 1);
    }

    #[test]
    fn resolves_text_and_hex() {
        let records = parse(
            r#"[{"timestamp": -3, "value": "hi"}, {"timestamp": 4, "value_hex": "00FF7f"}]"#,
        );
        let dir = Path::new(".");
        assert_eq!(resolve_value(&records[0], dir).unwrap(), "hi");
        assert_eq!(resolve_value(&records[1], dir).unwrap(), [0x00_u8, 0xFF, 0x7F].as_slice());
    }

    #[test]
    fn rejects_missing_or_conflicting_sources() {
        let records = parse(
            r#"[{"timestamp": 1}, {"timestamp": 2, "value": "a", "value_hex": "61"}]"#,
        );
        let dir = Path::new(".");
        assert!(resolve_value(&records[0], dir).is_err());
        assert!(resolve_value(&records[1], dir).is_err());
    }

    #[test]
    fn rejects_bad_hex() {
        let records = parse(r#"[{"timestamp": 1, "value_hex": "abc"}]"#);
        assert!(resolve_value(&records[0], Path::new(".")).is_err());
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(serde_json::from_str::<Manifest>(r#"[{"timestamp": 1, "vale": "typo"}]"#).is_err());
    }

    // ── run ───────────────────────────────────────────────────────────────────

    fn encode_args(dir: &Path, manifest: &str, byte_order: ByteOrder) -> EncodeArgs {
        let input = dir.join("manifest.json");
        fs::write(&input, manifest).unwrap();
        EncodeArgs {
            input,
            output: dir.join("out.stl"),
            byte_order,
        }
    }

    #[test]
    fn run_resolves_value_file_next_to_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("blobs")).unwrap();
        fs::write(dir.path().join("blobs/frame.bin"), [0x00, 0x01, 0xFF]).unwrap();

        let args = encode_args(
            dir.path(),
            r#"{"records": [
                {"timestamp": 10, "value": "cpu=0.42"},
                {"timestamp": 20, "value_hex": "beef"},
                {"timestamp": 30, "value_file": "blobs/frame.bin"}
            ]}"#,
            ByteOrder::Little,
        );
        run(&args).unwrap();

        let written = fs::read(&args.output).unwrap();
        let decoded = RecordDecoder::new(ByteOrder::Little).decode(&written);
        assert!(decoded.is_complete());
        assert_eq!(
            decoded.records,
            vec![
                Record::new(10, "cpu=0.42"),
                Record::new(20, vec![0xBE_u8, 0xEF]),
                Record::new(30, vec![0x00_u8, 0x01, 0xFF]),
            ]
        );
    }

    #[test]
    fn run_fails_on_missing_value_file() {
        let dir = tempfile::tempdir().unwrap();
        let args = encode_args(
            dir.path(),
            r#"[{"timestamp": 1, "value_file": "absent.bin"}]"#,
            ByteOrder::Big,
        );

        let err = run(&args).unwrap_err();
        assert!(format!("{err:#}").contains("record 0"), "{err:#}");
        assert!(!args.output.exists());
    }

    #[test]
    fn run_writes_an_empty_stream_for_no_records() {
        let dir = tempfile::tempdir().unwrap();
        let args = encode_args(dir.path(), "[]", ByteOrder::Big);
        run(&args).unwrap();
        assert!(fs::read(&args.output).unwrap().is_empty());
    }
}
