//! Implementation of `stl decode`.
//!
//! Reads a record stream, decodes it with `RecordDecoder`, and prints the
//! complete records as a JSON array on stdout (or to `-o <file>`):
//!
//! ```text
//! [{"timestamp":1700000000000,"value":"cpu=0.42"}, ...]
//! ```
//!
//! # Value presentations
//!
//! ```text
//! ┌───────┬───────────────────────────────────────────────────────────────┐
//! │ Mode  │ `value` field                                                 │
//! ├───────┼───────────────────────────────────────────────────────────────┤
//! │ text  │ UTF-8 string, invalid sequences replaced by U+FFFD (default)  │
//! │ bytes │ array of integers 0-255                                       │
//! │ json  │ the value parsed as a JSON document, `null` if it is not one  │
//! └───────┴───────────────────────────────────────────────────────────────┘
//! ```
use std::fs;
use std::io::{self, Write as _};

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::Value;
use stl_decoder::{Record, RecordDecoder};

use crate::DecodeArgs;
use crate::input;

/// How record values are rendered in the JSON output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum ValuePresentation {
    #[default]
    Text,
    Bytes,
    Json,
}

/// One output element.
#[derive(Debug, Serialize)]
struct RenderedRecord {
    timestamp: i64,
    value: Value,
}

/// Run the `stl decode` command.
///
/// # Errors
///
/// Returns an error if the input cannot be read or base64-decoded, or the
/// output cannot be written. A soft stop in the stream is not an error.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let bytes = input::read_stream(&args.source)?;
    let decoded = RecordDecoder::new(args.source.byte_order).decode_bytes(&bytes);

    let rendered = render_records(&decoded.records, args.value);
    let mut out = if args.pretty {
        serde_json::to_string_pretty(&rendered)
    } else {
        serde_json::to_string(&rendered)
    }
    .context("cannot serialize records")?;
    out.push('\n');

    if let Some(path) = &args.output {
        fs::write(path, out.as_bytes())
            .with_context(|| format!("cannot write {}", path.display()))?;
    } else {
        io::stdout()
            .lock()
            .write_all(out.as_bytes())
            .context("cannot write to stdout")?;
    }

    Ok(())
}

/// Convert decoded records into their JSON output form.
fn render_records(records: &[Record], presentation: ValuePresentation) -> Vec<RenderedRecord> {
    records
        .iter()
        .map(|record| RenderedRecord {
            timestamp: record.timestamp,
            value: render_value(&record.value, presentation),
        })
        .collect()
}

fn render_value(value: &[u8], presentation: ValuePresentation) -> Value {
    match presentation {
        ValuePresentation::Text => Value::String(String::from_utf8_lossy(value).into_owned()),
        ValuePresentation::Bytes => Value::from(value.to_vec()),
        ValuePresentation::Json => serde_json::from_slice(value).unwrap_or(Value::Null),
    }
}
