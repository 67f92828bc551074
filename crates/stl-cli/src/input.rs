//! Reading the stream bytes for `decode` and `inspect`.

use std::fs;
use std::io::{self, Read as _};
use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;

use crate::SourceArgs;

/// Read the stream named by `source`, decoding base64 if requested.
///
/// # Errors
///
/// Returns an error if the file (or stdin) cannot be read, or if
/// `--base64` is set and the input is not valid base64.
pub fn read_stream(source: &SourceArgs) -> Result<Bytes> {
    let raw = read_raw(&source.file)?;

    if source.base64 {
        let decoded = decode_base64(&raw)
            .with_context(|| format!("{} is not valid base64", display_name(&source.file)))?;
        tracing::debug!(encoded = raw.len(), decoded = decoded.len(), "decoded base64 input");
        Ok(Bytes::from(decoded))
    } else {
        Ok(Bytes::from(raw))
    }
}

/// Human-readable name for an input path (`-` reads as stdin).
pub fn display_name(path: &Path) -> String {
    if is_stdin(path) {
        "<stdin>".to_string()
    } else {
        path.display().to_string()
    }
}

fn read_raw(path: &Path) -> Result<Vec<u8>> {
    if is_stdin(path) {
        let mut buf = Vec::new();
        io::stdin()
            .lock()
            .read_to_end(&mut buf)
            .context("cannot read stdin")?;
        Ok(buf)
    } else {
        fs::read(path).with_context(|| format!("cannot read {}", path.display()))
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Standard-alphabet base64, with any ASCII whitespace stripped first so
/// wrapped text (e.g. from `base64` without `-w0`) decodes as-is.
fn decode_base64(text: &[u8]) -> Result<Vec<u8>, base64::DecodeError> {
    let compact: Vec<u8> = text
        .iter()
        .copied()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    STANDARD.decode(compact)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base64_ignores_line_breaks() {
        assert_eq!(decode_base64(b"aGVs\nbG8=\n").unwrap(), b"hello");
    }

    #[test]
    fn base64_rejects_garbage() {
        assert!(decode_base64(b"not base64!").is_err());
    }

    #[test]
    fn dash_is_stdin() {
        assert!(is_stdin(Path::new("-")));
        assert!(!is_stdin(Path::new("./-")));
        assert_eq!(display_name(Path::new("-")), "<stdin>");
    }
}
