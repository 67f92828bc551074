use stl_wire::WireError;

/// Errors that can occur while encoding a record stream.
///
/// ```text
///   EncodeError
///   ├── ValueTooLarge      ← 8 + value length overflows int64
///   └── Wire(WireError)    ← writer failure from stl-wire framing
/// ```
#[derive(Debug, thiserror::Error)]
pub enum EncodeError {
    #[error("record {index}: value of {len} bytes does not fit an int64 payload_size")]
    ValueTooLarge { index: usize, len: usize },

    #[error(transparent)]
    Wire(#[from] WireError),
}
