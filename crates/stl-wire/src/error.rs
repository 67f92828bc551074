/// Errors raised by the fixed-width field codec.
///
/// Only [`WireError::UnknownByteOrder`] is a caller bug. The record
/// decoders never surface `UnexpectedEof` to their callers; they turn it
/// into a soft stop instead.
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// Fewer bytes remained than a fixed-width field needs.
    #[error("unexpected end of input at offset {offset}: needed {needed} bytes, {available} available")]
    UnexpectedEof {
        offset: usize,
        needed: usize,
        available: usize,
    },

    /// A byte order name that is neither big nor little endian.
    #[error("unknown byte order {value:?}: expected big|little")]
    UnknownByteOrder { value: String },

    /// A value so long that `8 + len` does not fit the signed 64-bit
    /// `payload_size` field.
    #[error("value of {len} bytes does not fit an int64 payload_size")]
    ValueTooLarge { len: usize },

    /// I/O error while writing a frame.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
