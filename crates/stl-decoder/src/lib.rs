#![warn(clippy::pedantic)]

pub mod decoder;
pub mod error;
pub mod streaming;

pub use decoder::{DecodedStream, RecordDecoder, decode};
pub use error::{DecodeError, SoftStop};
pub use streaming::StreamingDecoder;
pub use stl_wire::{ByteOrder, Record};
