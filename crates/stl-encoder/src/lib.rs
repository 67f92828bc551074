#![warn(clippy::pedantic)]

pub mod encoder;
pub mod error;

pub use encoder::RecordEncoder;
pub use error::EncodeError;
pub use stl_wire::{ByteOrder, Record};
