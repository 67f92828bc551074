#![warn(clippy::pedantic)]

pub mod byte_order;
pub mod error;
pub mod record;
pub mod record_frame;

pub use byte_order::ByteOrder;
pub use error::WireError;
pub use record::Record;
pub use record_frame::RecordFrame;
