//! 3270 data stream handling
//!
//! Everything between a framed record and the screen buffer: protocol
//! constants, buffer address codecs, the decoded order model, and the
//! decoder itself.

pub mod address;
pub mod codes;
pub mod decoder;
pub mod order;

pub use codes::{CommandCode, WriteControlCharacter};
pub use decoder::{DataStreamMessage, DatastreamDecoder};
pub use order::{
    Colour, FieldAttributes, Highlight, Order, ReadPartitionType, StructuredField,
};
