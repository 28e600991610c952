//! Screen buffer model
//!
//! The ordered field partition that decoded orders apply to, and the query
//! surface callers render and assert against.

pub mod buffer;
pub mod field;

pub use buffer::Screen;
pub use field::{Field, FieldContent, StartOfField};
