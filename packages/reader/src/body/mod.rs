//! Body content buffers
//!
//! A batch item's `body` is either a JSON object/array or a string. The
//! buffer captures it from the token source and materializes it into bytes
//! the caller can read after the reader has moved on.

mod buffer;
pub mod content_type;
mod json_copy;
mod reader;

pub use buffer::{BodyContentBuffer, BodyKind, OpaqueKind};
pub(crate) use json_copy::copy_subtree;
