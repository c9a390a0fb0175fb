//! Batch reader builder modules
//!
//! Fluent configuration of a batch reader and the entry points that attach
//! it to a payload.

pub mod core;
pub mod execution;
pub mod limits;

pub use self::core::BatchReaderBuilder;
