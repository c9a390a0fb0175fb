//! Batch decoding errors
//!
//! Every failure aborts the current read. Errors carry a structured [`Kind`]
//! and are grouped into an [`ErrorCategory`] for callers that only care
//! whether the payload was malformed, mis-ordered or too large.

pub mod classification;
pub mod constructors;
pub mod types;

pub use classification::ErrorCategory;
pub use constructors::*;
pub use types::{Error, Kind, Result};
