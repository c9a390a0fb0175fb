//! Batch item scanning
//!
//! Each object in the `requests`/`responses` array is scanned into a
//! [`PayloadItemPropertyCache`] before the reader decides what it means.

mod cache;
mod headers;
mod properties;

pub use cache::PayloadItemPropertyCache;
pub use headers::BatchHeaders;
pub use properties::{PropertyName, PropertyValue};
