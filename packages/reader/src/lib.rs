//! # OData JSON Batch Reader
//!
//! Pull-based decoder for the OData JSON batch format: one JSON object whose
//! `requests` or `responses` array packs many HTTP-like operations, optionally
//! grouped into atomicity groups (changesets) and linked by `dependsOn`.
//!
//! ## Features
//!
//! - **Single engine** for blocking iteration and async streaming
//! - **Changeset tracking** with contiguity checks on atomicity groups
//! - **dependsOn validation** and flattening of group references
//! - **Case-insensitive item properties** with duplicate detection
//! - **Body buffers** that accept `body` and `headers` in either order
//! - **Bounded input**: body size, part count and nesting depth limits
//!
//! ## Usage
//!
//! ```rust
//! use odata_batch_reader::{BatchEvent, ReaderConfig, SliceBatchReader};
//!
//! let payload = r#"{"requests":[{"id":"1","method":"get","url":"/Customers"}]}"#;
//! let reader = SliceBatchReader::from_bytes(payload, ReaderConfig::default());
//!
//! for event in reader {
//!     if let BatchEvent::Operation(operation) = event.unwrap() {
//!         let request = operation.as_request().unwrap();
//!         assert_eq!(request.method.as_str(), "GET");
//!         assert_eq!(request.url, "/Customers");
//!     }
//! }
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all)]

pub mod atomic_group;
pub mod body;
pub mod config;
pub mod dependency;
pub mod error;
pub mod item;
pub mod prelude;
pub mod reader;
pub mod token;

pub use atomic_group::AtomicGroupCache;
pub use body::{BodyContentBuffer, BodyKind, OpaqueKind};
pub use config::{BatchMode, ConfigurationError, ReaderConfig, TextEncoding, Validator};
pub use dependency::DependencyValidator;
pub use error::{Error, ErrorCategory, Kind, Result};
pub use item::{BatchHeaders, PayloadItemPropertyCache, PropertyName, PropertyValue};
pub use reader::{
    AsyncBatchReader, BatchEvent, BatchOperation, BatchReader, BatchRequest, BatchResponse,
    BlockingBatchReader, ReaderState, ReaderStats, SliceBatchReader,
};
pub use token::{
    AsyncReadSource, BlockingRead, ByteSource, JsonScalar, JsonTokenSource, NodeKind, TokenSource,
};
