//! OData Batch Public API
//!
//! Fluent entry points for decoding OData JSON batch payloads. Readers are
//! blocking iterators over in-memory or `std::io::Read` payloads, or async
//! streams over tokio readers.
//!
//! ```rust
//! let payload = r#"{"requests":[
//!     {"id":"1","atomicityGroup":"g1","method":"POST","url":"/Customers","body":{"Name":"A"}},
//!     {"id":"2","atomicityGroup":"g1","method":"PATCH","url":"/Customers('1')","dependsOn":["1"]}
//! ]}"#;
//!
//! let operations = odata_batch::requests()
//!     .max_message_size(64 * 1024)
//!     .collect_operations(payload)
//!     .unwrap();
//! assert_eq!(operations.len(), 2);
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod builder;

pub use builder::BatchReaderBuilder;

// Re-export the reader's public types
pub use odata_batch_reader::{
    AsyncBatchReader, BatchEvent, BatchHeaders, BatchMode, BatchOperation, BatchReader,
    BatchRequest, BatchResponse, BlockingBatchReader, BodyContentBuffer, BodyKind,
    ConfigurationError, Error, ErrorCategory, Kind, OpaqueKind, ReaderConfig, ReaderState,
    ReaderStats, Result, SliceBatchReader, TextEncoding, prelude,
};

// HTTP types carried by decoded operations
pub use http::{HeaderMap, Method, StatusCode};

/// Main entry point providing static builder methods
pub struct OdataBatch;

impl OdataBatch {
    /// Builder for a batch of requests
    #[must_use]
    pub fn requests() -> BatchReaderBuilder {
        BatchReaderBuilder::requests()
    }

    /// Builder for a batch of responses
    #[must_use]
    pub fn responses() -> BatchReaderBuilder {
        BatchReaderBuilder::responses()
    }

    /// Builder that detects the mode from the payload
    #[must_use]
    pub fn auto() -> BatchReaderBuilder {
        BatchReaderBuilder::auto()
    }

    /// Builder starting from an existing configuration
    #[must_use]
    pub fn with_config(config: ReaderConfig) -> BatchReaderBuilder {
        BatchReaderBuilder::with_config(config)
    }
}

/// Builder for a batch of requests
///
/// Shorthand for `BatchReaderBuilder::requests()`
#[must_use]
pub fn requests() -> BatchReaderBuilder {
    BatchReaderBuilder::requests()
}

/// Builder for a batch of responses
///
/// Shorthand for `BatchReaderBuilder::responses()`
#[must_use]
pub fn responses() -> BatchReaderBuilder {
    BatchReaderBuilder::responses()
}

/// Builder that detects the mode from the payload
///
/// Shorthand for `BatchReaderBuilder::auto()`
#[must_use]
pub fn auto() -> BatchReaderBuilder {
    BatchReaderBuilder::auto()
}
