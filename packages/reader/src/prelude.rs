//! OData Batch Prelude
//!
//! The types needed to read a batch and inspect what it yields.

// Readers
pub use crate::reader::{AsyncBatchReader, BatchReader, BlockingBatchReader, SliceBatchReader};

// What the reader yields
pub use crate::body::{BodyContentBuffer, BodyKind, OpaqueKind};
pub use crate::item::BatchHeaders;
pub use crate::reader::{
    BatchEvent, BatchOperation, BatchRequest, BatchResponse, ReaderState, ReaderStats,
};

// Configuration
pub use crate::config::{BatchMode, ReaderConfig, TextEncoding};

// Error types
pub use crate::error::{Error, ErrorCategory, Kind};

// Token source trait, needed to call its provided methods on custom sources
pub use crate::token::TokenSource;
