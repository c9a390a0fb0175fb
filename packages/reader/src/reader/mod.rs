//! Batch reader state machine
//!
//! [`BatchReader`] turns a token source into a sequence of [`BatchEvent`]s:
//! changeset boundaries and decoded requests or responses. The same engine
//! backs the blocking iterator and the async stream.

mod blocking;
mod engine;
mod stream;
mod transitions;
mod types;

pub use blocking::{BlockingBatchReader, SliceBatchReader};
pub use engine::BatchReader;
pub use stream::AsyncBatchReader;
pub use types::{
    BatchEvent, BatchOperation, BatchRequest, BatchResponse, ReaderState, ReaderStats,
};
