//! Blocking consumption
//!
//! Runs the async engine on the current thread. Suitable for in-memory
//! payloads and `std::io::Read` sources; do not use it with a source that
//! needs a tokio runtime to make progress.

use std::io::Read;

use bytes::Bytes;

use super::engine::BatchReader;
use super::types::{BatchEvent, ReaderState};
use crate::config::ReaderConfig;
use crate::error::Result;
use crate::token::{BlockingRead, JsonTokenSource, TokenSource};

/// Reader over an in-memory payload.
pub type SliceBatchReader = BatchReader<JsonTokenSource<Bytes>>;

/// Reader over a blocking `std::io::Read`.
pub type BlockingBatchReader<R> = BatchReader<JsonTokenSource<BlockingRead<R>>>;

impl<S: TokenSource> BatchReader<S> {
    /// Blocking form of [`read_async`](Self::read_async).
    pub fn read(&mut self) -> Result<Option<BatchEvent>> {
        futures::executor::block_on(self.read_async())
    }
}

impl SliceBatchReader {
    /// Reader over a complete payload held in memory.
    pub fn from_bytes(payload: impl Into<Bytes>, config: ReaderConfig) -> Self {
        let source = JsonTokenSource::with_config(payload.into(), &config);
        BatchReader::new(source, config)
    }
}

impl<R: Read> BlockingBatchReader<R> {
    /// Reader pulling chunks of `config.read_chunk_size` from `reader`.
    pub fn from_reader(reader: R, config: ReaderConfig) -> Self {
        let source = JsonTokenSource::with_config(BlockingRead(reader), &config);
        BatchReader::new(source, config)
    }
}

/// Yields events until completion; an error is yielded once, then iteration stops.
impl<S: TokenSource> Iterator for BatchReader<S> {
    type Item = Result<BatchEvent>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.state == ReaderState::Failed {
            return None;
        }
        self.read().transpose()
    }
}
