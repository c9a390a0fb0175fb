//! Limit and encoding settings

use odata_batch_reader::{BatchMode, TextEncoding};

use super::core::BatchReaderBuilder;

impl BatchReaderBuilder {
    /// Expected batch mode
    #[must_use]
    pub fn mode(mut self, mode: BatchMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Maximum size of one materialized body, in bytes
    #[must_use]
    pub fn max_message_size(mut self, bytes: usize) -> Self {
        self.config.max_message_size = bytes;
        self
    }

    /// Maximum number of top-level parts; a changeset counts once
    #[must_use]
    pub fn max_parts_per_batch(mut self, parts: usize) -> Self {
        self.config.max_parts_per_batch = parts;
        self
    }

    /// Maximum number of operations inside one changeset
    #[must_use]
    pub fn max_operations_per_changeset(mut self, operations: usize) -> Self {
        self.config.max_operations_per_changeset = operations;
        self
    }

    /// Encoding for buffered JSON and textual bodies without a charset
    #[must_use]
    pub fn encoding(mut self, encoding: TextEncoding) -> Self {
        self.config.encoding = encoding;
        self
    }

    /// Bytes requested from the payload source per refill
    #[must_use]
    pub fn read_chunk_size(mut self, bytes: usize) -> Self {
        self.config.read_chunk_size = bytes;
        self
    }

    /// Maximum JSON nesting depth
    #[must_use]
    pub fn max_nesting_depth(mut self, depth: usize) -> Self {
        self.config.max_nesting_depth = depth;
        self
    }
}
