//! Attaching a configured builder to a payload

use std::io::Read;

use bytes::Bytes;
use futures::{Stream, StreamExt};
use odata_batch_reader::{
    AsyncBatchReader, BatchEvent, BatchOperation, BlockingBatchReader, ReaderConfig, Result,
    SliceBatchReader, Validator, error,
};
use tokio::io::AsyncRead;

use super::core::BatchReaderBuilder;

impl BatchReaderBuilder {
    /// Validates and returns the configuration
    ///
    /// # Errors
    ///
    /// Returns a configuration error for zero or contradictory limits.
    pub fn build_config(self) -> Result<ReaderConfig> {
        self.config.validate().map_err(error::configuration)?;
        if self.debug_enabled {
            tracing::debug!(target: "odata_batch::builder", config = ?self.config, "reader configured");
        }
        Ok(self.config)
    }

    /// Reader over an in-memory payload
    ///
    /// # Errors
    ///
    /// Returns a configuration error if validation fails.
    pub fn slice(self, payload: impl Into<Bytes>) -> Result<SliceBatchReader> {
        Ok(SliceBatchReader::from_bytes(payload, self.build_config()?))
    }

    /// Reader over a blocking `std::io::Read`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if validation fails.
    pub fn reader<R: Read>(self, reader: R) -> Result<BlockingBatchReader<R>> {
        Ok(BlockingBatchReader::from_reader(reader, self.build_config()?))
    }

    /// Reader over a tokio `AsyncRead`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if validation fails.
    pub fn async_reader<R: AsyncRead + Unpin>(self, reader: R) -> Result<AsyncBatchReader<R>> {
        Ok(AsyncBatchReader::from_async_reader(reader, self.build_config()?))
    }

    /// Event stream over a tokio `AsyncRead`
    ///
    /// # Errors
    ///
    /// Returns a configuration error if validation fails.
    pub fn stream<R: AsyncRead + Unpin>(
        self,
        reader: R,
    ) -> Result<impl Stream<Item = Result<BatchEvent>>> {
        Ok(self.async_reader(reader)?.into_stream())
    }

    /// Reads a whole in-memory payload into its events
    ///
    /// # Errors
    ///
    /// Returns the first error the reader reports.
    pub fn collect_events(self, payload: impl Into<Bytes>) -> Result<Vec<BatchEvent>> {
        self.slice(payload)?.collect()
    }

    /// Reads a whole in-memory payload, keeping only requests and responses
    ///
    /// # Errors
    ///
    /// Returns the first error the reader reports.
    pub fn collect_operations(self, payload: impl Into<Bytes>) -> Result<Vec<BatchOperation>> {
        self.slice(payload)?
            .filter_map(|event| event.map(BatchEvent::into_operation).transpose())
            .collect()
    }

    /// Reads an async payload to the end, keeping only requests and responses
    ///
    /// # Errors
    ///
    /// Returns the first error the reader reports.
    pub async fn collect_operations_async<R: AsyncRead + Unpin>(
        self,
        reader: R,
    ) -> Result<Vec<BatchOperation>> {
        let stream = self.stream(reader)?;
        let mut stream = std::pin::pin!(stream);
        let mut operations = Vec::new();
        while let Some(event) = stream.next().await {
            if let Some(operation) = event?.into_operation() {
                operations.push(operation);
            }
        }
        Ok(operations)
    }
}
