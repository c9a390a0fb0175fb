//! Suspendable consumption as a `futures::Stream`

use futures::Stream;
use tokio::io::AsyncRead;

use super::engine::BatchReader;
use super::types::{BatchEvent, ReaderState};
use crate::config::ReaderConfig;
use crate::error::Result;
use crate::token::{AsyncReadSource, JsonTokenSource, TokenSource};

/// Reader over a tokio `AsyncRead`.
pub type AsyncBatchReader<R> = BatchReader<JsonTokenSource<AsyncReadSource<R>>>;

impl<R: AsyncRead + Unpin> AsyncBatchReader<R> {
    /// Reader that suspends whenever `reader` has no data ready.
    pub fn from_async_reader(reader: R, config: ReaderConfig) -> Self {
        let source = JsonTokenSource::with_config(AsyncReadSource(reader), &config);
        BatchReader::new(source, config)
    }
}

impl<S: TokenSource> BatchReader<S> {
    /// Converts the reader into a stream of events.
    ///
    /// The stream ends after completion, or after yielding the first error.
    pub fn into_stream(self) -> impl Stream<Item = Result<BatchEvent>> {
        futures::stream::unfold(self, |mut reader| async move {
            if reader.state == ReaderState::Failed {
                return None;
            }
            match reader.read_async().await {
                Ok(Some(event)) => Some((Ok(event), reader)),
                Ok(None) => None,
                Err(err) => Some((Err(err), reader)),
            }
        })
    }
}
