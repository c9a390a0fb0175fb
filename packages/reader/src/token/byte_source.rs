//! Byte sources feeding the tokenizer
//!
//! A byte source appends raw payload bytes to the token window on demand.
//! Suspension of the async reader happens only inside [`ByteSource::fill`].

use std::io::{self, Read};

use bytes::{Bytes, BytesMut};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Supplies payload bytes in chunks.
#[allow(async_fn_in_trait)]
pub trait ByteSource {
    /// Append up to `max` bytes to `buf`, returning how many were added.
    ///
    /// Returning `0` signals the end of the payload.
    async fn fill(&mut self, buf: &mut BytesMut, max: usize) -> io::Result<usize>;
}

/// An in-memory payload is handed over `max` bytes at a time.
impl ByteSource for Bytes {
    async fn fill(&mut self, buf: &mut BytesMut, max: usize) -> io::Result<usize> {
        let chunk = self.split_to(max.min(self.len()));
        buf.extend_from_slice(&chunk);
        Ok(chunk.len())
    }
}

/// Blocking `std::io::Read` adapter.
///
/// Each fill blocks the calling thread; use it with the blocking reader API.
#[derive(Debug)]
pub struct BlockingRead<R>(pub R);

impl<R: Read> ByteSource for BlockingRead<R> {
    async fn fill(&mut self, buf: &mut BytesMut, max: usize) -> io::Result<usize> {
        let start = buf.len();
        buf.resize(start + max, 0);
        loop {
            match self.0.read(&mut buf[start..]) {
                Ok(read) => {
                    buf.truncate(start + read);
                    return Ok(read);
                }
                Err(err) if err.kind() == io::ErrorKind::Interrupted => {}
                Err(err) => {
                    buf.truncate(start);
                    return Err(err);
                }
            }
        }
    }
}

/// Tokio `AsyncRead` adapter; reads suspend until data is available.
#[derive(Debug)]
pub struct AsyncReadSource<R>(pub R);

impl<R: AsyncRead + Unpin> ByteSource for AsyncReadSource<R> {
    async fn fill(&mut self, buf: &mut BytesMut, max: usize) -> io::Result<usize> {
        let mut limited = (&mut self.0).take(max as u64);
        limited.read_buf(buf).await
    }
}
