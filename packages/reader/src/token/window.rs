//! Refillable byte window the tokenizer lexes from
//!
//! Bytes arrive from a [`ByteSource`](super::ByteSource) in chunks and are
//! consumed from the front one lexeme at a time. The window remembers how
//! many bytes it has already released so syntax errors can report absolute
//! offsets.

use bytes::{Buf, BytesMut};

#[derive(Debug)]
pub struct TokenWindow {
    buffer: BytesMut,
    consumed_total: u64,
    received_total: u64,
}

impl TokenWindow {
    /// Create a window with the given initial capacity in bytes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: BytesMut::with_capacity(capacity),
            consumed_total: 0,
            received_total: 0,
        }
    }

    /// Mutable access for a byte source to append into.
    pub(crate) fn buffer_mut(&mut self) -> &mut BytesMut {
        &mut self.buffer
    }

    pub(crate) fn record_received(&mut self, bytes: usize) {
        self.received_total += bytes as u64;
    }

    /// Mark bytes at the front of the window as consumed.
    pub fn consume(&mut self, bytes: usize) {
        let bytes = bytes.min(self.buffer.len());
        self.buffer.advance(bytes);
        self.consumed_total += bytes as u64;
    }

    /// Unconsumed bytes.
    #[inline]
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer[..]
    }

    /// Absolute payload offset of the first unconsumed byte.
    #[inline]
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.consumed_total
    }

    /// Total bytes received from the byte source.
    #[inline]
    #[must_use]
    pub fn total_received(&self) -> u64 {
        self.received_total
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for TokenWindow {
    fn default() -> Self {
        Self::with_capacity(8192) // 8KB default
    }
}
