//! `std::io::Read` and tokio `AsyncRead` for body buffers

use std::io::{self, Read};
use std::pin::Pin;
use std::task::{Context, Poll};

use tokio::io::{AsyncRead, ReadBuf};

use super::buffer::BodyContentBuffer;

impl Read for BodyContentBuffer {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        Ok(self.read_into(buf))
    }
}

impl AsyncRead for BodyContentBuffer {
    fn poll_read(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        let this = self.get_mut();
        let copied = this.read_into(buf.initialize_unfilled());
        buf.advance(copied);
        Poll::Ready(Ok(()))
    }
}
