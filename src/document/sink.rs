//! Channel-backed document sink.
//!
//! The compositor writes synchronously into a [`ChannelSink`]; the HTTP
//! layer drains the receiving end into the response body. Writes are
//! buffered and forwarded on every flush, so each PDF object reaches the
//! client as soon as the writer finishes it.

use std::io::{self, Write};

use bytes::{Bytes, BytesMut};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Forward once this many bytes are buffered even without a flush.
const HIGH_WATER: usize = 64 * 1024;

/// `Write` adapter that forwards chunks over an mpsc channel.
pub struct ChannelSink {
    tx: UnboundedSender<Bytes>,
    buf: BytesMut,
}

impl ChannelSink {
    /// Create a sink and the receiver that yields its chunks.
    #[must_use]
    pub fn channel() -> (Self, UnboundedReceiver<Bytes>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            Self {
                tx,
                buf: BytesMut::new(),
            },
            rx,
        )
    }

    fn forward(&mut self) -> io::Result<()> {
        if self.buf.is_empty() {
            return Ok(());
        }
        let chunk = self.buf.split().freeze();
        self.tx
            .send(chunk)
            .map_err(|_| io::Error::new(io::ErrorKind::BrokenPipe, "document receiver closed"))
    }
}

impl Write for ChannelSink {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        if self.tx.is_closed() {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "document receiver closed"));
        }
        self.buf.extend_from_slice(data);
        if self.buf.len() >= HIGH_WATER {
            self.forward()?;
        }
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.forward()
    }
}
