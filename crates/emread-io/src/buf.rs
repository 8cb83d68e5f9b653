//! Sequential `Read`/`BufRead` over a buffered stream.
//!
//! The reader walks the input front to back in windows of `window_size`
//! bytes, fetched with `get_chunk`. Every time it moves to a new window it
//! releases everything before its position, so a stream-backed source only
//! ever holds about one window plus whatever the producer has read ahead.
//!
//! With a stream-backed source some other thread must be running `stream()`,
//! otherwise the first fill blocks forever. Its `memory_limit` must also
//! cover `window_size` plus one `chunk_size`, or the producer stalls before
//! a full window is ingested and the fill never returns.

use std::io::{self, BufRead, Read};
use std::sync::Arc;

use emread_core::Buffer;

use crate::buffered::BufferedStream;
use crate::error::Result;

pub struct BufferedReader {
    inner: Arc<dyn BufferedStream>,
    window: Buffer,
    window_start: usize,
    consumed: usize,
    window_size: usize,
    eof: bool,
}

impl BufferedReader {
    pub fn new(inner: Arc<dyn BufferedStream>, window_size: usize) -> Self {
        assert!(window_size > 0, "window_size must be > 0");
        Self {
            inner,
            window: Buffer::new(),
            window_start: 0,
            consumed: 0,
            window_size,
            eof: false,
        }
    }

    /// Absolute offset of the next byte `read` would return.
    pub fn position(&self) -> usize {
        self.window_start + self.consumed
    }

    /// Look at up to `n` bytes from the current position without consuming them.
    pub fn peek(&self, n: usize) -> Result<Buffer> {
        self.inner.get_chunk(self.position(), n)
    }

    /// Bytes left in the current window.
    pub fn buffered(&self) -> &[u8] {
        &self.window[self.consumed..]
    }
}

impl BufRead for BufferedReader {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        if self.consumed >= self.window.len() && !self.eof {
            let pos = self.position();
            self.inner.release_chunk(pos);
            self.window = self.inner.get_chunk(pos, self.window_size)?;
            self.window_start = pos;
            self.consumed = 0;
            self.eof = self.window.is_empty();
        }
        Ok(&self.window[self.consumed..])
    }

    fn consume(&mut self, amt: usize) {
        self.consumed = (self.consumed + amt).min(self.window.len());
    }
}

impl Read for BufferedReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let avail = self.fill_buf()?;
        let n = avail.len().min(buf.len());
        buf[..n].copy_from_slice(&avail[..n]);
        self.consume(n);
        Ok(n)
    }
}
