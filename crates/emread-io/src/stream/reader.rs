//! `std::io::Read` adapters (files, decompressors, sockets).

use std::fs::File;
use std::io::Read;
use std::path::Path;

use emread_core::Buffer;

use super::Stream;
use crate::error::Result;

// Callers may pass huge hints; don't reserve more than this up front.
const MAX_PREALLOC: usize = 16 * 1024 * 1024;

/// Adapts any reader into a `Stream`.
///
/// Each pull fills up to `max_size` bytes, issuing as many reads as it takes,
/// so a short read from the underlying reader is never mistaken for EOF.
#[derive(Debug)]
pub struct ReaderStream<R: Read> {
    inner: R,
    bytes_read: u64,
}

/// A stream over a regular file.
pub type FileStream = ReaderStream<File>;

impl FileStream {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path.as_ref()).map_err(|e| {
            crate::Error::Io(e).with_context(format!("opening {}", path.as_ref().display()))
        })?;
        Ok(Self::new(file))
    }
}

impl<R: Read> ReaderStream<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            bytes_read: 0,
        }
    }

    /// Total bytes handed out so far.
    pub fn bytes_read(&self) -> u64 {
        self.bytes_read
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read + Send> Stream for ReaderStream<R> {
    fn read_chunk(&mut self, max_size: usize) -> Result<Buffer> {
        let mut buf = Vec::with_capacity(max_size.min(MAX_PREALLOC));
        // `read_to_end` retries on `Interrupted` and stops at EOF.
        let n = (&mut self.inner).take(max_size as u64).read_to_end(&mut buf)?;
        self.bytes_read += n as u64;
        Ok(Buffer::from(buf))
    }
}
