//! Raw byte streams: the pull-based sources a buffered stream ingests.
//!
//! A `Stream` hands out up to `max_size` bytes per call and signals
//! end-of-input with an empty buffer. Calls may block on I/O for as long as
//! they need; errors surface as `Err` and are never retried here.

pub mod hashing;
pub mod memory;
pub mod reader;

use emread_core::Buffer;

use crate::error::Result;

pub use hashing::{DigestHandle, HashingStream};
pub use memory::MemoryStream;
pub use reader::{FileStream, ReaderStream};

pub trait Stream: Send {
    /// Read up to `max_size` bytes. An empty buffer means end-of-input.
    fn read_chunk(&mut self, max_size: usize) -> Result<Buffer>;
}

impl<S: Stream + ?Sized> Stream for Box<S> {
    fn read_chunk(&mut self, max_size: usize) -> Result<Buffer> {
        (**self).read_chunk(max_size)
    }
}
