use std::sync::{Mutex, MutexGuard, PoisonError};

use emread_core::Buffer;

use super::BufferedStream;
use crate::error::Result;

/// A buffered stream whose input is already fully in memory.
pub struct BufferBackedStream {
    buffer: Mutex<Buffer>,
}

impl BufferBackedStream {
    pub fn new(buffer: Buffer) -> Self {
        Self {
            buffer: Mutex::new(buffer),
        }
    }

    fn buffer(&self) -> MutexGuard<'_, Buffer> {
        self.buffer.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl BufferedStream for BufferBackedStream {
    fn get_chunk(&self, start: usize, size: usize) -> Result<Buffer> {
        let buffer = self.buffer();
        let n = buffer.len();
        if start >= n {
            return Ok(Buffer::new());
        }
        Ok(buffer.view(size.min(n - start), start))
    }

    fn stream(&self) -> Result<()> {
        Ok(())
    }

    fn release_chunk(&self, _up_to: usize) {}

    fn read_chunk(&self, _requested_size: usize) -> Result<Buffer> {
        Ok(self.buffer().take())
    }
}
