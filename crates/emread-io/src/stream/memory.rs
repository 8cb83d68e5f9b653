//! In-memory stream over a `Buffer`.

use emread_core::Buffer;

use super::Stream;
use crate::error::Result;

/// Yields zero-copy views of a buffer, front to back.
///
/// `with_max_pull` caps every pull regardless of what the caller asks for,
/// which mimics sources that deliver data in fixed-size blocks.
pub struct MemoryStream {
    data: Buffer,
    pos: usize,
    max_pull: usize,
}

impl MemoryStream {
    pub fn new(data: impl Into<Buffer>) -> Self {
        Self {
            data: data.into(),
            pos: 0,
            max_pull: usize::MAX,
        }
    }

    pub fn with_max_pull(mut self, max_pull: usize) -> Self {
        assert!(max_pull > 0, "max_pull must be > 0");
        self.max_pull = max_pull;
        self
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }
}

impl Stream for MemoryStream {
    fn read_chunk(&mut self, max_size: usize) -> Result<Buffer> {
        let n = self.remaining().min(max_size).min(self.max_pull);
        let out = self.data.view(n, self.pos);
        self.pos += n;
        Ok(out)
    }
}
