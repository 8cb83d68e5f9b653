//! Whole-input origins.
//!
//! A `Source` materializes its input as one `Buffer` and hands it to a
//! `ReadDirector`, which decides what to do with it (usually: wrap it with
//! `buffered::from_buffer` and parse).

use std::fs::File;
use std::path::{Path, PathBuf};

use emread_core::Buffer;
use memmap2::Mmap;

use crate::error::Result;

/// Receives the materialized input of a `Source`.
pub trait ReadDirector {
    fn read_buffer(&mut self, buffer: Buffer) -> Result<()>;
}

pub trait Source: Send {
    fn name(&self) -> &str;

    /// Whether another source should be read after this one.
    fn keep_reading(&self) -> bool {
        false
    }

    fn read_with(&self, director: &mut dyn ReadDirector) -> Result<()>;
}

/// In-memory text or bytes.
pub struct TextSource {
    text: Buffer,
}

impl TextSource {
    pub fn new(text: impl Into<Buffer>) -> Self {
        Self { text: text.into() }
    }
}

impl Source for TextSource {
    fn name(&self) -> &str {
        "<text>"
    }

    fn read_with(&self, director: &mut dyn ReadDirector) -> Result<()> {
        director.read_buffer(self.text.clone())
    }
}

/// A file on disk, memory-mapped rather than read.
pub struct FileSource {
    name: String,
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Source for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn read_with(&self, director: &mut dyn ReadDirector) -> Result<()> {
        let buf = mmap_file(&self.path).map_err(|e| e.with_context(format!("mapping {}", self.name)))?;
        director.read_buffer(buf)
    }
}

/// Map a file into a `Buffer`. Empty files cannot be mapped and give an
/// empty buffer instead.
#[allow(unsafe_code)]
pub fn mmap_file(path: &Path) -> Result<Buffer> {
    let file = File::open(path)?;
    if file.metadata()?.len() == 0 {
        return Ok(Buffer::new());
    }
    // SAFETY: the map is read-only; the caller must not truncate the file
    // while any view of the buffer is alive.
    let mmap = unsafe { Mmap::map(&file)? };
    Ok(Buffer::from_owner(mmap))
}
