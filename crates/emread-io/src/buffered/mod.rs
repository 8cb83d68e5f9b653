//! Buffered streams: a randomly addressable, memory-bounded byte window over
//! an incrementally produced source.
//!
//! Two flavours, picked at construction time:
//! - [`from_buffer`]: the whole input is already in memory (a literal or a
//!   memory-mapped file). Nothing blocks and nothing is ever freed early.
//! - [`from_stream`]: a producer thread pulls a raw [`Stream`] into
//!   pieces while consumers read windows by absolute offset, releasing the
//!   prefix they are done with so the producer can keep going.
//!
//! Typical wiring:
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use emread_io::buffered::{self, BufferedStream};
//! use emread_io::stream::FileStream;
//!
//! # fn main() -> emread_io::Result<()> {
//! let bs: Arc<dyn BufferedStream> =
//!     Arc::from(buffered::from_stream(Box::new(FileStream::open("data.csv")?), 8 << 20)?);
//! let producer = buffered::spawn_producer(Arc::clone(&bs))?;
//! let header = bs.get_chunk(0, 4096)?;
//! bs.release_chunk(header.len());
//! # let _ = producer;
//! # Ok(())
//! # }
//! ```

mod from_buffer;
mod from_stream;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use emread_core::{Buffer, ReadConfig};

use crate::error::Result;
use crate::stream::Stream;

pub use from_buffer::BufferBackedStream;
pub use from_stream::{StreamBackedStream, StreamStats};

/// The contract a parser reads through.
///
/// Offsets are absolute positions in the input. `stream` is driven by exactly
/// one producer; every other method may be called concurrently from consumer
/// threads.
pub trait BufferedStream: Send + Sync {
    /// Bytes `[start, start + size)`, blocking until they are available.
    ///
    /// The result is shorter than `size` only when the input ends first.
    /// Data stays retained, so the same window can be read again until it is
    /// released.
    ///
    /// # Panics
    /// If `start` lies below what has already been released.
    fn get_chunk(&self, start: usize, size: usize) -> Result<Buffer>;

    /// Ingest the whole input. Returns once the source is exhausted.
    fn stream(&self) -> Result<()>;

    /// Declare that no offset below `up_to` will be requested again.
    fn release_chunk(&self, up_to: usize);

    /// Destructively take the next bytes in order. `requested_size` is a hint.
    /// An empty buffer means everything has been read.
    fn read_chunk(&self, requested_size: usize) -> Result<Buffer>;
}

/// Wrap a fully materialized buffer.
pub fn from_buffer(buffer: Buffer) -> Box<dyn BufferedStream> {
    Box::new(BufferBackedStream::new(buffer))
}

/// Wrap a raw stream, retaining at most about `memory_limit` bytes.
pub fn from_stream(stream: Box<dyn Stream>, memory_limit: usize) -> Result<Box<dyn BufferedStream>> {
    from_stream_with_config(stream, &ReadConfig::new(memory_limit))
}

pub fn from_stream_with_config(
    stream: Box<dyn Stream>,
    config: &ReadConfig,
) -> Result<Box<dyn BufferedStream>> {
    Ok(Box::new(StreamBackedStream::with_config(stream, config)?))
}

/// Run `stream()` to completion on a dedicated thread.
pub fn spawn_producer(bs: Arc<dyn BufferedStream>) -> Result<JoinHandle<Result<()>>> {
    let handle = thread::Builder::new()
        .name("emread-producer".into())
        .spawn(move || bs.stream())?;
    Ok(handle)
}
