#![forbid(unsafe_code)]
//! emread: memory-bounded ingestion for columnar readers.
//!
//! Facade over the workspace crates:
//! - `emread-core`: `Buffer`, `ReadConfig`, core errors.
//! - `emread-io`: raw streams, sources, and the buffered streams parsers read through.

pub use emread_core::{Buffer, ReadConfig};
pub use emread_io::buffered::{self, BufferBackedStream, BufferedStream, StreamBackedStream, StreamStats};
pub use emread_io::source::{self, FileSource, ReadDirector, Source, TextSource};
pub use emread_io::stream::{self, DigestHandle, FileStream, HashingStream, MemoryStream, ReaderStream, Stream};
pub use emread_io::{BufferedReader, Error, Result};
