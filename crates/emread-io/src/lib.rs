#![deny(unsafe_code)]
//! emread-io: raw streams, sources, and memory-bounded buffered streams.
//!
//! - `stream`: the `Stream` pull contract plus reader, in-memory and hashing streams.
//! - `buffered`: `BufferedStream` and its buffer-backed / stream-backed variants.
//! - `buf`: sequential `Read`/`BufRead` over a buffered stream (releases as it goes).
//! - `source`: whole-input origins (text, memory-mapped file) and `ReadDirector`.
//!
//! The only `unsafe` is the memory map in `source::mmap_file`.

pub mod buf;
pub mod buffered;
pub mod source;
pub mod stream;

pub mod error;

pub use buf::BufferedReader;
pub use buffered::{BufferedStream, StreamBackedStream, StreamStats};
pub use error::{Error, Result};
pub use source::{FileSource, ReadDirector, Source, TextSource};
pub use stream::Stream;
