//! Immutable byte regions with zero-copy sub-range views.
//!
//! `Buffer` is a thin wrapper over `bytes::Bytes`: cloning and slicing share
//! the underlying storage, which is freed once the last view is dropped. The
//! storage can be heap memory or any owner that exposes a byte slice (the io
//! crate plugs memory-mapped files in through [`Buffer::from_owner`]).

use std::fmt;
use std::ops::Deref;

use bytes::{Bytes, BytesMut};

#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Buffer {
    bytes: Bytes,
}

impl Buffer {
    /// An empty buffer. Empty buffers are the end-of-input signal for streams.
    pub fn new() -> Self {
        Self { bytes: Bytes::new() }
    }

    pub fn from_static(data: &'static [u8]) -> Self {
        Self {
            bytes: Bytes::from_static(data),
        }
    }

    pub fn copy_from_slice(data: &[u8]) -> Self {
        Self {
            bytes: Bytes::copy_from_slice(data),
        }
    }

    /// Wrap any owner of a byte region (e.g. a memory map) without copying.
    pub fn from_owner<T>(owner: T) -> Self
    where
        T: AsRef<[u8]> + Send + 'static,
    {
        Self {
            bytes: Bytes::from_owner(owner),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// A view of `len` bytes starting at `offset`, sharing this buffer's storage.
    ///
    /// # Panics
    /// If `offset + len` exceeds the buffer length.
    pub fn view(&self, len: usize, offset: usize) -> Buffer {
        let end = offset
            .checked_add(len)
            .filter(|&end| end <= self.len())
            .unwrap_or_else(|| {
                panic!(
                    "view [{offset}, {offset}+{len}) out of bounds for buffer of {} bytes",
                    self.len()
                )
            });
        Buffer {
            bytes: self.bytes.slice(offset..end),
        }
    }

    /// Join fragments into one buffer.
    ///
    /// Zero fragments give an empty buffer and a single fragment is returned as
    /// is; otherwise exactly one allocation of the total size is made.
    pub fn concat(fragments: &[Buffer]) -> Buffer {
        match fragments {
            [] => Buffer::new(),
            [single] => single.clone(),
            many => {
                let total = many.iter().map(Buffer::len).sum();
                let mut out = BytesMut::with_capacity(total);
                for frag in many {
                    out.extend_from_slice(frag);
                }
                Buffer {
                    bytes: out.freeze(),
                }
            }
        }
    }

    /// Take the buffer's contents, leaving it empty.
    pub fn take(&mut self) -> Buffer {
        std::mem::take(self)
    }

    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

impl Deref for Buffer {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for Buffer {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl From<Bytes> for Buffer {
    fn from(bytes: Bytes) -> Self {
        Self { bytes }
    }
}

impl From<Vec<u8>> for Buffer {
    fn from(v: Vec<u8>) -> Self {
        Self { bytes: Bytes::from(v) }
    }
}

impl From<String> for Buffer {
    fn from(s: String) -> Self {
        Self {
            bytes: Bytes::from(s),
        }
    }
}

impl From<&'static str> for Buffer {
    fn from(s: &'static str) -> Self {
        Self::from_static(s.as_bytes())
    }
}

impl From<&'static [u8]> for Buffer {
    fn from(s: &'static [u8]) -> Self {
        Self::from_static(s)
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Payloads can be megabytes; print a short prefix only.
        const PREVIEW: usize = 32;
        let head = &self.bytes[..self.len().min(PREVIEW)];
        f.debug_struct("Buffer")
            .field("len", &self.len())
            .field("head", &String::from_utf8_lossy(head))
            .finish()
    }
}
