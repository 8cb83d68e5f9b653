//! Content hashing for ingested bytes.

use std::sync::{Arc, Mutex, PoisonError};

use emread_core::Buffer;

use super::Stream;
use crate::error::Result;

#[derive(Default)]
struct Digest {
    hasher: blake3::Hasher,
    bytes_hashed: u64,
}

/// A [`Stream`] that hashes every byte pulled through it with BLAKE3.
///
/// Take a [`DigestHandle`] before boxing the stream into a buffered stream;
/// the handle reads the hash of exactly what was ingested, independent of
/// how the bytes were later windowed or released.
pub struct HashingStream<S> {
    inner: S,
    digest: Arc<Mutex<Digest>>,
}

/// Shared view of a [`HashingStream`]'s running hash.
#[derive(Clone)]
pub struct DigestHandle {
    digest: Arc<Mutex<Digest>>,
}

impl DigestHandle {
    /// Hash of everything read so far.
    pub fn digest(&self) -> blake3::Hash {
        self.digest.lock().unwrap_or_else(PoisonError::into_inner).hasher.finalize()
    }

    pub fn bytes_hashed(&self) -> u64 {
        self.digest.lock().unwrap_or_else(PoisonError::into_inner).bytes_hashed
    }
}

impl<S: Stream> HashingStream<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            digest: Arc::new(Mutex::new(Digest::default())),
        }
    }

    pub fn handle(&self) -> DigestHandle {
        DigestHandle {
            digest: Arc::clone(&self.digest),
        }
    }

    /// Hash of everything read so far.
    pub fn digest(&self) -> blake3::Hash {
        self.handle().digest()
    }

    pub fn bytes_hashed(&self) -> u64 {
        self.handle().bytes_hashed()
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: Stream> Stream for HashingStream<S> {
    fn read_chunk(&mut self, max_size: usize) -> Result<Buffer> {
        let chunk = self.inner.read_chunk(max_size)?;
        let mut digest = self.digest.lock().unwrap_or_else(PoisonError::into_inner);
        digest.hasher.update(&chunk);
        digest.bytes_hashed += chunk.len() as u64;
        Ok(chunk)
    }
}
