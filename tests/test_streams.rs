//! Stream fixtures shared by the emread test suite
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use emread_core::Buffer;
use emread_io::{Error, Result, Stream};

/// One scripted step: a chunk to hand out, or an I/O failure.
pub enum Step {
    Chunk(&'static str),
    Fail(&'static str),
}

/// A stream that replays a fixed script and counts how often it was pulled.
pub struct ScriptedStream {
    steps: VecDeque<Step>,
    pulls: Arc<AtomicUsize>,
}

impl ScriptedStream {
    pub fn new(steps: Vec<Step>) -> Self {
        Self {
            steps: steps.into(),
            pulls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn chunks(chunks: &[&'static str]) -> Self {
        Self::new(chunks.iter().map(|&c| Step::Chunk(c)).collect())
    }

    /// Shared pull counter, readable after the stream has been boxed away.
    pub fn pulls(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.pulls)
    }
}

impl Stream for ScriptedStream {
    fn read_chunk(&mut self, _max_size: usize) -> Result<Buffer> {
        self.pulls.fetch_add(1, Ordering::SeqCst);
        match self.steps.pop_front() {
            None => Ok(Buffer::new()),
            Some(Step::Chunk(s)) => Ok(Buffer::from(s)),
            Some(Step::Fail(msg)) => Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                msg,
            ))),
        }
    }
}

/// Deterministic pseudo-random payload.
pub fn generate_bytes(len: usize, seed: u64) -> Vec<u8> {
    let mut x = seed | 1;
    (0..len)
        .map(|_| {
            x ^= x << 13;
            x ^= x >> 7;
            x ^= x << 17;
            (x & 0xFF) as u8
        })
        .collect()
}

/// Poll `cond` until it holds, failing the test after a few seconds.
pub fn wait_until(what: &str, mut cond: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(5);
    while !cond() {
        assert!(Instant::now() < deadline, "timed out waiting for {}", what);
        std::thread::sleep(Duration::from_millis(1));
    }
}
