//! Stream-backed buffered stream.
//!
//! A single producer pulls the raw stream into a deque of pieces, each one
//! tagged with its `[offset0, offset1)` range in input coordinates. Consumers
//! read windows that may straddle pieces, and release the prefix they are done
//! with. Retained bytes are capped by `memory_limit`: once the cap is reached
//! the producer sleeps until a release (or a destructive read) frees memory.
//!
//! Locking: `state` guards the deque and counters; `source` guards the raw
//! stream. Whoever needs both takes `source` first. The producer never does
//! I/O while holding `state` and never waits for memory while holding
//! `source`.

use std::collections::VecDeque;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use serde::Serialize;

use emread_core::{Buffer, ReadConfig};

use super::BufferedStream;
use crate::error::{Error, Result};
use crate::stream::Stream;

/// One ingested range `[offset0, offset1)`; `buffer.len() == offset1 - offset0`.
struct Piece {
    offset0: usize,
    offset1: usize,
    buffer: Buffer,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Streaming,
    Exhausted,
    Failed(String),
}

struct State {
    pieces: VecDeque<Piece>,
    bytes_ingested: usize,
    pieces_ingested: u64,
    memory_used: usize,
    /// Lowest offset that can still be requested.
    released_to: usize,
    phase: Phase,
}

impl State {
    fn push_piece(&mut self, buffer: Buffer) {
        let len = buffer.len();
        let offset0 = self.bytes_ingested;
        debug_assert!(self.pieces.back().map_or(offset0 == self.released_to, |p| p.offset1 == offset0));
        self.pieces.push_back(Piece {
            offset0,
            offset1: offset0 + len,
            buffer,
        });
        self.bytes_ingested += len;
        self.pieces_ingested += 1;
        self.memory_used += len;
    }

    fn pop_piece(&mut self) -> Option<Piece> {
        let piece = self.pieces.pop_front()?;
        self.memory_used -= piece.buffer.len();
        self.released_to = piece.offset1;
        Some(piece)
    }

    fn failure(&self) -> Option<Error> {
        match &self.phase {
            Phase::Failed(msg) => Some(Error::ProducerFailed(msg.clone())),
            _ => None,
        }
    }
}

/// Point-in-time view of a stream-backed buffer's bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub bytes_ingested: usize,
    pub pieces_ingested: u64,
    pub memory_used: usize,
    pub memory_limit: usize,
    pub retained_pieces: usize,
    pub released_to: usize,
    pub exhausted: bool,
}

pub struct StreamBackedStream {
    source: Mutex<Box<dyn Stream>>,
    state: Mutex<State>,
    /// Signalled when a piece arrives or the producer stops.
    data_ready: Condvar,
    /// Signalled when retained memory shrinks.
    memory_freed: Condvar,
    memory_limit: usize,
    chunk_size: usize,
    wait_timeout: Option<Duration>,
}

impl StreamBackedStream {
    /// # Panics
    /// If `memory_limit` is zero.
    pub fn new(stream: Box<dyn Stream>, memory_limit: usize) -> Self {
        assert!(memory_limit > 0, "memory_limit must be > 0");
        Self::build(stream, &ReadConfig::new(memory_limit))
    }

    pub fn with_config(stream: Box<dyn Stream>, config: &ReadConfig) -> Result<Self> {
        config
            .validate()
            .map_err(|e| e.with_context("building stream-backed buffer"))?;
        Ok(Self::build(stream, config))
    }

    fn build(stream: Box<dyn Stream>, config: &ReadConfig) -> Self {
        Self {
            source: Mutex::new(stream),
            state: Mutex::new(State {
                pieces: VecDeque::new(),
                bytes_ingested: 0,
                pieces_ingested: 0,
                memory_used: 0,
                released_to: 0,
                phase: Phase::Streaming,
            }),
            data_ready: Condvar::new(),
            memory_freed: Condvar::new(),
            memory_limit: config.memory_limit,
            chunk_size: config.chunk_size,
            wait_timeout: config.wait_timeout(),
        }
    }

    pub fn stats(&self) -> StreamStats {
        let st = self.state();
        StreamStats {
            bytes_ingested: st.bytes_ingested,
            pieces_ingested: st.pieces_ingested,
            memory_used: st.memory_used,
            memory_limit: self.memory_limit,
            retained_pieces: st.pieces.len(),
            released_to: st.released_to,
            exhausted: st.phase == Phase::Exhausted,
        }
    }

    // A panic while holding the lock (a caller precondition) leaves the
    // state untouched, so a poisoned lock is still safe to use.
    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn source(&self) -> MutexGuard<'_, Box<dyn Stream>> {
        self.source.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Block while the memory cap is reached. Returns the phase seen on wake-up.
    fn wait_for_memory(&self) -> Phase {
        let st = self.state();
        #[cfg(feature = "tracing")]
        if st.memory_used >= self.memory_limit && st.phase == Phase::Streaming {
            tracing::debug!(
                memory_used = st.memory_used,
                memory_limit = self.memory_limit,
                "producer stalled on memory limit"
            );
        }
        let st = self
            .memory_freed
            .wait_while(st, |s| {
                s.memory_used >= self.memory_limit && s.phase == Phase::Streaming
            })
            .unwrap_or_else(PoisonError::into_inner);
        st.phase.clone()
    }

    fn fail(&self, err: &Error) {
        {
            let mut st = self.state();
            if st.phase == Phase::Streaming {
                st.phase = Phase::Failed(err.to_string());
            }
        }
        #[cfg(feature = "tracing")]
        tracing::warn!(error = %err, "producer failed");
        self.data_ready.notify_all();
        self.memory_freed.notify_all();
    }

    /// Wait until `pieces_ingested` moves past `seen` or the producer stops.
    fn wait_for_data<'a>(
        &self,
        st: MutexGuard<'a, State>,
        seen: u64,
        deadline: Option<Instant>,
        start: usize,
        size: usize,
    ) -> Result<MutexGuard<'a, State>> {
        let pending = |s: &mut State| s.pieces_ingested == seen && s.phase == Phase::Streaming;
        match (deadline, self.wait_timeout) {
            (Some(deadline), Some(timeout)) => {
                let remaining = deadline.saturating_duration_since(Instant::now());
                let (st, res) = self
                    .data_ready
                    .wait_timeout_while(st, remaining, pending)
                    .unwrap_or_else(PoisonError::into_inner);
                if res.timed_out() {
                    return Err(Error::WaitTimeout {
                        waited_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
                        start,
                        size,
                    });
                }
                Ok(st)
            }
            _ => Ok(self
                .data_ready
                .wait_while(st, pending)
                .unwrap_or_else(PoisonError::into_inner)),
        }
    }
}

impl BufferedStream for StreamBackedStream {
    fn get_chunk(&self, start: usize, size: usize) -> Result<Buffer> {
        if size == 0 {
            return Ok(Buffer::new());
        }
        let end = start.saturating_add(size);
        let deadline = self.wait_timeout.map(|t| Instant::now() + t);
        let mut fragments: Vec<Buffer> = Vec::new();
        // First offset not collected yet. Fragments are views that keep their
        // storage alive, so the scan resumes here after every wait.
        let mut next = start;

        let mut st = self.state();
        loop {
            assert!(
                next >= st.released_to,
                "offset {} requested after release up to {}",
                next,
                st.released_to
            );
            let first = st.pieces.partition_point(|p| p.offset1 <= next);
            for piece in st.pieces.range(first..) {
                if next >= end {
                    break;
                }
                assert!(
                    piece.offset0 <= next,
                    "offset {} was released while being read",
                    next
                );
                let frag_start = next - piece.offset0;
                let frag_len = (piece.offset1 - next).min(end - next);
                fragments.push(piece.buffer.view(frag_len, frag_start));
                next += frag_len;
            }
            if next >= end || st.phase == Phase::Exhausted {
                break;
            }
            if let Some(err) = st.failure() {
                return Err(err);
            }
            let seen = st.pieces_ingested;
            st = self.wait_for_data(st, seen, deadline, start, size)?;
        }
        drop(st);

        Ok(Buffer::concat(&fragments))
    }

    fn stream(&self) -> Result<()> {
        loop {
            match self.wait_for_memory() {
                Phase::Streaming => {}
                Phase::Exhausted => return Ok(()),
                Phase::Failed(msg) => return Err(Error::ProducerFailed(msg)),
            }

            let mut source = self.source();
            let chunk = match source.read_chunk(self.chunk_size) {
                Ok(chunk) => chunk,
                Err(e) => {
                    self.fail(&e);
                    return Err(e);
                }
            };

            let mut st = self.state();
            if st.phase != Phase::Streaming {
                // A destructive read hit the end first.
                return Ok(());
            }
            if chunk.is_empty() {
                st.phase = Phase::Exhausted;
                #[cfg(feature = "tracing")]
                tracing::debug!(
                    bytes = st.bytes_ingested,
                    pieces = st.pieces_ingested,
                    "source exhausted"
                );
                drop(st);
                drop(source);
                self.data_ready.notify_all();
                self.memory_freed.notify_all();
                return Ok(());
            }
            #[cfg(feature = "tracing")]
            tracing::trace!(
                offset = st.bytes_ingested,
                len = chunk.len(),
                memory_used = st.memory_used + chunk.len(),
                "ingested piece"
            );
            st.push_piece(chunk);
            drop(st);
            drop(source);
            self.data_ready.notify_all();
        }
    }

    fn release_chunk(&self, up_to: usize) {
        let mut freed = 0usize;
        {
            let mut st = self.state();
            while st.pieces.front().is_some_and(|p| p.offset1 <= up_to) {
                if let Some(piece) = st.pop_piece() {
                    freed += piece.buffer.len();
                }
            }
            if freed > 0 {
                #[cfg(feature = "tracing")]
                tracing::trace!(up_to, freed, memory_used = st.memory_used, "released prefix");
            }
        }
        if freed > 0 {
            self.memory_freed.notify_all();
        }
    }

    fn read_chunk(&self, requested_size: usize) -> Result<Buffer> {
        if let Some(out) = self.take_front()? {
            return Ok(out);
        }

        // Nothing retained: pull straight from the source. Holding `source`
        // keeps the producer from appending behind our back.
        let mut source = self.source();
        if let Some(out) = self.take_front()? {
            return Ok(out);
        }
        let want = if requested_size == 0 { self.chunk_size } else { requested_size };
        let chunk = match source.read_chunk(want) {
            Ok(chunk) => chunk,
            Err(e) => {
                self.fail(&e);
                return Err(e);
            }
        };
        let mut st = self.state();
        if chunk.is_empty() {
            st.phase = Phase::Exhausted;
            drop(st);
            self.data_ready.notify_all();
            self.memory_freed.notify_all();
        } else {
            // The deque is empty, so the retained window starts at the new end.
            st.bytes_ingested += chunk.len();
            st.released_to = st.bytes_ingested;
        }
        Ok(chunk)
    }
}

impl StreamBackedStream {
    /// Pop the front piece if there is one; `Ok(Some(empty))` once exhausted.
    fn take_front(&self) -> Result<Option<Buffer>> {
        let mut st = self.state();
        if let Some(piece) = st.pop_piece() {
            drop(st);
            self.memory_freed.notify_all();
            return Ok(Some(piece.buffer));
        }
        match &st.phase {
            Phase::Streaming => Ok(None),
            Phase::Exhausted => Ok(Some(Buffer::new())),
            Phase::Failed(msg) => Err(Error::ProducerFailed(msg.clone())),
        }
    }
}

impl std::fmt::Debug for StreamBackedStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamBackedStream")
            .field("chunk_size", &self.chunk_size)
            .field("stats", &self.stats())
            .finish()
    }
}
