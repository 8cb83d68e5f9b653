//! Read-session configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default soft cap on retained bytes (64 MiB).
pub const DEFAULT_MEMORY_LIMIT: usize = 64 * 1024 * 1024;

/// Default size of each pull from the raw stream (1 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 1024;

/// Knobs for a stream-backed read session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadConfig {
    /// Soft cap on bytes retained by the buffered stream; the producer stalls
    /// while this many bytes are held.
    pub memory_limit: usize,
    /// Bytes requested from the raw stream per pull.
    pub chunk_size: usize,
    /// Upper bound on how long a consumer waits for data. `None` waits forever.
    pub wait_timeout_ms: Option<u64>,
}

impl Default for ReadConfig {
    fn default() -> Self {
        Self {
            memory_limit: DEFAULT_MEMORY_LIMIT,
            chunk_size: DEFAULT_CHUNK_SIZE,
            wait_timeout_ms: None,
        }
    }
}

impl ReadConfig {
    pub fn new(memory_limit: usize) -> Self {
        Self {
            memory_limit,
            ..Self::default()
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_wait_timeout(mut self, timeout: Duration) -> Self {
        self.wait_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn wait_timeout(&self) -> Option<Duration> {
        self.wait_timeout_ms.map(Duration::from_millis)
    }

    /// Defaults overridden by `EMREAD_MEMORY_LIMIT`, `EMREAD_CHUNK_SIZE` and
    /// `EMREAD_WAIT_TIMEOUT_MS`. Unparseable values are reported, not ignored.
    pub fn from_env() -> Result<Self> {
        let mut cfg = Self::default();
        if let Some(v) = env_usize("EMREAD_MEMORY_LIMIT")? {
            cfg.memory_limit = v;
        }
        if let Some(v) = env_usize("EMREAD_CHUNK_SIZE")? {
            cfg.chunk_size = v;
        }
        if let Some(v) = env_usize("EMREAD_WAIT_TIMEOUT_MS")? {
            cfg.wait_timeout_ms = Some(v as u64);
        }
        cfg.validate()?;
        Ok(cfg)
    }

    /// Parse from JSON; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn validate(&self) -> Result<()> {
        if self.memory_limit == 0 {
            return Err(Error::Config("memory_limit must be > 0".into()));
        }
        if self.chunk_size == 0 {
            return Err(Error::Config("chunk_size must be > 0".into()));
        }
        Ok(())
    }
}

fn env_usize(key: &str) -> Result<Option<usize>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|e| Error::Config(format!("{key}={raw:?}: {e}")).with_context("reading environment")),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(e) => Err(Error::Config(format!("{key}: {e}"))),
    }
}
