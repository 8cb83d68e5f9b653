#![forbid(unsafe_code)]
//! emread-core: shared kernel for the emread ingestion layer.
//!
//! This crate contains only *pure* types and small helpers that the I/O
//! crate builds on. There is **no I/O** and **no threading** here.
//!
//! - `buffer`: reference-counted byte regions with zero-copy views.
//! - `config`: `ReadConfig` (memory limit, chunk size, wait bound).
//! - `error`: core error type.

pub mod buffer;
pub mod config;
pub mod error;

pub use buffer::Buffer;
pub use config::ReadConfig;
pub use error::{Error, Result};

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
