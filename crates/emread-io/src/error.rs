use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] emread_core::Error),

    /// The producer stopped with an error before the requested bytes arrived.
    #[error("producer failed: {0}")]
    ProducerFailed(String),

    #[error("timed out after {waited_ms}ms waiting for bytes [{start}, {start}+{size})")]
    WaitTimeout {
        waited_ms: u64,
        start: usize,
        size: usize,
    },
}

impl Error {
    /// Add context to an error.
    pub fn with_context(self, context: impl Into<String>) -> Self {
        let ctx = context.into();
        match self {
            Error::Io(e) => Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", ctx, e))),
            Error::Core(e) => Error::Core(e.with_context(ctx)),
            Error::ProducerFailed(msg) => Error::ProducerFailed(format!("{}: {}", ctx, msg)),
            other => other,
        }
    }

    /// Timeouts can be retried; the data may still arrive.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::WaitTimeout { .. })
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::WaitTimeout { .. } => {
                vec![
                    "The source is slower than wait_timeout_ms allows - retrying may help".into(),
                    "Check that a producer thread is calling stream()".into(),
                    "Release consumed bytes so a stalled producer can continue".into(),
                ]
            }
            Error::ProducerFailed(msg) => {
                vec![
                    "Bytes ingested before the failure are still readable".into(),
                    format!("Producer error details: {}", msg),
                ]
            }
            Error::Core(e) => e.suggestions(),
            _ => vec![],
        }
    }
}

impl From<Error> for std::io::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::Io(e) => e,
            Error::WaitTimeout { .. } => std::io::Error::new(std::io::ErrorKind::TimedOut, e),
            other => std::io::Error::new(std::io::ErrorKind::Other, other),
        }
    }
}
