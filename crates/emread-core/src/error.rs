use thiserror::Error;

/// Canonical result for core.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// Error with context chain for better debugging
    #[error("Error in {context}: {source}")]
    Context {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl Error {
    /// Add context to an error, creating an error chain.
    ///
    /// # Example
    /// ```rust,no_run
    /// use emread_core::error::Error;
    /// let err = Error::Config("memory_limit must be > 0".into());
    /// let err = err.with_context("while loading EMREAD_MEMORY_LIMIT");
    /// ```
    pub fn with_context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self) as Box<dyn std::error::Error + Send + Sync>,
        }
    }

    /// Get suggestions for common errors.
    pub fn suggestions(&self) -> Vec<String> {
        match self {
            Error::Config(msg) => {
                if msg.contains("memory") || msg.contains("limit") {
                    vec!["Set memory_limit to a positive number of bytes".into(),
                         "Check the EMREAD_MEMORY_LIMIT environment variable".into()]
                } else if msg.contains("chunk") {
                    vec!["Set chunk_size to a positive number of bytes".into(),
                         "Check the EMREAD_CHUNK_SIZE environment variable".into()]
                } else {
                    vec![]
                }
            }
            Error::Context { source, .. } => match source.downcast_ref::<Error>() {
                Some(inner) => inner.suggestions(),
                None => vec![],
            },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Config(e.to_string())
    }
}
