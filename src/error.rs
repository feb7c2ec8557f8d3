use std::sync::Arc;
use thiserror::Error;

/// Unified error type for the resolver, cache, and store layers.
///
/// `NotFound` and `Transient` are kept distinct so the tiered cache facade
/// can downgrade an L2 failure into a fall-through to L3 while still
/// surfacing an L3 failure to the orchestrator.
#[derive(Debug, Clone, Error)]
pub enum CoreError {
    /// The question has no answer at either the exact or wildcard level.
    #[error("not found")]
    NotFound,

    /// A dependency (L2 or L3) failed recoverably.
    #[error("transient failure: {0}")]
    Transient(String),

    /// The question or record failed structural validation.
    #[error("malformed input: {0}")]
    Malformed(String),

    /// The request deadline elapsed before an answer was produced.
    #[error("operation timed out")]
    Timeout,

    /// Unrecoverable condition; the process should exit.
    #[error("fatal error: {0}")]
    Fatal(String),

    #[error("io error: {0}")]
    Io(Arc<std::io::Error>),

    #[error("redis error: {0}")]
    Redis(String),

    #[error("cache error: {0}")]
    Cache(String),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, CoreError>;

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Io(Arc::new(err))
    }
}

impl CoreError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, CoreError::NotFound)
    }

    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            CoreError::Transient(_) | CoreError::Timeout | CoreError::Redis(_)
        )
    }
}
