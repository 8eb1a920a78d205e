//! Error types for asynq
//!
//! Every failure surfaces to the caller of the terminal consumer unchanged.
//! Nothing is retried, logged or partially returned on the way up.

use thiserror::Error;

/// Boxed error carried by callback and upstream failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while adapting or draining a sequence
#[derive(Error, Debug)]
pub enum Error {
    /// The value offers none of the supported iteration capabilities
    #[error("Unsupported sequence: {kind} is not iterable")]
    UnsupportedSequence { kind: String },

    /// A selector, reducer, handler or predicate failed
    #[error("Callback failed: {0}")]
    Callback(#[source] BoxError),

    /// Pulling the next item from the source failed
    #[error("Upstream iteration failed: {0}")]
    Upstream(#[source] BoxError),

    /// Telemetry initialization error
    #[error("Telemetry initialization error: {0}")]
    TelemetryInit(String),
}

impl Error {
    /// Build an `UnsupportedSequence` error for a value of the given kind.
    pub fn unsupported(kind: impl Into<String>) -> Self {
        Self::UnsupportedSequence { kind: kind.into() }
    }

    /// Wrap a failure raised by a caller-supplied callback.
    pub fn callback(err: impl Into<BoxError>) -> Self {
        Self::Callback(err.into())
    }

    /// Wrap a failure raised while pulling from a source.
    pub fn upstream(err: impl Into<BoxError>) -> Self {
        Self::Upstream(err.into())
    }

    /// Callback failure carrying only a message.
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::Callback(message.into())
    }

    pub fn is_unsupported(&self) -> bool {
        matches!(self, Self::UnsupportedSequence { .. })
    }

    pub fn is_callback(&self) -> bool {
        matches!(self, Self::Callback(_))
    }

    pub fn is_upstream(&self) -> bool {
        matches!(self, Self::Upstream(_))
    }
}

/// Result type for asynq operations
pub type Result<T, E = Error> = std::result::Result<T, E>;
