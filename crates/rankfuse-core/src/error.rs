//! Error types for Rankfuse operations.
//!
//! This module provides a common `Error` type and `Result<T>` alias used across
//! all Rankfuse crates. Uses `thiserror` for derive macros.
//!
//! The variants map onto the failure modes of a hybrid retrieval call:
//! caller mistakes (`Config`), per-source backend failures (`Retrieval`),
//! deadline expiry (`Timeout`), and batch-fetch failures (`Hydration`).
//! A missing item during hydration is not an error and has no variant.

/// Errors that can occur in Rankfuse operations.
///
/// `Display` and `std::error::Error` are implemented by hand rather than via
/// `thiserror` because the `Retrieval` variant's `source` field is a source
/// *name* (a `String`), which `thiserror` would otherwise infer as the error
/// source.
#[derive(Debug)]
pub enum Error {
    /// I/O error.
    Io(std::io::Error),

    /// Configuration error (caller's fault, never retried).
    Config(String),

    /// A ranked source's backend call failed.
    Retrieval {
        /// Name of the source whose backend call failed.
        source: String,
        /// Backend error description.
        message: String,
    },

    /// Deadline expired before all sources returned.
    Timeout {
        /// Milliseconds elapsed when the deadline fired.
        elapsed_ms: u64,
    },

    /// The hydration batch fetch itself failed.
    Hydration(String),

    /// Serialization error.
    Serialization(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(err) => write!(f, "I/O error: {err}"),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Retrieval { source, message } => {
                write!(f, "Retrieval failed for source '{source}': {message}")
            }
            Self::Timeout { elapsed_ms } => {
                write!(f, "Retrieval timed out after {elapsed_ms}ms")
            }
            Self::Hydration(msg) => write!(f, "Hydration error: {msg}"),
            Self::Serialization(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl Error {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create a retrieval error for a named source.
    pub fn retrieval(source: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Retrieval {
            source: source.into(),
            message: msg.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout(elapsed_ms: u64) -> Self {
        Self::Timeout { elapsed_ms }
    }

    /// Create a hydration error.
    pub fn hydration(msg: impl Into<String>) -> Self {
        Self::Hydration(msg.into())
    }

    /// Create a serialization error.
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Whether a retry wrapper may re-issue the failed call.
    ///
    /// Configuration and serialization errors are deterministic and are
    /// never retried. Backend and deadline failures are transient.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::Retrieval { .. } | Self::Timeout { .. } | Self::Hydration(_) | Self::Io(_)
        )
    }

    /// The source name carried by a retrieval error, if any.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            Self::Retrieval { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Result type alias using Rankfuse's Error type.
pub type Result<T> = std::result::Result<T, Error>;
