//! Error types shared by every CipherSync crate.
//!
//! All fallible operations return `CipherResult<T>`. Parse failures of
//! schema-constrained model replies are NOT errors: the adapter substitutes
//! a labelled fallback report instead. Everything that reaches the caller
//! as `Err` is a transport, service, storage, or configuration problem.

use thiserror::Error;

/// The unified error type for CipherSync.
#[derive(Debug, Error)]
pub enum CipherError {
    /// The request never produced an HTTP response (DNS, TLS, connect, timeout).
    #[error("transport error: {reason}")]
    Transport { reason: String },

    /// The generative service answered with a non-success status.
    ///
    /// Auth and quota failures land here; `message` carries the service's
    /// own explanation when it could be decoded.
    #[error("upstream service returned {status}: {message}")]
    Upstream { status: u16, message: String },

    /// Durable key/value storage could not be read or written.
    #[error("storage error: {reason}")]
    Storage { reason: String },

    /// A required configuration value is missing or invalid.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A value could not be encoded or decoded.
    #[error("serialization error: {reason}")]
    Serialization { reason: String },

    /// The caller supplied input a tool cannot run on (e.g. an empty payload).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },
}

/// Convenience alias used throughout the CipherSync crates.
pub type CipherResult<T> = Result<T, CipherError>;

impl From<serde_json::Error> for CipherError {
    fn from(e: serde_json::Error) -> Self {
        Self::Serialization {
            reason: e.to_string(),
        }
    }
}
