//! Error type shared by the hashing, parsing and configuration layers.
//!
//! Malformed hash strings are not errors: every `parse` in this crate returns
//! `Option` and reports a rejected input as `None`. `HashError` is reserved for
//! invalid construction arguments, collaborator failures and the explicit
//! format failure of [`crate::verify`].

use thiserror::Error;

/// Errors produced by this crate.
#[derive(Debug, Error)]
pub enum HashError {
    /// Salt size below the minimum accepted by the hasher.
    #[error("salt size must be at least {min} bytes, got {actual}")]
    SaltTooShort { min: usize, actual: usize },

    /// Iteration count of zero.
    #[error("iteration count must be >= 1")]
    InvalidIterationCount,

    /// The algorithm cannot be used for this operation.
    #[error("unsupported algorithm: {0}")]
    UnsupportedAlgorithm(String),

    /// Envelope identifier is empty or contains `$`.
    #[error("invalid hash identifier '{0}'")]
    InvalidEnvelope(String),

    /// No password was supplied.
    #[error("no password provided")]
    MissingPassword,

    /// The hash string could not be parsed by any registered family.
    #[error("invalid hash format")]
    Format,

    /// The OS random generator failed.
    #[error("OS random generator unavailable")]
    Random,

    /// The key derivation primitive rejected its arguments.
    #[error("key derivation failed")]
    KeyDerivation,

    /// Hasher configuration file could not be read or decoded.
    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl HashError {
    /// Create a configuration error from any displayable cause.
    pub fn config<E: std::fmt::Display>(err: E) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result alias used across the library.
pub type Result<T> = std::result::Result<T, HashError>;
