//! Error types for the restvault system.
//!
//! All failures are represented by the [`Error`] enum so the taxonomy stays
//! inspectable across crates: callers match on the variant, not on message
//! text. Validation errors are raised before any network traffic; everything
//! else originates at the client boundary and propagates unmodified.

use thiserror::Error as ThisError;

/// The core error type for all vault operations.
#[derive(ThisError, Debug)]
pub enum Error {
    /// Malformed or missing tool arguments, caught before any network call
    #[error("Validation error: {reason}")]
    Validation { reason: String },

    /// Connection refused, timeout, or TLS failure
    #[error("Transport error: {reason}")]
    Transport { reason: String },

    /// 401/403 from the vault API
    #[error("Authentication failed ({status}): {message}")]
    Auth { status: u16, message: String },

    /// 404: missing file, directory, or patch target
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    /// 400: malformed query, unresolvable target, or incompatible
    /// operation/content-type
    #[error("Precondition failed: {reason}")]
    Precondition { reason: String },

    /// 5xx or unexpected status from the vault API
    #[error("Server error ({status}): {message}")]
    Server { status: u16, message: String },

    /// Invalid configuration, fatal at startup
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Convenient Result type alias
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a validation error
    pub fn validation(reason: impl Into<String>) -> Self {
        Error::Validation {
            reason: reason.into(),
        }
    }

    /// Create a transport error
    pub fn transport(reason: impl Into<String>) -> Self {
        Error::Transport {
            reason: reason.into(),
        }
    }

    /// Create an authentication error
    pub fn auth(status: u16, message: impl Into<String>) -> Self {
        Error::Auth {
            status,
            message: message.into(),
        }
    }

    /// Create a not-found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Error::NotFound {
            resource: resource.into(),
        }
    }

    /// Create a precondition error
    pub fn precondition(reason: impl Into<String>) -> Self {
        Error::Precondition {
            reason: reason.into(),
        }
    }

    /// Create a server error
    pub fn server(status: u16, message: impl Into<String>) -> Self {
        Error::Server {
            status,
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn config(reason: impl Into<String>) -> Self {
        Error::Config {
            reason: reason.into(),
        }
    }

    /// Stable machine-readable kind tag, used in batch results and logs
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Validation { .. } => "validation",
            Error::Transport { .. } => "transport",
            Error::Auth { .. } => "auth",
            Error::NotFound { .. } => "not_found",
            Error::Precondition { .. } => "precondition",
            Error::Server { .. } => "server",
            Error::Config { .. } => "config",
        }
    }
}
