//! Error types for the devsearch core.
//!
//! This module defines the crate-wide error type [`DevsearchError`], the
//! [`Result`] alias, and the two collaborator-facing failure types:
//! [`BackendError`] for search and catalogue calls and [`AccountError`] for
//! the Code account lifecycle. All are implemented with `thiserror`.

use thiserror::Error;

/// The main error type for devsearch operations.
///
/// Search and account failures never surface here at runtime: the session
/// converts them into reducer actions. This type covers the plumbing around
/// the core (persistence, configuration, channels).
///
/// # Examples
///
/// ```
/// use devsearch::DevsearchError;
///
/// fn validate() -> Result<(), DevsearchError> {
///     Err(DevsearchError::Config("debounce_ms must be positive".to_string()))
/// }
/// assert!(validate().is_err());
/// ```
#[derive(Debug, Error)]
pub enum DevsearchError {
    /// Reading or writing the preferences file failed.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Filesystem or I/O operation failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration is invalid or could not be parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A backend call failed outside of the orchestrator boundary.
    #[error("Backend error: {0}")]
    Backend(#[from] BackendError),

    /// An internal channel was closed while the session was still running.
    #[error("Channel closed: {0}")]
    Channel(String),
}

/// A specialized `Result` type for devsearch operations.
pub type Result<T> = std::result::Result<T, DevsearchError>;

/// Failure reported by a search backend or the doc-source catalogue.
///
/// Carries only the short, user-facing message that ends up in the result
/// bucket and the global error line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct BackendError {
    message: String,
}

impl BackendError {
    /// Creates a backend error from any displayable message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// Returns the user-facing message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Outcome of a failed Code account initialization.
///
/// `NoAccessToken` is the benign zero state of a user who never linked an
/// account; it must not be shown as an error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccountError {
    /// No stored credential exists.
    #[error("No access token found")]
    NoAccessToken,

    /// The account could not be initialized.
    #[error("{0}")]
    Failed(String),
}
