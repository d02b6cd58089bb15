//! Shared error model.

use thiserror::Error;

/// Result type used across the dashboard crates.
pub type CoreResult<T> = Result<T, CoreError>;

/// Error shared by the dashboard crates.
///
/// Access evaluation itself never fails; these cover the edges where
/// untrusted input (persisted sessions, configuration) enters the system.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// Persisted session data could not be interpreted.
    #[error("malformed session: {0}")]
    MalformedSession(String),
}

impl CoreError {
    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn malformed_session(msg: impl Into<String>) -> Self {
        Self::MalformedSession(msg.into())
    }
}
