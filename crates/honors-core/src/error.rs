//! Error types for honors operations.

use thiserror::Error;

/// Errors that can occur while loading or saving honors data.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HonorsError {
    /// A date string was not a valid `YYYY-MM-DD` date.
    #[error("invalid date '{0}': expected YYYY-MM-DD")]
    InvalidDate(String),

    /// A consumed service could not be reached or answered with a failure.
    #[error("{service} unavailable: {message}")]
    Unavailable {
        service: &'static str,
        message: String,
    },

    /// The server refused a request. The message is the server's own text.
    #[error("{0}")]
    Rejected(String),

    /// The same honor key appeared twice in one assignment set.
    #[error("duplicate honor '{0}' in assignment set")]
    DuplicateHonor(String),
}

impl HonorsError {
    /// Create an unavailable error for the named service.
    pub fn unavailable(service: &'static str, message: impl Into<String>) -> Self {
        Self::Unavailable {
            service,
            message: message.into(),
        }
    }
}
