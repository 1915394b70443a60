//! Error types for companion-core.

use thiserror::Error;

/// Result type alias using companion-core Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for companion operations
#[derive(Error, Debug)]
pub enum Error {
    // Storage errors
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database lock poisoned")]
    LockPoisoned,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Background task failed: {0}")]
    Background(String),

    // External collaborators
    #[error("{0}")]
    ExternalCall(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    // Reminders
    #[error("Scheduling failed: {0}")]
    Scheduling(String),

    // Configuration
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigValidationError),
}

/// Coarse classification of an [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Local storage could not be read or written.
    IoFailure,
    /// The generative-text service or the events endpoint failed.
    ExternalCallFailure,
    /// A reminder timer could not be registered.
    SchedulingFailure,
    /// Invalid configuration.
    Configuration,
}

impl Error {
    /// Create an error for a failed external call
    pub fn external(message: impl Into<String>) -> Self {
        Self::ExternalCall(message.into())
    }

    /// Create a scheduling error
    pub fn scheduling(message: impl Into<String>) -> Self {
        Self::Scheduling(message.into())
    }

    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Database(_) | Self::LockPoisoned | Self::Io(_) | Self::Background(_) => {
                ErrorKind::IoFailure
            }
            Self::ExternalCall(_) | Self::Http(_) => ErrorKind::ExternalCallFailure,
            Self::Scheduling(_) => ErrorKind::SchedulingFailure,
            Self::Config(_) => ErrorKind::Configuration,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(e: tokio::task::JoinError) -> Self {
        Error::Background(e.to_string())
    }
}
