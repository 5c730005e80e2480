//! Application-wide error types.
//!
//! This module defines the main error type hierarchy for the application,
//! allowing for type-safe error handling throughout the codebase.

pub use crate::api::ApiError;
pub use crate::board::BoardError;
pub use crate::config::ConfigError;
pub use crate::session::SessionError;

/// Main application error type.
///
/// This is the top-level error type that encompasses all error types
/// in the application. It uses `thiserror` for automatic error derivation
/// and conversion.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Taskboard API-related errors
    #[error("API error: {0}")]
    Api(#[from] ApiError),

    /// Board loading or mutation errors
    #[error("Board error: {0}")]
    Board(#[from] BoardError),

    /// Session storage errors
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Input rejected before any request was made
    #[error("Invalid input: {0}")]
    Validation(String),

    /// Command requires a signed-in user
    #[error("Not signed in. Run `taskboard login` first")]
    NotAuthenticated,

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Logger initialization errors
    #[error("Logger error: {0}")]
    Logger(String),
}

impl From<crate::utils::validation::FieldError> for AppError {
    fn from(error: crate::utils::validation::FieldError) -> Self {
        AppError::Validation(error.to_string())
    }
}

/// Convenience type alias for Result with AppError
pub type AppResult<T> = Result<T, AppError>;
