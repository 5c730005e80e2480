//! Board controller error types.

use crate::api::ApiError;

/// Errors that can occur while loading or mutating a board.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Entity does not exist on the server or in the loaded board
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },

    /// Input rejected before any request was made
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Request failed or returned an unusable response
    #[error("Network failure: {0}")]
    Network(#[from] ApiError),
}

impl BoardError {
    /// Classify a board fetch error, mapping 404 to NotFound.
    ///
    pub fn from_load(error: ApiError, board_id: &str) -> Self {
        if error.is_not_found() {
            BoardError::NotFound {
                kind: "Board",
                id: board_id.to_string(),
            }
        } else {
            BoardError::Network(error)
        }
    }
}
