//! Error types shared by the library and the command-line front end.

use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum Error {
    /// Malformed city set, non-permutation tour or shape-mismatched matrix.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A city index that is not part of the current city set.
    #[error("no city at index {0}")]
    NotFound(usize),
    #[error("a run is already in progress")]
    AlreadyRunning,
    #[error("no run has been started")]
    NotRunning,
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput(message.into())
    }
}
