use shared::domain::SwimmerId;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Rejected user input. Nothing was changed.
    #[error("invalid input: {0}")]
    Validation(String),
    #[error("swimmer {0} not found")]
    NotFound(SwimmerId),
    /// The backend could not read or write. In-memory state was rolled back.
    #[error("persistence failed: {0}")]
    Persistence(String),
}

impl StoreError {
    pub fn persistence(message: impl Into<String>) -> Self {
        Self::Persistence(message.into())
    }
}

impl From<std::io::Error> for StoreError {
    fn from(value: std::io::Error) -> Self {
        Self::Persistence(value.to_string())
    }
}

impl From<reqwest::Error> for StoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Persistence(value.to_string())
    }
}
