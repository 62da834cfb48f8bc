use linkpulse_core::StorageError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RedirectorError>;

#[derive(Debug, Clone, Error)]
pub enum RedirectorError {
    #[error("short id not found: {0}")]
    NotFound(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl RedirectorError {
    /// Whether the visit may be retried later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, RedirectorError::StoreUnavailable(_))
    }
}

impl From<StorageError> for RedirectorError {
    fn from(error: StorageError) -> Self {
        if error.is_retryable() {
            return RedirectorError::StoreUnavailable(error.to_string());
        }
        RedirectorError::Storage(error.to_string())
    }
}
