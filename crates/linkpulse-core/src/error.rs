use thiserror::Error;

/// Errors raised while constructing core values.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error("invalid short id: {0}")]
    InvalidShortId(String),
    #[error("invalid owner: {0}")]
    InvalidOwner(String),
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("short id already exists: {0}")]
    Conflict(String),
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
    #[error("storage operation timed out: {0}")]
    Timeout(String),
    #[error("storage query failed: {0}")]
    Query(String),
    #[error("stored data is invalid: {0}")]
    InvalidData(String),
    #[error("storage operation failed: {0}")]
    Operation(String),
}

impl StorageError {
    /// Whether the failure is transient and the operation may be retried with backoff.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StorageError::Unavailable(_) | StorageError::Timeout(_))
    }
}

#[derive(Debug, Clone, Error)]
pub enum ShortenerError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("short link not found: {0}")]
    NotFound(String),
    #[error("short link {0} is not owned by the requester")]
    Unauthorized(String),
    #[error("store unavailable: {0}")]
    StoreUnavailable(String),
    #[error("storage error: {0}")]
    Storage(String),
}

impl ShortenerError {
    /// Whether the caller may retry the same request later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ShortenerError::StoreUnavailable(_))
    }
}

impl From<StorageError> for ShortenerError {
    fn from(error: StorageError) -> Self {
        if error.is_retryable() {
            return ShortenerError::StoreUnavailable(error.to_string());
        }
        ShortenerError::Storage(error.to_string())
    }
}
