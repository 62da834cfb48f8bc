use crate::error::StorageError;
use crate::link::{NewShortLink, ShortLink, VisitRecord};
use crate::owner::Owner;
use crate::short_id::ShortId;
use async_trait::async_trait;

/// Result type for repository operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// A read-only view of the record store.
#[async_trait]
pub trait ReadRepository: Send + Sync + 'static {
    /// Retrieves the link for a given short id, including its visits.
    /// Returns `None` if the id does not exist.
    async fn get(&self, id: &ShortId) -> Result<Option<ShortLink>>;

    /// Checks whether a short id is currently taken.
    async fn exists(&self, id: &ShortId) -> Result<bool>;

    /// Returns every link created by `owner`, newest first.
    async fn list_by_owner(&self, owner: &Owner) -> Result<Vec<ShortLink>>;
}

#[async_trait]
pub trait Repository: ReadRepository {
    /// Inserts a new link under `id`.
    ///
    /// The uniqueness check and the insert must be a single atomic step:
    /// returns `Err(Conflict)` if the id is already taken, including when a
    /// concurrent writer took it an instant earlier.
    async fn insert(&self, id: &ShortId, link: NewShortLink) -> Result<ShortLink>;

    /// Increments the click counter and appends `visit` as one atomic
    /// operation, returning the link's long URL.
    ///
    /// Returns `None` (and records nothing) if the id does not exist.
    async fn record_visit(&self, id: &ShortId, visit: VisitRecord) -> Result<Option<String>>;

    /// Deletes the link and all of its visits if it exists and belongs to `owner`.
    /// Returns `true` if a link was removed.
    async fn delete(&self, id: &ShortId, owner: &Owner) -> Result<bool>;
}
