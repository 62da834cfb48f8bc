use crate::link::ShortLink;
use crate::owner::Owner;
use crate::short_id::ShortId;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, crate::error::ShortenerError>;

/// Parameters for creating a shortened URL.
#[derive(Debug, Clone)]
pub struct ShortenParams {
    /// The principal creating the link.
    pub owner: Owner,
    /// The original URL to be shortened.
    pub long_url: String,
}

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Creates a shortened URL under a freshly allocated short id.
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink>;

    /// Lists the owner's links with their visits, newest first.
    async fn list(&self, owner: &Owner) -> Result<Vec<ShortLink>>;

    /// Fetches a single link, which must belong to `owner`.
    async fn get(&self, owner: &Owner, id: &ShortId) -> Result<ShortLink>;

    /// Deletes a link and its visits. Only the owner may delete.
    async fn delete(&self, owner: &Owner, id: &ShortId) -> Result<()>;
}
