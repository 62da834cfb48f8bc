use crate::allocator::Allocator;
use async_trait::async_trait;
use jiff::Timestamp;
use linkpulse_core::{
    NewShortLink, Owner, Repository, ShortId, ShortLink, ShortenParams, Shortener, ShortenerError,
};
use linkpulse_generator::Generator;
use std::sync::Arc;
use tracing::{debug, info};

/// A concrete implementation of the `Shortener` trait.
///
/// This service wraps a `Repository` and a `Generator` to handle:
/// - URL scheme validation
/// - Short id allocation (see [`Allocator`])
/// - Owner-scoped listing, lookup and deletion
#[derive(Debug)]
pub struct ShortenerService<R, G> {
    repository: Arc<R>,
    allocator: Allocator<R, G>,
}

impl<R, G> Clone for ShortenerService<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            allocator: self.allocator.clone(),
        }
    }
}

impl<R: Repository, G: Generator> ShortenerService<R, G> {
    pub fn new(repository: R, generator: G) -> Self {
        Self::from_shared(Arc::new(repository), Arc::new(generator))
    }

    /// Creates a service over a repository handle shared with other services.
    pub fn from_shared(repository: Arc<R>, generator: Arc<G>) -> Self {
        Self {
            allocator: Allocator::new(Arc::clone(&repository), generator),
            repository,
        }
    }

    /// Accepts the URLs matching `^https?://.+` that contain no ASCII control
    /// characters. Control characters cannot be sent back in a `Location`
    /// header, so such a link could record visits but never redirect.
    fn validate_url(url: &str) -> Result<(), ShortenerError> {
        if url.is_empty() {
            return Err(ShortenerError::InvalidUrl(
                "URL cannot be empty".to_string(),
            ));
        }

        if url.chars().any(|c| c.is_ascii_control()) {
            return Err(ShortenerError::InvalidUrl(format!(
                "URL contains control characters: {:?}",
                url
            )));
        }

        let rest = url
            .strip_prefix("https://")
            .or_else(|| url.strip_prefix("http://"));

        match rest {
            Some(rest) if !rest.is_empty() => Ok(()),
            _ => Err(ShortenerError::InvalidUrl(format!(
                "URL must start with http:// or https://: {}",
                url
            ))),
        }
    }
}

#[async_trait]
impl<R: Repository, G: Generator> Shortener for ShortenerService<R, G> {
    async fn shorten(&self, params: ShortenParams) -> Result<ShortLink, ShortenerError> {
        Self::validate_url(&params.long_url)?;

        // Only trailing spaces can be left once the raw input has validated.
        let link = NewShortLink {
            owner: params.owner,
            long_url: params.long_url.trim_end().to_string(),
            created_at: Timestamp::now(),
        };

        let stored = self.allocator.allocate(link).await?;
        info!(
            short_id = %stored.short_id,
            owner = %stored.owner,
            "created short link"
        );

        Ok(stored)
    }

    async fn list(&self, owner: &Owner) -> Result<Vec<ShortLink>, ShortenerError> {
        Ok(self.repository.list_by_owner(owner).await?)
    }

    async fn get(&self, owner: &Owner, id: &ShortId) -> Result<ShortLink, ShortenerError> {
        let link = self
            .repository
            .get(id)
            .await?
            .ok_or_else(|| ShortenerError::NotFound(id.to_string()))?;

        if !link.is_owned_by(owner) {
            return Err(ShortenerError::Unauthorized(id.to_string()));
        }

        Ok(link)
    }

    async fn delete(&self, owner: &Owner, id: &ShortId) -> Result<(), ShortenerError> {
        if self.repository.delete(id, owner).await? {
            info!(short_id = %id, owner = %owner, "deleted short link");
            return Ok(());
        }

        // Nothing removed: either the id is unknown or someone else owns it.
        if self.repository.exists(id).await? {
            debug!(short_id = %id, owner = %owner, "delete refused for non-owner");
            return Err(ShortenerError::Unauthorized(id.to_string()));
        }

        Err(ShortenerError::NotFound(id.to_string()))
    }
}
