use async_trait::async_trait;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use linkpulse_core::repository::{ReadRepository, Repository, Result};
use linkpulse_core::{NewShortLink, Owner, ShortId, ShortLink, StorageError, VisitRecord};
use std::sync::Arc;
use tracing::trace;

/// In-memory implementation of the Repository trait using DashMap.
///
/// DashMap shards its locks, so operations on different short ids proceed
/// in parallel while the check-and-insert of [`Repository::insert`] and the
/// increment-and-append of [`Repository::record_visit`] each run under a
/// single shard write lock.
///
/// Clones share the same underlying map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRepository {
    storage: Arc<DashMap<String, ShortLink>>,
}

impl InMemoryRepository {
    /// Creates a new in-memory repository.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory repository with the specified capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Arc::new(DashMap::with_capacity(capacity)),
        }
    }

    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl ReadRepository for InMemoryRepository {
    async fn get(&self, id: &ShortId) -> Result<Option<ShortLink>> {
        Ok(self.storage.get(id.as_str()).map(|entry| entry.value().clone()))
    }

    async fn exists(&self, id: &ShortId) -> Result<bool> {
        Ok(self.storage.contains_key(id.as_str()))
    }

    async fn list_by_owner(&self, owner: &Owner) -> Result<Vec<ShortLink>> {
        let mut links: Vec<ShortLink> = self
            .storage
            .iter()
            .filter(|entry| entry.is_owned_by(owner))
            .map(|entry| entry.value().clone())
            .collect();
        links.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(links)
    }
}

#[async_trait]
impl Repository for InMemoryRepository {
    async fn insert(&self, id: &ShortId, link: NewShortLink) -> Result<ShortLink> {
        match self.storage.entry(id.as_str().to_owned()) {
            Entry::Occupied(_) => Err(StorageError::Conflict(id.to_string())),
            Entry::Vacant(slot) => {
                let link = link.into_link(id.clone());
                slot.insert(link.clone());
                Ok(link)
            }
        }
    }

    async fn record_visit(&self, id: &ShortId, visit: VisitRecord) -> Result<Option<String>> {
        let Some(mut link) = self.storage.get_mut(id.as_str()) else {
            trace!(short_id = %id, "visit for unknown short id");
            return Ok(None);
        };

        link.push_visit(visit);
        Ok(Some(link.long_url.clone()))
    }

    async fn delete(&self, id: &ShortId, owner: &Owner) -> Result<bool> {
        Ok(self
            .storage
            .remove_if(id.as_str(), |_, link| link.is_owned_by(owner))
            .is_some())
    }
}
