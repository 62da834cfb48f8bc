use linkpulse_core::{NewShortLink, Repository, ShortId, ShortLink, StorageError};
use linkpulse_generator::Generator;
use std::sync::Arc;
use tracing::{debug, trace};

/// Persists a new link under a freshly generated, unique short id.
///
/// The store's atomic insert is the only uniqueness check: a candidate is
/// never looked up first, so there is no window between "is it free?" and
/// "take it". A [`StorageError::Conflict`] means another link (possibly one
/// inserted concurrently) already owns the candidate, and a new candidate is
/// drawn. There is no attempt cap; with the default id space a retry is
/// already rare.
#[derive(Debug)]
pub struct Allocator<R, G> {
    repository: Arc<R>,
    generator: Arc<G>,
}

impl<R, G> Clone for Allocator<R, G> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            generator: Arc::clone(&self.generator),
        }
    }
}

impl<R: Repository, G: Generator> Allocator<R, G> {
    pub fn new(repository: Arc<R>, generator: Arc<G>) -> Self {
        Self {
            repository,
            generator,
        }
    }

    /// Allocates an id for `link` and stores it.
    ///
    /// Collisions are retried internally and never returned. Any other
    /// storage failure, including an unavailable store, is returned as is.
    pub async fn allocate(&self, link: NewShortLink) -> Result<ShortLink, StorageError> {
        let mut attempt: u64 = 0;

        loop {
            attempt += 1;
            let id: ShortId = self.generator.generate().into();
            trace!(short_id = %id, attempt, "trying candidate short id");

            match self.repository.insert(&id, link.clone()).await {
                Ok(stored) => {
                    if attempt > 1 {
                        debug!(short_id = %id, attempt, "allocated short id after collisions");
                    }
                    return Ok(stored);
                }
                Err(StorageError::Conflict(_)) => {
                    debug!(short_id = %id, attempt, "short id collision, regenerating");
                }
                Err(err) => return Err(err),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use jiff::Timestamp;
    use linkpulse_core::repository::Result;
    use linkpulse_core::{Owner, ReadRepository, VisitRecord};
    use linkpulse_generator::{Alphabet, RandomGenerator, RandomGeneratorSettings};
    use linkpulse_storage::InMemoryRepository;
    use std::collections::{HashSet, VecDeque};
    use std::sync::Mutex;

    /// Hands out a fixed sequence of candidates.
    struct ScriptedGenerator {
        ids: Mutex<VecDeque<&'static str>>,
    }

    impl ScriptedGenerator {
        fn new(ids: &[&'static str]) -> Self {
            Self {
                ids: Mutex::new(ids.iter().copied().collect()),
            }
        }
    }

    impl Generator for ScriptedGenerator {
        type Output = ShortId;

        fn generate(&self) -> ShortId {
            let next = self.ids.lock().unwrap().pop_front().expect("script exhausted");
            ShortId::new_unchecked(next)
        }
    }

    struct UnavailableRepository;

    #[async_trait]
    impl ReadRepository for UnavailableRepository {
        async fn get(&self, _id: &ShortId) -> Result<Option<ShortLink>> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        async fn exists(&self, _id: &ShortId) -> Result<bool> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        async fn list_by_owner(&self, _owner: &Owner) -> Result<Vec<ShortLink>> {
            Err(StorageError::Unavailable("connection refused".into()))
        }
    }

    #[async_trait]
    impl Repository for UnavailableRepository {
        async fn insert(&self, _id: &ShortId, _link: NewShortLink) -> Result<ShortLink> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        async fn record_visit(&self, _id: &ShortId, _visit: VisitRecord) -> Result<Option<String>> {
            Err(StorageError::Unavailable("connection refused".into()))
        }

        async fn delete(&self, _id: &ShortId, _owner: &Owner) -> Result<bool> {
            Err(StorageError::Unavailable("connection refused".into()))
        }
    }

    fn new_link(url: &str) -> NewShortLink {
        NewShortLink {
            owner: Owner::new("alice").unwrap(),
            long_url: url.to_string(),
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn retries_past_taken_ids() {
        let repo = Arc::new(InMemoryRepository::new());
        let generator = Arc::new(ScriptedGenerator::new(&["taken1", "taken2", "fresh1"]));
        let allocator = Allocator::new(Arc::clone(&repo), generator);

        for code in ["taken1", "taken2"] {
            repo.insert(&ShortId::new_unchecked(code), new_link("https://old.example"))
                .await
                .unwrap();
        }

        let stored = allocator.allocate(new_link("https://new.example")).await.unwrap();
        assert_eq!(stored.short_id.as_str(), "fresh1");

        let untouched = repo
            .get(&ShortId::new_unchecked("taken1"))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(untouched.long_url, "https://old.example");
    }

    #[tokio::test]
    async fn store_unavailable_is_not_swallowed() {
        let generator = Arc::new(RandomGenerator::default());
        let allocator = Allocator::new(Arc::new(UnavailableRepository), generator);

        let err = allocator.allocate(new_link("https://example.com")).await.unwrap_err();
        assert!(matches!(err, StorageError::Unavailable(_)));
        assert!(err.is_retryable());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn parallel_allocations_are_distinct() {
        let repo = Arc::new(InMemoryRepository::new());
        let allocator = Allocator::new(Arc::clone(&repo), Arc::new(RandomGenerator::default()));

        let mut handles = vec![];
        for i in 0..500 {
            let allocator = allocator.clone();
            handles.push(tokio::spawn(async move {
                allocator
                    .allocate(new_link(&format!("https://example.com/{i}")))
                    .await
                    .unwrap()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            let link = handle.await.unwrap();
            assert_eq!(link.short_id.as_str().len(), 8);
            ids.insert(link.short_id);
        }
        assert_eq!(ids.len(), 500);
        assert_eq!(repo.len(), 500);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn parallel_allocations_fill_a_tiny_id_space_without_duplicates() {
        // Two-symbol alphabet, length 3: only 8 possible ids, so nearly every
        // allocation collides with a concurrent one and has to retry.
        let generator = RandomGenerator::new(
            RandomGeneratorSettings::builder()
                .length(3)
                .alphabet(Alphabet::new("xy").unwrap())
                .build(),
        )
        .unwrap();
        let repo = Arc::new(InMemoryRepository::new());
        let allocator = Allocator::new(Arc::clone(&repo), Arc::new(generator));

        let mut handles = vec![];
        for i in 0..8 {
            let allocator = allocator.clone();
            handles.push(tokio::spawn(async move {
                allocator
                    .allocate(new_link(&format!("https://example.com/{i}")))
                    .await
                    .unwrap()
            }));
        }

        let mut ids = HashSet::new();
        for handle in handles {
            ids.insert(handle.await.unwrap().short_id);
        }
        assert_eq!(ids.len(), 8);
        assert_eq!(repo.len(), 8);
    }
}
