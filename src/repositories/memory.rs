use async_trait::async_trait;
use dashmap::{mapref::entry::Entry, DashMap};

use super::{MappingRepository, Result};
use crate::errors::RepositoryError;
use crate::models::UrlMapping;

/// In-memory store using DashMap.
///
/// Sharded locking lets concurrent handlers read and write different ids
/// without contending on one lock. Contents die with the process.
#[derive(Debug, Default)]
pub struct InMemoryMappingRepository {
    storage: DashMap<String, String>,
}

impl InMemoryMappingRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[cfg(test)]
impl InMemoryMappingRepository {
    pub fn len(&self) -> usize {
        self.storage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.storage.is_empty()
    }
}

#[async_trait]
impl MappingRepository for InMemoryMappingRepository {
    async fn put(&self, mapping: &UrlMapping) -> Result<()> {
        // Same write-once rule a keyed document store enforces
        match self.storage.entry(mapping.short_url.clone()) {
            Entry::Occupied(_) => Err(RepositoryError::Conflict(format!(
                "short_url '{}' already exists",
                mapping.short_url
            ))),
            Entry::Vacant(slot) => {
                slot.insert(mapping.original_url.clone());
                Ok(())
            }
        }
    }

    async fn find_by_short_id(&self, short_url: &str) -> Result<Option<String>> {
        Ok(self.storage.get(short_url).map(|url| url.value().clone()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn put_and_find() {
        let repo = InMemoryMappingRepository::new();

        repo.put(&UrlMapping::new("abcd1234", "https://example.com"))
            .await
            .unwrap();

        let found = repo.find_by_short_id("abcd1234").await.unwrap();
        assert_eq!(found.as_deref(), Some("https://example.com"));
        assert_eq!(repo.len(), 1);
    }

    #[tokio::test]
    async fn find_missing() {
        let repo = InMemoryMappingRepository::new();

        assert!(repo.find_by_short_id("nope").await.unwrap().is_none());
        assert!(repo.is_empty());
    }

    #[tokio::test]
    async fn lookup_is_exact_match() {
        let repo = InMemoryMappingRepository::new();
        repo.put(&UrlMapping::new("AbCd1234", "https://example.com"))
            .await
            .unwrap();

        assert!(repo.find_by_short_id("abcd1234").await.unwrap().is_none());
        assert!(repo.find_by_short_id("AbCd123").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_put_conflicts_and_keeps_first() {
        let repo = InMemoryMappingRepository::new();
        repo.put(&UrlMapping::new("abcd1234", "https://first.example"))
            .await
            .unwrap();

        let err = repo
            .put(&UrlMapping::new("abcd1234", "https://second.example"))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));

        let found = repo.find_by_short_id("abcd1234").await.unwrap();
        assert_eq!(found.as_deref(), Some("https://first.example"));
    }

    #[tokio::test]
    async fn concurrent_colliding_puts_admit_one() {
        let repo = Arc::new(InMemoryMappingRepository::new());

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.put(&UrlMapping::new("samekey1", format!("https://{}.example", i)))
                        .await
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap().is_ok() {
                successes += 1;
            }
        }

        assert_eq!(successes, 1);
        assert_eq!(repo.len(), 1);
    }
}
