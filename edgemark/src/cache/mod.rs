//! Edge metadata cache seam.
//!
//! Keys are fully qualified request URLs, case-sensitive, query string
//! included. Values are whole JSON-LD documents; writers replace entire
//! entries, so concurrent readers never observe partial updates.

use async_trait::async_trait;
use dashmap::DashMap;

use crate::analyzer::JsonLd;
use crate::errors::CacheError;

/// Key/value store consulted on every eligible request.
///
/// An entry implies a prior completed analysis for that URL; absence implies
/// nothing, the job may still be in flight.
#[async_trait]
pub trait MetadataCache: Send + Sync {
    /// Looks up the document cached for a request URL.
    async fn get(&self, key: &str) -> Result<Option<JsonLd>, CacheError>;

    /// Replaces the document cached for a request URL.
    async fn put(&self, key: &str, value: JsonLd) -> Result<(), CacheError>;
}

/// In-process cache for tests and single-node deployments.
#[derive(Debug, Default)]
pub struct InMemoryMetadataCache {
    entries: DashMap<String, JsonLd>,
}

impl InMemoryMetadataCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of cached entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl MetadataCache for InMemoryMetadataCache {
    async fn get(&self, key: &str) -> Result<Option<JsonLd>, CacheError> {
        Ok(self.entries.get(key).map(|entry| entry.value().clone()))
    }

    async fn put(&self, key: &str, value: JsonLd) -> Result<(), CacheError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(type_name: &str) -> JsonLd {
        JsonLd::new(json!({
            "@context": "https://schema.org",
            "@type": type_name,
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_get_absent_key() {
        let cache = InMemoryMetadataCache::new();
        assert_eq!(cache.get("https://example.com/a").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let cache = InMemoryMetadataCache::new();
        cache
            .put("https://example.com/a", document("WebPage"))
            .await
            .unwrap();

        let entry = cache.get("https://example.com/a").await.unwrap();
        assert_eq!(entry, Some(document("WebPage")));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_put_replaces_whole_value() {
        let cache = InMemoryMetadataCache::new();
        cache
            .put("https://example.com/a", document("WebPage"))
            .await
            .unwrap();
        cache
            .put("https://example.com/a", document("Article"))
            .await
            .unwrap();

        let entry = cache.get("https://example.com/a").await.unwrap();
        assert_eq!(entry, Some(document("Article")));
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_keys_are_case_sensitive() {
        let cache = InMemoryMetadataCache::new();
        cache
            .put("https://example.com/A", document("WebPage"))
            .await
            .unwrap();

        assert_eq!(cache.get("https://example.com/a").await.unwrap(), None);
    }
}
