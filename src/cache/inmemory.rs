//! In-memory route cache (default, thread-safe, async).
//!
//! Uses DashMap for lock-free concurrent access with per-key sharding.
//! TTL expiration is handled lazily on access.

use super::RouteCache;
use crate::error::Result;
use dashmap::DashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Cached route entry with optional expiration.
struct CacheEntry {
    data: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn new(data: Vec<u8>, ttl: Option<Duration>) -> Self {
        let expires_at = ttl.map(|d| Instant::now() + d);
        CacheEntry { data, expires_at }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Instant::now() > exp)
    }
}

/// Thread-safe in-memory route cache.
///
/// Cloning is cheap - clones share the same underlying store.
#[derive(Clone, Default)]
pub struct InMemoryRouteCache {
    store: Arc<DashMap<String, CacheEntry>>,
}

impl InMemoryRouteCache {
    pub fn new() -> Self {
        InMemoryRouteCache {
            store: Arc::new(DashMap::new()),
        }
    }

    /// Current number of cached routes.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

impl RouteCache for InMemoryRouteCache {
    async fn get(&self, route: &str) -> Result<Option<Vec<u8>>> {
        if let Some(entry) = self.store.get(route) {
            if !entry.is_expired() {
                debug!("route cache GET {} -> HIT", route);
                return Ok(Some(entry.data.clone()));
            }
        }

        // Drop the expired entry if one was there
        self.store.remove(route);
        debug!("route cache GET {} -> MISS", route);
        Ok(None)
    }

    async fn set(&self, route: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()> {
        self.store
            .insert(route.to_string(), CacheEntry::new(value, ttl));

        if let Some(d) = ttl {
            debug!("route cache SET {} (TTL: {:?})", route, d);
        } else {
            debug!("route cache SET {}", route);
        }

        Ok(())
    }

    async fn invalidate(&self, route: &str) -> Result<()> {
        self.store.remove(route);
        debug!("route cache INVALIDATE {}", route);
        Ok(())
    }

    async fn contains(&self, route: &str) -> Result<bool> {
        if let Some(entry) = self.store.get(route) {
            return Ok(!entry.is_expired());
        }

        Ok(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_set_get() {
        let cache = InMemoryRouteCache::new();

        cache
            .set("/dashboard/invoices", b"view".to_vec(), None)
            .await
            .expect("Failed to set");

        let result = cache.get("/dashboard/invoices").await.expect("Failed to get");
        assert_eq!(result, Some(b"view".to_vec()));
    }

    #[tokio::test]
    async fn test_miss() {
        let cache = InMemoryRouteCache::new();

        let result = cache.get("/nowhere").await.expect("Failed to get");
        assert_eq!(result, None);
    }

    #[tokio::test]
    async fn test_invalidate_removes_entry() {
        let cache = InMemoryRouteCache::new();

        cache
            .set("/dashboard/invoices", b"view".to_vec(), None)
            .await
            .expect("Failed to set");
        assert!(cache
            .contains("/dashboard/invoices")
            .await
            .expect("Failed to check contains"));

        cache
            .invalidate("/dashboard/invoices")
            .await
            .expect("Failed to invalidate");
        assert!(!cache
            .contains("/dashboard/invoices")
            .await
            .expect("Failed to check contains"));
    }

    #[tokio::test]
    async fn test_invalidate_absent_route_is_noop() {
        let cache = InMemoryRouteCache::new();
        cache.invalidate("/nowhere").await.expect("Failed to invalidate");
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let cache = InMemoryRouteCache::new();

        cache
            .set("/r", b"view".to_vec(), Some(Duration::from_millis(50)))
            .await
            .expect("Failed to set");

        assert!(cache.get("/r").await.expect("Failed to get").is_some());

        tokio::time::sleep(Duration::from_millis(80)).await;

        assert!(cache.get("/r").await.expect("Failed to get").is_none());
        assert!(cache.is_empty(), "expired entry should be dropped on access");
    }

    #[tokio::test]
    async fn test_clones_share_store() {
        let cache1 = InMemoryRouteCache::new();
        cache1
            .set("/r", b"view".to_vec(), None)
            .await
            .expect("Failed to set");

        let cache2 = cache1.clone();
        assert_eq!(
            cache2.get("/r").await.expect("Failed to get"),
            Some(b"view".to_vec())
        );

        cache2.invalidate("/r").await.expect("Failed to invalidate");
        assert!(cache1.get("/r").await.expect("Failed to get").is_none());
    }
}
