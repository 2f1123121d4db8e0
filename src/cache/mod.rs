//! Route-keyed cache for read-side views.
//!
//! The dashboard caches rendered list views under their route path. Writes
//! never update the cache in place; they call [`RouteCache::invalidate`] so
//! the next read recomputes the view from the store. That keeps the write
//! path a single explicit call - testable without a real cache - and the
//! read path a plain read-through.

use crate::error::Result;
use std::time::Duration;

pub mod inmemory;

pub use inmemory::InMemoryRouteCache;

/// Trait for route cache implementations.
///
/// All methods take `&self`; implementations use interior mutability
/// (DashMap, RwLock, or external storage) so one instance can be shared
/// across workers.
#[allow(async_fn_in_trait)]
pub trait RouteCache: Send + Sync {
    /// Retrieve the cached representation of a route, if present.
    ///
    /// # Errors
    /// Returns `Err` on backend failure (connection lost, etc.)
    async fn get(&self, route: &str) -> Result<Option<Vec<u8>>>;

    /// Store a route's representation with optional TTL.
    ///
    /// `ttl: None` means the entry lives until invalidated.
    ///
    /// # Errors
    /// Returns `Err` on backend failure
    async fn set(&self, route: &str, value: Vec<u8>, ttl: Option<Duration>) -> Result<()>;

    /// Mark a route's cached representation stale so the next read is
    /// recomputed from the persistent store.
    ///
    /// Invalidating a route with no cached entry is a no-op success.
    ///
    /// # Errors
    /// Returns `Err` on backend failure
    async fn invalidate(&self, route: &str) -> Result<()>;

    /// Check whether a route currently has a cached representation.
    ///
    /// # Errors
    /// Returns `Err` on backend failure
    async fn contains(&self, route: &str) -> Result<bool> {
        Ok(self.get(route).await?.is_some())
    }
}
