//! Observability hooks for the mutation pipeline and the read-side cache.
//!
//! Implement [`DashboardMetrics`] to feed your monitoring system:
//!
//! ```ignore
//! use invoice_desk::observability::DashboardMetrics;
//! use std::time::Duration;
//!
//! struct PrometheusMetrics;
//!
//! impl DashboardMetrics for PrometheusMetrics {
//!     fn record_write(&self, operation: &str, duration: Duration) {
//!         // counter!("invoice_writes", "op" => operation).inc();
//!         // histogram!("invoice_write_latency").record(duration);
//!     }
//!     // ... other methods keep their log-backed defaults
//! }
//!
//! // let service = InvoiceService::new(store, cache)
//! //     .with_metrics(Box::new(PrometheusMetrics));
//! ```
//!
//! The default ([`NoOpMetrics`]) records nothing; the trait's default
//! methods log via the `log` crate for implementations that only override a
//! subset.

use std::time::Duration;

/// Hooks covering the lifecycle of dashboard operations.
pub trait DashboardMetrics: Send + Sync {
    /// A write (insert/update/delete) landed in the store.
    fn record_write(&self, operation: &str, duration: Duration) {
        debug!("write '{}' landed in {:?}", operation, duration);
    }

    /// A submission was rejected by the validator.
    fn record_validation_failure(&self, operation: &str, fields: usize) {
        debug!(
            "'{}' rejected by validation ({} invalid fields)",
            operation, fields
        );
    }

    /// A write attempt failed at the store.
    fn record_persistence_failure(&self, operation: &str, error: &str) {
        warn!("'{}' persistence failure: {}", operation, error);
    }

    /// A route's cached view was invalidated after a successful write.
    fn record_invalidation(&self, route: &str) {
        debug!("invalidated cached view for {}", route);
    }

    /// The list view was served from cache.
    fn record_list_hit(&self, route: &str, duration: Duration) {
        debug!("list view HIT for {} in {:?}", route, duration);
    }

    /// The list view was recomputed from the store.
    fn record_list_miss(&self, route: &str, duration: Duration) {
        debug!("list view MISS for {} in {:?}", route, duration);
    }
}

/// Default metrics implementation (no-op).
#[derive(Clone, Default)]
pub struct NoOpMetrics;

impl DashboardMetrics for NoOpMetrics {
    fn record_write(&self, _operation: &str, _duration: Duration) {}
    fn record_validation_failure(&self, _operation: &str, _fields: usize) {}
    fn record_persistence_failure(&self, _operation: &str, _error: &str) {}
    fn record_invalidation(&self, _route: &str) {}
    fn record_list_hit(&self, _route: &str, _duration: Duration) {}
    fn record_list_miss(&self, _route: &str, _duration: Duration) {}
}
