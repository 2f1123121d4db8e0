//! Repository traits abstracting the persistent store.
//!
//! The service layer talks to these traits only, never to a concrete
//! database client. That keeps the mutation pipeline testable with in-memory
//! doubles and lets the Postgres backend stay behind a feature gate.
//!
//! # Error Handling
//!
//! Implementations return `Err` for connectivity problems, constraint
//! violations, and targeted updates that match no row. "Row not found" on a
//! read is NOT an error - it is `Ok(None)`.

use crate::error::Result;
use crate::model::{Customer, Invoice, InvoiceRevision};
use uuid::Uuid;

pub mod memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PgStore;

/// Write and read operations on the `invoices` table.
#[allow(async_fn_in_trait)]
pub trait InvoiceStore: Send + Sync {
    /// Insert a new invoice row.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable, the id already exists, or
    /// the customer reference does not resolve.
    async fn insert(&self, invoice: &Invoice) -> Result<()>;

    /// Rewrite the customer, amount, and status of the row keyed by `id`.
    /// The issue date column is never touched.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable, the customer reference
    /// does not resolve, or no row matches `id` (a targeted update is never
    /// a silent no-op).
    async fn update(&self, id: &Uuid, revision: &InvoiceRevision) -> Result<()>;

    /// Delete the row keyed by `id`.
    ///
    /// Deleting an absent id is a no-op success - the store reports only
    /// what it naturally knows, and this crate adds no existence check on
    /// top.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable.
    async fn delete(&self, id: &Uuid) -> Result<()>;

    /// Fetch an invoice by id.
    ///
    /// # Returns
    /// - `Ok(Some(invoice))` - row found
    /// - `Ok(None)` - no such row (not an error)
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable or the fetch fails
    async fn fetch_by_id(&self, id: &Uuid) -> Result<Option<Invoice>>;

    /// Fetch the full invoice list backing the dashboard view.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable or the fetch fails
    async fn fetch_all(&self) -> Result<Vec<Invoice>>;
}

/// Read operations on the `customers` table.
///
/// Customers are read-only from this crate's perspective; they exist to
/// resolve invoice references and populate selection options.
#[allow(async_fn_in_trait)]
pub trait CustomerStore: Send + Sync {
    /// Fetch all customers. Order is insignificant to callers.
    ///
    /// # Errors
    /// Returns `Err` if the store is unavailable or the fetch fails
    async fn fetch_customers(&self) -> Result<Vec<Customer>>;
}
