//! # invoice-desk
//!
//! A web invoice management dashboard with a validated, cache-consistent
//! mutation pipeline.
//!
//! ## Architecture
//!
//! - **HTTP** ([`http`]): thin actix-web handlers; form submissions in,
//!   redirects or [`form::FormState`] JSON out
//! - **Service** ([`service::InvoiceService`]): the mutation pipeline
//!   (validate, normalize, persist, invalidate, redirect) plus the cached
//!   read side
//! - **Store** ([`store`]): repository traits over the relational data,
//!   with in-memory (default) and Postgres (`postgres` feature) backends
//! - **Cache** ([`cache`]): the route-keyed list cache that mutations
//!   invalidate and the list view reads through
//!
//! ## Quick start
//!
//! ```ignore
//! use invoice_desk::{
//!     cache::InMemoryRouteCache,
//!     form::{FormState, RawForm},
//!     service::{InvoiceService, MutationOutcome},
//!     store::InMemoryStore,
//! };
//! use std::sync::Arc;
//!
//! let store = Arc::new(InMemoryStore::new());
//! let service = InvoiceService::new(store, InMemoryRouteCache::new());
//!
//! let form = RawForm::new()
//!     .with("customerId", "cus_evil_rabbit")
//!     .with("amount", "99.50")
//!     .with("status", "pending");
//!
//! match service.create_invoice(&FormState::empty(), &form).await {
//!     MutationOutcome::Redirect(route) => { /* 303 to the invoices list */ }
//!     MutationOutcome::Form(state) => { /* re-render with state.errors */ }
//! }
//! ```

#[macro_use]
extern crate log;

pub mod auth;
pub mod cache;
pub mod error;
pub mod form;
pub mod http;
pub mod model;
pub mod observability;
pub mod schema;
pub mod serialization;
pub mod service;
pub mod store;

// Re-exports for convenience
pub use cache::RouteCache;
pub use error::{Error, Result};
pub use form::{FieldErrors, FormState, RawForm};
pub use model::{Customer, Invoice, InvoiceRevision, InvoiceStatus};
pub use schema::{parse_invoice_form, FormMode, InvoiceDraft};
pub use service::{InvoiceService, MutationOutcome, INVOICES_ROUTE};
pub use store::{CustomerStore, InvoiceStore};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
