//! The invoice service: mutation pipeline and cached read side.
//!
//! Every submission runs the same pipeline:
//!
//! ```text
//! validate ──fail──▶ FormState with field errors (nothing persisted)
//!    │
//! normalize (dollars → minor units; issue date on create)
//!    │
//! persist ──fail──▶ FormState with a generic message (no field errors)
//!    │
//! invalidate list cache + redirect to the invoices route
//! ```
//!
//! Validation and persistence failures never escape as errors - they come
//! back as [`FormState`] values the form re-renders. The final step couples
//! cache invalidation with navigation: a write that did one without the
//! other would leave a stale page on screen, so both live in a single
//! commit helper and navigation is a value ([`MutationOutcome::Redirect`])
//! rather than a control-flow interrupt.
//!
//! Each submission is an independent request-scoped unit of work: no state
//! is shared across submissions, each operation issues exactly one write
//! attempt, and concurrent updates of the same invoice resolve to
//! last-write-wins at the store. The invalidation step is not transactional
//! with the write; a crash between them leaves a stale cached view until
//! the next invalidation, which is an accepted staleness window - the
//! underlying rows are correct.

use crate::cache::RouteCache;
use crate::error::Result;
use crate::form::{FormState, RawForm};
use crate::model::{Customer, Invoice, InvoiceRevision};
use crate::observability::{DashboardMetrics, NoOpMetrics};
use crate::schema::{parse_invoice_form, FormMode, FIELD_ID};
use crate::serialization::{deserialize_view, serialize_view};
use crate::store::{CustomerStore, InvoiceStore};
use crate::Error;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// The canonical invoices list route: cache key for the list view and the
/// redirect target after a successful create/update.
pub const INVOICES_ROUTE: &str = "/dashboard/invoices";

/// Result contract of a create/update submission.
#[derive(Clone, Debug, PartialEq)]
pub enum MutationOutcome {
    /// Validation or persistence failed; re-render the form with this state.
    Form(FormState),
    /// The write landed and the list cache was invalidated; transfer
    /// control to the given route.
    Redirect(&'static str),
}

impl MutationOutcome {
    /// The carried form state, if this outcome is one.
    pub fn form_state(&self) -> Option<&FormState> {
        match self {
            MutationOutcome::Form(state) => Some(state),
            MutationOutcome::Redirect(_) => None,
        }
    }

    pub fn is_redirect(&self) -> bool {
        matches!(self, MutationOutcome::Redirect(_))
    }
}

/// Convert a currency amount in dollars to integer minor units.
///
/// `round(amount * 100)` - deterministic, and what an integer database
/// column would do to the product anyway.
pub fn to_minor_units(amount: f64) -> i64 {
    (amount * 100.0).round() as i64
}

/// Service layer coordinating validation, persistence, and the route cache.
pub struct InvoiceService<S, C> {
    store: Arc<S>,
    cache: C,
    metrics: Box<dyn DashboardMetrics>,
    list_ttl: Option<Duration>,
}

impl<S, C> InvoiceService<S, C>
where
    S: InvoiceStore + CustomerStore,
    C: RouteCache,
{
    pub fn new(store: Arc<S>, cache: C) -> Self {
        InvoiceService {
            store,
            cache,
            metrics: Box::new(NoOpMetrics),
            list_ttl: None,
        }
    }

    /// Set custom metrics handler.
    pub fn with_metrics(mut self, metrics: Box<dyn DashboardMetrics>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Bound the cached list view's lifetime. `None` (the default) keeps
    /// entries until a write invalidates them.
    pub fn with_list_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.list_ttl = ttl;
        self
    }

    // ========================================================================
    // Mutations
    // ========================================================================

    /// Create an invoice from a raw form submission.
    ///
    /// The prior form state is discarded - each submission is evaluated
    /// independently of the previous attempt's errors.
    pub async fn create_invoice(&self, prior: &FormState, form: &RawForm) -> MutationOutcome {
        debug!(
            "create: new submission (prior state had {} field errors)",
            prior.error_count()
        );

        let draft = match parse_invoice_form(FormMode::Create, form) {
            Ok(draft) => draft,
            Err(errors) => {
                self.metrics.record_validation_failure("create", errors.len());
                return MutationOutcome::Form(FormState::invalid(
                    "Missing Fields. Failed to Create Invoice.",
                    errors,
                ));
            }
        };

        let invoice = Invoice::new(
            draft.customer_id,
            to_minor_units(draft.amount),
            draft.status,
        );

        let timer = Instant::now();
        match self.store.insert(&invoice).await {
            Ok(()) => {
                self.metrics.record_write("create", timer.elapsed());
                info!("created invoice {}", invoice.id);
                self.commit("create").await
            }
            Err(e) => {
                self.metrics.record_persistence_failure("create", &e.to_string());
                MutationOutcome::Form(FormState::with_message(
                    "Database Error: Failed to Create Invoice.",
                ))
            }
        }
    }

    /// Update the invoice keyed by `id` from a raw form submission.
    ///
    /// Only customer, amount, and status are written; the issue date is
    /// retained unchanged. A targeted update that matches no row is a
    /// persistence failure, not a silent no-op.
    pub async fn update_invoice(
        &self,
        id: &str,
        prior: &FormState,
        form: &RawForm,
    ) -> MutationOutcome {
        debug!(
            "update {}: new submission (prior state had {} field errors)",
            id,
            prior.error_count()
        );

        // The route id joins the field set so the validator sees one map
        let mut fields = form.clone();
        fields.set(FIELD_ID, id);

        let draft = match parse_invoice_form(FormMode::Update, &fields) {
            Ok(draft) => draft,
            Err(errors) => {
                self.metrics.record_validation_failure("update", errors.len());
                return MutationOutcome::Form(FormState::invalid(
                    "Missing Fields. Failed to Edit Invoice.",
                    errors,
                ));
            }
        };

        let Some(invoice_id) = draft.id else {
            // Update-mode parses always carry an id; guard anyway
            return MutationOutcome::Form(FormState::with_message(
                "Missing Fields. Failed to Edit Invoice.",
            ));
        };

        let revision = InvoiceRevision {
            customer_id: draft.customer_id,
            amount: to_minor_units(draft.amount),
            status: draft.status,
        };

        let timer = Instant::now();
        match self.store.update(&invoice_id, &revision).await {
            Ok(()) => {
                self.metrics.record_write("update", timer.elapsed());
                info!("updated invoice {}", invoice_id);
                self.commit("update").await
            }
            Err(e) => {
                self.metrics.record_persistence_failure("update", &e.to_string());
                MutationOutcome::Form(FormState::with_message(
                    "Database Error: Failed to Update Invoice.",
                ))
            }
        }
    }

    /// Delete the invoice keyed by `id`.
    ///
    /// Invoked from within the list view itself, so it never navigates: a
    /// confirmation (or failure) message comes back and the list re-renders
    /// in place after its cache entry is invalidated.
    pub async fn delete_invoice(&self, id: &str) -> FormState {
        let Ok(invoice_id) = Uuid::parse_str(id) else {
            // An unkeyable delete fails the same way a store error would
            self.metrics
                .record_persistence_failure("delete", "unparseable invoice id");
            return FormState::with_message("Database Error: Failed to Delete Invoice.");
        };

        let timer = Instant::now();
        match self.store.delete(&invoice_id).await {
            Ok(()) => {
                self.metrics.record_write("delete", timer.elapsed());
                info!("deleted invoice {}", invoice_id);
                self.invalidate_list("delete").await;
                FormState::with_message("Deleted Invoice.")
            }
            Err(e) => {
                self.metrics.record_persistence_failure("delete", &e.to_string());
                FormState::with_message("Database Error: Failed to Delete Invoice.")
            }
        }
    }

    /// Invalidation and navigation travel together: a successful write must
    /// never invalidate without redirecting, nor redirect without
    /// invalidating.
    async fn commit(&self, operation: &str) -> MutationOutcome {
        self.invalidate_list(operation).await;
        MutationOutcome::Redirect(INVOICES_ROUTE)
    }

    async fn invalidate_list(&self, operation: &str) {
        match self.cache.invalidate(INVOICES_ROUTE).await {
            Ok(()) => self.metrics.record_invalidation(INVOICES_ROUTE),
            // The rows are correct either way; a failed invalidation only
            // widens the staleness window until the next one
            Err(e) => warn!("{}: list invalidation failed: {}", operation, e),
        }
    }

    // ========================================================================
    // Read side
    // ========================================================================

    /// Fetch a single invoice for form hydration.
    ///
    /// # Errors
    /// `Error::NotFound` when `id` is malformed or matches no row.
    pub async fn invoice(&self, id: &str) -> Result<Invoice> {
        let invoice_id = Uuid::parse_str(id)
            .map_err(|_| Error::NotFound(format!("invoice {} not found", id)))?;

        self.store
            .fetch_by_id(&invoice_id)
            .await?
            .ok_or_else(|| Error::NotFound(format!("invoice {} not found", id)))
    }

    /// Fetch all customers, for selection options.
    pub async fn customers(&self) -> Result<Vec<Customer>> {
        self.store.fetch_customers().await
    }

    /// The invoice list backing [`INVOICES_ROUTE`], served read-through
    /// from the route cache.
    ///
    /// Cache trouble never takes down the read: a corrupt or out-of-version
    /// entry is treated as a miss and the view is recomputed from the store.
    pub async fn invoices(&self) -> Result<Vec<Invoice>> {
        let timer = Instant::now();

        match self.cache.get(INVOICES_ROUTE).await {
            Ok(Some(bytes)) => match deserialize_view::<Vec<Invoice>>(&bytes) {
                Ok(list) => {
                    self.metrics.record_list_hit(INVOICES_ROUTE, timer.elapsed());
                    return Ok(list);
                }
                Err(e) => debug!("cached list view unusable ({}), recomputing", e),
            },
            Ok(None) => {}
            Err(e) => warn!("route cache get failed: {}", e),
        }

        let list = self.store.fetch_all().await?;
        self.metrics.record_list_miss(INVOICES_ROUTE, timer.elapsed());

        match serialize_view(&list) {
            Ok(bytes) => {
                if let Err(e) = self.cache.set(INVOICES_ROUTE, bytes, self.list_ttl).await {
                    warn!("route cache set failed: {}", e);
                }
            }
            Err(e) => warn!("list view serialization failed: {}", e),
        }

        Ok(list)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::InMemoryRouteCache;
    use crate::model::{Customer, InvoiceStatus};
    use crate::store::InMemoryStore;

    fn service() -> (Arc<InMemoryStore>, InvoiceService<InMemoryStore, InMemoryRouteCache>) {
        let store = Arc::new(InMemoryStore::new());
        store.add_customer(Customer {
            id: "cus_1".to_string(),
            name: "Evil Rabbit".to_string(),
            email: "evil@rabbit.com".to_string(),
        });
        let service = InvoiceService::new(store.clone(), InMemoryRouteCache::new());
        (store, service)
    }

    fn valid_form() -> RawForm {
        RawForm::new()
            .with("customerId", "cus_1")
            .with("amount", "99.50")
            .with("status", "pending")
    }

    #[test]
    fn test_to_minor_units() {
        assert_eq!(to_minor_units(99.50), 9950);
        assert_eq!(to_minor_units(0.29), 29);
        assert_eq!(to_minor_units(10.0), 1000);
        assert_eq!(to_minor_units(0.005), 1);
    }

    #[tokio::test]
    async fn test_create_persists_minor_units_and_redirects() {
        let (store, service) = service();

        let outcome = service
            .create_invoice(&FormState::empty(), &valid_form())
            .await;

        assert_eq!(outcome, MutationOutcome::Redirect(INVOICES_ROUTE));
        let list = store.fetch_all().await.expect("Failed to fetch");
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].amount, 9950);
        assert_eq!(list[0].status, InvoiceStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_validation_failure_persists_nothing() {
        let (store, service) = service();

        let outcome = service
            .create_invoice(&FormState::empty(), &valid_form().with("amount", "-5"))
            .await;

        let state = outcome.form_state().expect("Expected a form state");
        assert_eq!(
            state.message.as_deref(),
            Some("Missing Fields. Failed to Create Invoice.")
        );
        assert_eq!(state.error_count(), 1);
        assert_eq!(store.invoice_count(), 0);
    }

    #[tokio::test]
    async fn test_create_unknown_customer_is_a_database_error() {
        let (store, service) = service();

        let outcome = service
            .create_invoice(
                &FormState::empty(),
                &valid_form().with("customerId", "cus_ghost"),
            )
            .await;

        let state = outcome.form_state().expect("Expected a form state");
        assert_eq!(
            state.message.as_deref(),
            Some("Database Error: Failed to Create Invoice.")
        );
        assert!(state.errors.is_none(), "store failures carry no field errors");
        assert_eq!(store.invoice_count(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_row_is_a_database_error() {
        let (_store, service) = service();

        let outcome = service
            .update_invoice(
                &Uuid::now_v7().to_string(),
                &FormState::empty(),
                &valid_form(),
            )
            .await;

        assert_eq!(
            outcome.form_state().and_then(|s| s.message.as_deref()),
            Some("Database Error: Failed to Update Invoice.")
        );
    }

    #[tokio::test]
    async fn test_delete_unparseable_id_is_a_database_error() {
        let (_store, service) = service();

        let state = service.delete_invoice("not-a-uuid").await;
        assert_eq!(
            state.message.as_deref(),
            Some("Database Error: Failed to Delete Invoice.")
        );
    }

    #[tokio::test]
    async fn test_list_read_through_survives_corrupt_cache() {
        let (store, _) = service();
        let cache = InMemoryRouteCache::new();
        let service = InvoiceService::new(store, cache.clone());

        service
            .create_invoice(&FormState::empty(), &valid_form())
            .await;

        // Poison the cached entry; the read must recompute, not fail
        cache
            .set(INVOICES_ROUTE, b"garbage".to_vec(), None)
            .await
            .expect("Failed to set");

        let list = service.invoices().await.expect("Read should survive");
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_invoice_fetch_not_found() {
        let (_store, service) = service();

        let err = service
            .invoice(&Uuid::now_v7().to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));

        let err = service.invoice("garbage").await.unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }
}
