//! In-memory store (default backend, also the test double of choice).
//!
//! Backs the dashboard when no database is configured and keeps unit tests
//! free of database setup. It enforces the same write-time integrity rule
//! as the relational schema: an invoice never lands without a resolvable
//! customer reference.

use super::{CustomerStore, InvoiceStore};
use crate::error::{Error, Result};
use crate::model::{Customer, Invoice, InvoiceRevision};
use dashmap::DashMap;
use std::sync::Arc;
use uuid::Uuid;

/// Thread-safe in-memory store.
///
/// Cloning is cheap - clones share the same underlying maps.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    invoices: Arc<DashMap<Uuid, Invoice>>,
    customers: Arc<DashMap<String, Customer>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        InMemoryStore {
            invoices: Arc::new(DashMap::new()),
            customers: Arc::new(DashMap::new()),
        }
    }

    /// Register a customer so invoice writes referencing it resolve.
    pub fn add_customer(&self, customer: Customer) {
        self.customers.insert(customer.id.clone(), customer);
    }

    /// Number of stored invoices.
    pub fn invoice_count(&self) -> usize {
        self.invoices.len()
    }

    fn require_customer(&self, customer_id: &str) -> Result<()> {
        if self.customers.contains_key(customer_id) {
            Ok(())
        } else {
            Err(Error::PersistenceError(format!(
                "customer reference '{}' does not resolve",
                customer_id
            )))
        }
    }
}

impl InvoiceStore for InMemoryStore {
    async fn insert(&self, invoice: &Invoice) -> Result<()> {
        self.require_customer(&invoice.customer_id)?;

        if self.invoices.contains_key(&invoice.id) {
            return Err(Error::PersistenceError(format!(
                "duplicate invoice id {}",
                invoice.id
            )));
        }

        self.invoices.insert(invoice.id, invoice.clone());
        debug!("memory store INSERT invoice {}", invoice.id);
        Ok(())
    }

    async fn update(&self, id: &Uuid, revision: &InvoiceRevision) -> Result<()> {
        self.require_customer(&revision.customer_id)?;

        match self.invoices.get_mut(id) {
            Some(mut entry) => {
                let invoice = entry.value_mut();
                invoice.customer_id = revision.customer_id.clone();
                invoice.amount = revision.amount;
                invoice.status = revision.status;
                // invoice.date stays as issued
                debug!("memory store UPDATE invoice {}", id);
                Ok(())
            }
            None => Err(Error::PersistenceError(format!(
                "no invoice row matched id {}",
                id
            ))),
        }
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        self.invoices.remove(id);
        debug!("memory store DELETE invoice {}", id);
        Ok(())
    }

    async fn fetch_by_id(&self, id: &Uuid) -> Result<Option<Invoice>> {
        Ok(self.invoices.get(id).map(|entry| entry.value().clone()))
    }

    async fn fetch_all(&self) -> Result<Vec<Invoice>> {
        let mut list: Vec<Invoice> = self
            .invoices
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        // Newest first, ties broken by id for a stable view
        list.sort_by(|a, b| b.date.cmp(&a.date).then(a.id.cmp(&b.id)));
        Ok(list)
    }
}

impl CustomerStore for InMemoryStore {
    async fn fetch_customers(&self) -> Result<Vec<Customer>> {
        let mut list: Vec<Customer> = self
            .customers
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        list.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(list)
    }
}
