//! PostgreSQL store - SQLX-backed, enabled with the `postgres` feature.
//!
//! Schema lives in `migrations/`; `amount` is stored as BIGINT minor units
//! and the `customer_id` foreign key enforces the write-time customer
//! reference invariant at the database level.

use super::{CustomerStore, InvoiceStore};
use crate::error::{Error, Result};
use crate::model::{Customer, Invoice, InvoiceRevision, InvoiceStatus};
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

/// Raw invoice row as it comes back from Postgres.
#[derive(sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    customer_id: String,
    amount: i64,
    status: String,
    date: NaiveDate,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = Error;

    fn try_from(row: InvoiceRow) -> Result<Self> {
        let status = InvoiceStatus::parse(&row.status).ok_or_else(|| {
            Error::DeserializationError(format!(
                "invoice {} carries unknown status '{}'",
                row.id, row.status
            ))
        })?;

        Ok(Invoice {
            id: row.id,
            customer_id: row.customer_id,
            amount: row.amount,
            status,
            date: row.date,
        })
    }
}

#[derive(sqlx::FromRow)]
struct CustomerRow {
    id: String,
    name: String,
    email: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: row.id,
            name: row.name,
            email: row.email,
        }
    }
}

/// Postgres-backed store.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl InvoiceStore for PgStore {
    async fn insert(&self, invoice: &Invoice) -> Result<()> {
        sqlx::query(
            "INSERT INTO invoices (id, customer_id, amount, status, date) \
             VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(invoice.id)
        .bind(&invoice.customer_id)
        .bind(invoice.amount)
        .bind(invoice.status.as_str())
        .bind(invoice.date)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, id: &Uuid, revision: &InvoiceRevision) -> Result<()> {
        let result = sqlx::query(
            "UPDATE invoices SET customer_id = $2, amount = $3, status = $4 WHERE id = $1",
        )
        .bind(id)
        .bind(&revision.customer_id)
        .bind(revision.amount)
        .bind(revision.status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::PersistenceError(format!(
                "no invoice row matched id {}",
                id
            )));
        }

        Ok(())
    }

    async fn delete(&self, id: &Uuid) -> Result<()> {
        // Zero affected rows is fine; the store reports only real failures
        sqlx::query("DELETE FROM invoices WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    async fn fetch_by_id(&self, id: &Uuid) -> Result<Option<Invoice>> {
        let row: Option<InvoiceRow> = sqlx::query_as(
            "SELECT id, customer_id, amount, status, date FROM invoices WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Invoice::try_from).transpose()
    }

    async fn fetch_all(&self) -> Result<Vec<Invoice>> {
        let rows: Vec<InvoiceRow> = sqlx::query_as(
            "SELECT id, customer_id, amount, status, date FROM invoices \
             ORDER BY date DESC, id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Invoice::try_from).collect()
    }
}

impl CustomerStore for PgStore {
    async fn fetch_customers(&self) -> Result<Vec<Customer>> {
        let rows: Vec<CustomerRow> =
            sqlx::query_as("SELECT id, name, email FROM customers ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }
}
