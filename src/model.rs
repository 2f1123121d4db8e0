//! Entity types owned by the persistent store.

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Invoice payment status.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    /// Parse the wire/form representation (`"pending"` | `"paid"`).
    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "pending" => Some(InvoiceStatus::Pending),
            "paid" => Some(InvoiceStatus::Paid),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Pending => "pending",
            InvoiceStatus::Paid => "paid",
        }
    }
}

impl std::fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored invoice row.
///
/// `amount` is held in integer minor units (cents); it is always positive
/// once persisted. `date` is the issue date, assigned at creation and never
/// rewritten by updates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: Uuid,
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}

impl Invoice {
    /// Create a new invoice with a fresh UUIDv7 id, dated today (UTC).
    ///
    /// `amount` must already be in minor units.
    pub fn new(customer_id: String, amount: i64, status: InvoiceStatus) -> Self {
        Self {
            id: Uuid::now_v7(),
            customer_id,
            amount,
            status,
            date: Utc::now().date_naive(),
        }
    }
}

/// The user-editable fields written by a targeted update.
///
/// The issue date is intentionally absent: updates never touch it.
#[derive(Clone, Debug, PartialEq)]
pub struct InvoiceRevision {
    pub customer_id: String,
    pub amount: i64,
    pub status: InvoiceStatus,
}

/// A customer record, read-only from this crate's perspective.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub email: String,
}
