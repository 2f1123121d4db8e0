//! Declarative shape of the invoice form and its validation.
//!
//! This is the single boundary where untyped form text becomes typed data.
//! All coercion (string→number, string→enum, string→uuid) happens here, and
//! validation is all-or-nothing per submission: any field failure yields the
//! full per-field error map and nothing is handed to persistence.

use crate::form::{FieldErrors, RawForm};
use crate::model::InvoiceStatus;
use uuid::Uuid;

/// Form field names, as submitted by the dashboard pages.
pub const FIELD_ID: &str = "id";
pub const FIELD_CUSTOMER_ID: &str = "customerId";
pub const FIELD_AMOUNT: &str = "amount";
pub const FIELD_STATUS: &str = "status";

/// Which variant of the invoice form is being parsed.
///
/// `Create` does not accept an id (one is generated at persistence time);
/// `Update` additionally requires a resolvable invoice id, injected into the
/// field set by the caller.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Update,
}

/// Fully typed outcome of a successful parse.
///
/// `amount` is still in plain currency units (dollars); conversion to
/// integer minor units is the mutation handler's job, not the validator's.
#[derive(Clone, Debug, PartialEq)]
pub struct InvoiceDraft {
    /// Present in `Update` mode, absent in `Create` mode.
    pub id: Option<Uuid>,
    pub customer_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
}

fn field_error(errors: &mut FieldErrors, field: &str, message: &str) {
    errors
        .entry(field.to_string())
        .or_default()
        .push(message.to_string());
}

/// Validate a raw invoice form.
///
/// Returns the typed draft, or a mapping from each invalid field to one or
/// more messages. Missing keys, empty strings, and whitespace-only values
/// are all "not provided" (see [`RawForm::get`]); a non-numeric amount
/// surfaces the same as an out-of-range one.
pub fn parse_invoice_form(mode: FormMode, form: &RawForm) -> Result<InvoiceDraft, FieldErrors> {
    let mut errors = FieldErrors::new();

    let id = match mode {
        FormMode::Create => None,
        FormMode::Update => match form.get(FIELD_ID) {
            None => {
                field_error(&mut errors, FIELD_ID, "Missing invoice id.");
                None
            }
            Some(raw) => match Uuid::parse_str(raw) {
                Ok(parsed) => Some(parsed),
                Err(_) => {
                    field_error(&mut errors, FIELD_ID, "Invalid invoice id.");
                    None
                }
            },
        },
    };

    let customer_id = form.get(FIELD_CUSTOMER_ID).map(str::to_owned);
    if customer_id.is_none() {
        field_error(&mut errors, FIELD_CUSTOMER_ID, "Please select a customer.");
    }

    let amount = match form.get(FIELD_AMOUNT) {
        None => {
            field_error(&mut errors, FIELD_AMOUNT, "Please enter an amount.");
            None
        }
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) if value.is_finite() && value > 0.0 => Some(value),
            _ => {
                field_error(&mut errors, FIELD_AMOUNT, "amount must be greater than $0");
                None
            }
        },
    };

    let status = match form.get(FIELD_STATUS) {
        None => {
            field_error(&mut errors, FIELD_STATUS, "Please select an invoice status.");
            None
        }
        Some(raw) => match InvoiceStatus::parse(raw) {
            Some(parsed) => Some(parsed),
            None => {
                field_error(&mut errors, FIELD_STATUS, "Please select an invoice status.");
                None
            }
        },
    };

    match (customer_id, amount, status) {
        (Some(customer_id), Some(amount), Some(status)) if errors.is_empty() => Ok(InvoiceDraft {
            id,
            customer_id,
            amount,
            status,
        }),
        _ => Err(errors),
    }
}
