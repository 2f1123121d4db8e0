//! Form submission values and the per-submission result contract.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Mapping from field name to one or more human-readable messages.
///
/// A `BTreeMap` keeps serialization and test output deterministic.
pub type FieldErrors = BTreeMap<String, Vec<String>>;

/// Raw, untyped form submission: string-keyed, string-valued.
///
/// This is the shape an HTML form posts - every value arrives as text, and a
/// field the user never touched may be absent entirely. All type coercion
/// happens later, at the schema boundary.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RawForm(HashMap<String, String>);

impl RawForm {
    pub fn new() -> Self {
        RawForm(HashMap::new())
    }

    /// Builder-style insert, mostly for tests and demos.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(field.into(), value.into());
        self
    }

    /// Insert or replace a field value.
    pub fn set(&mut self, field: impl Into<String>, value: impl Into<String>) {
        self.0.insert(field.into(), value.into());
    }

    /// Fetch a field, treating missing keys, empty strings, and
    /// whitespace-only values uniformly as "not provided".
    pub fn get(&self, field: &str) -> Option<&str> {
        let value = self.0.get(field)?.trim();
        if value.is_empty() {
            None
        } else {
            Some(value)
        }
    }
}

impl From<HashMap<String, String>> for RawForm {
    fn from(fields: HashMap<String, String>) -> Self {
        RawForm(fields)
    }
}

/// Outcome of the most recent submission attempt, as seen by the caller.
///
/// Created empty when a form is first shown, replaced wholesale by each
/// submission, and discarded once navigation away from the form occurs. It
/// never echoes the raw submitted values back - the caller's own draft view
/// is responsible for showing what the user typed.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormState {
    /// Human-readable summary of the failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Per-field messages. Present on validation failures only; persistence
    /// failures are not attributable to a specific field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

impl FormState {
    /// The state a form starts in.
    pub fn empty() -> Self {
        FormState::default()
    }

    pub fn with_message(message: impl Into<String>) -> Self {
        FormState {
            message: Some(message.into()),
            errors: None,
        }
    }

    pub fn invalid(message: impl Into<String>, errors: FieldErrors) -> Self {
        FormState {
            message: Some(message.into()),
            errors: Some(errors),
        }
    }

    /// True when the state carries neither a message nor field errors.
    pub fn is_clean(&self) -> bool {
        self.message.is_none() && self.errors.is_none()
    }

    /// Number of fields carrying at least one error.
    pub fn error_count(&self) -> usize {
        self.errors.as_ref().map_or(0, |e| e.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_form_missing_and_blank_are_equivalent() {
        let form = RawForm::new()
            .with("empty", "")
            .with("blank", "   \t ")
            .with("present", " value ");

        assert_eq!(form.get("absent"), None);
        assert_eq!(form.get("empty"), None);
        assert_eq!(form.get("blank"), None);
        assert_eq!(form.get("present"), Some("value"));
    }

    #[test]
    fn test_raw_form_set_replaces() {
        let mut form = RawForm::new().with("amount", "10");
        form.set("amount", "20");
        assert_eq!(form.get("amount"), Some("20"));
    }

    #[test]
    fn test_form_state_empty_is_clean() {
        let state = FormState::empty();
        assert!(state.is_clean());
        assert_eq!(state.error_count(), 0);
    }

    #[test]
    fn test_form_state_serialization_skips_absent_parts() {
        let state = FormState::with_message("Deleted Invoice.");
        let json = serde_json::to_string(&state).unwrap();
        assert_eq!(json, r#"{"message":"Deleted Invoice."}"#);
    }

    #[test]
    fn test_form_state_roundtrip() {
        let mut errors = FieldErrors::new();
        errors.insert(
            "amount".to_string(),
            vec!["amount must be greater than $0".to_string()],
        );
        let state = FormState::invalid("Missing Fields. Failed to Create Invoice.", errors);

        let json = serde_json::to_string(&state).unwrap();
        let back: FormState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, back);
        assert_eq!(back.error_count(), 1);
    }
}
