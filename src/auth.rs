//! Sign-in plumbing over an injected credential backend.
//!
//! The dashboard does not design an authentication protocol; it consumes a
//! credential-check primitive and classifies its failures. A rejected
//! username/password pair is an ordinary outcome the login form renders.
//! Anything else the backend throws is NOT swallowed - misreporting an
//! outage as "wrong password" would send users in circles - so it
//! propagates as a crate error.

use crate::error::{Error, Result};
use crate::form::RawForm;

/// Login form field names.
pub const FIELD_EMAIL: &str = "email";
pub const FIELD_PASSWORD: &str = "password";

/// Outcome of a sign-in attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn,
    /// The backend rejected the credential pair. User-correctable.
    InvalidCredentials,
}

/// Classified failure from a credential backend.
#[derive(Debug, Clone)]
pub enum AuthError {
    /// The username/password pair was rejected.
    InvalidCredentials,
    /// Unclassified backend failure - must propagate, never be reported as
    /// a credential rejection.
    Unexpected(String),
}

/// Trait for credential backends.
#[allow(async_fn_in_trait)]
pub trait CredentialGate: Send + Sync {
    /// Check a credential pair.
    ///
    /// # Errors
    /// - `AuthError::InvalidCredentials` when the pair is rejected
    /// - `AuthError::Unexpected` for any other backend failure
    async fn sign_in(&self, email: &str, password: &str) -> std::result::Result<(), AuthError>;
}

/// Run a login form through the gate.
///
/// Missing fields are passed through as empty strings - the gate rejects
/// them like any other bad pair.
///
/// # Errors
/// Propagates unclassified gate failures as [`Error::Other`].
pub async fn authenticate<G: CredentialGate>(gate: &G, form: &RawForm) -> Result<AuthOutcome> {
    let email = form.get(FIELD_EMAIL).unwrap_or("");
    let password = form.get(FIELD_PASSWORD).unwrap_or("");

    match gate.sign_in(email, password).await {
        Ok(()) => {
            info!("sign-in succeeded for {}", email);
            Ok(AuthOutcome::SignedIn)
        }
        Err(AuthError::InvalidCredentials) => {
            debug!("sign-in rejected for {}", email);
            Ok(AuthOutcome::InvalidCredentials)
        }
        Err(AuthError::Unexpected(cause)) => Err(Error::Other(format!(
            "authentication backend failure: {}",
            cause
        ))),
    }
}

/// Environment-configured single-user gate for demo deployments.
pub struct StaticCredentialGate {
    email: String,
    password: String,
}

impl StaticCredentialGate {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Read `DEMO_EMAIL` / `DEMO_PASSWORD` from the environment, falling
    /// back to the seeded demo user.
    pub fn from_env() -> Self {
        let email =
            std::env::var("DEMO_EMAIL").unwrap_or_else(|_| "user@nextmail.com".to_string());
        let password = std::env::var("DEMO_PASSWORD").unwrap_or_else(|_| "123456".to_string());
        Self::new(email, password)
    }
}

impl CredentialGate for StaticCredentialGate {
    async fn sign_in(&self, email: &str, password: &str) -> std::result::Result<(), AuthError> {
        if email == self.email && password == self.password {
            Ok(())
        } else {
            Err(AuthError::InvalidCredentials)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn login_form(email: &str, password: &str) -> RawForm {
        RawForm::new()
            .with(FIELD_EMAIL, email)
            .with(FIELD_PASSWORD, password)
    }

    #[tokio::test]
    async fn test_valid_pair_signs_in() {
        let gate = StaticCredentialGate::new("user@nextmail.com", "123456");
        let outcome = authenticate(&gate, &login_form("user@nextmail.com", "123456"))
            .await
            .expect("Gate should not fail");
        assert_eq!(outcome, AuthOutcome::SignedIn);
    }

    #[tokio::test]
    async fn test_wrong_password_is_classified() {
        let gate = StaticCredentialGate::new("user@nextmail.com", "123456");
        let outcome = authenticate(&gate, &login_form("user@nextmail.com", "hunter2"))
            .await
            .expect("Rejection is not a failure");
        assert_eq!(outcome, AuthOutcome::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_missing_fields_are_rejected_not_errors() {
        let gate = StaticCredentialGate::new("user@nextmail.com", "123456");
        let outcome = authenticate(&gate, &RawForm::new())
            .await
            .expect("Empty form is a rejection, not a failure");
        assert_eq!(outcome, AuthOutcome::InvalidCredentials);
    }

    #[tokio::test]
    async fn test_unclassified_failure_propagates() {
        struct BrokenGate;

        impl CredentialGate for BrokenGate {
            async fn sign_in(
                &self,
                _email: &str,
                _password: &str,
            ) -> std::result::Result<(), AuthError> {
                Err(AuthError::Unexpected("directory unreachable".to_string()))
            }
        }

        let result = authenticate(&BrokenGate, &login_form("a@b.c", "pw")).await;
        match result {
            Err(Error::Other(msg)) => assert!(msg.contains("directory unreachable")),
            other => panic!("Expected propagated error, got {:?}", other),
        }
    }
}
