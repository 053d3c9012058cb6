//! Principal and credential types.
//!
//! DESIGN
//! ======
//! `Principal` is the client-side view of the signed-in account. Credentials
//! are transient form input: they are never stored by the session store and
//! their `Debug` output never includes passwords.

use std::fmt;

use serde::{Deserialize, Serialize};

// =============================================================================
// PRINCIPAL
// =============================================================================

/// The authenticated user as known to the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// Opaque identifier assigned by the identity service.
    pub id: String,
    /// Display name.
    pub name: String,
    pub email: String,
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Email + password pair submitted by the login form.
#[derive(Clone)]
pub struct LoginCredentials {
    pub email: String,
    pub password: String,
}

impl LoginCredentials {
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self { email: email.into(), password: password.into() }
    }
}

impl fmt::Debug for LoginCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginCredentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Fields submitted by the registration form.
#[derive(Clone)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub password: String,
    pub password_confirm: String,
}

impl Registration {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        password_confirm: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            password: password.into(),
            password_confirm: password_confirm.into(),
        }
    }

    /// Local checks run before any remote call.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] if a required field is blank or the
    /// password confirmation does not match.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.trim().is_empty() {
            return Err(ValidationError::MissingField("name"));
        }
        if self.email.trim().is_empty() {
            return Err(ValidationError::MissingField("email"));
        }
        if self.password != self.password_confirm {
            return Err(ValidationError::PasswordMismatch);
        }
        Ok(())
    }

    /// Login credentials for the session opened right after account creation.
    #[must_use]
    pub fn credentials(&self) -> LoginCredentials {
        LoginCredentials::new(self.email.clone(), self.password.clone())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("password_confirm", &"<redacted>")
            .finish()
    }
}

/// Local, synchronous rejection of form input.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("passwords did not match")]
    PasswordMismatch,
    #[error("{0} is required")]
    MissingField(&'static str),
}

#[cfg(test)]
#[path = "principal_test.rs"]
mod tests;
