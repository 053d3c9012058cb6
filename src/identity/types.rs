//! Identity types — the client contract, its errors and session handles.
//!
//! Backend-neutral types shared by the Appwrite and in-memory clients.

use serde::{Deserialize, Serialize};

use crate::principal::Principal;

/// Session id accepted by [`IdentityClient::delete_session`] for the ambient
/// session.
pub const CURRENT_SESSION: &str = "current";

// =============================================================================
// ERROR
// =============================================================================

/// Errors produced by identity client operations.
///
/// Transport errors are flattened to strings so the type stays `Clone` and
/// can be handed back to callers after being logged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum IdentityError {
    /// Email unknown or password wrong.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// No active session for the ambient credentials.
    #[error("no active session")]
    NoSession,

    /// A session is already active for these credentials.
    #[error("a session is already active")]
    SessionExists,

    /// An account with this email or id already exists.
    #[error("account already exists")]
    AccountExists,

    /// The password was refused by the service's policy.
    #[error("weak password: {0}")]
    WeakPassword(String),

    /// The service rejected the request for another reason.
    #[error("rejected ({status} {kind}): {message}")]
    Rejected { status: u16, kind: String, message: String },

    /// The HTTP request did not complete.
    #[error("request failed: {0}")]
    Request(String),

    /// The response body could not be deserialized.
    #[error("response parse failed: {0}")]
    Parse(String),

    /// A required configuration variable is not set.
    #[error("missing config: env var {var} not set")]
    MissingConfig { var: String },

    /// A configuration value could not be parsed.
    #[error("config parse failed: {0}")]
    ConfigParse(String),

    /// The underlying HTTP client could not be constructed.
    #[error("HTTP client build failed: {0}")]
    HttpClientBuild(String),
}

// =============================================================================
// SESSION / USER ID
// =============================================================================

/// Opaque handle for a session created by the identity service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub user_id: String,
}

/// Account id requested on account creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserId {
    /// Mint a fresh id client-side.
    Unique,
    /// Use a caller-chosen id.
    Custom(String),
}

impl UserId {
    /// Resolve to the id string sent to the service.
    #[must_use]
    pub fn resolve(&self) -> String {
        match self {
            Self::Unique => uuid::Uuid::new_v4().simple().to_string(),
            Self::Custom(id) => id.clone(),
        }
    }
}

// =============================================================================
// CLIENT CONTRACT
// =============================================================================

/// The remote identity service consumed by the session store.
#[async_trait::async_trait]
pub trait IdentityClient: Send + Sync {
    /// Open a session for the given credentials.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::InvalidCredentials`] for an unknown email or a
    /// wrong password, or a transport error.
    async fn create_session(&self, email: &str, password: &str) -> Result<Session, IdentityError>;

    /// Fetch the account behind the ambient session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NoSession`] when nobody is signed in.
    async fn get_account(&self) -> Result<Principal, IdentityError>;

    /// Delete a session; pass [`CURRENT_SESSION`] for the ambient one.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::NoSession`] when there is nothing to delete.
    async fn delete_session(&self, session_id: &str) -> Result<(), IdentityError>;

    /// Create an account. Does not open a session.
    ///
    /// # Errors
    ///
    /// Returns [`IdentityError::AccountExists`] or
    /// [`IdentityError::WeakPassword`] on policy rejection.
    async fn create_account(
        &self,
        user_id: &UserId,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Principal, IdentityError>;
}
