//! Session store — the client-side cache of the remote session.
//!
//! DESIGN
//! ======
//! One `SessionStore` is built at startup and shared as `Arc<SessionStore>`.
//! It owns the `(principal, loading)` pair and publishes every change through
//! a `tokio::sync::watch` channel; the route gate and UI hold receivers.
//!
//! ERROR HANDLING
//! ==============
//! Remote failures never escape as errors. They are logged, leave the
//! principal untouched, and come back to the caller as
//! `AuthOutcome::Failed` so forms can show a reason. Only local validation
//! of registration input is returned as `Err`.
//!
//! In-flight calls are not cancelled. A result that resolves after the view
//! that asked for it is gone is still applied, since the state is
//! process-wide.

use std::sync::Arc;

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::gate::Route;
use crate::identity::{CURRENT_SESSION, IdentityClient, IdentityError, UserId};
use crate::principal::{LoginCredentials, Principal, Registration, ValidationError};

// =============================================================================
// STATE
// =============================================================================

/// Authentication state tracking the current principal and loading status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthState {
    pub principal: Option<Principal>,
    pub loading: bool,
}

impl Default for AuthState {
    /// Process start: nothing known yet, first session check pending.
    fn default() -> Self {
        Self { principal: None, loading: true }
    }
}

impl AuthState {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.principal.is_some()
    }
}

/// Result of a login or registration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    SignedIn(Principal),
    Failed(IdentityError),
}

impl AuthOutcome {
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        matches!(self, Self::SignedIn(_))
    }

    /// Where the caller should navigate next, if anywhere.
    #[must_use]
    pub fn redirect(&self) -> Option<Route> {
        match self {
            Self::SignedIn(_) => Some(Route::Home),
            Self::Failed(_) => None,
        }
    }
}

// =============================================================================
// STORE
// =============================================================================

pub struct SessionStore {
    identity: Arc<dyn IdentityClient>,
    state: watch::Sender<AuthState>,
}

impl SessionStore {
    /// Build a store in the loading state. Call [`SessionStore::initialize`]
    /// once at startup.
    #[must_use]
    pub fn new(identity: Arc<dyn IdentityClient>) -> Self {
        let (state, _) = watch::channel(AuthState::default());
        Self { identity, state }
    }

    /// Receive every subsequent state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> AuthState {
        self.state.borrow().clone()
    }

    #[must_use]
    pub fn principal(&self) -> Option<Principal> {
        self.state.borrow().principal.clone()
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state.borrow().loading
    }

    /// Restore an existing remote session, if any.
    ///
    /// A failed lookup means "not signed in", never an application error.
    pub async fn initialize(&self) {
        self.state.send_modify(|s| s.loading = true);

        let principal = match self.identity.get_account().await {
            Ok(principal) => {
                info!(user_id = %principal.id, "restored existing session");
                Some(principal)
            }
            Err(e) => {
                debug!(error = %e, "no active session at startup");
                None
            }
        };

        self.state.send_modify(|s| {
            s.principal = principal;
            s.loading = false;
        });
    }

    /// Open a session and load its account.
    pub async fn login(&self, credentials: &LoginCredentials) -> AuthOutcome {
        self.state.send_modify(|s| s.loading = true);
        let result = self.sign_in(credentials).await;
        self.settle("login", &credentials.email, result)
    }

    /// Delete the current remote session and forget the principal.
    ///
    /// The principal is cleared even if the remote delete fails. Returns the
    /// route the caller should navigate to.
    pub async fn logout(&self) -> Route {
        if let Err(e) = self.identity.delete_session(CURRENT_SESSION).await {
            warn!(error = %e, "remote session delete failed; clearing local session anyway");
        }
        self.state.send_modify(|s| {
            s.principal = None;
            s.loading = false;
        });
        info!("signed out");
        Route::Login
    }

    /// Create an account, then sign in with it.
    ///
    /// # Errors
    ///
    /// Returns a [`ValidationError`] without contacting the identity service
    /// when the input fails local checks. Remote failures are reported as
    /// [`AuthOutcome::Failed`].
    pub async fn register(&self, registration: &Registration) -> Result<AuthOutcome, ValidationError> {
        if let Err(e) = registration.validate() {
            debug!(error = %e, "registration rejected locally");
            return Err(e);
        }

        self.state.send_modify(|s| s.loading = true);
        let result = self.create_and_sign_in(registration).await;
        Ok(self.settle("register", &registration.email, result))
    }

    async fn sign_in(&self, credentials: &LoginCredentials) -> Result<Principal, IdentityError> {
        self.identity
            .create_session(&credentials.email, &credentials.password)
            .await?;
        self.identity.get_account().await
    }

    async fn create_and_sign_in(&self, registration: &Registration) -> Result<Principal, IdentityError> {
        self.identity
            .create_account(&UserId::Unique, &registration.email, &registration.password, &registration.name)
            .await?;
        self.sign_in(&registration.credentials()).await
    }

    /// Apply the result of a login/register chain and clear `loading`.
    fn settle(&self, action: &'static str, email: &str, result: Result<Principal, IdentityError>) -> AuthOutcome {
        match result {
            Ok(principal) => {
                info!(action, user_id = %principal.id, "signed in");
                let stored = principal.clone();
                self.state.send_modify(|s| {
                    s.principal = Some(stored);
                    s.loading = false;
                });
                AuthOutcome::SignedIn(principal)
            }
            Err(e) => {
                warn!(action, email, error = %e, "authentication failed");
                self.state.send_modify(|s| s.loading = false);
                AuthOutcome::Failed(e)
            }
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
