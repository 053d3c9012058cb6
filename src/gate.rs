//! Route table and access gate.
//!
//! DESIGN
//! ======
//! `decide` is a pure function of the current `AuthState` and the requested
//! route. `RouteGate` wraps a subscription to the session store and reads the
//! latest state on every check, so decisions are never cached across
//! navigations.

use tokio::sync::watch;

use crate::session::AuthState;

// =============================================================================
// ROUTES
// =============================================================================

/// Who may see a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// Anyone.
    Public,
    /// Signed-out visitors only; signed-in users are sent home.
    GuestOnly,
    /// Signed-in users only; others are sent to login.
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Profile,
    Login,
    Register,
}

impl Route {
    pub const ALL: [Route; 4] = [Route::Home, Route::Profile, Route::Login, Route::Register];

    #[must_use]
    pub fn path(self) -> &'static str {
        match self {
            Self::Home => "/",
            Self::Profile => "/profile",
            Self::Login => "/login",
            Self::Register => "/register",
        }
    }

    /// Match a path, ignoring a trailing slash.
    #[must_use]
    pub fn from_path(path: &str) -> Option<Self> {
        let trimmed = path.trim();
        let normalized = if trimmed.len() > 1 { trimmed.trim_end_matches('/') } else { trimmed };
        Self::ALL.into_iter().find(|r| r.path() == normalized)
    }

    #[must_use]
    pub fn access(self) -> Access {
        match self {
            Self::Home | Self::Profile => Access::Protected,
            Self::Login => Access::GuestOnly,
            Self::Register => Access::Public,
        }
    }
}

// =============================================================================
// DECISION
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateDecision {
    /// Session check still pending; render nothing route-specific.
    Placeholder,
    Render(Route),
    Redirect(Route),
}

/// Decide what to show for `route` given the current auth state.
///
/// While `loading` is set every route gets the placeholder, matching the
/// provider that withholds all children until the first session check ends.
#[must_use]
pub fn decide(state: &AuthState, route: Route) -> GateDecision {
    if state.loading {
        return GateDecision::Placeholder;
    }
    let signed_in = state.principal.is_some();
    match route.access() {
        Access::Protected if !signed_in => GateDecision::Redirect(Route::Login),
        Access::GuestOnly if signed_in => GateDecision::Redirect(Route::Home),
        _ => GateDecision::Render(route),
    }
}

// =============================================================================
// GATE
// =============================================================================

/// Live gate bound to a session store subscription.
#[derive(Clone)]
pub struct RouteGate {
    state: watch::Receiver<AuthState>,
}

impl RouteGate {
    #[must_use]
    pub fn new(state: watch::Receiver<AuthState>) -> Self {
        Self { state }
    }

    /// Evaluate `route` against the latest published state.
    #[must_use]
    pub fn check(&self, route: Route) -> GateDecision {
        decide(&self.state.borrow(), route)
    }

    /// Wait until the store is not loading, then evaluate `route`.
    ///
    /// If the store has been dropped the last published state is used.
    pub async fn settled(&mut self, route: Route) -> GateDecision {
        if let Err(e) = self.state.wait_for(|s| !s.loading).await {
            tracing::debug!(error = %e, "session store dropped while waiting for gate");
        }
        self.check(route)
    }
}

#[cfg(test)]
#[path = "gate_test.rs"]
mod tests;
