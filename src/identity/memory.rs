//! In-memory identity backend.
//!
//! Implements the identity contract locally for offline runs and tests.
//! Every call is recorded, and a failure can be queued for the next call of
//! a given operation.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::types::{CURRENT_SESSION, IdentityClient, IdentityError, Session, UserId};
use crate::principal::Principal;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Identity operations, as recorded in the call log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    CreateSession,
    GetAccount,
    DeleteSession,
    CreateAccount,
}

struct Account {
    principal: Principal,
    password: String,
}

#[derive(Default)]
struct Inner {
    /// Accounts keyed by lowercased email.
    accounts: HashMap<String, Account>,
    current: Option<Session>,
    calls: Vec<Operation>,
    failures: HashMap<Operation, IdentityError>,
    next_session: u64,
}

#[derive(Default)]
pub struct MemoryIdentity {
    inner: Mutex<Inner>,
}

impl MemoryIdentity {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an account without recording a call.
    #[must_use]
    pub fn with_account(self, principal: Principal, password: impl Into<String>) -> Self {
        {
            let mut inner = self.lock();
            let key = principal.email.to_ascii_lowercase();
            inner.accounts.insert(key, Account { principal, password: password.into() });
        }
        self
    }

    /// Seed an account and mark it as signed in, as if a session cookie
    /// survived from an earlier run.
    #[must_use]
    pub fn with_active_session(self, principal: Principal, password: impl Into<String>) -> Self {
        let user_id = principal.id.clone();
        let this = self.with_account(principal, password);
        {
            let mut inner = this.lock();
            inner.next_session += 1;
            inner.current = Some(Session { id: format!("session-{}", inner.next_session), user_id });
        }
        this
    }

    /// Make the next call of `op` fail with `error`.
    pub fn fail_next(&self, op: Operation, error: IdentityError) {
        self.lock().failures.insert(op, error);
    }

    /// Operations received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<Operation> {
        self.lock().calls.clone()
    }

    #[must_use]
    pub fn current_session(&self) -> Option<Session> {
        self.lock().current.clone()
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Record the call and take any queued failure for it.
    fn begin(&self, op: Operation) -> Result<MutexGuard<'_, Inner>, IdentityError> {
        let mut inner = self.lock();
        inner.calls.push(op);
        match inner.failures.remove(&op) {
            Some(err) => Err(err),
            None => Ok(inner),
        }
    }
}

#[async_trait::async_trait]
impl IdentityClient for MemoryIdentity {
    async fn create_session(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let mut inner = self.begin(Operation::CreateSession)?;
        let user_id = match inner.accounts.get(&email.to_ascii_lowercase()) {
            Some(account) if account.password == password => account.principal.id.clone(),
            _ => return Err(IdentityError::InvalidCredentials),
        };
        inner.next_session += 1;
        let session = Session { id: format!("session-{}", inner.next_session), user_id };
        inner.current = Some(session.clone());
        Ok(session)
    }

    async fn get_account(&self) -> Result<Principal, IdentityError> {
        let inner = self.begin(Operation::GetAccount)?;
        let session = inner.current.as_ref().ok_or(IdentityError::NoSession)?;
        inner
            .accounts
            .values()
            .find(|a| a.principal.id == session.user_id)
            .map(|a| a.principal.clone())
            .ok_or(IdentityError::NoSession)
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), IdentityError> {
        let mut inner = self.begin(Operation::DeleteSession)?;
        let matches = inner
            .current
            .as_ref()
            .is_some_and(|s| session_id == CURRENT_SESSION || s.id == session_id);
        if !matches {
            return Err(IdentityError::NoSession);
        }
        inner.current = None;
        Ok(())
    }

    async fn create_account(
        &self,
        user_id: &UserId,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Principal, IdentityError> {
        let mut inner = self.begin(Operation::CreateAccount)?;
        let key = email.to_ascii_lowercase();
        let id = user_id.resolve();
        if inner.accounts.contains_key(&key) || inner.accounts.values().any(|a| a.principal.id == id) {
            return Err(IdentityError::AccountExists);
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(IdentityError::WeakPassword(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        let principal = Principal { id, name: name.to_owned(), email: email.to_owned() };
        inner
            .accounts
            .insert(key, Account { principal: principal.clone(), password: password.to_owned() });
        Ok(principal)
    }
}

#[cfg(test)]
#[path = "memory_test.rs"]
mod tests;
