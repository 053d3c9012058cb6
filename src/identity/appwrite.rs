//! Appwrite Account API client.
//!
//! Thin HTTP wrapper for the `/account` endpoints used by the session store.
//! Pure parsing in `parse_*` / `classify_error` for testability.
//!
//! SESSIONS
//! ========
//! Appwrite answers session creation with a `a_session_<project>` cookie,
//! kept by reqwest's cookie store. When cookies cannot be set it also returns
//! an `X-Fallback-Cookies` header; that value is remembered and replayed on
//! every later request until the current session is deleted.

use std::time::Duration;

use tokio::sync::Mutex;

use super::config::AppwriteConfig;
use super::types::{CURRENT_SESSION, IdentityClient, IdentityError, Session, UserId};
use crate::principal::Principal;

const PROJECT_HEADER: &str = "X-Appwrite-Project";
const FALLBACK_COOKIES_HEADER: &str = "X-Fallback-Cookies";

// =============================================================================
// CLIENT
// =============================================================================

pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    fallback_cookies: Mutex<Option<String>>,
}

impl AppwriteClient {
    /// Build a client from a parsed config.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client fails to build.
    pub fn new(config: AppwriteConfig) -> Result<Self, IdentityError> {
        let http = reqwest::Client::builder()
            .cookie_store(true)
            .timeout(Duration::from_secs(config.timeouts.request_secs))
            .connect_timeout(Duration::from_secs(config.timeouts.connect_secs))
            .build()
            .map_err(|e| IdentityError::HttpClientBuild(e.to_string()))?;
        Ok(Self { http, endpoint: config.endpoint, project_id: config.project_id, fallback_cookies: Mutex::new(None) })
    }

    /// Build a client from `APPWRITE_*` environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if the config is missing or the HTTP client fails.
    pub fn from_env() -> Result<Self, IdentityError> {
        Self::new(AppwriteConfig::from_env()?)
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    /// Send a request and return the body of a 2xx response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, IdentityError> {
        let mut request = request.header(PROJECT_HEADER, &self.project_id);
        if let Some(cookies) = self.fallback_cookies.lock().await.as_deref() {
            request = request.header(FALLBACK_COOKIES_HEADER, cookies);
        }

        let response = request
            .send()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        if let Some(cookies) = response
            .headers()
            .get(FALLBACK_COOKIES_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            *self.fallback_cookies.lock().await = Some(cookies.to_owned());
        }

        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .map_err(|e| IdentityError::Request(e.to_string()))?;

        if !(200..300).contains(&status) {
            return Err(classify_error(status, &text));
        }
        Ok(text)
    }
}

#[async_trait::async_trait]
impl IdentityClient for AppwriteClient {
    async fn create_session(&self, email: &str, password: &str) -> Result<Session, IdentityError> {
        let body = SessionRequest { email, password };
        let text = self
            .send(self.http.post(self.url("/account/sessions/email")).json(&body))
            .await?;
        parse_session(&text)
    }

    async fn get_account(&self) -> Result<Principal, IdentityError> {
        let text = self.send(self.http.get(self.url("/account"))).await?;
        parse_account(&text)
    }

    async fn delete_session(&self, session_id: &str) -> Result<(), IdentityError> {
        let result = self
            .send(self.http.delete(self.url(&format!("/account/sessions/{session_id}"))))
            .await;
        if session_id == CURRENT_SESSION {
            *self.fallback_cookies.lock().await = None;
        }
        result.map(|_| ())
    }

    async fn create_account(
        &self,
        user_id: &UserId,
        email: &str,
        password: &str,
        name: &str,
    ) -> Result<Principal, IdentityError> {
        let user_id = user_id.resolve();
        let body = AccountRequest { user_id: &user_id, email, password, name };
        let text = self.send(self.http.post(self.url("/account")).json(&body)).await?;
        parse_account(&text)
    }
}

// =============================================================================
// WIRE TYPES
// =============================================================================

#[derive(serde::Serialize)]
struct SessionRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(serde::Serialize)]
#[serde(rename_all = "camelCase")]
struct AccountRequest<'a> {
    user_id: &'a str,
    email: &'a str,
    password: &'a str,
    name: &'a str,
}

#[derive(serde::Deserialize)]
struct SessionResponse {
    #[serde(rename = "$id")]
    id: String,
    #[serde(rename = "userId")]
    user_id: String,
}

#[derive(serde::Deserialize)]
struct AccountResponse {
    #[serde(rename = "$id")]
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
}

#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    message: String,
    #[serde(rename = "type", default)]
    kind: String,
}

// =============================================================================
// PARSING
// =============================================================================

fn parse_session(json: &str) -> Result<Session, IdentityError> {
    let api: SessionResponse = serde_json::from_str(json).map_err(|e| IdentityError::Parse(e.to_string()))?;
    Ok(Session { id: api.id, user_id: api.user_id })
}

fn parse_account(json: &str) -> Result<Principal, IdentityError> {
    let api: AccountResponse = serde_json::from_str(json).map_err(|e| IdentityError::Parse(e.to_string()))?;
    Ok(Principal { id: api.id, name: api.name, email: api.email })
}

/// Map a non-2xx Appwrite response onto the identity error taxonomy.
fn classify_error(status: u16, body: &str) -> IdentityError {
    let api = serde_json::from_str::<ErrorResponse>(body)
        .unwrap_or_else(|_| ErrorResponse { message: body.to_owned(), kind: String::new() });

    match (status, api.kind.as_str()) {
        (_, "user_invalid_credentials") => IdentityError::InvalidCredentials,
        (_, "user_session_already_exists") => IdentityError::SessionExists,
        (_, "user_already_exists" | "user_email_already_exists") | (409, _) => IdentityError::AccountExists,
        (_, "user_password_recently_used" | "user_password_personal_data") => IdentityError::WeakPassword(api.message),
        (400, "general_argument_invalid") if api.message.contains("password") => {
            IdentityError::WeakPassword(api.message)
        }
        (401, _) => IdentityError::NoSession,
        _ => IdentityError::Rejected { status, kind: api.kind, message: api.message },
    }
}

#[cfg(test)]
#[path = "appwrite_test.rs"]
mod tests;
