//! Appwrite configuration parsed from environment variables.

use super::types::IdentityError;

pub const DEFAULT_APPWRITE_ENDPOINT: &str = "https://cloud.appwrite.io/v1";
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HttpTimeouts {
    pub request_secs: u64,
    pub connect_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppwriteConfig {
    pub endpoint: String,
    pub project_id: String,
    pub timeouts: HttpTimeouts,
}

impl AppwriteConfig {
    /// Build typed Appwrite config from environment variables.
    ///
    /// Required:
    /// - `APPWRITE_PROJECT_ID`
    ///
    /// Optional:
    /// - `APPWRITE_ENDPOINT`: default Appwrite Cloud endpoint
    /// - `APPWRITE_REQUEST_TIMEOUT_SECS`: default 30
    /// - `APPWRITE_CONNECT_TIMEOUT_SECS`: default 10
    ///
    /// # Errors
    ///
    /// Returns an error if the project id is missing or the endpoint is not
    /// an http(s) URL.
    pub fn from_env() -> Result<Self, IdentityError> {
        let project_id = std::env::var("APPWRITE_PROJECT_ID")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| IdentityError::MissingConfig { var: "APPWRITE_PROJECT_ID".into() })?;

        let endpoint = parse_endpoint(std::env::var("APPWRITE_ENDPOINT").ok().as_deref())?;
        let timeouts = HttpTimeouts {
            request_secs: env_parse_u64("APPWRITE_REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS),
            connect_secs: env_parse_u64("APPWRITE_CONNECT_TIMEOUT_SECS", DEFAULT_CONNECT_TIMEOUT_SECS),
        };

        Ok(Self { endpoint, project_id, timeouts })
    }
}

fn env_parse_u64(key: &str, default: u64) -> u64 {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(default)
}

fn parse_endpoint(raw: Option<&str>) -> Result<String, IdentityError> {
    let endpoint = raw
        .unwrap_or(DEFAULT_APPWRITE_ENDPOINT)
        .trim()
        .trim_end_matches('/');
    if !endpoint.starts_with("http://") && !endpoint.starts_with("https://") {
        return Err(IdentityError::ConfigParse(format!("APPWRITE_ENDPOINT must be an http(s) URL, got '{endpoint}'")));
    }
    Ok(endpoint.to_string())
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
