//! Connection settings shared by every client call.
//!
//! A `ClientConfig` can be built in code or read from the environment:
//!
//! - `CLOUDHEALTH_API_KEY` (required)
//! - `CLOUDHEALTH_ENDPOINT` (optional, defaults to [`DEFAULT_ENDPOINT`])
//! - `CLOUDHEALTH_TIMEOUT_SECS` (optional, defaults to 15)

use std::time::Duration;

use crate::error::{ApiError, Result};

/// Public CloudHealth API root.
pub const DEFAULT_ENDPOINT: &str = "https://chapi.cloudhealthtech.com/v1";

/// Per-request timeout when none is configured.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub const API_KEY_VAR: &str = "CLOUDHEALTH_API_KEY";
pub const ENDPOINT_VAR: &str = "CLOUDHEALTH_ENDPOINT";
pub const TIMEOUT_VAR: &str = "CLOUDHEALTH_TIMEOUT_SECS";

/// Base URL, API key and timeout for a CloudHealth client.
#[derive(Clone)]
pub struct ClientConfig {
    pub endpoint: String,
    pub api_key: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientConfig")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ClientConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: api_key.into(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Load configuration from `CLOUDHEALTH_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| ApiError::configuration(format!("{API_KEY_VAR} is not set")))?;

        let mut config = Self::new(api_key);

        if let Some(endpoint) = lookup(ENDPOINT_VAR).filter(|e| !e.trim().is_empty()) {
            config.endpoint = endpoint;
        }

        if let Some(raw) = lookup(TIMEOUT_VAR) {
            let secs: u64 = raw.trim().parse().map_err(|_| {
                ApiError::configuration(format!("{TIMEOUT_VAR} must be a whole number of seconds, got `{raw}`"))
            })?;
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }
}
