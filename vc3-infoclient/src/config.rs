//! Connection settings for the information service.

use crate::error::{StoreError, StoreResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// How to reach the information service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InfoClientConfig {
    /// Base URL, e.g. `https://info.virtualclusters.org:20334`.
    pub endpoint: String,
    /// Per-request timeout. Fractions are allowed.
    pub timeout_seconds: f64,
    pub auth: StoreAuth,
}

impl Default for InfoClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:20334".to_string(),
            timeout_seconds: 30.0,
            auth: StoreAuth::None,
        }
    }
}

impl InfoClientConfig {
    /// Config for `endpoint` with defaults for everything else.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }

    /// Returns the request timeout, or a config error if `timeout_seconds`
    /// is not positive or does not fit a `Duration`.
    pub fn timeout(&self) -> StoreResult<Duration> {
        if !self.timeout_seconds.is_finite() || self.timeout_seconds <= 0.0 {
            return Err(StoreError::Config(format!(
                "timeout_seconds must be a positive number, got {}",
                self.timeout_seconds
            )));
        }
        Duration::try_from_secs_f64(self.timeout_seconds).map_err(|e| {
            StoreError::Config(format!(
                "timeout_seconds {} is out of range: {e}",
                self.timeout_seconds
            ))
        })
    }

    /// Checks the endpoint scheme and the timeout range.
    pub fn validate(&self) -> StoreResult<()> {
        if !(self.endpoint.starts_with("http://") || self.endpoint.starts_with("https://")) {
            return Err(StoreError::Config(format!(
                "endpoint '{}' must be an http(s) URL",
                self.endpoint
            )));
        }
        self.timeout()?;
        Ok(())
    }
}

/// Credentials sent with every request.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StoreAuth {
    #[default]
    None,
    Bearer {
        token: String,
    },
    Basic {
        username: String,
        password: String,
    },
}

// Secrets stay out of logs.
impl fmt::Debug for StoreAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreAuth::None => f.write_str("None"),
            StoreAuth::Bearer { .. } => f.debug_struct("Bearer").field("token", &"<redacted>").finish(),
            StoreAuth::Basic { username, .. } => f
                .debug_struct("Basic")
                .field("username", username)
                .field("password", &"<redacted>")
                .finish(),
        }
    }
}
