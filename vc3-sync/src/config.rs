use serde::{Deserialize, Serialize};
use std::time::Duration;

/// What storing an entity under an existing name does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Fail with `SyncError::AlreadyExists`.
    #[default]
    Reject,
    /// Replace the stored entity.
    Overwrite,
}

/// Configuration for the sync engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    pub duplicate_policy: DuplicatePolicy,
    /// Attempts per write before giving up on conflicts.
    pub max_write_attempts: u32,
    /// Backoff after the first conflict; grows linearly per attempt.
    pub retry_backoff_ms: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            duplicate_policy: DuplicatePolicy::Reject,
            max_write_attempts: 5,
            retry_backoff_ms: 50,
        }
    }
}

impl SyncConfig {
    pub(crate) fn attempts(&self) -> u32 {
        self.max_write_attempts.max(1)
    }

    pub(crate) fn backoff(&self, attempt: u32) -> Duration {
        Duration::from_millis(self.retry_backoff_ms.saturating_mul(u64::from(attempt)))
    }
}
