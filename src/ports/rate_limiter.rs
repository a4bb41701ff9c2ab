//! Fixed-window rate limiting port.
//!
//! Every provider-backed operation consumes a slot from a per-minute and a
//! per-hour window before calling out. Keys combine an identifier with a
//! window length, so the same identifier tracks each window independently.

use async_trait::async_trait;

use crate::domain::foundation::Timestamp;

#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Consumes one slot from the key's window if any remain.
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError>;

    /// Reads the window state without consuming a slot.
    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError>;

    /// Drops the key's current window, restoring the full quota.
    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError>;
}

/// What a limit applies to: an identifier plus a window length.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct RateLimitKey {
    pub identifier: String,
    pub window_secs: u32,
}

impl RateLimitKey {
    pub fn per_minute(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            window_secs: 60,
        }
    }

    pub fn per_hour(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            window_secs: 3600,
        }
    }

    /// Bucket name for backends that store windows by string key.
    pub fn storage_key(&self) -> String {
        format!("ratelimit:{}:{}", self.identifier, self.window_secs)
    }
}

#[derive(Debug, Clone)]
pub enum RateLimitResult {
    Allowed(RateLimitStatus),
    Denied(RateLimitDenied),
}

impl RateLimitResult {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitResult::Allowed(_))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, RateLimitResult::Denied(_))
    }
}

/// Window state returned on an allowed check.
#[derive(Debug, Clone)]
pub struct RateLimitStatus {
    pub limit: u32,
    pub remaining: u32,
    /// When the window rolls over and the quota refills.
    pub reset_at: Timestamp,
    pub window_secs: u32,
}

/// Denial details, enough for a Retry-After header.
#[derive(Debug, Clone)]
pub struct RateLimitDenied {
    pub limit: u32,
    pub retry_after_secs: u32,
    pub message: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("rate limiter unavailable: {0}")]
    Unavailable(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),
}
