//! In-memory rate limiter for single-server deployments.
//!
//! Uses a fixed-window counter algorithm with an in-memory HashMap.
//! Not suitable for multi-server deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::Timestamp;
use crate::ports::{
    RateLimitDenied, RateLimitError, RateLimitKey, RateLimitResult, RateLimitStatus, RateLimiter,
};

/// Per-window request limits.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Requests allowed per 60-second window.
    pub per_minute: u32,
    /// Requests allowed per 3600-second window.
    pub per_hour: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            per_minute: 50,
            per_hour: 1000,
        }
    }
}

impl RateLimitConfig {
    fn limit_for_window(&self, window_secs: u32) -> u32 {
        match window_secs {
            3600 => self.per_hour,
            _ => self.per_minute,
        }
    }
}

/// State for a single rate limit window.
#[derive(Debug, Clone)]
struct WindowState {
    /// Number of requests in the current window.
    count: u32,
    /// When the current window started, unix seconds.
    window_start: u64,
    /// Window duration in seconds.
    window_secs: u32,
}

impl WindowState {
    fn expired_at(&self, now: u64) -> bool {
        now >= self.window_start + self.window_secs as u64
    }

    fn retry_after(&self, now: u64) -> u32 {
        (self.window_start + self.window_secs as u64).saturating_sub(now) as u32
    }
}

/// In-memory fixed-window rate limiter.
#[derive(Debug)]
pub struct InMemoryRateLimiter {
    config: RateLimitConfig,
    /// Per-key window state.
    windows: Arc<RwLock<HashMap<String, WindowState>>>,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(RateLimitConfig::default())
    }

    fn now_secs() -> u64 {
        Timestamp::now().as_unix_secs()
    }

    fn status_from(state: &WindowState, limit: u32) -> RateLimitStatus {
        RateLimitStatus {
            limit,
            remaining: limit.saturating_sub(state.count),
            reset_at: Timestamp::from_unix_secs(state.window_start + state.window_secs as u64),
            window_secs: state.window_secs,
        }
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, key: RateLimitKey) -> Result<RateLimitResult, RateLimitError> {
        let storage_key = key.storage_key();
        let limit = self.config.limit_for_window(key.window_secs);
        let now = Self::now_secs();

        let mut windows = self.windows.write().await;

        let state = windows.entry(storage_key).or_insert_with(|| WindowState {
            count: 0,
            window_start: now,
            window_secs: key.window_secs,
        });

        if state.expired_at(now) {
            state.count = 0;
            state.window_start = now;
        }

        if state.count >= limit {
            let retry_after = state.retry_after(now);
            return Ok(RateLimitResult::Denied(RateLimitDenied {
                limit,
                retry_after_secs: retry_after,
                message: format!(
                    "Rate limit exceeded: {} requests per {}s window",
                    limit, state.window_secs
                ),
            }));
        }

        state.count += 1;
        Ok(RateLimitResult::Allowed(Self::status_from(state, limit)))
    }

    async fn status(&self, key: RateLimitKey) -> Result<RateLimitStatus, RateLimitError> {
        let limit = self.config.limit_for_window(key.window_secs);
        let now = Self::now_secs();

        let windows = self.windows.read().await;
        let status = match windows.get(&key.storage_key()) {
            Some(state) if !state.expired_at(now) => Self::status_from(state, limit),
            _ => RateLimitStatus {
                limit,
                remaining: limit,
                reset_at: Timestamp::from_unix_secs(now + key.window_secs as u64),
                window_secs: key.window_secs,
            },
        };
        Ok(status)
    }

    async fn reset(&self, key: RateLimitKey) -> Result<(), RateLimitError> {
        self.windows.write().await.remove(&key.storage_key());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_limiter() -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(RateLimitConfig {
            per_minute: 2,
            per_hour: 5,
        })
    }

    #[tokio::test]
    async fn allows_up_to_limit_then_denies() {
        let limiter = small_limiter();
        let key = RateLimitKey::per_minute("ai_requests");

        assert!(limiter.check(key.clone()).await.unwrap().is_allowed());
        assert!(limiter.check(key.clone()).await.unwrap().is_allowed());

        let result = limiter.check(key).await.unwrap();
        match result {
            RateLimitResult::Denied(denied) => {
                assert_eq!(denied.limit, 2);
                assert!(denied.retry_after_secs <= 60);
            }
            RateLimitResult::Allowed(_) => panic!("expected denial"),
        }
    }

    #[tokio::test]
    async fn minute_and_hour_windows_count_independently() {
        let limiter = small_limiter();
        let minute = RateLimitKey::per_minute("ai_requests");
        let hour = RateLimitKey::per_hour("ai_requests");

        // Exhaust the minute window.
        limiter.check(minute.clone()).await.unwrap();
        limiter.check(minute.clone()).await.unwrap();
        assert!(limiter.check(minute).await.unwrap().is_denied());

        // Hour window still has quota.
        assert!(limiter.check(hour).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn status_does_not_consume() {
        let limiter = small_limiter();
        let key = RateLimitKey::per_minute("uploads");

        for _ in 0..5 {
            let status = limiter.status(key.clone()).await.unwrap();
            assert_eq!(status.remaining, 2);
        }
        assert!(limiter.check(key).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn reset_restores_quota() {
        let limiter = small_limiter();
        let key = RateLimitKey::per_minute("ai_requests");

        limiter.check(key.clone()).await.unwrap();
        limiter.check(key.clone()).await.unwrap();
        assert!(limiter.check(key.clone()).await.unwrap().is_denied());

        limiter.reset(key.clone()).await.unwrap();
        assert!(limiter.check(key).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn distinct_identifiers_do_not_share_windows() {
        let limiter = small_limiter();
        limiter
            .check(RateLimitKey::per_minute("a"))
            .await
            .unwrap();
        limiter
            .check(RateLimitKey::per_minute("a"))
            .await
            .unwrap();

        assert!(limiter
            .check(RateLimitKey::per_minute("b"))
            .await
            .unwrap()
            .is_allowed());
    }
}
