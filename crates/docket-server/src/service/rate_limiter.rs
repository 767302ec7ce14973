//! In-memory per-account rate limiter using fixed windows.
//!
//! A window opens on an account's first request and closes after the
//! configured duration; requests inside a window count against the cap,
//! and the counter resets when the next window opens. Counters are
//! advisory, in-memory and reset on restart.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;
use uuid::Uuid;

use crate::handler::{Error, ErrorKind};

/// Logging target for rate limiter operations.
const TRACING_TARGET: &str = "docket_server::service::rate_limiter";

/// Rate limiter configuration.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Maximum requests allowed per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl RateLimitConfig {
    /// Creates a new rate limit configuration.
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    /// Creates a configuration for N requests per minute.
    pub fn per_minute(requests: u32) -> Self {
        Self::new(requests, Duration::from_secs(60))
    }
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::per_minute(60)
    }
}

#[derive(Debug, Clone, Copy)]
struct FixedWindow {
    opened_at: Instant,
    count: u32,
}

/// In-memory rate limiter keyed by account id.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<RwLock<HashMap<Uuid, FixedWindow>>>,
    config: RateLimitConfig,
}

impl RateLimiter {
    /// Creates a new rate limiter with the given configuration.
    pub fn new(config: RateLimitConfig) -> Self {
        tracing::info!(
            target: TRACING_TARGET,
            max_requests = config.max_requests,
            window_secs = config.window.as_secs_f64(),
            "Rate limiter initialized"
        );

        Self {
            windows: Arc::new(RwLock::new(HashMap::new())),
            config,
        }
    }

    /// Checks whether a request from the account is allowed.
    pub async fn check(&self, account_id: Uuid) -> Result<(), Error<'static>> {
        let mut windows = self.windows.write().await;

        let window = windows.entry(account_id).or_insert(FixedWindow {
            opened_at: Instant::now(),
            count: 0,
        });

        if window.opened_at.elapsed() >= self.config.window {
            window.opened_at = Instant::now();
            window.count = 0;
        }

        window.count += 1;

        if window.count > self.config.max_requests {
            let retry_after = self.config.window.saturating_sub(window.opened_at.elapsed());

            tracing::warn!(
                target: TRACING_TARGET,
                account_id = %account_id,
                retry_after_secs = retry_after.as_secs(),
                "Rate limit exceeded"
            );

            return Err(ErrorKind::TooManyRequests.with_context(format!(
                "Rate limit exceeded. Please try again in {} seconds",
                retry_after.as_secs().max(1)
            )));
        }

        Ok(())
    }

    /// Clears the window for a specific account.
    pub async fn reset(&self, account_id: Uuid) {
        let mut windows = self.windows.write().await;
        windows.remove(&account_id);
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("config", &self.config)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn allows_up_to_the_cap_then_rejects() {
        let limiter = RateLimiter::new(RateLimitConfig::new(2, Duration::from_secs(60)));
        let account = Uuid::new_v4();

        assert!(limiter.check(account).await.is_ok());
        assert!(limiter.check(account).await.is_ok());
        assert!(limiter.check(account).await.is_err());
    }

    #[tokio::test]
    async fn resets_after_the_window_elapses() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1, Duration::from_millis(30)));
        let account = Uuid::new_v4();

        assert!(limiter.check(account).await.is_ok());
        assert!(limiter.check(account).await.is_err());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(limiter.check(account).await.is_ok());
    }

    #[tokio::test]
    async fn accounts_are_tracked_independently() {
        let limiter = RateLimiter::new(RateLimitConfig::new(1, Duration::from_secs(60)));
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();

        assert!(limiter.check(first).await.is_ok());
        assert!(limiter.check(first).await.is_err());
        assert!(limiter.check(second).await.is_ok());
    }
}
