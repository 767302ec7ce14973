//! TTL cache for verified bearer credentials.
//!
//! Avoids re-validating the same token on every request. Entries are
//! best-effort and in-memory: they reset on restart, and tokens carry
//! their own expiry which is re-checked on every cache hit.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use sha2::{Digest, Sha256};
use tokio::sync::RwLock;

use crate::service::auth_keys::AuthClaims;

/// Logging target for token cache operations.
const TRACING_TARGET: &str = "docket_server::service::token_cache";

/// Cap on cached entries; exceeding it evicts stale entries first.
const MAX_ENTRIES: usize = 10_000;

#[derive(Debug, Clone)]
struct CachedEntry {
    claims: AuthClaims,
    cached_at: Instant,
}

/// In-memory cache of verified credentials keyed by token digest.
#[derive(Clone)]
pub struct TokenCache {
    entries: Arc<RwLock<HashMap<[u8; 32], CachedEntry>>>,
    ttl: Duration,
}

impl TokenCache {
    /// Creates a cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the cached claims for a token if still fresh and unexpired.
    pub async fn get(&self, token: &str) -> Option<AuthClaims> {
        let key = Self::digest(token);
        let entries = self.entries.read().await;

        let entry = entries.get(&key)?;
        if entry.cached_at.elapsed() >= self.ttl || entry.claims.is_expired() {
            return None;
        }

        Some(entry.claims.clone())
    }

    /// Caches the claims of a freshly verified token.
    pub async fn insert(&self, token: &str, claims: AuthClaims) {
        let key = Self::digest(token);
        let mut entries = self.entries.write().await;

        if entries.len() >= MAX_ENTRIES {
            let ttl = self.ttl;
            entries.retain(|_, entry| entry.cached_at.elapsed() < ttl);

            tracing::debug!(
                target: TRACING_TARGET,
                remaining = %entries.len(),
                "Evicted stale token cache entries"
            );
        }

        entries.insert(
            key,
            CachedEntry {
                claims,
                cached_at: Instant::now(),
            },
        );
    }

    /// Returns the number of cached entries.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Returns whether the cache is empty.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn digest(token: &str) -> [u8; 32] {
        Sha256::digest(token.as_bytes()).into()
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache").field("ttl", &self.ttl).finish()
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn claims() -> AuthClaims {
        AuthClaims::new(Uuid::new_v4(), Duration::from_secs(3600))
    }

    #[tokio::test]
    async fn caches_and_returns_claims() {
        let cache = TokenCache::new(Duration::from_secs(300));
        let claims = claims();

        cache.insert("token-a", claims.clone()).await;

        assert_eq!(cache.get("token-a").await, Some(claims));
        assert_eq!(cache.get("token-b").await, None);
    }

    #[tokio::test]
    async fn entries_expire_after_ttl() {
        let cache = TokenCache::new(Duration::from_millis(20));
        cache.insert("token-a", claims()).await;

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert_eq!(cache.get("token-a").await, None);
    }

    #[tokio::test]
    async fn expired_tokens_are_not_served_from_cache() {
        let cache = TokenCache::new(Duration::from_secs(300));
        let expired = AuthClaims::new(Uuid::new_v4(), Duration::from_secs(0));

        cache.insert("token-a", expired).await;
        assert_eq!(cache.get("token-a").await, None);
    }
}
