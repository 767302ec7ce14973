//! Application state and dependency injection.

use std::sync::Arc;

use docket_core::AiServices;
use docket_data::SharedDocumentStore;
use docket_object::ObjectStorage;
use docket_rig::Embedder;
use docket_vector::VectorStore;

use crate::service::{AuthKeys, RateLimiter, ServiceConfig, TokenCache};

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection). All external
/// collaborators enter through this struct so the pipelines can be tested
/// with in-memory backends and mock AI services.
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    config: Arc<ServiceConfig>,

    documents: SharedDocumentStore,
    vectors: Arc<VectorStore>,
    objects: Arc<ObjectStorage>,
    ai: AiServices,
    embedder: Embedder,

    auth_keys: AuthKeys,
    token_cache: TokenCache,
    rate_limiter: RateLimiter,
}

impl ServiceState {
    /// Assembles application state from configuration and collaborators.
    pub fn new(
        config: ServiceConfig,
        documents: SharedDocumentStore,
        vectors: VectorStore,
        objects: ObjectStorage,
        ai: AiServices,
    ) -> Self {
        let auth_keys = AuthKeys::from_secret(&config.auth_secret);
        let token_cache = TokenCache::new(config.token_cache_ttl);
        let rate_limiter = RateLimiter::new(config.rate_limit);
        let embedder = Embedder::new(ai.embedder.clone(), config.embed_batch_size);

        Self {
            config: Arc::new(config),
            documents,
            vectors: Arc::new(vectors),
            objects: Arc::new(objects),
            ai,
            embedder,
            auth_keys,
            token_cache,
            rate_limiter,
        }
    }

    /// Returns the service configuration.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Returns the document metadata store.
    pub fn documents(&self) -> &SharedDocumentStore {
        &self.documents
    }

    /// Returns the vector index gateway.
    pub fn vectors(&self) -> &VectorStore {
        &self.vectors
    }

    /// Returns the blob storage gateway.
    pub fn objects(&self) -> &ObjectStorage {
        &self.objects
    }

    /// Returns the AI service bundle.
    pub fn ai(&self) -> &AiServices {
        &self.ai
    }

    /// Returns the batched embedding generator.
    pub fn embedder(&self) -> &Embedder {
        &self.embedder
    }

    /// Returns the bearer-token keys.
    pub fn auth_keys(&self) -> &AuthKeys {
        &self.auth_keys
    }

    /// Returns the credential verification cache.
    pub fn token_cache(&self) -> &TokenCache {
        &self.token_cache
    }

    /// Returns the rate limiter.
    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+ $(,)?) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

impl_di!(auth_keys: AuthKeys);
impl_di!(token_cache: TokenCache);
impl_di!(rate_limiter: RateLimiter);

impl std::fmt::Debug for ServiceState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceState")
            .field("vectors", &self.vectors)
            .field("objects", &self.objects)
            .field("ai", &self.ai)
            .finish_non_exhaustive()
    }
}
