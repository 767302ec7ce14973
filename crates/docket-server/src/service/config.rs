//! Service configuration.

use std::time::Duration;

use docket_core::split::{DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};

use crate::service::rate_limiter::RateLimitConfig;

/// Application configuration with sensible development defaults.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    /// Maximum upload size in bytes.
    pub max_upload_bytes: usize,
    /// Declared content types accepted even when the file kind cannot be
    /// resolved from the MIME type or extension.
    pub allowed_content_types: Vec<String>,
    /// Namespace used when the caller supplies no case name.
    pub default_case_name: String,

    /// Chunk window size in characters.
    pub chunk_size: usize,
    /// Chunk overlap in characters.
    pub chunk_overlap: usize,
    /// Texts per embedding request.
    pub embed_batch_size: usize,

    /// Chunk hits gathered for document search aggregation.
    pub search_top_k: usize,
    /// Documents returned from search after aggregation.
    pub search_limit: usize,
    /// Chunk hits gathered for question answering.
    pub answer_top_k: usize,
    /// Chunks assembled into the answer context.
    pub context_chunks: usize,
    /// Preview length in characters.
    pub preview_chars: usize,

    /// HMAC secret for bearer-token verification.
    pub auth_secret: String,
    /// How long verified credentials are cached.
    pub token_cache_ttl: Duration,
    /// Per-account rate limit.
    pub rate_limit: RateLimitConfig,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: 50 * 1024 * 1024,
            allowed_content_types: vec!["application/octet-stream".to_string()],
            default_case_name: "default-case".to_string(),

            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
            embed_batch_size: docket_rig::DEFAULT_BATCH_SIZE,

            search_top_k: 20,
            search_limit: 10,
            answer_top_k: 15,
            context_chunks: 10,
            preview_chars: 300,

            auth_secret: "docket-development-secret".to_string(),
            token_cache_ttl: Duration::from_secs(300),
            rate_limit: RateLimitConfig::default(),
        }
    }
}
