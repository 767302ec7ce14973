//! Service configuration, state and process-scoped resources.

mod auth_keys;
mod config;
mod rate_limiter;
mod state;
mod token_cache;

pub use auth_keys::{AuthClaims, AuthKeys};
pub use config::ServiceConfig;
pub use rate_limiter::{RateLimitConfig, RateLimiter};
pub use state::ServiceState;
pub use token_cache::TokenCache;
