//! Per-account rate limiting middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::extract::AuthAccount;
use crate::service::RateLimiter;

/// Rate limits requests by the authenticated account.
///
/// Over-limit callers are rejected before any pipeline work is done.
pub async fn rate_limit_by_account(
    AuthAccount(claims): AuthAccount,
    State(rate_limiter): State<RateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    match rate_limiter.check(claims.account_id).await {
        Ok(()) => next.run(request).await,
        Err(error) => error.into_response(),
    }
}
