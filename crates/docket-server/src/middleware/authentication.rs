//! Authentication middleware for validating request credentials.

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use crate::extract::AuthAccount;

/// Requires a valid bearer credential to proceed with the request.
///
/// Extraction performs the actual verification (with caching); requests
/// without a valid credential are rejected before reaching the handler.
pub async fn require_authentication(
    AuthAccount(_): AuthAccount,
    request: Request,
    next: Next,
) -> Response {
    next.run(request).await
}
