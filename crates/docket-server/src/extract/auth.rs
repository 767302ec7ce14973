//! Bearer-credential extractor.

use axum::RequestPartsExt;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::TypedHeader;
use axum_extra::headers::Authorization;
use axum_extra::headers::authorization::Bearer;

use crate::handler::{Error, ErrorKind};
use crate::service::{AuthClaims, ServiceState};

/// Logging target for authentication extraction.
const TRACING_TARGET: &str = "docket_server::extract::auth";

/// Verified caller identity extracted from the `Authorization` header.
///
/// Verification results are cached with a bounded TTL so repeated
/// requests with the same credential skip signature checks.
#[derive(Debug, Clone)]
pub struct AuthAccount(pub AuthClaims);

impl<S> FromRequestParts<S> for AuthAccount
where
    ServiceState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error<'static>;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = ServiceState::from_ref(state);

        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| {
                ErrorKind::MissingAuthToken
                    .with_resource("authorization")
                    .into_static()
            })?;

        let token = bearer.token();

        if let Some(claims) = state.token_cache().get(token).await {
            return Ok(Self(claims));
        }

        let claims = state.auth_keys().verify(token).map_err(|error| {
            tracing::warn!(
                target: TRACING_TARGET,
                error = %error,
                "Bearer token verification failed"
            );
            ErrorKind::Unauthorized
                .with_resource("authorization")
                .into_static()
        })?;

        state.token_cache().insert(token, claims.clone()).await;

        Ok(Self(claims))
    }
}
