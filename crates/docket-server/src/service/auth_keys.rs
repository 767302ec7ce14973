//! Bearer-token claims and verification keys.

use std::sync::Arc;
use std::time::Duration;

use jiff::Timestamp;
use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode,
    errors::Error as JwtError,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// JWT issuer identifier.
const JWT_ISSUER: &str = "docket";
/// JWT audience identifier.
const JWT_AUDIENCE: &str = "docket:server";

/// Claims carried by an authentication token.
///
/// Timestamps are numeric UNIX seconds so that standard expiry validation
/// applies during decoding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthClaims {
    /// Issuer.
    #[serde(rename = "iss")]
    issued_by: String,
    /// Audience.
    #[serde(rename = "aud")]
    audience: String,
    /// Token id.
    #[serde(rename = "jti")]
    pub token_id: Uuid,
    /// Account the credential maps to.
    #[serde(rename = "sub")]
    pub account_id: Uuid,
    /// Issued at, UNIX seconds.
    #[serde(rename = "iat")]
    pub issued_at: i64,
    /// Expires at, UNIX seconds.
    #[serde(rename = "exp")]
    pub expires_at: i64,
}

impl AuthClaims {
    /// Creates claims for an account, valid for `ttl` from now.
    pub fn new(account_id: Uuid, ttl: Duration) -> Self {
        let now = Timestamp::now().as_second();

        Self {
            issued_by: JWT_ISSUER.to_string(),
            audience: JWT_AUDIENCE.to_string(),
            token_id: Uuid::new_v4(),
            account_id,
            issued_at: now,
            expires_at: now + ttl.as_secs() as i64,
        }
    }

    /// Check if the token's expiration time has passed.
    #[inline]
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.expires_at <= Timestamp::now().as_second()
    }
}

/// Signing and verification keys for bearer tokens.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    validation: Validation,
}

impl AuthKeys {
    /// Derives keys from a shared HMAC secret.
    pub fn from_secret(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_audience(&[JWT_AUDIENCE]);
        validation.set_issuer(&[JWT_ISSUER]);

        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            validation,
        }
    }

    /// Issues a signed token for an account.
    pub fn issue(&self, account_id: Uuid, ttl: Duration) -> Result<String, JwtError> {
        let claims = AuthClaims::new(account_id, ttl);
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
    }

    /// Verifies a token and returns its claims.
    pub fn verify(&self, token: &str) -> Result<AuthClaims, JwtError> {
        decode::<AuthClaims>(token, &self.decoding, &self.validation).map(|data| data.claims)
    }
}

impl std::fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthKeys").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_tokens_verify() {
        let keys = AuthKeys::from_secret("test-secret");
        let account_id = Uuid::new_v4();

        let token = keys.issue(account_id, Duration::from_secs(60)).unwrap();
        let claims = keys.verify(&token).unwrap();

        assert_eq!(claims.account_id, account_id);
        assert!(!claims.is_expired());
    }

    #[test]
    fn wrong_secret_is_rejected() {
        let keys = AuthKeys::from_secret("test-secret");
        let other = AuthKeys::from_secret("other-secret");

        let token = keys.issue(Uuid::new_v4(), Duration::from_secs(60)).unwrap();
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn garbage_tokens_are_rejected() {
        let keys = AuthKeys::from_secret("test-secret");
        assert!(keys.verify("not-a-token").is_err());
    }
}
