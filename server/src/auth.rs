//! Caller identity from `Authorization: Bearer <jwt>`.
//!
//! Tokens are HS256 JWTs whose `sub` claim is the owner's UUID. Issuing them
//! belongs to an upstream login service; `issue_token` exists for tests and
//! local tooling.

use axum::{extract::FromRequestParts, http::header::AUTHORIZATION, http::request::Parts};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::{error::AppError, AppState};

const BEARER_PREFIX: &str = "Bearer ";

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Signing and verification keys derived from the shared secret.
#[derive(Clone)]
pub struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    pub fn new(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    fn verify(&self, token: &str) -> Option<Uuid> {
        let data = decode::<Claims>(token, &self.decoding, &Validation::default())
            .map_err(|e| debug!("rejected token: {e}"))
            .ok()?;
        data.claims.sub.parse().ok()
    }
}

/// Mints a token for `owner` that expires after `ttl`.
pub fn issue_token(
    keys: &Keys,
    owner: Uuid,
    ttl: Duration,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: owner.to_string(),
        exp: (Utc::now() + ttl).timestamp().max(0) as usize,
    };
    encode(&Header::default(), &claims, &keys.encoding)
}

/// The authenticated caller. Every todo route takes one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Owner(pub Uuid);

impl FromRequestParts<AppState> for Owner {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized("No token, authorization denied"))?;

        let token = header
            .strip_prefix(BEARER_PREFIX)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthorized("No token, authorization denied"))?;

        state
            .keys
            .verify(token)
            .map(Owner)
            .ok_or(AppError::Unauthorized("Token is not valid"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn issued_token_verifies_to_owner() {
        let keys = Keys::new(b"secret");
        let owner = Uuid::new_v4();
        let token = issue_token(&keys, owner, Duration::hours(1)).unwrap();
        assert_eq!(keys.verify(&token), Some(owner));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = issue_token(&Keys::new(b"other"), Uuid::new_v4(), Duration::hours(1)).unwrap();
        assert_eq!(Keys::new(b"secret").verify(&token), None);
    }

    #[test]
    fn expired_token_is_rejected() {
        let keys = Keys::new(b"secret");
        let token = issue_token(&keys, Uuid::new_v4(), Duration::hours(-2)).unwrap();
        assert_eq!(keys.verify(&token), None);
    }

    #[test]
    fn non_uuid_subject_is_rejected() {
        let keys = Keys::new(b"secret");
        let claims = Claims {
            sub: "someone@example.com".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();
        assert_eq!(keys.verify(&token), None);
    }
}
