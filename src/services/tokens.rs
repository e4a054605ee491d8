// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access and refresh token issuance.
//!
//! Access tokens are HS256 JWTs that carry everything needed to check them.
//! Refresh tokens are opaque random strings; their state (expiry, revocation)
//! lives in the datastore, so this module only mints them.

use chrono::{Duration, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation,
};
use ring::rand::{SecureRandom, SystemRandom};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// `iss` claim on every access token.
pub const ISSUER: &str = "chirpy";

/// Upper bound (and default) for access token lifetime, in seconds.
pub const MAX_ACCESS_TOKEN_TTL_SECS: i64 = 60 * 60;

/// Lifetime of a refresh token, in days.
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 60;

const REFRESH_TOKEN_BYTES: usize = 32;

/// Token errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,

    #[error("token signature or structure is invalid")]
    Invalid,

    #[error("token subject is not a valid user id")]
    MalformedSubject,

    #[error("failed to sign token: {0}")]
    Signing(String),

    #[error("random source unavailable")]
    Entropy,
}

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Issuer, always [`ISSUER`]
    pub iss: String,
    /// Subject (user ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: usize,
    /// Expiration time (Unix timestamp)
    pub exp: usize,
}

/// Resolve a client-requested lifetime in seconds.
///
/// Missing or non-positive values get the maximum; larger values are clamped to it.
pub fn access_token_ttl(requested_secs: Option<i64>) -> Duration {
    match requested_secs {
        Some(secs) if secs > 0 => Duration::seconds(secs.min(MAX_ACCESS_TOKEN_TTL_SECS)),
        _ => Duration::seconds(MAX_ACCESS_TOKEN_TTL_SECS),
    }
}

/// Sign an access token for `user_id` that expires after `ttl`.
pub fn issue_access_token(user_id: Uuid, secret: &[u8], ttl: Duration) -> Result<String, TokenError> {
    let now = Utc::now();
    let claims = Claims {
        iss: ISSUER.to_string(),
        sub: user_id.to_string(),
        iat: now.timestamp() as usize,
        exp: (now + ttl).timestamp() as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// Verify signature, issuer and expiry, then return the subject.
pub fn validate_access_token(token: &str, secret: &[u8]) -> Result<Uuid, TokenError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation.set_issuer(&[ISSUER]);
    validation.set_required_spec_claims(&["exp", "iss", "sub"]);

    let data = decode::<Claims>(token, &DecodingKey::from_secret(secret), &validation).map_err(
        |e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        },
    )?;

    // jsonwebtoken accepts exp == now; a token is only valid strictly before exp.
    if data.claims.exp <= Utc::now().timestamp() as usize {
        return Err(TokenError::Expired);
    }

    Uuid::parse_str(&data.claims.sub).map_err(|_| TokenError::MalformedSubject)
}

/// Generate an opaque refresh token: 32 random bytes, hex encoded.
pub fn issue_refresh_token() -> Result<String, TokenError> {
    let mut bytes = [0u8; REFRESH_TOKEN_BYTES];
    SystemRandom::new()
        .fill(&mut bytes)
        .map_err(|_| TokenError::Entropy)?;
    Ok(hex::encode(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &[u8] = b"kerfuffle";

    #[test]
    fn test_access_token_roundtrip() {
        let user_id = Uuid::new_v4();
        let token = issue_access_token(user_id, SECRET, Duration::minutes(5)).unwrap();
        assert_eq!(validate_access_token(&token, SECRET), Ok(user_id));
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::minutes(5)).unwrap();
        assert_eq!(
            validate_access_token(&token, b"other"),
            Err(TokenError::Invalid)
        );
    }

    #[test]
    fn test_expired_token_reports_expiry() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::seconds(-10)).unwrap();
        assert_eq!(validate_access_token(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_expiring_now_is_expired() {
        let token = issue_access_token(Uuid::new_v4(), SECRET, Duration::zero()).unwrap();
        assert_eq!(validate_access_token(&token, SECRET), Err(TokenError::Expired));
    }

    #[test]
    fn test_garbage_is_invalid() {
        assert_eq!(
            validate_access_token("invalid.token.here", SECRET),
            Err(TokenError::Invalid)
        );
        assert_eq!(validate_access_token("", SECRET), Err(TokenError::Invalid));
    }

    #[test]
    fn test_non_uuid_subject() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            iss: ISSUER.to_string(),
            sub: "12345".to_string(),
            iat: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(
            validate_access_token(&token, SECRET),
            Err(TokenError::MalformedSubject)
        );
    }

    #[test]
    fn test_foreign_issuer_is_invalid() {
        let now = Utc::now().timestamp() as usize;
        let claims = Claims {
            iss: "someone-else".to_string(),
            sub: Uuid::new_v4().to_string(),
            iat: now,
            exp: now + 600,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(SECRET),
        )
        .unwrap();

        assert_eq!(validate_access_token(&token, SECRET), Err(TokenError::Invalid));
    }

    #[test]
    fn test_access_token_ttl_clamping() {
        let max = Duration::hours(1);
        assert_eq!(access_token_ttl(None), max);
        assert_eq!(access_token_ttl(Some(0)), max);
        assert_eq!(access_token_ttl(Some(-5)), max);
        assert_eq!(access_token_ttl(Some(60)), Duration::seconds(60));
        assert_eq!(access_token_ttl(Some(7200)), max);
    }

    #[test]
    fn test_refresh_token_shape() {
        let a = issue_refresh_token().unwrap();
        let b = issue_refresh_token().unwrap();
        assert_eq!(a.len(), 64);
        assert!(a.chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(a, b);
    }
}
