// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential extraction from the `Authorization` header.

use axum::http::{header, HeaderMap};

/// Scheme for access and refresh tokens.
pub const BEARER_SCHEME: &str = "Bearer";
/// Scheme used by the payment provider's webhook.
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Authorization header errors.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HeaderError {
    #[error("malformed authorization header")]
    Malformed,
}

/// Extract `<token>` from `Authorization: Bearer <token>`.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, HeaderError> {
    extract_credential(headers, BEARER_SCHEME)
}

/// Extract `<key>` from `Authorization: ApiKey <key>`.
pub fn extract_api_key(headers: &HeaderMap) -> Result<&str, HeaderError> {
    extract_credential(headers, API_KEY_SCHEME)
}

/// The header must hold exactly two whitespace-separated fields, the first
/// being `scheme`.
fn extract_credential<'a>(headers: &'a HeaderMap, scheme: &str) -> Result<&'a str, HeaderError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or(HeaderError::Malformed)?;

    let mut fields = value.split_whitespace();
    match (fields.next(), fields.next(), fields.next()) {
        (Some(s), Some(credential), None) if s == scheme => Ok(credential),
        _ => Err(HeaderError::Malformed),
    }
}
