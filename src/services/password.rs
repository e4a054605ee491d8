// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Password hashing with Argon2.
//!
//! Digests are PHC strings, so the salt and parameters travel with the hash.
//! Verification goes through `argon2`'s constant-time comparison.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use std::sync::OnceLock;

static DUMMY_DIGEST: OnceLock<String> = OnceLock::new();

/// Password hashing and verification errors
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("password must not be empty")]
    Empty,

    #[error("failed to hash password: {0}")]
    Hash(String),

    #[error("password does not match")]
    Mismatch,
}

/// Hash a plaintext password.
pub fn hash_password(plain: &str) -> Result<String, PasswordError> {
    if plain.is_empty() {
        return Err(PasswordError::Empty);
    }
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| PasswordError::Hash(e.to_string()))
}

/// Check `plain` against a stored digest.
pub fn verify_password(plain: &str, digest: &str) -> Result<(), PasswordError> {
    let parsed = PasswordHash::new(digest).map_err(|e| PasswordError::Hash(e.to_string()))?;
    Argon2::default()
        .verify_password(plain.as_bytes(), &parsed)
        .map_err(|_| PasswordError::Mismatch)
}

/// [`hash_password`] on the blocking pool.
pub async fn hash_password_blocking(plain: String) -> Result<String, PasswordError> {
    tokio::task::spawn_blocking(move || hash_password(&plain))
        .await
        .map_err(|e| PasswordError::Hash(format!("hashing task failed: {e}")))?
}

/// [`verify_password`] on the blocking pool.
pub async fn verify_password_blocking(plain: String, digest: String) -> Result<(), PasswordError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &digest))
        .await
        .map_err(|e| PasswordError::Hash(format!("verification task failed: {e}")))?
}

/// Digest of a throwaway password, hashed once per process.
fn dummy_digest() -> &'static str {
    DUMMY_DIGEST.get_or_init(|| hash_password("chirpy-unknown-account").unwrap_or_default())
}

/// Spend one verification's worth of work against [`dummy_digest`].
///
/// Lets a lookup miss cost the same as a wrong password.
pub async fn verify_dummy_blocking(plain: String) {
    let _ = tokio::task::spawn_blocking(move || verify_password(&plain, dummy_digest())).await;
}
