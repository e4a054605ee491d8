//! Database layer.
//!
//! Handlers and services only see the [`Datastore`] trait. Two backends
//! implement it: [`PgStore`] for Postgres and [`MemoryStore`] for local
//! development and tests.

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgStore;

use crate::models::{Chirp, RefreshToken, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Datastore failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique key (e.g. email) is already taken.
    #[error("unique constraint violated: {0}")]
    UniqueViolation(&'static str),

    #[error("datastore error: {0}")]
    Backend(String),
}

/// Persistence operations used by the service layer.
#[async_trait]
pub trait Datastore: Send + Sync {
    // ─── Users ───────────────────────────────────────────────────

    /// Insert a new user. Fails with `UniqueViolation("email")` on a duplicate.
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError>;

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;

    /// Replace email and password hash. `None` if the user does not exist.
    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, StoreError>;

    /// Mark a user as Chirpy Red. `None` if the user does not exist.
    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    /// Delete every user together with their chirps and refresh tokens.
    async fn reset_users(&self) -> Result<(), StoreError>;

    // ─── Chirps ──────────────────────────────────────────────────

    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError>;

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError>;

    /// All chirps, or only those by `author`, oldest first.
    async fn get_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError>;

    async fn delete_chirp(&self, id: Uuid) -> Result<(), StoreError>;

    // ─── Refresh Tokens ──────────────────────────────────────────

    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, StoreError>;

    /// Owner of `token`, only if it is neither revoked nor expired.
    async fn get_user_from_refresh_token(&self, token: &str) -> Result<Option<Uuid>, StoreError>;

    /// Set `revoked_at` on `token`. Already revoked or unknown tokens are left alone.
    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError>;
}
