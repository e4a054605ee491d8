// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Postgres datastore using a `sqlx` connection pool.
//!
//! Tables are created on connect if missing (see `schema.sql`).

use crate::db::{Datastore, StoreError};
use crate::models::{Chirp, RefreshToken, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgPool, PgPoolOptions};
use uuid::Uuid;

const SCHEMA: &str = include_str!("schema.sql");
const MAX_CONNECTIONS: u32 = 10;

const USER_COLUMNS: &str = "id, created_at, updated_at, email, hashed_password, is_chirpy_red";
const CHIRP_COLUMNS: &str = "id, created_at, updated_at, body, user_id";

/// Postgres datastore.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

/// Map a sqlx error, keeping unique violations distinguishable.
fn map_err(what: &'static str) -> impl Fn(sqlx::Error) -> StoreError {
    move |e| match &e {
        sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::UniqueViolation(what),
        _ => StoreError::Backend(e.to_string()),
    }
}

impl PgStore {
    /// Connect to Postgres and make sure the tables exist.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to connect to Postgres: {e}")))?;

        sqlx::raw_sql(SCHEMA)
            .execute(&pool)
            .await
            .map_err(|e| StoreError::Backend(format!("Failed to create schema: {e}")))?;

        tracing::info!("Connected to Postgres");

        Ok(Self { pool })
    }
}

#[async_trait]
impl Datastore for PgStore {
    // ─── User Operations ─────────────────────────────────────────

    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (id, created_at, updated_at, email, hashed_password) \
             VALUES ($1, NOW(), NOW(), $2, $3) RETURNING {USER_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err("email"))
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("user"))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(email)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("email"))
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET email = $2, hashed_password = $3, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .bind(email)
        .bind(hashed_password)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err("email"))
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET is_chirpy_red = TRUE, updated_at = NOW() \
             WHERE id = $1 RETURNING {USER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err("user"))
    }

    async fn reset_users(&self) -> Result<(), StoreError> {
        // Chirps and refresh tokens go with their owners (ON DELETE CASCADE).
        let result = sqlx::query("DELETE FROM users")
            .execute(&self.pool)
            .await
            .map_err(map_err("user"))?;
        tracing::info!(deleted = result.rows_affected(), "Deleted all users");
        Ok(())
    }

    // ─── Chirp Operations ────────────────────────────────────────

    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError> {
        sqlx::query_as::<_, Chirp>(&format!(
            "INSERT INTO chirps (id, created_at, updated_at, body, user_id) \
             VALUES ($1, NOW(), NOW(), $2, $3) RETURNING {CHIRP_COLUMNS}"
        ))
        .bind(Uuid::new_v4())
        .bind(body)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err("chirp"))
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError> {
        sqlx::query_as::<_, Chirp>(&format!("SELECT {CHIRP_COLUMNS} FROM chirps WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_err("chirp"))
    }

    async fn get_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError> {
        let query = match author {
            Some(author) => sqlx::query_as::<_, Chirp>(&format!(
                "SELECT {CHIRP_COLUMNS} FROM chirps WHERE user_id = $1 ORDER BY created_at ASC"
            ))
            .bind(author)
            .fetch_all(&self.pool)
            .await,
            None => sqlx::query_as::<_, Chirp>(&format!(
                "SELECT {CHIRP_COLUMNS} FROM chirps ORDER BY created_at ASC"
            ))
            .fetch_all(&self.pool)
            .await,
        };
        query.map_err(map_err("chirp"))
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM chirps WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_err("chirp"))?;
        Ok(())
    }

    // ─── Refresh Token Operations ────────────────────────────────

    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, StoreError> {
        sqlx::query_as::<_, RefreshToken>(
            "INSERT INTO refresh_tokens (token, created_at, updated_at, user_id, expires_at, revoked_at) \
             VALUES ($1, NOW(), NOW(), $2, $3, NULL) \
             RETURNING token, user_id, created_at, updated_at, expires_at, revoked_at",
        )
        .bind(token)
        .bind(user_id)
        .bind(expires_at)
        .fetch_one(&self.pool)
        .await
        .map_err(map_err("refresh token"))
    }

    async fn get_user_from_refresh_token(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        sqlx::query_scalar::<_, Uuid>(
            "SELECT user_id FROM refresh_tokens \
             WHERE token = $1 AND revoked_at IS NULL AND expires_at > NOW()",
        )
        .bind(token)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_err("refresh token"))
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query(
            "UPDATE refresh_tokens SET revoked_at = NOW(), updated_at = NOW() \
             WHERE token = $1 AND revoked_at IS NULL",
        )
        .bind(token)
        .execute(&self.pool)
        .await
        .map_err(map_err("refresh token"))?;
        Ok(())
    }
}
