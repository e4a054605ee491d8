// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User model for storage.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// User record as stored in the datastore.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct User {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Unique across all users
    pub email: String,
    /// Argon2 PHC string (salt embedded)
    pub hashed_password: String,
    /// Set by the payment provider webhook
    pub is_chirpy_red: bool,
}
