// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chirp model for storage.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Maximum chirp body length, in characters.
pub const MAX_CHIRP_LENGTH: usize = 140;

/// A short text post owned by exactly one user.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Chirp {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Body after profanity masking
    pub body: String,
    /// Author
    pub user_id: Uuid,
}
