// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! In-memory datastore backed by `DashMap`.
//!
//! Mirrors the Postgres semantics closely enough that the whole HTTP
//! surface can be exercised without a database.

use crate::db::{Datastore, StoreError};
use crate::models::{Chirp, RefreshToken, User};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// Chirp plus its insertion sequence, so listing order does not depend on
/// clock resolution.
#[derive(Clone)]
struct StoredChirp {
    seq: u64,
    chirp: Chirp,
}

/// In-memory datastore.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<Uuid, User>,
    /// email -> user id; the entry API makes uniqueness checks atomic
    emails: DashMap<String, Uuid>,
    chirps: DashMap<Uuid, StoredChirp>,
    refresh_tokens: DashMap<String, RefreshToken>,
    next_seq: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored refresh token record, for assertions in tests.
    #[cfg(test)]
    pub(crate) fn refresh_token(&self, token: &str) -> Option<RefreshToken> {
        self.refresh_tokens.get(token).map(|t| t.clone())
    }
}

#[async_trait]
impl Datastore for MemoryStore {
    async fn create_user(&self, email: &str, hashed_password: &str) -> Result<User, StoreError> {
        let id = Uuid::new_v4();
        match self.emails.entry(email.to_string()) {
            Entry::Occupied(_) => return Err(StoreError::UniqueViolation("email")),
            Entry::Vacant(slot) => {
                slot.insert(id);
            }
        }

        let now = Utc::now();
        let user = User {
            id,
            created_at: now,
            updated_at: now,
            email: email.to_string(),
            hashed_password: hashed_password.to_string(),
            is_chirpy_red: false,
        };
        self.users.insert(id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let Some(id) = self.emails.get(email).map(|e| *e) else {
            return Ok(None);
        };
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn update_credentials(
        &self,
        id: Uuid,
        email: &str,
        hashed_password: &str,
    ) -> Result<Option<User>, StoreError> {
        let Some(old_email) = self.users.get(&id).map(|u| u.email.clone()) else {
            return Ok(None);
        };

        if old_email != email {
            match self.emails.entry(email.to_string()) {
                Entry::Occupied(_) => return Err(StoreError::UniqueViolation("email")),
                Entry::Vacant(slot) => {
                    slot.insert(id);
                }
            }
            self.emails.remove(&old_email);
        }

        let Some(mut user) = self.users.get_mut(&id) else {
            // Deleted concurrently; release the email we just claimed.
            self.emails.remove_if(email, |_, owner| *owner == id);
            return Ok(None);
        };
        user.email = email.to_string();
        user.hashed_password = hashed_password.to_string();
        user.updated_at = Utc::now();
        Ok(Some(user.clone()))
    }

    async fn upgrade_to_chirpy_red(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.users.get_mut(&id).map(|mut user| {
            user.is_chirpy_red = true;
            user.updated_at = Utc::now();
            user.clone()
        }))
    }

    async fn reset_users(&self) -> Result<(), StoreError> {
        self.refresh_tokens.clear();
        self.chirps.clear();
        self.users.clear();
        self.emails.clear();
        Ok(())
    }

    async fn create_chirp(&self, user_id: Uuid, body: &str) -> Result<Chirp, StoreError> {
        if !self.users.contains_key(&user_id) {
            return Err(StoreError::Backend(format!(
                "chirp author {user_id} does not exist"
            )));
        }

        let now = Utc::now();
        let chirp = Chirp {
            id: Uuid::new_v4(),
            created_at: now,
            updated_at: now,
            body: body.to_string(),
            user_id,
        };
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        self.chirps.insert(
            chirp.id,
            StoredChirp {
                seq,
                chirp: chirp.clone(),
            },
        );
        Ok(chirp)
    }

    async fn get_chirp(&self, id: Uuid) -> Result<Option<Chirp>, StoreError> {
        Ok(self.chirps.get(&id).map(|c| c.chirp.clone()))
    }

    async fn get_chirps(&self, author: Option<Uuid>) -> Result<Vec<Chirp>, StoreError> {
        let mut stored: Vec<StoredChirp> = self
            .chirps
            .iter()
            .filter(|c| author.map_or(true, |a| c.chirp.user_id == a))
            .map(|c| c.value().clone())
            .collect();
        stored.sort_by_key(|c| c.seq);
        Ok(stored.into_iter().map(|c| c.chirp).collect())
    }

    async fn delete_chirp(&self, id: Uuid) -> Result<(), StoreError> {
        self.chirps.remove(&id);
        Ok(())
    }

    async fn create_refresh_token(
        &self,
        token: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> Result<RefreshToken, StoreError> {
        if !self.users.contains_key(&user_id) {
            return Err(StoreError::Backend(format!(
                "refresh token owner {user_id} does not exist"
            )));
        }

        let now = Utc::now();
        let record = RefreshToken {
            token: token.to_string(),
            user_id,
            created_at: now,
            updated_at: now,
            expires_at,
            revoked_at: None,
        };
        match self.refresh_tokens.entry(token.to_string()) {
            Entry::Occupied(_) => Err(StoreError::UniqueViolation("refresh token")),
            Entry::Vacant(slot) => {
                slot.insert(record.clone());
                Ok(record)
            }
        }
    }

    async fn get_user_from_refresh_token(&self, token: &str) -> Result<Option<Uuid>, StoreError> {
        let now = Utc::now();
        Ok(self
            .refresh_tokens
            .get(token)
            .filter(|t| t.is_active_at(now))
            .map(|t| t.user_id))
    }

    async fn revoke_refresh_token(&self, token: &str) -> Result<(), StoreError> {
        if let Some(mut record) = self.refresh_tokens.get_mut(token) {
            if record.revoked_at.is_none() {
                let now = Utc::now();
                record.revoked_at = Some(now);
                record.updated_at = now;
            }
        }
        Ok(())
    }
}
