// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chirp creation, listing and author-only deletion.

use crate::db::Datastore;
use crate::error::{AppError, Result};
use crate::models::chirp::{Chirp, MAX_CHIRP_LENGTH};
use crate::services::content_filter::mask_profanity;
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

/// Listing order by creation time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

/// Length-check a raw body, then mask it.
///
/// Over-long bodies are rejected, never truncated.
pub fn clean_chirp_body(body: &str) -> Result<String> {
    if body.chars().count() > MAX_CHIRP_LENGTH {
        return Err(AppError::BadRequest("Chirp is too long".to_string()));
    }
    Ok(mask_profanity(body))
}

#[derive(Clone)]
pub struct ChirpService {
    db: Arc<dyn Datastore>,
}

impl ChirpService {
    pub fn new(db: Arc<dyn Datastore>) -> Self {
        Self { db }
    }

    pub async fn create(&self, author: Uuid, body: &str) -> Result<Chirp> {
        let cleaned = clean_chirp_body(body)?;
        let chirp = self.db.create_chirp(author, &cleaned).await?;
        tracing::debug!(chirp_id = %chirp.id, user_id = %author, "Chirp created");
        Ok(chirp)
    }

    pub async fn list(&self, author: Option<Uuid>, sort: SortOrder) -> Result<Vec<Chirp>> {
        let mut chirps = self.db.get_chirps(author).await?;
        if sort == SortOrder::Desc {
            chirps.reverse();
        }
        Ok(chirps)
    }

    pub async fn get(&self, id: Uuid) -> Result<Chirp> {
        self.db
            .get_chirp(id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Chirp {id} not found")))
    }

    /// Delete a chirp on behalf of `requester`.
    ///
    /// A missing chirp is `NotFound` regardless of who asks; an existing chirp
    /// owned by someone else is `Forbidden`.
    pub async fn delete(&self, requester: Uuid, id: Uuid) -> Result<()> {
        let chirp = self.get(id).await?;

        if chirp.user_id != requester {
            tracing::warn!(
                chirp_id = %id,
                owner = %chirp.user_id,
                requester = %requester,
                "Blocked deletion of another user's chirp"
            );
            return Err(AppError::Forbidden(
                "Can't delete chirps from other users".to_string(),
            ));
        }

        self.db.delete_chirp(id).await?;
        tracing::info!(chirp_id = %id, "Chirp deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStore;

    async fn setup() -> (ChirpService, Uuid, Uuid) {
        let db = Arc::new(MemoryStore::new());
        let a = db.create_user("a@b.com", "hash").await.unwrap();
        let b = db.create_user("b@b.com", "hash").await.unwrap();
        (ChirpService::new(db), a.id, b.id)
    }

    #[test]
    fn test_length_boundary() {
        assert!(clean_chirp_body(&"a".repeat(140)).is_ok());
        assert!(matches!(
            clean_chirp_body(&"a".repeat(141)),
            Err(AppError::BadRequest(_))
        ));
    }

    #[test]
    fn test_length_counts_characters() {
        assert!(clean_chirp_body(&"é".repeat(140)).is_ok());
    }

    #[test]
    fn test_length_checked_before_masking() {
        // Masking would shorten this below the limit, but it is still rejected.
        let body = format!("kerfuffle {}", "x".repeat(131));
        assert_eq!(body.chars().count(), 141);
        assert!(clean_chirp_body(&body).is_err());
    }

    #[tokio::test]
    async fn test_create_masks_body() {
        let (chirps, a, _) = setup().await;
        let chirp = chirps.create(a, "what a Kerfuffle").await.unwrap();
        assert_eq!(chirp.body, "what a ****");
        assert_eq!(chirp.user_id, a);
    }

    #[tokio::test]
    async fn test_list_sort_and_filter() {
        let (chirps, a, b) = setup().await;
        let first = chirps.create(a, "first").await.unwrap();
        let second = chirps.create(b, "second").await.unwrap();

        let asc = chirps.list(None, SortOrder::Asc).await.unwrap();
        assert_eq!(
            asc.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![first.id, second.id]
        );

        let desc = chirps.list(None, SortOrder::Desc).await.unwrap();
        assert_eq!(
            desc.iter().map(|c| c.id).collect::<Vec<_>>(),
            vec![second.id, first.id]
        );

        let only_b = chirps.list(Some(b), SortOrder::Asc).await.unwrap();
        assert_eq!(only_b.len(), 1);
        assert_eq!(only_b[0].id, second.id);
    }

    #[tokio::test]
    async fn test_delete_ownership() {
        let (chirps, a, b) = setup().await;
        let chirp = chirps.create(a, "mine").await.unwrap();

        assert!(matches!(
            chirps.delete(b, chirp.id).await,
            Err(AppError::Forbidden(_))
        ));
        assert!(matches!(
            chirps.delete(b, Uuid::new_v4()).await,
            Err(AppError::NotFound(_))
        ));

        chirps.delete(a, chirp.id).await.unwrap();
        assert!(matches!(chirps.get(chirp.id).await, Err(AppError::NotFound(_))));
    }
}
