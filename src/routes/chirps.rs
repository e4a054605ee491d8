// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chirp endpoints.

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::Chirp;
use crate::routes::{ApiJson, ApiPath, ApiQuery};
use crate::services::SortOrder;
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/chirps", get(list_chirps).post(create_chirp))
        .route("/api/chirps/{chirp_id}", get(get_chirp).delete(delete_chirp))
}

#[derive(Debug, Serialize)]
pub struct ChirpResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub body: String,
    pub user_id: Uuid,
}

impl From<Chirp> for ChirpResponse {
    fn from(chirp: Chirp) -> Self {
        Self {
            id: chirp.id,
            created_at: chirp.created_at,
            updated_at: chirp.updated_at,
            body: chirp.body,
            user_id: chirp.user_id,
        }
    }
}

#[derive(Deserialize)]
pub struct CreateChirpRequest {
    pub body: String,
}

/// Listing filters.
#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    #[serde(default)]
    pub author_id: Option<Uuid>,
    #[serde(default)]
    pub sort: SortOrder,
}

async fn create_chirp(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(request): ApiJson<CreateChirpRequest>,
) -> Result<(StatusCode, Json<ChirpResponse>)> {
    let chirp = state.chirps.create(auth.user_id, &request.body).await?;
    Ok((StatusCode::CREATED, Json(chirp.into())))
}

async fn list_chirps(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ListParams>,
) -> Result<Json<Vec<ChirpResponse>>> {
    let chirps = state.chirps.list(params.author_id, params.sort).await?;
    Ok(Json(chirps.into_iter().map(Into::into).collect()))
}

async fn get_chirp(
    State(state): State<Arc<AppState>>,
    ApiPath(chirp_id): ApiPath<Uuid>,
) -> Result<Json<ChirpResponse>> {
    Ok(Json(state.chirps.get(chirp_id).await?.into()))
}

async fn delete_chirp(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiPath(chirp_id): ApiPath<Uuid>,
) -> Result<StatusCode> {
    state.chirps.delete(auth.user_id, chirp_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
