// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! User registration and credential updates.

use crate::error::Result;
use crate::middleware::AuthUser;
use crate::models::User;
use crate::routes::ApiJson;
use crate::services::Credentials;
use crate::AppState;
use axum::{extract::State, http::StatusCode, routing::post, Json, Router};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/users", post(create_user).put(update_user))
}

/// Public view of a user. Never carries the password hash.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub email: String,
    pub is_chirpy_red: bool,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            created_at: user.created_at,
            updated_at: user.updated_at,
            email: user.email,
            is_chirpy_red: user.is_chirpy_red,
        }
    }
}

async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<(StatusCode, Json<UserResponse>)> {
    let user = state.sessions.register(credentials).await?;
    Ok((StatusCode::CREATED, Json(user.into())))
}

async fn update_user(
    State(state): State<Arc<AppState>>,
    auth: AuthUser,
    ApiJson(credentials): ApiJson<Credentials>,
) -> Result<Json<UserResponse>> {
    let user = state
        .sessions
        .update_credentials(auth.user_id, credentials)
        .await?;
    Ok(Json(user.into()))
}
