// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login, access token refresh and refresh token revocation.

use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;

use crate::error::Result;
use crate::routes::users::UserResponse;
use crate::routes::ApiJson;
use crate::services::LoginRequest;
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/login", post(login))
        .route("/api/refresh", post(refresh))
        .route("/api/revoke", post(revoke))
}

/// Login response: the user plus both tokens.
#[derive(Serialize)]
pub struct LoginResponse {
    #[serde(flatten)]
    pub user: UserResponse,
    pub token: String,
    pub refresh_token: String,
}

#[derive(Serialize)]
pub struct RefreshResponse {
    pub token: String,
}

async fn login(
    State(state): State<Arc<AppState>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    let outcome = state.sessions.login(request).await?;
    Ok(Json(LoginResponse {
        user: outcome.user.into(),
        token: outcome.token,
        refresh_token: outcome.refresh_token,
    }))
}

/// Exchange `Authorization: Bearer <refresh token>` for a new access token.
async fn refresh(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>> {
    let token = state.sessions.refresh(&headers).await?;
    Ok(Json(RefreshResponse { token }))
}

async fn revoke(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Result<StatusCode> {
    state.sessions.revoke(&headers).await?;
    Ok(StatusCode::NO_CONTENT)
}
