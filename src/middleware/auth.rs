// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Access token authentication.

use crate::error::AppError;
use crate::AppState;
use axum::{extract::FromRequestParts, http::request::Parts};
use std::sync::Arc;
use uuid::Uuid;

/// Authenticated user, resolved from `Authorization: Bearer <access token>`.
///
/// Handlers that take this extractor reject unauthenticated requests with 401
/// before any of their own logic runs.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub user_id: Uuid,
}

impl FromRequestParts<Arc<AppState>> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let user_id = state.sessions.authenticate(&parts.headers)?;
        Ok(AuthUser { user_id })
    }
}
