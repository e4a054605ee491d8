// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Webhook routes for Polka payment events.

use crate::error::{AppError, Result};
use crate::services::credentials::extract_api_key;
use crate::AppState;
use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    routing::post,
    Router,
};
use serde::Deserialize;
use std::sync::Arc;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// The only event that changes anything.
pub const USER_UPGRADED_EVENT: &str = "user.upgraded";

/// Webhook routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/polka/webhooks", post(handle_event))
}

/// Polka webhook envelope. `data` is only interpreted for events we act on.
#[derive(Debug, Deserialize)]
pub struct PolkaEvent {
    pub event: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub struct UpgradeData {
    pub user_id: Uuid,
}

fn invalid_payload(e: serde_json::Error) -> AppError {
    AppError::BadRequest(format!("Invalid webhook payload: {e}"))
}

/// Handle incoming webhook event (POST).
///
/// The API key is checked before the body is interpreted.
async fn handle_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<StatusCode> {
    let key = extract_api_key(&headers)?;
    if !bool::from(key.as_bytes().ct_eq(state.config.polka_key.as_bytes())) {
        tracing::warn!("Security Alert: Polka webhook API key mismatch");
        return Err(AppError::Unauthorized);
    }

    let event: PolkaEvent = serde_json::from_slice(&body).map_err(invalid_payload)?;
    tracing::info!(event = %event.event, "Received Polka webhook");

    if event.event != USER_UPGRADED_EVENT {
        // Acknowledge so Polka stops retrying
        return Ok(StatusCode::NO_CONTENT);
    }

    let data: UpgradeData = serde_json::from_value(event.data).map_err(invalid_payload)?;

    state
        .db
        .upgrade_to_chirpy_red(data.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", data.user_id)))?;

    tracing::info!(user_id = %data.user_id, "User upgraded to Chirpy Red");
    Ok(StatusCode::NO_CONTENT)
}
