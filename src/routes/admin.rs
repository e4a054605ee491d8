// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Operator endpoints: file server metrics and the dev-only reset.

use crate::error::{AppError, Result};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    response::Html,
    routing::{get, post},
    Router,
};
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/metrics", get(metrics))
        .route("/admin/reset", post(reset))
}

async fn metrics(State(state): State<Arc<AppState>>) -> Html<String> {
    Html(format!(
        "<html><body><h1>Welcome, Chirpy Admin</h1><p>Chirpy has been visited {} times!</p></body></html>",
        state.metrics.hits()
    ))
}

/// Delete every user (and with them all chirps and refresh tokens) and zero
/// the hit counter. Refused outside `PLATFORM=dev`.
async fn reset(State(state): State<Arc<AppState>>) -> Result<(StatusCode, &'static str)> {
    if !state.config.platform.is_dev() {
        tracing::warn!("Rejected reset outside dev platform");
        return Err(AppError::Forbidden(
            "Reset is only allowed in dev environment".to_string(),
        ));
    }

    state.db.reset_users().await?;
    state.metrics.reset();
    tracing::info!("Datastore and metrics reset");

    Ok((StatusCode::OK, "Hits reset to 0"))
}
