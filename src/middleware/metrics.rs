// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Hit counter for the static file server.

use crate::AppState;
use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Number of requests served under `/app` since start (or the last reset).
#[derive(Debug, Default)]
pub struct FileserverMetrics {
    hits: AtomicU64,
}

impl FileserverMetrics {
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn record_hit(&self) -> u64 {
        self.hits.fetch_add(1, Ordering::Relaxed) + 1
    }

    pub fn reset(&self) {
        self.hits.store(0, Ordering::Relaxed);
    }
}

/// Count every request that reaches the file server.
pub async fn count_hits(State(state): State<Arc<AppState>>, req: Request, next: Next) -> Response {
    state.metrics.record_hit();
    next.run(req).await
}
