// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Chirpy: a small micro-blogging REST backend.
//!
//! Users register, log in for an access/refresh token pair, and post short
//! "chirps" that are length-checked and profanity-masked.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;

use config::Config;
use db::Datastore;
use middleware::FileserverMetrics;
use services::{ChirpService, SessionService};
use std::sync::Arc;

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub db: Arc<dyn Datastore>,
    pub sessions: SessionService,
    pub chirps: ChirpService,
    pub metrics: FileserverMetrics,
}

impl AppState {
    /// Wire the services onto `db`.
    pub fn new(config: Config, db: Arc<dyn Datastore>) -> Self {
        let sessions = SessionService::new(db.clone(), &config.jwt_secret);
        let chirps = ChirpService::new(db.clone());
        Self {
            config,
            db,
            sessions,
            chirps,
            metrics: FileserverMetrics::default(),
        }
    }
}
