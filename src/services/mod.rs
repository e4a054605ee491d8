// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod chirps;
pub mod content_filter;
pub mod credentials;
pub mod password;
pub mod session;
pub mod tokens;

pub use chirps::{ChirpService, SortOrder};
pub use session::{Credentials, LoginOutcome, LoginRequest, SessionService};
