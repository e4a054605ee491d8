// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session orchestration: registration, login, refresh and revocation.
//!
//! Composes the password hasher, token issuance and header parsing on top of
//! the datastore. Holds no state of its own beyond the signing secret.

use crate::db::Datastore;
use crate::error::{AppError, Result};
use crate::models::User;
use crate::services::credentials::extract_bearer_token;
use crate::services::password::{
    hash_password_blocking, verify_dummy_blocking, verify_password_blocking,
};
use crate::services::tokens::{
    access_token_ttl, issue_access_token, issue_refresh_token, validate_access_token,
    REFRESH_TOKEN_TTL_DAYS,
};
use axum::http::HeaderMap;
use chrono::{Duration, Utc};
use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

/// Email and password, as submitted on registration and credential updates.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Credentials {
    #[validate(email(message = "Email not valid"))]
    pub email: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Requested access token lifetime; clamped to one hour.
    #[serde(default)]
    pub expires_in_seconds: Option<i64>,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub user: User,
    pub token: String,
    pub refresh_token: String,
}

/// Authentication flows over a shared datastore.
#[derive(Clone)]
pub struct SessionService {
    db: Arc<dyn Datastore>,
    jwt_secret: Arc<[u8]>,
}

impl SessionService {
    pub fn new(db: Arc<dyn Datastore>, jwt_secret: &[u8]) -> Self {
        Self {
            db,
            jwt_secret: Arc::from(jwt_secret),
        }
    }

    /// Create a user. Duplicate email is a `Conflict`.
    pub async fn register(&self, credentials: Credentials) -> Result<User> {
        credentials
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let hashed = hash_password_blocking(credentials.password).await?;
        let user = self.db.create_user(&credentials.email, &hashed).await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Check credentials and mint an access token plus a persisted refresh token.
    ///
    /// Unknown email and wrong password fail identically.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginOutcome> {
        let Some(user) = self.db.get_user_by_email(&request.email).await? else {
            tracing::warn!("Login failed: unknown email");
            verify_dummy_blocking(request.password).await;
            return Err(AppError::InvalidCredentials);
        };

        verify_password_blocking(request.password, user.hashed_password.clone())
            .await
            .inspect_err(|_| tracing::warn!(user_id = %user.id, "Login failed: bad password"))?;

        let ttl = access_token_ttl(request.expires_in_seconds);
        let token = issue_access_token(user.id, &self.jwt_secret, ttl)?;

        let refresh_token = issue_refresh_token()?;
        let expires_at = Utc::now() + Duration::days(REFRESH_TOKEN_TTL_DAYS);
        self.db
            .create_refresh_token(&refresh_token, user.id, expires_at)
            .await?;

        tracing::info!(user_id = %user.id, ttl_secs = ttl.num_seconds(), "User logged in");
        Ok(LoginOutcome {
            user,
            token,
            refresh_token,
        })
    }

    /// Mint a new access token from the refresh token in `headers`.
    ///
    /// The refresh token itself is not rotated.
    pub async fn refresh(&self, headers: &HeaderMap) -> Result<String> {
        let refresh_token = extract_bearer_token(headers)?;

        let user_id = self
            .db
            .get_user_from_refresh_token(refresh_token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let token = issue_access_token(user_id, &self.jwt_secret, access_token_ttl(None))?;
        tracing::debug!(user_id = %user_id, "Access token refreshed");
        Ok(token)
    }

    /// Revoke the refresh token in `headers`. Repeating it is a no-op.
    pub async fn revoke(&self, headers: &HeaderMap) -> Result<()> {
        let refresh_token = extract_bearer_token(headers)?;
        self.db.revoke_refresh_token(refresh_token).await?;
        Ok(())
    }

    /// Resolve the user behind the access token in `headers`.
    pub fn authenticate(&self, headers: &HeaderMap) -> Result<Uuid> {
        let token = extract_bearer_token(headers)?;
        Ok(validate_access_token(token, &self.jwt_secret)?)
    }

    /// Replace the email and password of `user_id`.
    pub async fn update_credentials(&self, user_id: Uuid, credentials: Credentials) -> Result<User> {
        credentials
            .validate()
            .map_err(|e| AppError::BadRequest(e.to_string()))?;

        let hashed = hash_password_blocking(credentials.password).await?;
        let user = self
            .db
            .update_credentials(user_id, &credentials.email, &hashed)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("User {user_id} not found")))?;

        tracing::info!(user_id = %user.id, "Credentials updated");
        Ok(user)
    }
}
