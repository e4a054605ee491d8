// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use chirpy::config::Config;
use chirpy::db::{MemoryStore, PgStore};
use chirpy::routes::create_router;
use chirpy::AppState;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

/// Check if a Postgres database is available via environment variable.
#[allow(dead_code)]
pub fn db_available() -> bool {
    std::env::var("DB_URL").is_ok()
}

/// Skip test with message if no database is configured.
#[macro_export]
macro_rules! require_db {
    () => {
        if !crate::common::db_available() {
            eprintln!("⚠️  Skipping: DB_URL not set");
            return;
        }
    };
}

/// Connect to the test database.
#[allow(dead_code)]
pub async fn test_db() -> PgStore {
    let url = std::env::var("DB_URL").expect("DB_URL must be set");
    PgStore::connect(&url)
        .await
        .expect("Failed to connect to Postgres")
}

/// Create a test app over the in-memory datastore.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app() -> (Router, Arc<AppState>) {
    create_test_app_with(Config::test_default())
}

/// Same as [`create_test_app`] with a caller-supplied config.
#[allow(dead_code)]
pub fn create_test_app_with(config: Config) -> (Router, Arc<AppState>) {
    let state = Arc::new(AppState::new(config, Arc::new(MemoryStore::new())));
    (create_router(state.clone()), state)
}

/// Build a JSON request, optionally with a bearer token.
#[allow(dead_code)]
pub fn json_request(method: Method, uri: &str, body: Value, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

/// Build a bodiless request, optionally with a bearer token.
#[allow(dead_code)]
pub fn empty_request(method: Method, uri: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

/// Send one request through a clone of `app`.
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> Response {
    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON.
#[allow(dead_code)]
pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Read a response body as text.
#[allow(dead_code)]
pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A registered and logged-in user.
#[allow(dead_code)]
pub struct TestUser {
    pub id: String,
    pub token: String,
    pub refresh_token: String,
}

/// Register `email` and log in, asserting both succeed.
#[allow(dead_code)]
pub async fn register_and_login(app: &Router, email: &str, password: &str) -> TestUser {
    let credentials = json!({ "email": email, "password": password });

    let response = send(
        app,
        json_request(Method::POST, "/api/users", credentials.clone(), None),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(app, json_request(Method::POST, "/api/login", credentials, None)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;

    TestUser {
        id: body["id"].as_str().unwrap().to_string(),
        token: body["token"].as_str().unwrap().to_string(),
        refresh_token: body["refresh_token"].as_str().unwrap().to_string(),
    }
}
