// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Security headers middleware.
//!
//! JSON responses get a deny-all content security policy. Only the static
//! site under `/app` may load same-origin resources.

use axum::{
    extract::Request,
    http::{header, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

/// Prefix the file server is nested under.
const STATIC_SITE_PREFIX: &str = "/app";

const API_CSP: &str = "default-src 'none'; frame-ancestors 'none'";
const STATIC_SITE_CSP: &str = "default-src 'self'; frame-ancestors 'none'";

/// Headers set on every response regardless of path.
const COMMON_HEADERS: [(&str, &str); 4] = [
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    (
        "strict-transport-security",
        "max-age=31536000; includeSubDomains",
    ),
    ("referrer-policy", "no-referrer"),
];

/// Content security policy for a request path.
fn content_security_policy(path: &str) -> &'static str {
    let under_static_site = path
        .strip_prefix(STATIC_SITE_PREFIX)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'));

    if under_static_site {
        STATIC_SITE_CSP
    } else {
        API_CSP
    }
}

/// Add security headers to all responses.
pub async fn add_security_headers(req: Request, next: Next) -> Response {
    let csp = content_security_policy(req.uri().path());
    let mut response = next.run(req).await;
    let headers = response.headers_mut();

    for (name, value) in COMMON_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(csp),
    );

    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::{routing::get, Router};
    use tower::ServiceExt; // for oneshot

    fn app() -> Router {
        Router::new()
            .route("/api/healthz", get(|| async { "OK" }))
            .route("/app/index.html", get(|| async { "<html></html>" }))
            .layer(axum::middleware::from_fn(add_security_headers))
    }

    async fn headers_for(uri: &str) -> axum::http::HeaderMap {
        app()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .headers()
            .clone()
    }

    #[test]
    fn test_policy_by_path() {
        assert_eq!(content_security_policy("/app"), STATIC_SITE_CSP);
        assert_eq!(content_security_policy("/app/"), STATIC_SITE_CSP);
        assert_eq!(content_security_policy("/app/assets/logo.png"), STATIC_SITE_CSP);
        assert_eq!(content_security_policy("/application"), API_CSP);
        assert_eq!(content_security_policy("/api/chirps"), API_CSP);
        assert_eq!(content_security_policy("/admin/metrics"), API_CSP);
    }

    #[tokio::test]
    async fn test_api_response_headers() {
        let headers = headers_for("/api/healthz").await;

        assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
        assert_eq!(headers.get("X-Frame-Options").unwrap(), "DENY");
        assert_eq!(
            headers.get("Strict-Transport-Security").unwrap(),
            "max-age=31536000; includeSubDomains"
        );
        assert_eq!(headers.get("Referrer-Policy").unwrap(), "no-referrer");
        assert_eq!(
            headers.get("Content-Security-Policy").unwrap(),
            "default-src 'none'; frame-ancestors 'none'"
        );
    }

    #[tokio::test]
    async fn test_static_site_headers() {
        let headers = headers_for("/app/index.html").await;

        assert_eq!(headers.get("X-Content-Type-Options").unwrap(), "nosniff");
        assert_eq!(
            headers.get("Content-Security-Policy").unwrap(),
            "default-src 'self'; frame-ancestors 'none'"
        );
    }
}
