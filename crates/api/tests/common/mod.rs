//! Shared harness for the HTTP integration tests.
//!
//! Builds the production router over a `#[sqlx::test]` pool and an in-memory
//! image host, and provides small request/response helpers.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE, SET_COOKIE};
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use http_body_util::BodyExt;
use petpals_api::auth::jwt::JwtConfig;
use petpals_api::config::ServerConfig;
use petpals_api::router::build_app_router;
use petpals_api::state::AppState;
use petpals_cloud::MemoryHost;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

/// Build a test `ServerConfig` with safe defaults and a fixed JWT secret.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        max_upload_bytes: 10 * 1024 * 1024,
        cookie_secure: false,
        jwt: JwtConfig {
            secret: "integration-test-secret-with-enough-length".to_string(),
            access_token_expiry_mins: 60,
            refresh_token_expiry_days: 1,
        },
    }
}

/// Build the full application router plus a handle on its image host.
pub fn build_test_app_with_host(pool: PgPool) -> (Router, Arc<MemoryHost>) {
    let config = test_config();
    let images = Arc::new(MemoryHost::new());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        images: images.clone(),
    };

    (build_app_router(state, &config), images)
}

/// Build the full application router using the given database pool.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_host(pool).0
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response {
    app.oneshot(request).await.expect("router is infallible")
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::get(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::get(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    json_request(app, Method::POST, uri, body, None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    json_request(app, Method::PUT, uri, body, Some(token)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::delete(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// Send a bodyless request carrying only a `Cookie` header.
pub async fn with_cookie(
    app: Router,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder.body(Body::empty()).unwrap()).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    body: Value,
    token: Option<&str>,
) -> Response {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
    }
    send(app, builder.body(Body::from(body.to_string())).unwrap()).await
}

// ---------------------------------------------------------------------------
// Multipart
// ---------------------------------------------------------------------------

const BOUNDARY: &str = "petpals-test-boundary";

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File(&'a str, &'a str, &'a [u8]),
}

pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            Part::File(name, file_name, bytes) => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; \
                         filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn multipart_auth(
    app: Router,
    method: Method,
    uri: &str,
    parts: &[Part<'_>],
    token: &str,
) -> Response {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_json(response: Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

/// The `name=value` pair of the response's `Set-Cookie` header.
pub fn set_cookie_pair(response: &Response) -> Option<String> {
    response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(';').next())
        .map(str::to_string)
}

// ---------------------------------------------------------------------------
// Account flows
// ---------------------------------------------------------------------------

pub const PASSWORD: &str = "rahasia-123";

/// Register an account of the given kind (`"adopters"` or `"doctors"`).
pub async fn register(app: Router, kind: &str, email: &str) -> Response {
    let body = serde_json::json!({
        "name": "Test Account",
        "phone": "081234567890",
        "email": email,
        "password": PASSWORD,
        "confirmPassword": PASSWORD,
        "address": "Jl. Kenanga 5, Bandung",
    });
    post_json(app, &format!("/api/{kind}/register"), body).await
}

/// Register and log in, returning the access token and the refresh cookie pair.
pub async fn register_and_login(app: Router, kind: &str, email: &str) -> (String, String) {
    let response = register(app.clone(), kind, email).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = serde_json::json!({ "email": email, "password": PASSWORD });
    let response = post_json(app, &format!("/api/{kind}/login"), body).await;
    assert_eq!(response.status(), StatusCode::OK);

    let cookie = set_cookie_pair(&response).expect("login must set the refresh cookie");
    let json = body_json(response).await;
    let token = json["accessToken"]
        .as_str()
        .expect("login must return accessToken")
        .to_string();
    (token, cookie)
}
