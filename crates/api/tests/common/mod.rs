#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use heist_api::config::ServerConfig;
use heist_api::router::build_app_router;
use heist_api::state::AppState;
use heist_core::outcome::{FateSource, FixedFate, MemberFate};
use heist_db::models::status::{HeistStatus, MemberStatus};
use heist_db::repositories::{HeistRepo, MemberRepo};

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        sweep_interval_secs: 60,
        db_max_connections: 5,
    }
}

/// Build the full application router, with every post-heist fate EXPIRED.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_fate(pool, Arc::new(FixedFate(MemberFate::Expired)))
}

/// Build the full application router with a chosen fate source.
pub fn build_test_app_with_fate(pool: PgPool, fate: Arc<dyn FateSource>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        fate,
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, body: Option<serde_json::Value>) -> Response<Body> {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::POST, uri, Some(body)).await
}

pub async fn put_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PUT, uri, Some(body)).await
}

pub async fn put_empty(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::PUT, uri, None).await
}

pub async fn patch_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(body)).await
}

pub async fn delete(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::DELETE, uri, None).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Register a member holding `skills` as `(name, level)` pairs. Returns the id.
pub async fn create_member(pool: &PgPool, name: &str, skills: &[(&str, &str)]) -> i64 {
    let skills: Vec<_> = skills
        .iter()
        .map(|(n, l)| serde_json::json!({"name": n, "level": l}))
        .collect();
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/member",
        serde_json::json!({
            "name": name,
            "sex": "F",
            "email": format!("{}@ag04.com", name.to_lowercase().replace(' ', ".")),
            "skills": skills,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "member fixture {name} was rejected");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Create a heist over `[start, end)` with `skills` as `(name, level, members)`.
/// Returns the id.
pub async fn create_heist(
    pool: &PgPool,
    name: &str,
    start: chrono::DateTime<chrono::Utc>,
    end: chrono::DateTime<chrono::Utc>,
    skills: &[(&str, &str, i32)],
) -> i64 {
    let skills: Vec<_> = skills
        .iter()
        .map(|(n, l, m)| serde_json::json!({"name": n, "level": l, "members": m}))
        .collect();
    let response = post_json(
        build_test_app(pool.clone()),
        "/api/v1/heist",
        serde_json::json!({
            "name": name,
            "location": "Madrid",
            "start_time": start,
            "end_time": end,
            "skills": skills,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED, "heist fixture {name} was rejected");
    body_json(response).await["id"].as_i64().unwrap()
}

/// Confirm `names` as the crew of `heist_id`, returning the response.
pub async fn confirm(pool: &PgPool, heist_id: i64, names: &[&str]) -> Response<Body> {
    put_json(
        build_test_app(pool.clone()),
        &format!("/api/v1/heist/{heist_id}/members"),
        serde_json::json!({ "members": names }),
    )
    .await
}

/// Current status of a heist as its wire name.
pub async fn heist_status(pool: &PgPool, heist_id: i64) -> String {
    let response = get(
        build_test_app(pool.clone()),
        &format!("/api/v1/heist/{heist_id}/status"),
    )
    .await;
    body_json(response).await["status"]
        .as_str()
        .unwrap()
        .to_string()
}

/// Overwrite a heist's status directly, bypassing the lifecycle rules.
pub async fn force_status(pool: &PgPool, heist_id: i64, status: HeistStatus) {
    let mut tx = pool.begin().await.unwrap();
    HeistRepo::set_status(&mut tx, heist_id, status).await.unwrap();
    tx.commit().await.unwrap();
}

/// Overwrite a member's status directly.
pub async fn force_member_status(pool: &PgPool, member_id: i64, status: MemberStatus) {
    let mut tx = pool.begin().await.unwrap();
    MemberRepo::set_status(&mut tx, member_id, status).await.unwrap();
    tx.commit().await.unwrap();
}
