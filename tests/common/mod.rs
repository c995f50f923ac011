use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode},
};
use http_body_util::BodyExt;
use std::sync::Arc;
use tower::ServiceExt;

use clubhouse::api::AppState;
use clubhouse::config::Config;

/// Credentials seeded by the admin migration.
pub const ADMIN_USERNAME: &str = "admin";
pub const ADMIN_PASSWORD: &str = "admin123";

pub fn test_config() -> Config {
    let mut config = Config::default();
    config.general.database_path = "sqlite::memory:".to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config.mail.enabled = false;
    config
}

pub async fn spawn_app() -> Router {
    let (app, _) = spawn_app_with_state().await;
    app
}

pub async fn spawn_app_with_state() -> (Router, Arc<AppState>) {
    let state = clubhouse::api::create_app_state_from_config(test_config())
        .await
        .expect("Failed to create app state");

    (clubhouse::api::router(state.clone()), state)
}

pub async fn send_json(
    app: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("Content-Type", "application/json");

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let request = builder
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null)
    };

    (status, json)
}

pub async fn get(
    app: &Router,
    uri: &str,
    token: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().uri(uri);

    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }

    let response = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);

    (status, json)
}

pub async fn login(app: &Router) -> String {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/admin/login",
        None,
        serde_json::json!({"username": ADMIN_USERNAME, "password": ADMIN_PASSWORD}),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

pub fn join_payload(name: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "fullName": name,
        "email": email,
        "phone": "+19995550123",
        "department": "CSE",
        "year": 2
    })
}

pub async fn create_event(
    app: &Router,
    token: &str,
    name: &str,
    max_participants: Option<i32>,
) -> i32 {
    let (status, body) = send_json(
        app,
        "POST",
        "/api/admin/events",
        Some(token),
        serde_json::json!({
            "name": name,
            "description": "Hands-on workshop",
            "schedule": "2030-05-01T17:00:00Z",
            "location": "Lab 2",
            "maxParticipants": max_participants,
        }),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "event create failed: {body}");
    body["data"]["id"].as_i64().unwrap() as i32
}
