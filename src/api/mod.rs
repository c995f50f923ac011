use axum::{
    Json, Router,
    extract::State,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::state::SharedState;

pub mod admin;
pub mod auth;
pub mod contact;
mod error;
pub mod events;
pub mod members;
mod types;
pub mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub start_time: std::time::Instant,
}

impl AppState {
    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn notifier(&self) -> &crate::services::Notifier {
        &self.shared.notifier
    }
}

pub async fn create_app_state(shared: Arc<SharedState>) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        start_time: std::time::Instant::now(),
    })
}

pub async fn create_app_state_from_config(config: Config) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared).await)
}

pub fn router(state: Arc<AppState>) -> Router {
    let cors_origins = state.shared.config.server.cors_allowed_origins.clone();

    let protected_routes = create_protected_router(state.clone());

    let api_router = Router::new()
        .merge(protected_routes)
        .route("/members/join", post(members::join))
        .route("/contact", post(contact::submit))
        .route("/events", get(events::list_events))
        .route("/events/{id}", get(events::get_event))
        .route("/events/register", post(events::register))
        .route("/admin/login", post(auth::login))
        .with_state(state.clone());

    let cors_layer = if cors_origins.contains(&"*".to_string()) {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    Router::new()
        .route("/health", get(health))
        .with_state(state)
        .nest("/api", api_router)
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http())
}

fn create_protected_router(state: Arc<AppState>) -> Router<Arc<AppState>> {
    Router::new()
        .route("/members", get(members::list_members))
        .route("/members/stats", get(members::member_stats))
        .route("/members/{id}/status", put(members::update_member_status))
        .route("/members/{id}", delete(members::remove_member))
        .route("/contact", get(contact::list_messages))
        .route("/contact/stats", get(contact::contact_stats))
        .route("/contact/{id}/read", put(contact::mark_read))
        .route("/contact/{id}", delete(contact::remove_message))
        .route("/events/{id}/registrations", get(events::list_registrations))
        .route("/admin/dashboard", get(admin::dashboard))
        .route("/admin/password", put(auth::change_password))
        .route("/admin/events", post(admin::create_event))
        .route("/admin/events/{id}", put(admin::update_event))
        .route("/admin/events/{id}", delete(admin::remove_event))
        .route("/admin/export/members", get(admin::export_members))
        .route_layer(middleware::from_fn_with_state(state, auth::auth_middleware))
}

/// GET /health
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        uptime_seconds: state.start_time.elapsed().as_secs(),
    })
}
