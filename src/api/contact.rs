use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::types::{ContactMessageDto, ContactRequest, StatusFilter};
use super::validation::validate_contact;
use super::{ApiError, ApiResponse, AppState};
use crate::db::{ContactStats, NewContactMessage};

/// POST /api/contact
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ContactRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_contact(&payload)?;

    let message = state
        .store()
        .create_contact_message(NewContactMessage {
            name: payload.name,
            email: payload.email,
            subject: payload.subject,
            message: payload.message,
        })
        .await?;

    state.notifier().contact_received(&message);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Message sent successfully! We will respond within 24 hours.",
            ContactMessageDto::from(message),
        )),
    ))
}

/// GET /api/contact
pub async fn list_messages(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<ApiResponse<Vec<ContactMessageDto>>>, ApiError> {
    let messages = state
        .store()
        .list_contact_messages(filter.status.as_deref())
        .await?;

    let messages: Vec<ContactMessageDto> =
        messages.into_iter().map(ContactMessageDto::from).collect();
    let count = messages.len();

    Ok(Json(ApiResponse::listing(messages, count)))
}

/// GET /api/contact/stats
pub async fn contact_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<ContactStats>>, ApiError> {
    let stats = state.store().contact_stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// PUT /api/contact/{id}/read
///
/// Idempotent: marking an already-read message succeeds and leaves it read.
pub async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<ContactMessageDto>>, ApiError> {
    let message = state.store().mark_contact_message_read(id).await?;

    Ok(Json(ApiResponse::success_with_message(
        "Message marked as read",
        ContactMessageDto::from(message),
    )))
}

/// DELETE /api/contact/{id}
pub async fn remove_message(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().remove_contact_message(id).await? {
        return Err(ApiError::not_found("Message"));
    }

    Ok(Json(ApiResponse::success_with_message(
        "Message deleted",
        (),
    )))
}
