use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::types::{RegisterRequest, RegisterResponse, RegistrationDto, StatusFilter};
use super::validation::validate_registration;
use super::{ApiError, ApiResponse, AppState};
use crate::db::{EventRecord, NewRegistration};

/// GET /api/events
pub async fn list_events(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<ApiResponse<Vec<EventRecord>>>, ApiError> {
    let events = state.store().list_events(filter.status.as_deref()).await?;
    let count = events.len();

    Ok(Json(ApiResponse::listing(events, count)))
}

/// GET /api/events/{id}
pub async fn get_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<EventRecord>>, ApiError> {
    let event = state
        .store()
        .get_event(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event"))?;

    Ok(Json(ApiResponse::success(event)))
}

/// POST /api/events/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_registration(&payload)?;

    let event_id = payload.event_id.ok_or_else(|| ApiError::not_found("Event"))?;

    // Fetched up front so the admin notification can report the
    // registration count; the registration itself re-checks everything
    // transactionally.
    let event = state
        .store()
        .get_event(event_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Event"))?;

    let registration = state
        .store()
        .register_for_event(
            event_id,
            NewRegistration {
                name: payload.name,
                email: payload.email,
                phone: payload.phone,
                department: payload.department,
                year: payload.year,
            },
        )
        .await?;

    state.notifier().registration_confirmed(&registration, &event);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Registration successful! Check your email for confirmation.",
            RegisterResponse {
                registration_id: registration.id,
                event_name: event.name,
                event_date: event.schedule,
            },
        )),
    ))
}

/// GET /api/events/{id}/registrations
pub async fn list_registrations(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<RegistrationDto>>>, ApiError> {
    if state.store().get_event(id).await?.is_none() {
        return Err(ApiError::not_found("Event"));
    }

    let registrations = state.store().event_registrations(id).await?;

    let registrations: Vec<RegistrationDto> =
        registrations.into_iter().map(RegistrationDto::from).collect();
    let count = registrations.len();

    Ok(Json(ApiResponse::listing(registrations, count)))
}
