use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;

use super::types::{JoinRequest, JoinResponse, MemberDto, StatusFilter, StatusUpdateRequest};
use super::validation::{validate_join, validate_member_status};
use super::{ApiError, ApiResponse, AppState};
use crate::db::{MemberStats, NewMember};

/// POST /api/members/join
pub async fn join(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<JoinRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_join(&payload)?;

    let member = state
        .store()
        .create_member(NewMember {
            full_name: payload.full_name,
            email: payload.email,
            phone: payload.phone,
            department: payload.department,
            year: payload.year.unwrap_or_default(),
            experience: payload.experience,
            motivation: payload.motivation,
        })
        .await?;

    // Both mails ride on spawned tasks; the 201 never waits on the relay.
    state.notifier().application_received(&member);

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Application submitted successfully! You will hear back from us within 2-3 business days.",
            JoinResponse {
                id: member.id,
                full_name: member.full_name,
                email: member.email,
                status: member.status,
            },
        )),
    ))
}

/// GET /api/members
pub async fn list_members(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<StatusFilter>,
) -> Result<Json<ApiResponse<Vec<MemberDto>>>, ApiError> {
    let members = state.store().list_members(filter.status.as_deref()).await?;

    let members: Vec<MemberDto> = members.into_iter().map(MemberDto::from).collect();
    let count = members.len();

    Ok(Json(ApiResponse::listing(members, count)))
}

/// GET /api/members/stats
pub async fn member_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<MemberStats>>, ApiError> {
    let stats = state.store().member_stats().await?;
    Ok(Json(ApiResponse::success(stats)))
}

/// PUT /api/members/{id}/status
///
/// Approving or rejecting triggers the status-specific notification.
pub async fn update_member_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<StatusUpdateRequest>,
) -> Result<Json<ApiResponse<MemberDto>>, ApiError> {
    validate_member_status(&payload.status)?;

    let member = state
        .store()
        .update_member_status(id, &payload.status)
        .await?;

    state
        .notifier()
        .application_status_changed(&member, &payload.status);

    Ok(Json(ApiResponse::success_with_message(
        format!("Member status updated to {}", payload.status),
        MemberDto::from(member),
    )))
}

/// DELETE /api/members/{id}
pub async fn remove_member(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().remove_member(id).await? {
        return Err(ApiError::not_found("Member"));
    }

    Ok(Json(ApiResponse::success_with_message(
        "Member deleted",
        (),
    )))
}
