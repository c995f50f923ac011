use axum::{
    Json,
    extract::{Path, State},
    http::{StatusCode, header},
    response::IntoResponse,
};
use serde::Serialize;
use std::sync::Arc;

use super::types::{EventDto, EventPayload};
use super::validation::validate_event;
use super::{ApiError, ApiResponse, AppState};
use crate::db::{ContactStats, EventStats, EventUpdate, MemberStats, NewEvent};

#[derive(Debug, Serialize)]
pub struct DashboardData {
    pub statistics: DashboardStatistics,
    pub recent_activity: RecentActivity,
}

#[derive(Debug, Serialize)]
pub struct DashboardStatistics {
    pub members: MemberStats,
    pub contacts: ContactStats,
    pub events: EventStats,
}

#[derive(Debug, Serialize)]
pub struct RecentActivity {
    pub members: Vec<RecentMember>,
    pub contacts: Vec<RecentContact>,
    pub events: Vec<UpcomingEvent>,
}

#[derive(Debug, Serialize)]
pub struct RecentMember {
    pub full_name: String,
    pub email: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct RecentContact {
    pub name: String,
    pub subject: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct UpcomingEvent {
    pub name: String,
    pub schedule: String,
    pub location: String,
}

const RECENT_LIMIT: u64 = 5;

/// GET /api/admin/dashboard
pub async fn dashboard(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<DashboardData>>, ApiError> {
    let store = state.store();

    let member_stats = store.member_stats().await?;
    let contact_stats = store.contact_stats().await?;
    let event_stats = store.event_stats().await?;

    let recent_members = store.recent_members(RECENT_LIMIT).await?;
    let recent_contacts = store.recent_contact_messages(RECENT_LIMIT).await?;
    let upcoming = store.upcoming_events(RECENT_LIMIT).await?;

    Ok(Json(ApiResponse::success(DashboardData {
        statistics: DashboardStatistics {
            members: member_stats,
            contacts: contact_stats,
            events: event_stats,
        },
        recent_activity: RecentActivity {
            members: recent_members
                .into_iter()
                .map(|m| RecentMember {
                    full_name: m.full_name,
                    email: m.email,
                    created_at: m.created_at,
                })
                .collect(),
            contacts: recent_contacts
                .into_iter()
                .map(|c| RecentContact {
                    name: c.name,
                    subject: c.subject,
                    created_at: c.created_at,
                })
                .collect(),
            events: upcoming
                .into_iter()
                .map(|e| UpcomingEvent {
                    name: e.name,
                    schedule: e.schedule,
                    location: e.location,
                })
                .collect(),
        },
    })))
}

/// POST /api/admin/events
pub async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EventPayload>,
) -> Result<impl IntoResponse, ApiError> {
    validate_event(&payload)?;

    let event = state
        .store()
        .create_event(NewEvent {
            name: payload.name,
            description: payload.description,
            schedule: payload.schedule,
            location: payload.location,
            max_participants: payload.max_participants,
        })
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success_with_message(
            "Event created successfully",
            EventDto::from(event),
        )),
    ))
}

/// PUT /api/admin/events/{id}
pub async fn update_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<EventPayload>,
) -> Result<Json<ApiResponse<EventDto>>, ApiError> {
    validate_event(&payload)?;

    let event = state
        .store()
        .update_event(
            id,
            EventUpdate {
                name: payload.name,
                description: payload.description,
                schedule: payload.schedule,
                location: payload.location,
                max_participants: payload.max_participants,
                status: payload.status.unwrap_or_else(|| "upcoming".to_string()),
            },
        )
        .await?;

    Ok(Json(ApiResponse::success_with_message(
        "Event updated successfully",
        EventDto::from(event),
    )))
}

/// DELETE /api/admin/events/{id}
///
/// Registrations for the event are removed by cascade.
pub async fn remove_event(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().remove_event(id).await? {
        return Err(ApiError::not_found("Event"));
    }

    Ok(Json(ApiResponse::success_with_message(
        "Event deleted successfully",
        (),
    )))
}

/// GET /api/admin/export/members
pub async fn export_members(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let members = state.store().list_members(None).await?;

    let mut csv = String::from("ID,Full Name,Email,Phone,Department,Year,Status,Created At\n");
    for member in members {
        csv.push_str(&format!(
            "{},\"{}\",{},{},{},{},{},{}\n",
            member.id,
            member.full_name.replace('"', "\"\""),
            member.email,
            member.phone,
            member.department,
            member.year,
            member.status,
            member.created_at
        ));
    }

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=members.csv",
            ),
        ],
        csv,
    ))
}
