use serde::{Deserialize, Serialize};

use super::validation::FieldError;
use crate::entities::{admin_users, contact_messages, event_registrations, events, members};

/// Uniform response envelope for every endpoint.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

impl<T> ApiResponse<T> {
    pub const fn success(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: None,
            errors: None,
        }
    }

    pub fn success_with_message(message: impl Into<String>, data: T) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            data: Some(data),
            count: None,
            errors: None,
        }
    }

    pub const fn listing(data: T, count: usize) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            count: Some(count),
            errors: None,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            count: None,
            errors: None,
        }
    }

    pub fn validation_failed(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            message: Some("Validation failed".to_string()),
            data: None,
            count: None,
            errors: Some(errors),
        }
    }
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinRequest {
    #[serde(default)]
    pub full_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub department: String,
    pub year: Option<i32>,
    pub experience: Option<String>,
    pub motivation: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContactRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub subject: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub event_id: Option<i32>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPayload {
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub schedule: String,
    #[serde(default)]
    pub location: String,
    pub max_participants: Option<i32>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    #[serde(default)]
    pub current_password: String,
    #[serde(default)]
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct StatusFilter {
    pub status: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct MemberDto {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub department: String,
    pub year: i32,
    pub experience: Option<String>,
    pub motivation: Option<String>,
    pub status: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<members::Model> for MemberDto {
    fn from(m: members::Model) -> Self {
        Self {
            id: m.id,
            full_name: m.full_name,
            email: m.email,
            phone: m.phone,
            department: m.department,
            year: m.year,
            experience: m.experience,
            motivation: m.motivation,
            status: m.status,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ContactMessageDto {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub status: String,
    pub created_at: String,
}

impl From<contact_messages::Model> for ContactMessageDto {
    fn from(m: contact_messages::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            email: m.email,
            subject: m.subject,
            message: m.message,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

/// Event row as returned by the admin create/update endpoints; the public
/// listing carries `EventRecord` with the derived registration count instead.
#[derive(Debug, Serialize)]
pub struct EventDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub schedule: String,
    pub location: String,
    pub max_participants: Option<i32>,
    pub status: String,
    pub created_at: String,
}

impl From<events::Model> for EventDto {
    fn from(m: events::Model) -> Self {
        Self {
            id: m.id,
            name: m.name,
            description: m.description,
            schedule: m.schedule,
            location: m.location,
            max_participants: m.max_participants,
            status: m.status,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegistrationDto {
    pub id: i32,
    pub event_id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub department: Option<String>,
    pub year: Option<i32>,
    pub created_at: String,
}

impl From<event_registrations::Model> for RegistrationDto {
    fn from(m: event_registrations::Model) -> Self {
        Self {
            id: m.id,
            event_id: m.event_id,
            name: m.name,
            email: m.email,
            phone: m.phone,
            department: m.department,
            year: m.year,
            created_at: m.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AdminProfileDto {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub role: String,
}

impl From<admin_users::Model> for AdminProfileDto {
    fn from(m: admin_users::Model) -> Self {
        Self {
            id: m.id,
            username: m.username,
            email: m.email,
            role: m.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub admin: AdminProfileDto,
}

#[derive(Debug, Serialize)]
pub struct JoinResponse {
    pub id: i32,
    pub full_name: String,
    pub email: String,
    pub status: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub registration_id: i32,
    pub event_name: String,
    pub event_date: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
    pub uptime_seconds: u64,
}
