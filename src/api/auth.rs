use axum::{
    Extension, Json,
    extract::{Request, State},
    http::{HeaderMap, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;

use super::types::{AdminProfileDto, ChangePasswordRequest, LoginRequest, LoginResponse};
use super::validation::validate_login;
use super::{ApiError, ApiResponse, AppState};
use crate::services::TokenError;

/// Identity attached to the request after the gate check, for downstream
/// role-based authorization.
#[derive(Debug, Clone)]
pub struct AdminIdentity {
    pub id: i32,
    pub username: String,
    pub role: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Gate-check middleware for admin routes: extracts the bearer token,
/// verifies signature and expiry, and attaches the decoded identity to the
/// request. Absent, invalid and expired tokens all fail with 401.
pub async fn auth_middleware(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_bearer_token(&headers).ok_or_else(|| {
        ApiError::Authentication("Access denied. No token provided.".to_string())
    })?;

    let claims = state.shared.auth.verify_token(&token).map_err(|e| {
        ApiError::Authentication(match e {
            TokenError::Expired => "Token expired".to_string(),
            TokenError::Invalid => "Invalid token".to_string(),
        })
    })?;

    request.extensions_mut().insert(AdminIdentity {
        id: claims.id,
        username: claims.username,
        role: claims.role,
    });

    Ok(next.run(request).await)
}

fn extract_bearer_token(headers: &HeaderMap) -> Option<String> {
    if let Some(auth_header) = headers.get("Authorization")
        && let Ok(auth_str) = auth_header.to_str()
        && let Some(token) = auth_str.strip_prefix("Bearer ")
    {
        return Some(token.trim().to_string());
    }

    None
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/admin/login
///
/// Verify credentials against the stored argon2 hash, update `last_login`
/// and issue a signed session token. Unknown username and wrong password
/// produce the same 401.
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_login(&payload)?;

    let admin = state
        .store()
        .verify_admin_credentials(&payload.username, &payload.password)
        .await?
        .ok_or_else(|| ApiError::Authentication("Invalid credentials".to_string()))?;

    state.store().touch_admin_last_login(admin.id).await?;

    let token = state
        .shared
        .auth
        .issue_token(&admin)
        .map_err(|e| ApiError::internal(format!("Failed to issue token: {e}")))?;

    tracing::info!("Admin login: {}", admin.username);

    Ok((
        StatusCode::OK,
        Json(ApiResponse::success_with_message(
            "Login successful",
            LoginResponse {
                token,
                admin: AdminProfileDto::from(admin),
            },
        )),
    ))
}

/// PUT /api/admin/password
pub async fn change_password(
    State(state): State<Arc<AppState>>,
    Extension(identity): Extension<AdminIdentity>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if payload.new_password.len() < 8 {
        return Err(ApiError::ValidationFailed(vec![
            super::validation::FieldError {
                field: "newPassword".to_string(),
                message: "New password must be at least 8 characters".to_string(),
            },
        ]));
    }

    if payload.current_password == payload.new_password {
        return Err(ApiError::ValidationFailed(vec![
            super::validation::FieldError {
                field: "newPassword".to_string(),
                message: "New password must be different from current password".to_string(),
            },
        ]));
    }

    let verified = state
        .store()
        .verify_admin_credentials(&identity.username, &payload.current_password)
        .await?;

    if verified.is_none() {
        return Err(ApiError::Authentication(
            "Current password is incorrect".to_string(),
        ));
    }

    state
        .store()
        .update_admin_password(
            &identity.username,
            &payload.new_password,
            &state.shared.config.security,
        )
        .await?;

    tracing::info!("Password changed for admin: {}", identity.username);

    Ok(Json(ApiResponse::success_with_message(
        "Password updated successfully",
        (),
    )))
}
