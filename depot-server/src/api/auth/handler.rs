//! Authentication Handlers
//!
//! Handles login, logout and session info

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::utils::{AppError, AppResult};

/// Login request payload
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response with JWT token
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// User information returned after login
#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: String,
}

/// Login handler
///
/// Authenticates user credentials and returns a JWT token
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = state
        .accounts()
        .find_by_username(&req.username)
        .await
        .map_err(AppError::from)?
        .ok_or_else(AppError::invalid_credentials)?;

    // Check if account is active
    if !account.is_active {
        return Err(AppError::forbidden("Account has been disabled"));
    }

    // Verify password using argon2
    let password_valid = account
        .verify_password(&req.password)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;

    if !password_valid {
        return Err(AppError::invalid_credentials());
    }

    let user_id = account
        .id
        .as_ref()
        .map(|t| t.to_string())
        .unwrap_or_default();

    let token = state.jwt_service().generate_token(
        &user_id,
        &account.username,
        &account.display_name,
        account.role.as_str(),
    )?;

    tracing::info!(
        user_id = %user_id,
        username = %account.username,
        role = account.role.as_str(),
        "User logged in successfully"
    );

    Ok(Json(LoginResponse {
        token,
        user: UserInfo {
            id: user_id,
            username: account.username,
            display_name: account.display_name,
            role: account.role.as_str().to_string(),
        },
    }))
}

/// Get current user info
pub async fn me(Extension(user): Extension<CurrentUser>) -> Json<UserInfo> {
    Json(UserInfo {
        id: user.id,
        username: user.username,
        display_name: user.display_name,
        role: user.role,
    })
}

/// Logout handler (client-side token invalidation)
///
/// Since JWTs are stateless, logout is handled client-side by removing the
/// token. This endpoint exists for the access log.
pub async fn logout(Extension(user): Extension<CurrentUser>) -> Json<bool> {
    tracing::info!(
        user_id = %user.id,
        username = %user.username,
        "User logged out"
    );
    Json(true)
}
