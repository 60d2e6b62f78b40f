//! Registration and login routes

use axum::{Json, Router, extract::State, http::StatusCode, routing::post};
use tracing::{debug, info};
use vconnect_db::{NewUser, Role};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginRequest, LoginResponse, RegisterRequest, UserResponse};

// ==================== Input Validation ====================

/// Maximum allowed username length
const MAX_USERNAME_LENGTH: usize = 64;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;
/// Minimum allowed password length
const MIN_PASSWORD_LENGTH: usize = 4;

/// Validate username format and length
pub(super) fn validate_username(username: &str) -> Result<(), ApiError> {
    if username.is_empty() {
        return Err(ApiError::BadRequest("Username cannot be empty".to_string()));
    }
    if username.len() > MAX_USERNAME_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Username exceeds maximum length of {} characters",
            MAX_USERNAME_LENGTH
        )));
    }
    // Only allow alphanumeric characters, underscores, and hyphens
    if !username.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') {
        return Err(ApiError::BadRequest(
            "Username can only contain alphanumeric characters, underscores, and hyphens"
                .to_string(),
        ));
    }
    Ok(())
}

/// Validate password length
pub(super) fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

// ==================== Auth Routes ====================

/// POST /api/auth/register (public)
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_username(&request.username)?;
    validate_password(&request.password)?;

    debug!("Registering user: {}", request.username);

    let role = match &request.role {
        Some(role_str) => role_str
            .parse::<Role>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid role: {}", role_str)))?,
        None => Role::Volunteer,
    };

    let password_hash = vconnect_auth::hash_password(&request.password)?;

    let user = state
        .db
        .insert_user(NewUser {
            username: request.username,
            password_hash,
            email: request.email,
            first_name: request.first_name,
            last_name: request.last_name,
            role,
        })
        .await?;

    info!("User registered: {}", user.username);

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /api/auth/login (public)
///
/// Unknown usernames and wrong passwords produce the same 401 response.
async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    validate_username(&request.username)?;
    if request.password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::BadRequest(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }

    debug!("Login attempt for user: {}", request.username);

    let principal = state
        .authenticator
        .authenticate(&request.username, &request.password)
        .await?;

    let token = state.jwt.issue_token(&principal)?;

    info!("User {} logged in successfully", principal.username);

    Ok(Json(LoginResponse {
        token,
        user_id: principal.id,
        username: principal.username,
        email: principal.email,
        first_name: principal.first_name,
        last_name: principal.last_name,
        role: principal.role.as_str().to_string(),
    }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}
