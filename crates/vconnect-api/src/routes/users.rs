//! User profile and administration routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, put},
};
use tracing::{debug, info};
use vconnect_auth::{AccessRule, require};
use vconnect_db::{ProfileUpdate, Role};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

use super::auth::validate_password;
use super::types::{UpdateProfileRequest, UserResponse};

/// GET /api/users (ADMIN only)
async fn list_users(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    require(principal.as_ref(), AccessRule::RoleIn(&[Role::Admin]))?;

    let users = state.db.list_users().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /api/users/{id} (ADMIN or the account holder)
async fn get_user_profile(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    require(
        principal.as_ref(),
        AccessRule::OwnerOrRoleIn {
            owner_id: id,
            roles: &[Role::Admin],
        },
    )?;

    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    Ok(Json(user.into()))
}

/// PUT /api/users/{id} (ADMIN or the account holder)
///
/// Role changes are applied only for ADMIN callers; an account can never
/// escalate itself.
async fn update_user_profile(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    require(
        principal.as_ref(),
        AccessRule::OwnerOrRoleIn {
            owner_id: id,
            roles: &[Role::Admin],
        },
    )?;

    debug!("Updating user: {}", id);

    // Verify the account exists before touching anything
    state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    if let Some(role_str) = &request.role {
        require(principal.as_ref(), AccessRule::RoleIn(&[Role::Admin]))?;
        let role = role_str
            .parse::<Role>()
            .map_err(|_| ApiError::BadRequest(format!("Invalid role: {}", role_str)))?;
        state.db.update_user_role(id, role).await?;
    }

    if let Some(password) = &request.password {
        validate_password(password)?;
        let password_hash = vconnect_auth::hash_password(password)?;
        state.db.update_user_password(id, &password_hash).await?;
    }

    state
        .db
        .update_user_profile(
            id,
            &ProfileUpdate {
                email: request.email,
                first_name: request.first_name,
                last_name: request.last_name,
            },
        )
        .await?;

    let user = state
        .db
        .get_user_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("User: {}", id)))?;

    info!("Updated user: {}", user.username);

    Ok(Json(user.into()))
}

/// DELETE /api/users/{id} (ADMIN only)
async fn delete_user(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require(principal.as_ref(), AccessRule::RoleIn(&[Role::Admin]))?;

    debug!("Deleting user: {}", id);

    let deleted = state.db.delete_user(id).await?;
    if deleted {
        info!("Deleted user: {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("User: {}", id)))
    }
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users))
        .route("/api/users/{id}", get(get_user_profile))
        .route("/api/users/{id}", put(update_user_profile))
        .route("/api/users/{id}", delete(delete_user))
}
