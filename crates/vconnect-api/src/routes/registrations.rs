//! Event registration routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use tracing::{debug, info};
use vconnect_auth::{AccessRule, AuthError, require};
use vconnect_db::{NewRegistration, RegistrationStatus, Role};

use crate::error::ApiError;
use crate::extract::{CurrentUser, RequireAuth};
use crate::state::AppState;

use super::types::{RegistrationRequest, RegistrationResponse, StatusUpdateRequest};

/// POST /api/registrations (VOLUNTEER only)
///
/// A volunteer can only register themselves: the request's volunteer id
/// must match the authenticated principal.
async fn create_registration(
    RequireAuth(principal): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<RegistrationRequest>,
) -> Result<(StatusCode, Json<RegistrationResponse>), ApiError> {
    require(Some(&principal), AccessRule::RoleIn(&[Role::Volunteer]))?;
    if principal.id != request.volunteer_id {
        return Err(ApiError::Auth(AuthError::InsufficientPermissions));
    }

    state
        .db
        .get_event_by_id(request.event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event: {}", request.event_id)))?;

    debug!(
        "Registering volunteer {} for event {}",
        request.volunteer_id, request.event_id
    );

    let registration = state
        .db
        .insert_registration(NewRegistration {
            event_id: request.event_id,
            volunteer_id: request.volunteer_id,
        })
        .await?;

    info!(
        "Volunteer {} registered for event {}",
        registration.volunteer_id, registration.event_id
    );

    Ok((StatusCode::CREATED, Json(registration.into())))
}

/// GET /api/registrations/event/{event_id} (ORGANIZER or ADMIN)
async fn list_registrations_by_event(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(event_id): Path<i64>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    require(
        principal.as_ref(),
        AccessRule::RoleIn(&[Role::Organizer, Role::Admin]),
    )?;

    state
        .db
        .get_event_by_id(event_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event: {}", event_id)))?;

    let registrations = state.db.list_registrations_by_event(event_id).await?;
    Ok(Json(
        registrations
            .into_iter()
            .map(RegistrationResponse::from)
            .collect(),
    ))
}

/// GET /api/registrations/volunteer/{volunteer_id} (ADMIN or the volunteer)
async fn list_registrations_by_volunteer(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(volunteer_id): Path<i64>,
) -> Result<Json<Vec<RegistrationResponse>>, ApiError> {
    require(
        principal.as_ref(),
        AccessRule::OwnerOrRoleIn {
            owner_id: volunteer_id,
            roles: &[Role::Admin],
        },
    )?;

    let registrations = state.db.list_registrations_by_volunteer(volunteer_id).await?;
    Ok(Json(
        registrations
            .into_iter()
            .map(RegistrationResponse::from)
            .collect(),
    ))
}

/// GET /api/registrations/{id} (ORGANIZER, ADMIN, or the owning volunteer)
async fn get_registration(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    let registration = state
        .db
        .get_registration_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Registration: {}", id)))?;

    require(
        principal.as_ref(),
        AccessRule::OwnerOrRoleIn {
            owner_id: registration.volunteer_id,
            roles: &[Role::Organizer, Role::Admin],
        },
    )?;

    Ok(Json(registration.into()))
}

/// PUT /api/registrations/{id}/status (ORGANIZER or ADMIN)
async fn update_registration_status(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<StatusUpdateRequest>,
) -> Result<Json<RegistrationResponse>, ApiError> {
    require(
        principal.as_ref(),
        AccessRule::RoleIn(&[Role::Organizer, Role::Admin]),
    )?;

    let status = request
        .status
        .parse::<RegistrationStatus>()
        .map_err(|_| ApiError::BadRequest(format!("Invalid status: {}", request.status)))?;

    let updated = state.db.update_registration_status(id, status).await?;
    if !updated {
        return Err(ApiError::NotFound(format!("Registration: {}", id)));
    }

    let registration = state
        .db
        .get_registration_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Registration: {}", id)))?;

    info!("Registration {} status set to {}", id, status.as_str());

    Ok(Json(registration.into()))
}

/// DELETE /api/registrations/{id} (ORGANIZER, ADMIN, or the owning volunteer)
async fn delete_registration(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let registration = state
        .db
        .get_registration_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Registration: {}", id)))?;

    require(
        principal.as_ref(),
        AccessRule::OwnerOrRoleIn {
            owner_id: registration.volunteer_id,
            roles: &[Role::Organizer, Role::Admin],
        },
    )?;

    state.db.delete_registration(id).await?;
    info!("Deleted registration: {}", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Create registration routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/registrations", post(create_registration))
        .route(
            "/api/registrations/event/{event_id}",
            get(list_registrations_by_event),
        )
        .route(
            "/api/registrations/volunteer/{volunteer_id}",
            get(list_registrations_by_volunteer),
        )
        .route("/api/registrations/{id}", get(get_registration))
        .route(
            "/api/registrations/{id}/status",
            put(update_registration_status),
        )
        .route("/api/registrations/{id}", delete(delete_registration))
}
