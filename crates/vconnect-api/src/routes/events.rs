//! Event routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use tracing::{debug, info};
use vconnect_auth::{AccessRule, require};
use vconnect_db::{EventUpdate, NewEvent, Role};

use crate::error::ApiError;
use crate::extract::{CurrentUser, RequireAuth};
use crate::state::AppState;

use super::types::{EventRequest, EventResponse};

/// POST /api/events (ORGANIZER only)
///
/// The creating principal becomes the event's organizer.
async fn create_event(
    RequireAuth(principal): RequireAuth,
    State(state): State<AppState>,
    Json(request): Json<EventRequest>,
) -> Result<(StatusCode, Json<EventResponse>), ApiError> {
    require(Some(&principal), AccessRule::RoleIn(&[Role::Organizer]))?;

    state
        .db
        .get_organization_by_id(request.organization_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Organization: {}", request.organization_id))
        })?;

    debug!("Creating event '{}' for organizer {}", request.title, principal.id);

    let event = state
        .db
        .insert_event(NewEvent {
            title: request.title,
            description: request.description,
            event_date: request.event_date,
            location: request.location,
            capacity: request.capacity,
            active: request.active,
            organization_id: request.organization_id,
            organizer_id: principal.id,
        })
        .await?;

    info!("Created event: {} ({})", event.title, event.id);

    Ok((StatusCode::CREATED, Json(event.into())))
}

/// GET /api/events (any authenticated user)
async fn list_events(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<EventResponse>>, ApiError> {
    require(principal.as_ref(), AccessRule::AnyAuthenticated)?;

    let events = state.db.list_events().await?;
    Ok(Json(events.into_iter().map(EventResponse::from).collect()))
}

/// GET /api/events/{id} (any authenticated user)
async fn get_event(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<EventResponse>, ApiError> {
    require(principal.as_ref(), AccessRule::AnyAuthenticated)?;

    let event = state
        .db
        .get_event_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event: {}", id)))?;

    Ok(Json(event.into()))
}

/// PUT /api/events/{id} (owning organizer or ADMIN)
async fn update_event(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<EventRequest>,
) -> Result<Json<EventResponse>, ApiError> {
    let event = state
        .db
        .get_event_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event: {}", id)))?;

    require(
        principal.as_ref(),
        AccessRule::OwnerOrRoleIn {
            owner_id: event.organizer_id,
            roles: &[Role::Admin],
        },
    )?;

    state
        .db
        .get_organization_by_id(request.organization_id)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound(format!("Organization: {}", request.organization_id))
        })?;

    state
        .db
        .update_event(
            id,
            &EventUpdate {
                title: request.title,
                description: request.description,
                event_date: request.event_date,
                location: request.location,
                capacity: request.capacity,
                active: request.active,
                organization_id: request.organization_id,
            },
        )
        .await?;

    let event = state
        .db
        .get_event_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event: {}", id)))?;

    info!("Updated event: {}", id);

    Ok(Json(event.into()))
}

/// DELETE /api/events/{id} (owning organizer or ADMIN)
async fn delete_event(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    let event = state
        .db
        .get_event_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Event: {}", id)))?;

    require(
        principal.as_ref(),
        AccessRule::OwnerOrRoleIn {
            owner_id: event.organizer_id,
            roles: &[Role::Admin],
        },
    )?;

    state.db.delete_event(id).await?;
    info!("Deleted event: {}", id);

    Ok(StatusCode::NO_CONTENT)
}

/// Create event routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/events", post(create_event))
        .route("/api/events", get(list_events))
        .route("/api/events/{id}", get(get_event))
        .route("/api/events/{id}", put(update_event))
        .route("/api/events/{id}", delete(delete_event))
}
