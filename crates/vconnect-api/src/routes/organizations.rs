//! Organization routes

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
};
use tracing::{debug, info};
use vconnect_auth::{AccessRule, require};
use vconnect_db::{NewOrganization, Role};

use crate::error::ApiError;
use crate::extract::CurrentUser;
use crate::state::AppState;

use super::types::{OrganizationRequest, OrganizationResponse};

fn to_new_organization(request: OrganizationRequest) -> NewOrganization {
    NewOrganization {
        name: request.name,
        description: request.description,
        contact_email: request.contact_email,
        phone_number: request.phone_number,
        website_url: request.website_url,
        address: request.address,
        active: request.active,
    }
}

/// POST /api/organizations (ORGANIZER or ADMIN)
async fn create_organization(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Json(request): Json<OrganizationRequest>,
) -> Result<(StatusCode, Json<OrganizationResponse>), ApiError> {
    require(
        principal.as_ref(),
        AccessRule::RoleIn(&[Role::Organizer, Role::Admin]),
    )?;

    debug!("Creating organization: {}", request.name);

    let org = state
        .db
        .insert_organization(to_new_organization(request))
        .await?;

    info!("Created organization: {} ({})", org.name, org.id);

    Ok((StatusCode::CREATED, Json(org.into())))
}

/// GET /api/organizations (any authenticated user)
async fn list_organizations(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<OrganizationResponse>>, ApiError> {
    require(principal.as_ref(), AccessRule::AnyAuthenticated)?;

    let orgs = state.db.list_organizations().await?;
    Ok(Json(orgs.into_iter().map(OrganizationResponse::from).collect()))
}

/// GET /api/organizations/{id} (any authenticated user)
async fn get_organization(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    require(principal.as_ref(), AccessRule::AnyAuthenticated)?;

    let org = state
        .db
        .get_organization_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Organization: {}", id)))?;

    Ok(Json(org.into()))
}

/// PUT /api/organizations/{id} (ORGANIZER or ADMIN)
async fn update_organization(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(request): Json<OrganizationRequest>,
) -> Result<Json<OrganizationResponse>, ApiError> {
    require(
        principal.as_ref(),
        AccessRule::RoleIn(&[Role::Organizer, Role::Admin]),
    )?;

    let updated = state
        .db
        .update_organization(id, &to_new_organization(request))
        .await?;
    if !updated {
        return Err(ApiError::NotFound(format!("Organization: {}", id)));
    }

    let org = state
        .db
        .get_organization_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Organization: {}", id)))?;

    info!("Updated organization: {}", id);

    Ok(Json(org.into()))
}

/// DELETE /api/organizations/{id} (ADMIN only)
async fn delete_organization(
    CurrentUser(principal): CurrentUser,
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    require(principal.as_ref(), AccessRule::RoleIn(&[Role::Admin]))?;

    let deleted = state.db.delete_organization(id).await?;
    if deleted {
        info!("Deleted organization: {}", id);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("Organization: {}", id)))
    }
}

/// Create organization routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/organizations", post(create_organization))
        .route("/api/organizations", get(list_organizations))
        .route("/api/organizations/{id}", get(get_organization))
        .route("/api/organizations/{id}", put(update_organization))
        .route("/api/organizations/{id}", delete(delete_organization))
}
