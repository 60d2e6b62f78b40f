//! API routes
//!
//! Authorization is enforced with explicit access-rule checks at the top of
//! each handler; the auth middleware only establishes the principal.

mod auth;
mod events;
mod health;
mod organizations;
mod registrations;
mod types;
mod users;

use axum::Router;

use crate::state::AppState;
use vconnect_auth::auth_middleware;

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    let jwt = state.jwt.clone();

    Router::new()
        .merge(health::routes())
        .merge(auth::routes())
        .merge(users::routes())
        .merge(events::routes())
        .merge(organizations::routes())
        .merge(registrations::routes())
        .with_state(state)
        // Runs once per request, before any route-level authorization check.
        .layer(axum::middleware::from_fn_with_state(jwt, auth_middleware))
}
