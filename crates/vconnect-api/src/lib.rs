//! VolunteerConnect REST API
//!
//! This crate provides the Axum-based HTTP API for VolunteerConnect:
//! account registration and login, and role-gated CRUD over events,
//! organizations and event registrations.

pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
