//! Authentication error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthError {
    /// No account with the given username. Rendered identically to
    /// `InvalidCredentials` at the HTTP boundary.
    #[error("Unknown username")]
    UnknownUser,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    /// Forged, tampered or otherwise undecodable token.
    #[error("Invalid token")]
    TokenInvalid,

    /// No principal where one is required.
    #[error("Authentication required")]
    MissingCredentials,

    #[error("Insufficient permissions")]
    InsufficientPermissions,

    #[error("Password hashing error: {0}")]
    PasswordHash(String),

    #[error("Signing secret is not valid base64")]
    InvalidSigningKey,

    #[error("Token TTL must be positive, got {0}")]
    InvalidTokenTtl(i64),

    #[error("Account store error: {0}")]
    Store(#[from] vconnect_db::DbError),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            // Unknown-user and bad-password are indistinguishable to the
            // caller; a differentiated response would enumerate usernames.
            AuthError::UnknownUser | AuthError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "invalid username or password")
            }
            AuthError::TokenExpired => (StatusCode::UNAUTHORIZED, "Token expired"),
            AuthError::TokenInvalid => (StatusCode::UNAUTHORIZED, "Invalid token"),
            AuthError::MissingCredentials => {
                (StatusCode::UNAUTHORIZED, "Authentication required")
            }
            AuthError::InsufficientPermissions => {
                (StatusCode::FORBIDDEN, "Insufficient permissions")
            }
            AuthError::PasswordHash(_)
            | AuthError::InvalidSigningKey
            | AuthError::InvalidTokenTtl(_)
            | AuthError::Store(_)
            | AuthError::Jwt(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
        };

        let body = axum::Json(json!({
            "error": message
        }));

        (status, body).into_response()
    }
}
