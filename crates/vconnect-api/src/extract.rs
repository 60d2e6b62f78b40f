//! Request extractors for the authenticated principal

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use std::convert::Infallible;
use vconnect_auth::{AuthError, Principal};

use crate::error::ApiError;

/// The principal the auth middleware attached to this request, if any.
///
/// Extraction never fails; handlers pass the inner `Option` to the access
/// evaluator, which turns an absent principal into a 401 where one is
/// required.
pub struct CurrentUser(pub Option<Principal>);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(CurrentUser(parts.extensions.get::<Principal>().cloned()))
    }
}

/// A required authenticated principal; rejects anonymous requests with 401.
pub struct RequireAuth(pub Principal);

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(RequireAuth)
            .ok_or(ApiError::Auth(AuthError::MissingCredentials))
    }
}
