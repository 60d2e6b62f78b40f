//! Authenticated principal

use serde::{Deserialize, Serialize};
use vconnect_db::{Role, User};

use crate::error::AuthError;
use crate::jwt::Claims;

/// The authenticated identity for one request.
///
/// Built either from a freshly-authenticated account or from a validated
/// token's claims; never persisted. Deliberately a separate type from the
/// stored [`User`] so the persistence model carries no security contract.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub id: i64,
    pub username: String,
    pub role: Role,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
}

impl Principal {
    /// Derive a principal from a stored account
    pub fn from_account(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            role: user.role,
            email: user.email.clone(),
            first_name: user.first_name.clone(),
            last_name: user.last_name.clone(),
        }
    }

    /// Reconstruct a principal from validated token claims.
    ///
    /// The claims are trusted as embedded at issuance; no store lookup. A
    /// role string that does not parse marks the token invalid.
    pub fn from_claims(claims: &Claims) -> Result<Self, AuthError> {
        let role = claims.role.parse::<Role>().map_err(|_| AuthError::TokenInvalid)?;
        Ok(Self {
            id: claims.user_id,
            username: claims.sub.clone(),
            role,
            email: claims.email.clone(),
            first_name: claims.first_name.clone(),
            last_name: claims.last_name.clone(),
        })
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}
