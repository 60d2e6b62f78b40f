//! JWT token management

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use crate::clock::{Clock, SystemClock};
use crate::error::AuthError;
use crate::principal::Principal;

/// JWT claims
///
/// `iat` and `exp` are millisecond-precision epoch instants. The claims are
/// trusted only because of a valid signature; they are embedded verbatim at
/// issuance and read back without a store lookup.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (username)
    pub sub: String,
    /// Account id
    #[serde(rename = "userId")]
    pub user_id: i64,
    /// Account role
    pub role: String,
    pub email: String,
    #[serde(rename = "firstName")]
    pub first_name: String,
    #[serde(rename = "lastName")]
    pub last_name: String,
    /// Issued at (epoch milliseconds)
    pub iat: i64,
    /// Expiration time (epoch milliseconds)
    pub exp: i64,
}

/// JWT manager for token generation and validation
#[derive(Clone)]
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_ms: i64,
    clock: Arc<dyn Clock>,
}

impl JwtManager {
    /// Create a new JWT manager.
    ///
    /// The secret is base64-encoded key material; the TTL is in milliseconds
    /// and must be strictly positive.
    pub fn new(secret_base64: &str, ttl_ms: i64) -> Result<Self, AuthError> {
        Self::with_clock(secret_base64, ttl_ms, Arc::new(SystemClock))
    }

    /// Create a JWT manager with an explicit time source.
    pub fn with_clock(
        secret_base64: &str,
        ttl_ms: i64,
        clock: Arc<dyn Clock>,
    ) -> Result<Self, AuthError> {
        if ttl_ms <= 0 {
            return Err(AuthError::InvalidTokenTtl(ttl_ms));
        }
        let encoding_key = EncodingKey::from_base64_secret(secret_base64)
            .map_err(|_| AuthError::InvalidSigningKey)?;
        let decoding_key = DecodingKey::from_base64_secret(secret_base64)
            .map_err(|_| AuthError::InvalidSigningKey)?;
        Ok(Self {
            encoding_key,
            decoding_key,
            ttl_ms,
            clock,
        })
    }

    /// Token lifetime in milliseconds
    pub fn ttl_ms(&self) -> i64 {
        self.ttl_ms
    }

    /// Issue a signed token for an authenticated principal
    pub fn issue_token(&self, principal: &Principal) -> Result<String, AuthError> {
        let now = self.clock.now_millis();

        let claims = Claims {
            sub: principal.username.clone(),
            user_id: principal.id,
            role: principal.role.as_str().to_string(),
            email: principal.email.clone(),
            first_name: principal.first_name.clone(),
            last_name: principal.last_name.clone(),
            iat: now,
            exp: now + self.ttl_ms,
        };

        debug!("Issuing token for user: {}", principal.username);

        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    /// Validate a token and return its claims.
    ///
    /// The signature is checked first; forged, tampered and malformed tokens
    /// are all reported as `TokenInvalid` without revealing which check
    /// failed. Expiry is checked against the injected clock and reported
    /// separately as `TokenExpired`.
    pub fn decode_token(&self, token: &str) -> Result<Claims, AuthError> {
        let mut validation = Validation::new(Algorithm::HS256);
        // exp carries milliseconds, not the seconds the library expects;
        // expiry is checked below against the injected clock.
        validation.validate_exp = false;
        validation.required_spec_claims.clear();

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|_| AuthError::TokenInvalid)?;

        if token_data.claims.exp <= self.clock.now_millis() {
            return Err(AuthError::TokenExpired);
        }

        Ok(token_data.claims)
    }
}
