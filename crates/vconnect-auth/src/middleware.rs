//! Authentication middleware for Axum

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::debug;

use crate::jwt::JwtManager;
use crate::principal::Principal;

/// Extract the bearer token from an authorization header value
fn extract_bearer_token(header: &str) -> Option<&str> {
    header.strip_prefix("Bearer ")
}

/// Decode the request's bearer token into a principal, if possible.
///
/// A missing header, a non-bearer scheme, or an expired/forged/malformed
/// token all yield `None`: the request stays anonymous and route-level
/// authorization decides its fate.
pub fn principal_from_headers(jwt: &JwtManager, headers: &HeaderMap) -> Option<Principal> {
    let header = headers.get(AUTHORIZATION)?.to_str().ok()?;
    let token = extract_bearer_token(header)?;

    let claims = match jwt.decode_token(token) {
        Ok(claims) => claims,
        Err(err) => {
            debug!("Rejected bearer token: {}", err);
            return None;
        }
    };

    Principal::from_claims(&claims).ok()
}

/// Authentication middleware
///
/// Runs exactly once per request, before any route-specific authorization
/// check. On success the principal is attached to the request extensions;
/// on any failure the request proceeds unauthenticated. This middleware
/// never short-circuits.
pub async fn auth_middleware(
    State(jwt): State<Arc<JwtManager>>,
    mut request: Request,
    next: Next,
) -> Response {
    if let Some(principal) = principal_from_headers(&jwt, request.headers()) {
        debug!(
            "Authenticated user: {} ({})",
            principal.username,
            principal.role.as_str()
        );
        request.extensions_mut().insert(principal);
    }

    next.run(request).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use axum::http::HeaderValue;
    use vconnect_db::Role;

    // base64 of "test-secret-key"
    const SECRET: &str = "dGVzdC1zZWNyZXQta2V5";

    fn alice() -> Principal {
        Principal {
            id: 1,
            username: "alice".to_string(),
            role: Role::Volunteer,
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Able".to_string(),
        }
    }

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_valid_bearer_token_yields_principal() {
        let clock = FixedClock::at(0);
        let jwt = JwtManager::with_clock(SECRET, 60_000, Arc::new(clock)).unwrap();
        let token = jwt.issue_token(&alice()).unwrap();

        let principal =
            principal_from_headers(&jwt, &headers_with(&format!("Bearer {}", token))).unwrap();
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.role, Role::Volunteer);
    }

    #[test]
    fn test_missing_header_is_anonymous() {
        let jwt = JwtManager::new(SECRET, 60_000).unwrap();
        assert!(principal_from_headers(&jwt, &HeaderMap::new()).is_none());
    }

    #[test]
    fn test_non_bearer_scheme_is_anonymous() {
        let jwt = JwtManager::new(SECRET, 60_000).unwrap();
        assert!(principal_from_headers(&jwt, &headers_with("Basic dXNlcjpwdw==")).is_none());
    }

    #[test]
    fn test_garbage_token_is_anonymous() {
        let jwt = JwtManager::new(SECRET, 60_000).unwrap();
        assert!(principal_from_headers(&jwt, &headers_with("Bearer garbage")).is_none());
    }

    #[test]
    fn test_expired_token_is_anonymous() {
        let clock = FixedClock::at(0);
        let jwt = JwtManager::with_clock(SECRET, 1_000, Arc::new(clock.clone())).unwrap();
        let token = jwt.issue_token(&alice()).unwrap();

        clock.set(1_500);
        assert!(principal_from_headers(&jwt, &headers_with(&format!("Bearer {}", token))).is_none());
    }
}
