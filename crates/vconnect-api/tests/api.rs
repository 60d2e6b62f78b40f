//! End-to-end API tests
//!
//! Each test builds a fresh in-memory database and drives the full router
//! through tower's `oneshot`, token issuance and middleware included.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::ServiceExt;
use vconnect_api::{AppState, create_router};
use vconnect_auth::JwtManager;
use vconnect_db::Database;

// base64 of "integration-test-secret"
const SECRET: &str = "aW50ZWdyYXRpb24tdGVzdC1zZWNyZXQ=";

async fn test_router() -> Router {
    let db = Database::open_in_memory().await.unwrap();
    let jwt = Arc::new(JwtManager::new(SECRET, 3_600_000).unwrap());
    create_router(AppState::new(db, jwt))
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

async fn register(router: &Router, username: &str, password: &str, role: Option<&str>) -> (StatusCode, Value) {
    register_with_email(
        router,
        username,
        password,
        &format!("{}@example.com", username),
        role,
    )
    .await
}

async fn register_with_email(
    router: &Router,
    username: &str,
    password: &str,
    email: &str,
    role: Option<&str>,
) -> (StatusCode, Value) {
    let mut body = json!({
        "username": username,
        "password": password,
        "email": email,
        "firstName": "Test",
        "lastName": "User",
    });
    if let Some(role) = role {
        body["role"] = json!(role);
    }
    send(router, "POST", "/api/auth/register", None, Some(body)).await
}

/// Log in and return the bearer token plus the full response body
async fn login(router: &Router, username: &str, password: &str) -> (StatusCode, Value) {
    send(
        router,
        "POST",
        "/api/auth/login",
        None,
        Some(json!({"username": username, "password": password})),
    )
    .await
}

async fn token_for(router: &Router, username: &str, password: &str) -> String {
    let (status, body) = login(router, username, password).await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

async fn create_org(router: &Router, token: &str, name: &str) -> i64 {
    let (status, body) = send(
        router,
        "POST",
        "/api/organizations",
        Some(token),
        Some(json!({"name": name, "description": "test org"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

async fn create_event(router: &Router, token: &str, org_id: i64, title: &str) -> i64 {
    let (status, body) = send(
        router,
        "POST",
        "/api/events",
        Some(token),
        Some(json!({
            "title": title,
            "eventDate": "2026-09-01T10:00:00Z",
            "location": "Town Hall",
            "capacity": 20,
            "organizationId": org_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["id"].as_i64().unwrap()
}

// ==================== Registration & Login ====================

#[tokio::test]
async fn test_register_defaults_to_volunteer_and_login_round_trip() {
    let router = test_router().await;

    let (status, body) = register(&router, "alice", "pw123", None).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["role"], "VOLUNTEER");

    let (status, body) = login(&router, "alice", "pw123").await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body["token"].as_str().unwrap().is_empty());
    assert_eq!(body["role"], "VOLUNTEER");
    assert_eq!(body["username"], "alice");

    let (status, _) = login(&router, "alice", "wrong").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_login_does_not_reveal_whether_username_exists() {
    let router = test_router().await;
    register(&router, "alice", "pw123", None).await;

    let (wrong_pw_status, wrong_pw_body) = login(&router, "alice", "nope").await;
    let (unknown_status, unknown_body) = login(&router, "mallory", "nope").await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw_body, unknown_body);
}

#[tokio::test]
async fn test_duplicate_username_conflicts_naming_the_field() {
    let router = test_router().await;

    let (status, _) =
        register_with_email(&router, "carol", "pw12", "carol@example.com", None).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) =
        register_with_email(&router, "carol", "pw12", "carol2@example.com", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("username"));
}

#[tokio::test]
async fn test_duplicate_email_conflicts_naming_the_field() {
    let router = test_router().await;

    register_with_email(&router, "dana", "pw12", "shared@example.com", None).await;
    let (status, body) =
        register_with_email(&router, "dana2", "pw12", "shared@example.com", None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("email"));
}

#[tokio::test]
async fn test_register_rejects_bad_input() {
    let router = test_router().await;

    let (status, _) = register(&router, "bad user!", "pw123", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&router, "shortpw", "pw", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = register(&router, "roleless", "pw123", Some("SUPERUSER")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ==================== Middleware & token handling ====================

#[tokio::test]
async fn test_protected_route_rejects_anonymous_and_garbage_tokens() {
    let router = test_router().await;

    // No token at all
    let (status, _) = send(&router, "GET", "/api/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Garbage bearer token leaves the request anonymous rather than 500ing
    let (status, _) = send(&router, "GET", "/api/events", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Valid token from a different signing key
    let other = JwtManager::new("YW5vdGhlci1zZWNyZXQ=", 3_600_000).unwrap();
    let forged = other
        .issue_token(&vconnect_auth::Principal {
            id: 1,
            username: "alice".to_string(),
            role: vconnect_db::Role::Admin,
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Able".to_string(),
        })
        .unwrap();
    let (status, _) = send(&router, "GET", "/api/events", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health_is_public() {
    let router = test_router().await;
    let (status, body) = send(&router, "GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

// ==================== Event authorization ====================

#[tokio::test]
async fn test_event_lifecycle_and_ownership() {
    let router = test_router().await;

    register(&router, "bob", "pw123", Some("ORGANIZER")).await;
    register(&router, "eve", "pw123", Some("ORGANIZER")).await;
    register(&router, "root", "pw123", Some("ADMIN")).await;
    register(&router, "alice", "pw123", None).await;

    let bob = token_for(&router, "bob", "pw123").await;
    let eve = token_for(&router, "eve", "pw123").await;
    let root = token_for(&router, "root", "pw123").await;
    let alice = token_for(&router, "alice", "pw123").await;

    let org_id = create_org(&router, &bob, "Helping Hands").await;

    // Volunteers cannot create events
    let (status, _) = send(
        &router,
        "POST",
        "/api/events",
        Some(&alice),
        Some(json!({
            "title": "Nope",
            "eventDate": "2026-09-01T10:00:00Z",
            "location": "Anywhere",
            "capacity": 5,
            "organizationId": org_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let event_id = create_event(&router, &bob, org_id, "Beach Cleanup").await;

    // Any authenticated user can read
    let (status, body) = send(
        &router,
        "GET",
        &format!("/api/events/{}", event_id),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Beach Cleanup");

    // A different organizer is not the owner and not an admin
    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/events/{}", event_id),
        Some(&eve),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // The owner can update
    let (status, body) = send(
        &router,
        "PUT",
        &format!("/api/events/{}", event_id),
        Some(&bob),
        Some(json!({
            "title": "Beach Cleanup (rescheduled)",
            "eventDate": "2026-09-08T10:00:00Z",
            "location": "Shoreline",
            "capacity": 25,
            "organizationId": org_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Beach Cleanup (rescheduled)");

    // An admin may delete an event they do not own
    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/events/{}", event_id),
        Some(&root),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ==================== Registration authorization ====================

#[tokio::test]
async fn test_volunteer_self_registration_rules() {
    let router = test_router().await;

    register(&router, "bob", "pw123", Some("ORGANIZER")).await;
    let (_, alice_body) = register(&router, "alice", "pw123", None).await;
    let alice_id = alice_body["id"].as_i64().unwrap();

    let bob = token_for(&router, "bob", "pw123").await;
    let alice = token_for(&router, "alice", "pw123").await;

    let org_id = create_org(&router, &bob, "Helping Hands").await;
    let event_id = create_event(&router, &bob, org_id, "Food Drive").await;

    // An organizer cannot register as a volunteer
    let (status, _) = send(
        &router,
        "POST",
        "/api/registrations",
        Some(&bob),
        Some(json!({"eventId": event_id, "volunteerId": alice_id})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // A volunteer cannot register someone else
    let (status, _) = send(
        &router,
        "POST",
        "/api/registrations",
        Some(&alice),
        Some(json!({"eventId": event_id, "volunteerId": alice_id + 1})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Self-registration succeeds and defaults to PENDING
    let (status, body) = send(
        &router,
        "POST",
        "/api/registrations",
        Some(&alice),
        Some(json!({"eventId": event_id, "volunteerId": alice_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PENDING");

    // Registering twice for the same event conflicts
    let (status, _) = send(
        &router,
        "POST",
        "/api/registrations",
        Some(&alice),
        Some(json!({"eventId": event_id, "volunteerId": alice_id})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // The volunteer sees their own registrations; the organizer sees the
    // event's; the volunteer cannot list someone else's.
    let (status, body) = send(
        &router,
        "GET",
        &format!("/api/registrations/volunteer/{}", alice_id),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, _) = send(
        &router,
        "GET",
        &format!("/api/registrations/volunteer/{}", alice_id + 1),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &router,
        "GET",
        &format!("/api/registrations/event/{}", event_id),
        Some(&bob),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let reg_id = body.as_array().unwrap()[0]["id"].as_i64().unwrap();

    // Volunteers cannot change status; organizers can
    let (status, _) = send(
        &router,
        "PUT",
        &format!("/api/registrations/{}/status", reg_id),
        Some(&alice),
        Some(json!({"status": "APPROVED"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &router,
        "PUT",
        &format!("/api/registrations/{}/status", reg_id),
        Some(&bob),
        Some(json!({"status": "APPROVED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "APPROVED");
}

// ==================== User profile authorization ====================

#[tokio::test]
async fn test_profile_access_and_admin_listing() {
    let router = test_router().await;

    let (_, alice_body) = register(&router, "alice", "pw123", None).await;
    let alice_id = alice_body["id"].as_i64().unwrap();
    register(&router, "frank", "pw123", None).await;
    register(&router, "root", "pw123", Some("ADMIN")).await;

    let alice = token_for(&router, "alice", "pw123").await;
    let frank = token_for(&router, "frank", "pw123").await;
    let root = token_for(&router, "root", "pw123").await;

    // Owner and admin can read the profile; another user cannot
    let uri = format!("/api/users/{}", alice_id);
    let (status, _) = send(&router, "GET", &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, "GET", &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&router, "GET", &uri, Some(&frank), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Only admins list users
    let (status, _) = send(&router, "GET", "/api/users", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = send(&router, "GET", "/api/users", Some(&root), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    // An account cannot change its own role
    let (status, _) = send(
        &router,
        "PUT",
        &uri,
        Some(&alice),
        Some(json!({
            "email": "alice@example.com",
            "firstName": "Alice",
            "lastName": "Able",
            "role": "ADMIN",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // An admin can
    let (status, body) = send(
        &router,
        "PUT",
        &uri,
        Some(&root),
        Some(json!({
            "email": "alice@example.com",
            "firstName": "Alice",
            "lastName": "Able",
            "role": "ORGANIZER",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "ORGANIZER");

    // Only admins delete accounts
    let (status, _) = send(&router, "DELETE", &uri, Some(&frank), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&router, "DELETE", &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// ==================== Organization authorization ====================

#[tokio::test]
async fn test_organization_rules() {
    let router = test_router().await;

    register(&router, "bob", "pw123", Some("ORGANIZER")).await;
    register(&router, "alice", "pw123", None).await;
    register(&router, "root", "pw123", Some("ADMIN")).await;

    let bob = token_for(&router, "bob", "pw123").await;
    let alice = token_for(&router, "alice", "pw123").await;
    let root = token_for(&router, "root", "pw123").await;

    // Volunteers cannot create organizations
    let (status, _) = send(
        &router,
        "POST",
        "/api/organizations",
        Some(&alice),
        Some(json!({"name": "Nope Org"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let org_id = create_org(&router, &bob, "Helping Hands").await;

    // Duplicate name conflicts
    let (status, _) = send(
        &router,
        "POST",
        "/api/organizations",
        Some(&bob),
        Some(json!({"name": "Helping Hands"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Any authenticated user can read
    let (status, _) = send(
        &router,
        "GET",
        &format!("/api/organizations/{}", org_id),
        Some(&alice),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    // Delete is admin-only, even for organizers
    let uri = format!("/api/organizations/{}", org_id);
    let (status, _) = send(&router, "DELETE", &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&router, "DELETE", &uri, Some(&root), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}
