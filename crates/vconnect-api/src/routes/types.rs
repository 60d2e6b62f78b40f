//! Request/Response DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use vconnect_db::{Event, EventRegistration, Organization, User};

// ==================== Auth Types ====================

/// Registration request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// Defaults to VOLUNTEER when omitted
    #[serde(default)]
    pub role: Option<String>,
}

/// Login request
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Login response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
}

// ==================== User Types ====================

/// User response (never includes the password hash)
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

/// Profile update request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    /// New password, if the account holder wants to rotate it
    #[serde(default)]
    pub password: Option<String>,
    /// New role; applying it is an admin-only operation
    #[serde(default)]
    pub role: Option<String>,
}

// ==================== Event Types ====================

/// Create/update event request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventRequest {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub event_date: DateTime<Utc>,
    pub location: String,
    pub capacity: i64,
    #[serde(default = "default_active")]
    pub active: bool,
    pub organization_id: i64,
}

fn default_active() -> bool {
    true
}

/// Event response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: String,
    pub location: String,
    pub capacity: i64,
    pub active: bool,
    pub organization_id: i64,
    pub organizer_id: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Event> for EventResponse {
    fn from(event: Event) -> Self {
        Self {
            id: event.id,
            title: event.title,
            description: event.description,
            event_date: event.event_date.to_rfc3339(),
            location: event.location,
            capacity: event.capacity,
            active: event.active,
            organization_id: event.organization_id,
            organizer_id: event.organizer_id,
            created_at: event.created_at.to_rfc3339(),
            updated_at: event.updated_at.to_rfc3339(),
        }
    }
}

// ==================== Organization Types ====================

/// Create/update organization request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub website_url: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default = "default_active")]
    pub active: bool,
}

/// Organization response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationResponse {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub contact_email: Option<String>,
    pub phone_number: Option<String>,
    pub website_url: Option<String>,
    pub address: Option<String>,
    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Organization> for OrganizationResponse {
    fn from(org: Organization) -> Self {
        Self {
            id: org.id,
            name: org.name,
            description: org.description,
            contact_email: org.contact_email,
            phone_number: org.phone_number,
            website_url: org.website_url,
            address: org.address,
            active: org.active,
            created_at: org.created_at.to_rfc3339(),
            updated_at: org.updated_at.to_rfc3339(),
        }
    }
}

// ==================== Registration Types ====================

/// Create registration request
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub event_id: i64,
    pub volunteer_id: i64,
}

/// Registration status update request
#[derive(Deserialize)]
pub struct StatusUpdateRequest {
    pub status: String,
}

/// Registration response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: i64,
    pub event_id: i64,
    pub volunteer_id: i64,
    pub status: String,
    pub registered_at: String,
}

impl From<EventRegistration> for RegistrationResponse {
    fn from(reg: EventRegistration) -> Self {
        Self {
            id: reg.id,
            event_id: reg.event_id,
            volunteer_id: reg.volunteer_id,
            status: reg.status.as_str().to_string(),
            registered_at: reg.registered_at.to_rfc3339(),
        }
    }
}
