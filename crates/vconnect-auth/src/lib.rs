//! VolunteerConnect Authentication and Authorization
//!
//! This crate provides credential verification, JWT issuance/validation
//! and role-based access control for the VolunteerConnect backend.

pub mod access;
pub mod authenticator;
pub mod clock;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod password;
pub mod principal;

pub use access::{AccessRule, authorize, require};
pub use authenticator::Authenticator;
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::AuthError;
pub use jwt::{Claims, JwtManager};
pub use middleware::{auth_middleware, principal_from_headers};
pub use password::{hash_password, verify_password};
pub use principal::Principal;
