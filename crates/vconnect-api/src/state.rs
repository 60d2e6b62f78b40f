//! Application state

use std::sync::Arc;
use vconnect_auth::{Authenticator, JwtManager};
use vconnect_db::Database;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
    pub authenticator: Authenticator,
}

impl AppState {
    pub fn new(db: Database, jwt: Arc<JwtManager>) -> Self {
        let authenticator = Authenticator::new(db.clone());
        Self {
            db,
            jwt,
            authenticator,
        }
    }
}
