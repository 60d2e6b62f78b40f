//! Credential verification against the account store

use tracing::debug;
use vconnect_db::Database;

use crate::error::AuthError;
use crate::password::verify_password;
use crate::principal::Principal;

/// Valid Argon2 hash that matches no password; verified when the username is
/// unknown so lookup misses take as long as password mismatches.
const DUMMY_HASH: &str =
    "$argon2id$v=19$m=19456,t=2,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$K8rI5T7VdQ8xkO0GqK5K2w";

/// Verifies username/password pairs and produces an authenticated principal.
///
/// Authentication has no side effects beyond the account lookup; token
/// issuance is a separate step the caller performs with the returned
/// principal.
#[derive(Clone)]
pub struct Authenticator {
    db: Database,
}

impl Authenticator {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Authenticate a username/password pair.
    ///
    /// Returns `UnknownUser` for a missing account and `InvalidCredentials`
    /// for a password mismatch. Both render as the same HTTP response; the
    /// split exists only for internal logging.
    pub async fn authenticate(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Principal, AuthError> {
        debug!("Authenticating user: {}", username);

        let user = self.db.get_user_by_username(username).await?;

        let (hash_to_verify, user) = match user {
            Some(u) => (u.password_hash.clone(), Some(u)),
            None => (DUMMY_HASH.to_string(), None),
        };

        let password_valid = verify_password(password, &hash_to_verify);

        match (user, password_valid) {
            (Some(u), true) => Ok(Principal::from_account(&u)),
            (Some(_), false) => Err(AuthError::InvalidCredentials),
            (None, _) => Err(AuthError::UnknownUser),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::password::hash_password;
    use vconnect_db::{NewUser, Role};

    async fn store_with_alice() -> Database {
        let db = Database::open_in_memory().await.unwrap();
        db.insert_user(NewUser {
            username: "alice".to_string(),
            password_hash: hash_password("pw123").unwrap(),
            email: "alice@example.com".to_string(),
            first_name: "Alice".to_string(),
            last_name: "Able".to_string(),
            role: Role::Volunteer,
        })
        .await
        .unwrap();
        db
    }

    #[tokio::test]
    async fn test_valid_credentials_yield_principal() {
        let db = store_with_alice().await;
        let authenticator = Authenticator::new(db.clone());

        let principal = authenticator.authenticate("alice", "pw123").await.unwrap();
        let stored = db.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(principal.id, stored.id);
        assert_eq!(principal.username, "alice");
        assert_eq!(principal.role, Role::Volunteer);
    }

    #[tokio::test]
    async fn test_wrong_password_fails() {
        let authenticator = Authenticator::new(store_with_alice().await);
        assert!(matches!(
            authenticator.authenticate("alice", "wrong").await,
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn test_unknown_user_fails() {
        let authenticator = Authenticator::new(store_with_alice().await);
        assert!(matches!(
            authenticator.authenticate("mallory", "pw123").await,
            Err(AuthError::UnknownUser)
        ));
    }
}
