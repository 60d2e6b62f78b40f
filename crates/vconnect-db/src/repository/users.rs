//! User account operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewUser, ProfileUpdate, Role, User};
use crate::repository::Database;

impl Database {
    // ==================== User Operations ====================

    /// Insert a new user account.
    ///
    /// Username and email are globally unique; the colliding field is named
    /// in the returned error.
    pub async fn insert_user(&self, user: NewUser) -> Result<User, DbError> {
        let now = Utc::now();

        if self.get_user_by_username(&user.username).await?.is_some() {
            return Err(DbError::Duplicate(format!(
                "username '{}' is already taken",
                user.username
            )));
        }
        if self.get_user_by_email(&user.email).await?.is_some() {
            return Err(DbError::Duplicate(format!(
                "email '{}' is already registered",
                user.email
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO users (username, password_hash, email, first_name, last_name, role, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&user.email)
        .bind(&user.first_name)
        .bind(&user.last_name)
        .bind(user.role.as_str())
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(User {
            id,
            username: user.username,
            password_hash: user.password_hash,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            role: user.role,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get a user by username
    pub async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, password_hash, email, first_name, last_name, role, created_at, updated_at
            FROM users
            WHERE username = ?
            "#,
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by email
    pub async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, password_hash, email, first_name, last_name, role, created_at, updated_at
            FROM users
            WHERE email = ?
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// Get a user by ID
    pub async fn get_user_by_id(&self, id: i64) -> Result<Option<User>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, username, password_hash, email, first_name, last_name, role, created_at, updated_at
            FROM users
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| User::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all users
    pub async fn list_users(&self) -> Result<Vec<User>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, username, password_hash, email, first_name, last_name, role, created_at, updated_at
            FROM users
            ORDER BY username
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| User::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Update a user's profile fields.
    ///
    /// The new email must not belong to another account.
    pub async fn update_user_profile(
        &self,
        id: i64,
        update: &ProfileUpdate,
    ) -> Result<bool, DbError> {
        if let Some(existing) = self.get_user_by_email(&update.email).await?
            && existing.id != id
        {
            return Err(DbError::Duplicate(format!(
                "email '{}' is already registered",
                update.email
            )));
        }

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET email = ?, first_name = ?, last_name = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.email)
        .bind(&update.first_name)
        .bind(&update.last_name)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update user role
    pub async fn update_user_role(&self, id: i64, role: Role) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET role = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(role.as_str())
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Update user password
    pub async fn update_user_password(&self, id: i64, password_hash: &str) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE users
            SET password_hash = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(password_hash)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Check if any users exist
    pub async fn has_users(&self) -> Result<bool, DbError> {
        let result = sqlx::query("SELECT COUNT(*) as count FROM users")
            .fetch_one(&self.pool)
            .await?;
        let count: i64 = result.get("count");
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password_hash: "hash".to_string(),
            email: email.to_string(),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            role: Role::Volunteer,
        }
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = Database::open_in_memory().await.unwrap();

        let user = db.insert_user(new_user("alice", "alice@example.com")).await.unwrap();
        assert_eq!(user.role, Role::Volunteer);

        let by_name = db.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(by_name.id, user.id);
        assert_eq!(by_name.email, "alice@example.com");

        let by_id = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.username, "alice");

        assert!(db.get_user_by_username("nobody").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_username_names_field() {
        let db = Database::open_in_memory().await.unwrap();

        db.insert_user(new_user("carol", "carol@example.com")).await.unwrap();
        let err = db
            .insert_user(new_user("carol", "other@example.com"))
            .await
            .unwrap_err();
        match err {
            DbError::Duplicate(msg) => assert!(msg.contains("username")),
            other => panic!("expected Duplicate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicate_email_names_field() {
        let db = Database::open_in_memory().await.unwrap();

        db.insert_user(new_user("dave", "dave@example.com")).await.unwrap();
        let err = db
            .insert_user(new_user("dave2", "dave@example.com"))
            .await
            .unwrap_err();
        match err {
            DbError::Duplicate(msg) => assert!(msg.contains("email")),
            other => panic!("expected Duplicate, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_profile_update_rejects_taken_email() {
        let db = Database::open_in_memory().await.unwrap();

        let erin = db.insert_user(new_user("erin", "erin@example.com")).await.unwrap();
        db.insert_user(new_user("frank", "frank@example.com")).await.unwrap();

        let err = db
            .update_user_profile(
                erin.id,
                &ProfileUpdate {
                    email: "frank@example.com".to_string(),
                    first_name: "Erin".to_string(),
                    last_name: "Example".to_string(),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::Duplicate(_)));

        // Keeping her own email is fine
        let updated = db
            .update_user_profile(
                erin.id,
                &ProfileUpdate {
                    email: "erin@example.com".to_string(),
                    first_name: "Erin".to_string(),
                    last_name: "Updated".to_string(),
                },
            )
            .await
            .unwrap();
        assert!(updated);
    }

    #[tokio::test]
    async fn test_role_update_and_delete() {
        let db = Database::open_in_memory().await.unwrap();

        let user = db.insert_user(new_user("grace", "grace@example.com")).await.unwrap();
        assert!(db.update_user_role(user.id, Role::Organizer).await.unwrap());

        let updated = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(updated.role, Role::Organizer);

        assert!(db.delete_user(user.id).await.unwrap());
        assert!(!db.delete_user(user.id).await.unwrap());
    }
}
