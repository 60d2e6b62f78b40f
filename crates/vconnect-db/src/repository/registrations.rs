//! Event registration operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{EventRegistration, NewRegistration, RegistrationStatus};
use crate::repository::Database;

impl Database {
    // ==================== Registration Operations ====================

    /// Insert a new registration.
    ///
    /// A volunteer can register for a given event at most once.
    pub async fn insert_registration(
        &self,
        reg: NewRegistration,
    ) -> Result<EventRegistration, DbError> {
        let now = Utc::now();

        if self
            .get_registration_for_event(reg.event_id, reg.volunteer_id)
            .await?
            .is_some()
        {
            return Err(DbError::Duplicate(
                "volunteer is already registered for this event".to_string(),
            ));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO event_registrations (event_id, volunteer_id, status, registered_at)
            VALUES (?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(reg.event_id)
        .bind(reg.volunteer_id)
        .bind(RegistrationStatus::Pending.as_str())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(EventRegistration {
            id,
            event_id: reg.event_id,
            volunteer_id: reg.volunteer_id,
            status: RegistrationStatus::Pending,
            registered_at: now,
        })
    }

    /// Get a registration by ID
    pub async fn get_registration_by_id(
        &self,
        id: i64,
    ) -> Result<Option<EventRegistration>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, event_id, volunteer_id, status, registered_at
            FROM event_registrations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| EventRegistration::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Get a volunteer's registration for an event, if any
    pub async fn get_registration_for_event(
        &self,
        event_id: i64,
        volunteer_id: i64,
    ) -> Result<Option<EventRegistration>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, event_id, volunteer_id, status, registered_at
            FROM event_registrations
            WHERE event_id = ? AND volunteer_id = ?
            "#,
        )
        .bind(event_id)
        .bind(volunteer_id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| EventRegistration::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// List registrations for an event
    pub async fn list_registrations_by_event(
        &self,
        event_id: i64,
    ) -> Result<Vec<EventRegistration>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, event_id, volunteer_id, status, registered_at
            FROM event_registrations
            WHERE event_id = ?
            ORDER BY registered_at
            "#,
        )
        .bind(event_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| EventRegistration::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// List registrations made by a volunteer
    pub async fn list_registrations_by_volunteer(
        &self,
        volunteer_id: i64,
    ) -> Result<Vec<EventRegistration>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, event_id, volunteer_id, status, registered_at
            FROM event_registrations
            WHERE volunteer_id = ?
            ORDER BY registered_at
            "#,
        )
        .bind(volunteer_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| EventRegistration::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Update a registration's status
    pub async fn update_registration_status(
        &self,
        id: i64,
        status: RegistrationStatus,
    ) -> Result<bool, DbError> {
        let result = sqlx::query(
            r#"
            UPDATE event_registrations
            SET status = ?
            WHERE id = ?
            "#,
        )
        .bind(status.as_str())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a registration
    pub async fn delete_registration(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM event_registrations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
