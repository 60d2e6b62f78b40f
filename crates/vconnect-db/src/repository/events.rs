//! Event operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{Event, EventUpdate, NewEvent};
use crate::repository::Database;

impl Database {
    // ==================== Event Operations ====================

    /// Insert a new event
    pub async fn insert_event(&self, event: NewEvent) -> Result<Event, DbError> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO events (title, description, event_date, location, capacity, active, organization_id, organizer_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.event_date.to_rfc3339())
        .bind(&event.location)
        .bind(event.capacity)
        .bind(event.active)
        .bind(event.organization_id)
        .bind(event.organizer_id)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Event {
            id,
            title: event.title,
            description: event.description,
            event_date: event.event_date,
            location: event.location,
            capacity: event.capacity,
            active: event.active,
            organization_id: event.organization_id,
            organizer_id: event.organizer_id,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an event by ID
    pub async fn get_event_by_id(&self, id: i64) -> Result<Option<Event>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, title, description, event_date, location, capacity, active, organization_id, organizer_id, created_at, updated_at
            FROM events
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result.map(|row| Event::try_from(&row).map_err(DbError::from)).transpose()
    }

    /// List all events, newest first
    pub async fn list_events(&self) -> Result<Vec<Event>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, description, event_date, location, capacity, active, organization_id, organizer_id, created_at, updated_at
            FROM events
            ORDER BY event_date DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Event::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Update an event (full replace; the organizer never changes)
    pub async fn update_event(&self, id: i64, update: &EventUpdate) -> Result<bool, DbError> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE events
            SET title = ?, description = ?, event_date = ?, location = ?, capacity = ?, active = ?, organization_id = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.title)
        .bind(&update.description)
        .bind(update.event_date.to_rfc3339())
        .bind(&update.location)
        .bind(update.capacity)
        .bind(update.active)
        .bind(update.organization_id)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an event
    pub async fn delete_event(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM events WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
