//! Organization operations

use chrono::Utc;
use sqlx::Row;

use crate::error::DbError;
use crate::models::{NewOrganization, Organization};
use crate::repository::Database;

impl Database {
    // ==================== Organization Operations ====================

    /// Insert a new organization; names are unique.
    pub async fn insert_organization(
        &self,
        org: NewOrganization,
    ) -> Result<Organization, DbError> {
        let now = Utc::now();

        if self.get_organization_by_name(&org.name).await?.is_some() {
            return Err(DbError::Duplicate(format!(
                "organization '{}' already exists",
                org.name
            )));
        }

        let result = sqlx::query(
            r#"
            INSERT INTO organizations (name, description, contact_email, phone_number, website_url, address, active, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING id
            "#,
        )
        .bind(&org.name)
        .bind(&org.description)
        .bind(&org.contact_email)
        .bind(&org.phone_number)
        .bind(&org.website_url)
        .bind(&org.address)
        .bind(org.active)
        .bind(now.to_rfc3339())
        .bind(now.to_rfc3339())
        .fetch_one(&self.pool)
        .await?;

        let id: i64 = result.get("id");

        Ok(Organization {
            id,
            name: org.name,
            description: org.description,
            contact_email: org.contact_email,
            phone_number: org.phone_number,
            website_url: org.website_url,
            address: org.address,
            active: org.active,
            created_at: now,
            updated_at: now,
        })
    }

    /// Get an organization by ID
    pub async fn get_organization_by_id(&self, id: i64) -> Result<Option<Organization>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, description, contact_email, phone_number, website_url, address, active, created_at, updated_at
            FROM organizations
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Organization::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// Get an organization by name
    pub async fn get_organization_by_name(
        &self,
        name: &str,
    ) -> Result<Option<Organization>, DbError> {
        let result = sqlx::query(
            r#"
            SELECT id, name, description, contact_email, phone_number, website_url, address, active, created_at, updated_at
            FROM organizations
            WHERE name = ?
            "#,
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await?;

        result
            .map(|row| Organization::try_from(&row).map_err(DbError::from))
            .transpose()
    }

    /// List all organizations
    pub async fn list_organizations(&self) -> Result<Vec<Organization>, DbError> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, description, contact_email, phone_number, website_url, address, active, created_at, updated_at
            FROM organizations
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| Organization::try_from(row).map_err(DbError::from))
            .collect()
    }

    /// Update an organization (full replace of mutable fields).
    pub async fn update_organization(
        &self,
        id: i64,
        update: &NewOrganization,
    ) -> Result<bool, DbError> {
        if let Some(existing) = self.get_organization_by_name(&update.name).await?
            && existing.id != id
        {
            return Err(DbError::Duplicate(format!(
                "organization '{}' already exists",
                update.name
            )));
        }

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            UPDATE organizations
            SET name = ?, description = ?, contact_email = ?, phone_number = ?, website_url = ?, address = ?, active = ?, updated_at = ?
            WHERE id = ?
            "#,
        )
        .bind(&update.name)
        .bind(&update.description)
        .bind(&update.contact_email)
        .bind(&update.phone_number)
        .bind(&update.website_url)
        .bind(&update.address)
        .bind(update.active)
        .bind(now.to_rfc3339())
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete an organization
    pub async fn delete_organization(&self, id: i64) -> Result<bool, DbError> {
        let result = sqlx::query("DELETE FROM organizations WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
