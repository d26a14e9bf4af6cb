//! Base event repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::event::{CreateEventRequest, Event, UpdateEventRequest};
use crate::utils::errors::PortalError;

const EVENT_COLUMNS: &str = "id, name, description, location, starts_at, ends_at, status, barangay, created_by, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct EventRepository {
    pool: PgPool,
}

impl EventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create a new event for a barangay
    pub async fn create(&self, request: CreateEventRequest, barangay: String, created_by: i64) -> Result<Event, PortalError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            INSERT INTO events (name, description, location, starts_at, ends_at, status, barangay, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(request.name)
        .bind(request.description)
        .bind(request.location)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.status)
        .bind(barangay)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Find event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<Event>, PortalError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(event)
    }

    /// Update event
    pub async fn update(&self, id: i64, request: UpdateEventRequest) -> Result<Event, PortalError> {
        let event = sqlx::query_as::<_, Event>(&format!(
            r#"
            UPDATE events
            SET name = COALESCE($2, name),
                description = COALESCE($3, description),
                location = COALESCE($4, location),
                starts_at = COALESCE($5, starts_at),
                ends_at = COALESCE($6, ends_at),
                status = COALESCE($7, status),
                updated_at = $8
            WHERE id = $1
            RETURNING {EVENT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.name)
        .bind(request.description)
        .bind(request.location)
        .bind(request.starts_at)
        .bind(request.ends_at)
        .bind(request.status)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(event)
    }

    /// Delete event; its publication and attendee rows cascade
    pub async fn delete(&self, id: i64) -> Result<bool, PortalError> {
        let result = sqlx::query("DELETE FROM events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List events, optionally for one barangay
    pub async fn list(&self, barangay: Option<&str>) -> Result<Vec<Event>, PortalError> {
        let events = sqlx::query_as::<_, Event>(&format!(
            "SELECT {EVENT_COLUMNS} FROM events WHERE ($1::text IS NULL OR barangay = $1) ORDER BY starts_at, id"
        ))
        .bind(barangay)
        .fetch_all(&self.pool)
        .await?;

        Ok(events)
    }
}
