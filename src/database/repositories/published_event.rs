//! Published event repository implementation

use chrono::Utc;
use sqlx::types::Json;
use sqlx::{PgConnection, PgPool};

use crate::eligibility::TagSet;
use crate::models::published_event::{PublishedEvent, PublishedEventSummary, UpdatePublishedEventRequest};
use crate::models::{EventStatus, YesNo};
use crate::utils::errors::{is_unique_violation, PortalError};

const PUBLISHED_COLUMNS: &str = "id, event_id, selected_tags, need_volunteers, status, event_type, barangay, description, published_by, created_at, updated_at";

const SUMMARY_SELECT: &str = r#"
    SELECT pe.id, pe.event_id, e.name AS event_name, e.location, e.starts_at,
        pe.selected_tags, pe.need_volunteers, pe.status, pe.event_type, pe.barangay, pe.description,
        (SELECT COUNT(*) FROM event_attendees ea WHERE ea.publish_event_id = pe.id) AS attendees_count,
        (SELECT COUNT(*) FROM registered_attendees ra
            WHERE ra.publish_event_id = pe.id AND ra.attendee_type = 'participant') AS participants_count,
        (SELECT COUNT(*) FROM registered_attendees ra
            WHERE ra.publish_event_id = pe.id AND ra.attendee_type = 'volunteer') AS volunteers_count,
        EXISTS (SELECT 1 FROM registered_attendees ra
            WHERE ra.publish_event_id = pe.id AND ra.account_id = $1) AS is_registered
    FROM published_events pe
    JOIN events e ON e.id = pe.event_id
"#;

/// Values written when an event is published
#[derive(Debug, Clone)]
pub struct NewPublishedEvent {
    pub event_id: i64,
    pub selected_tags: TagSet,
    pub need_volunteers: YesNo,
    pub status: EventStatus,
    pub event_type: String,
    pub barangay: String,
    pub description: Option<String>,
    pub published_by: i64,
}

#[derive(Clone, Debug)]
pub struct PublishedEventRepository {
    pool: PgPool,
}

impl PublishedEventRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert inside the publishing transaction; a second publish of the same event is rejected
    pub async fn insert_in(&self, conn: &mut PgConnection, new: NewPublishedEvent) -> Result<PublishedEvent, PortalError> {
        let event_id = new.event_id;
        let now = Utc::now();
        let inserted = sqlx::query_as::<_, PublishedEvent>(&format!(
            r#"
            INSERT INTO published_events (event_id, selected_tags, need_volunteers, status, event_type, barangay, description, published_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $9)
            RETURNING {PUBLISHED_COLUMNS}
            "#
        ))
        .bind(new.event_id)
        .bind(Json(new.selected_tags))
        .bind(new.need_volunteers)
        .bind(new.status)
        .bind(new.event_type)
        .bind(new.barangay)
        .bind(new.description)
        .bind(new.published_by)
        .bind(now)
        .fetch_one(conn)
        .await;

        match inserted {
            Ok(published) => Ok(published),
            Err(e) if is_unique_violation(&e) => Err(PortalError::AlreadyPublished { event_id }),
            Err(e) => Err(e.into()),
        }
    }

    /// Find published event by ID
    pub async fn find_by_id(&self, id: i64) -> Result<Option<PublishedEvent>, PortalError> {
        let mut conn = self.pool.acquire().await?;
        self.find_by_id_in(&mut conn, id).await
    }

    pub async fn find_by_id_in(&self, conn: &mut PgConnection, id: i64) -> Result<Option<PublishedEvent>, PortalError> {
        let published = sqlx::query_as::<_, PublishedEvent>(&format!(
            "SELECT {PUBLISHED_COLUMNS} FROM published_events WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(conn)
        .await?;

        Ok(published)
    }

    /// Whether the base event already has a publication
    pub async fn exists_for_event(&self, event_id: i64) -> Result<bool, PortalError> {
        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM published_events WHERE event_id = $1)")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(exists)
    }

    /// Update published event
    pub async fn update(&self, id: i64, request: UpdatePublishedEventRequest) -> Result<Option<PublishedEvent>, PortalError> {
        let published = sqlx::query_as::<_, PublishedEvent>(&format!(
            r#"
            UPDATE published_events
            SET selected_tags = COALESCE($2, selected_tags),
                need_volunteers = COALESCE($3, need_volunteers),
                description = COALESCE($4, description),
                status = COALESCE($5, status),
                event_type = COALESCE($6, event_type),
                updated_at = $7
            WHERE id = $1
            RETURNING {PUBLISHED_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(request.selected_tags.map(Json))
        .bind(request.need_volunteers)
        .bind(request.description)
        .bind(request.status)
        .bind(request.event_type)
        .bind(Utc::now())
        .fetch_optional(&self.pool)
        .await?;

        Ok(published)
    }

    /// Delete published event and, by cascade, its attendee rows
    pub async fn delete(&self, id: i64) -> Result<bool, PortalError> {
        let result = sqlx::query("DELETE FROM published_events WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Listing rows with counts and the registration state of `account_id`
    pub async fn list_summaries(&self, barangay: Option<&str>, account_id: Option<i64>) -> Result<Vec<PublishedEventSummary>, PortalError> {
        let summaries = sqlx::query_as::<_, PublishedEventSummary>(&format!(
            "{SUMMARY_SELECT} WHERE ($2::text IS NULL OR pe.barangay = $2) ORDER BY e.starts_at, pe.id"
        ))
        .bind(account_id)
        .bind(barangay)
        .fetch_all(&self.pool)
        .await?;

        Ok(summaries)
    }

    pub async fn find_summary(&self, id: i64, account_id: Option<i64>) -> Result<Option<PublishedEventSummary>, PortalError> {
        let summary = sqlx::query_as::<_, PublishedEventSummary>(&format!("{SUMMARY_SELECT} WHERE pe.id = $2"))
            .bind(account_id)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(summary)
    }
}
