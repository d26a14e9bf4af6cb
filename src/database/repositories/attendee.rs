//! Invited attendee repository implementation

use chrono::Utc;
use sqlx::{PgConnection, PgPool, Postgres, QueryBuilder};

use crate::models::attendee::{EventAttendee, InvitationStatus};
use crate::utils::errors::PortalError;

const ATTENDEE_COLUMNS: &str = "id, publish_event_id, profile_id, status, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct AttendeeRepository {
    pool: PgPool,
}

impl AttendeeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Bulk-insert `invited` rows in batches, skipping profiles already invited.
    ///
    /// Returns the number of rows actually inserted.
    pub async fn invite_in(
        &self,
        conn: &mut PgConnection,
        publish_event_id: i64,
        profile_ids: &[i64],
        batch_size: usize,
    ) -> Result<u64, PortalError> {
        let now = Utc::now();
        let mut inserted = 0;

        for batch in profile_ids.chunks(batch_size.max(1)) {
            let mut builder: QueryBuilder<Postgres> = QueryBuilder::new(
                "INSERT INTO event_attendees (publish_event_id, profile_id, status, created_at, updated_at) ",
            );
            builder.push_values(batch, |mut row, profile_id| {
                row.push_bind(publish_event_id)
                    .push_bind(*profile_id)
                    .push_bind(InvitationStatus::Invited)
                    .push_bind(now)
                    .push_bind(now);
            });
            builder.push(" ON CONFLICT (publish_event_id, profile_id) DO NOTHING");

            let result = builder.build().execute(&mut *conn).await?;
            inserted += result.rows_affected();
        }

        Ok(inserted)
    }

    /// Record a youth's answer, creating the row when they were never invited
    pub async fn upsert_response(&self, publish_event_id: i64, profile_id: i64, status: InvitationStatus) -> Result<EventAttendee, PortalError> {
        let now = Utc::now();
        let attendee = sqlx::query_as::<_, EventAttendee>(&format!(
            r#"
            INSERT INTO event_attendees (publish_event_id, profile_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $4)
            ON CONFLICT (publish_event_id, profile_id)
            DO UPDATE SET status = EXCLUDED.status, updated_at = EXCLUDED.updated_at
            RETURNING {ATTENDEE_COLUMNS}
            "#
        ))
        .bind(publish_event_id)
        .bind(profile_id)
        .bind(status)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(attendee)
    }

    pub async fn list_for_event(&self, publish_event_id: i64) -> Result<Vec<EventAttendee>, PortalError> {
        let attendees = sqlx::query_as::<_, EventAttendee>(&format!(
            "SELECT {ATTENDEE_COLUMNS} FROM event_attendees WHERE publish_event_id = $1 ORDER BY id"
        ))
        .bind(publish_event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(attendees)
    }

    pub async fn count_for_event(&self, publish_event_id: i64) -> Result<i64, PortalError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM event_attendees WHERE publish_event_id = $1")
            .bind(publish_event_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
