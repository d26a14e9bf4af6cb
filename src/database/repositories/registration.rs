//! Registered attendee repository implementation

use chrono::Utc;
use sqlx::{PgConnection, PgPool};

use crate::models::registration::{NewRegistration, RegisteredAttendee, RegistrationCounts};
use crate::models::YesNo;
use crate::utils::errors::{is_unique_violation, PortalError};

const REGISTRATION_COLUMNS: &str = "id, publish_event_id, account_id, attendee_type, first_name, middle_name, last_name, barangay, attended, created_at";

const COUNTS_QUERY: &str = r#"
    SELECT
        COUNT(*) FILTER (WHERE attendee_type = 'participant') AS participants,
        COUNT(*) FILTER (WHERE attendee_type = 'volunteer') AS volunteers
    FROM registered_attendees
    WHERE publish_event_id = $1
"#;

#[derive(Clone, Debug)]
pub struct RegistrationRepository {
    pool: PgPool,
}

impl RegistrationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn exists_in(&self, conn: &mut PgConnection, publish_event_id: i64, account_id: i64) -> Result<bool, PortalError> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM registered_attendees WHERE publish_event_id = $1 AND account_id = $2)",
        )
        .bind(publish_event_id)
        .bind(account_id)
        .fetch_one(conn)
        .await?;

        Ok(exists)
    }

    /// Insert a registration; the unique index turns a lost race into `AlreadyRegistered`
    pub async fn insert_in(&self, conn: &mut PgConnection, new: NewRegistration) -> Result<RegisteredAttendee, PortalError> {
        let (publish_event_id, account_id) = (new.publish_event_id, new.account_id);
        let inserted = sqlx::query_as::<_, RegisteredAttendee>(&format!(
            r#"
            INSERT INTO registered_attendees (publish_event_id, account_id, attendee_type, first_name, middle_name, last_name, barangay, attended, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING {REGISTRATION_COLUMNS}
            "#
        ))
        .bind(new.publish_event_id)
        .bind(new.account_id)
        .bind(new.attendee_type)
        .bind(new.first_name)
        .bind(new.middle_name)
        .bind(new.last_name)
        .bind(new.barangay)
        .bind(YesNo::No)
        .bind(Utc::now())
        .fetch_one(conn)
        .await;

        match inserted {
            Ok(registration) => Ok(registration),
            Err(e) if is_unique_violation(&e) => Err(PortalError::AlreadyRegistered { publish_event_id, account_id }),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn counts_in(&self, conn: &mut PgConnection, publish_event_id: i64) -> Result<RegistrationCounts, PortalError> {
        let (participants, volunteers): (i64, i64) = sqlx::query_as(COUNTS_QUERY)
            .bind(publish_event_id)
            .fetch_one(conn)
            .await?;

        Ok(RegistrationCounts {
            participants_count: participants,
            volunteers_count: volunteers,
        })
    }

    pub async fn counts(&self, publish_event_id: i64) -> Result<RegistrationCounts, PortalError> {
        let mut conn = self.pool.acquire().await?;
        self.counts_in(&mut conn, publish_event_id).await
    }

    pub async fn list_for_event(&self, publish_event_id: i64) -> Result<Vec<RegisteredAttendee>, PortalError> {
        let registrations = sqlx::query_as::<_, RegisteredAttendee>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registered_attendees WHERE publish_event_id = $1 ORDER BY attendee_type, id"
        ))
        .bind(publish_event_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(registrations)
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<RegisteredAttendee>, PortalError> {
        let registration = sqlx::query_as::<_, RegisteredAttendee>(&format!(
            "SELECT {REGISTRATION_COLUMNS} FROM registered_attendees WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }

    /// Mark whether the registrant showed up
    pub async fn set_attended(&self, id: i64, attended: YesNo) -> Result<Option<RegisteredAttendee>, PortalError> {
        let registration = sqlx::query_as::<_, RegisteredAttendee>(&format!(
            "UPDATE registered_attendees SET attended = $2 WHERE id = $1 RETURNING {REGISTRATION_COLUMNS}"
        ))
        .bind(id)
        .bind(attended)
        .fetch_optional(&self.pool)
        .await?;

        Ok(registration)
    }
}
