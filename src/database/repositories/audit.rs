//! Audit log repository implementation

use chrono::Utc;
use sqlx::PgPool;

use crate::models::audit::{AuditEntry, AuditLog};
use crate::utils::errors::PortalError;

#[derive(Clone, Debug)]
pub struct AuditRepository {
    pool: PgPool,
}

impl AuditRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Append an audit entry
    pub async fn insert(&self, entry: AuditEntry) -> Result<AuditLog, PortalError> {
        let log = sqlx::query_as::<_, AuditLog>(
            r#"
            INSERT INTO audit_logs (actor_id, actor_kind, action, subject_type, subject_id, details, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, actor_id, actor_kind, action, subject_type, subject_id, details, created_at
            "#,
        )
        .bind(entry.actor_id)
        .bind(entry.actor_kind)
        .bind(entry.action)
        .bind(entry.subject_type)
        .bind(entry.subject_id)
        .bind(entry.details)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(log)
    }

    /// Most recent entries for a subject
    pub async fn list_for_subject(&self, subject_type: &str, subject_id: i64) -> Result<Vec<AuditLog>, PortalError> {
        let logs = sqlx::query_as::<_, AuditLog>(
            r#"
            SELECT id, actor_id, actor_kind, action, subject_type, subject_id, details, created_at
            FROM audit_logs
            WHERE subject_type = $1 AND subject_id = $2
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .bind(subject_type)
        .bind(subject_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(logs)
    }
}
