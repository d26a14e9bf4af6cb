//! Audit log model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AuditLog {
    pub id: i64,
    pub actor_id: i64,
    pub actor_kind: String,
    pub action: String,
    pub subject_type: String,
    pub subject_id: Option<i64>,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Entry handed to the audit sink
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
    pub actor_id: i64,
    pub actor_kind: String,
    pub action: String,
    pub subject_type: String,
    pub subject_id: Option<i64>,
    pub details: serde_json::Value,
}
