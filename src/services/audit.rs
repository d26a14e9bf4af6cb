//! Best-effort audit trail
//!
//! Services hand entries to an injected sink. Writes happen outside the
//! business transaction and a failed write is only logged.

use std::sync::{Arc, Mutex};

use serde_json::Value;
use tracing::{debug, warn};

use crate::database::AuditRepository;
use crate::models::AuditEntry;
use crate::services::auth::OfficerContext;

pub trait AuditSink: Send + Sync {
    fn record(&self, entry: AuditEntry);
}

pub type SharedAuditSink = Arc<dyn AuditSink>;

impl AuditEntry {
    pub fn officer(officer: &OfficerContext, action: &str, subject_type: &str, subject_id: Option<i64>, details: Value) -> Self {
        Self {
            actor_id: officer.officer_id,
            actor_kind: format!("officer:{}", officer.role),
            action: action.to_string(),
            subject_type: subject_type.to_string(),
            subject_id,
            details,
        }
    }

    pub fn youth(account_id: i64, action: &str, subject_type: &str, subject_id: Option<i64>, details: Value) -> Self {
        Self {
            actor_id: account_id,
            actor_kind: "youth".to_string(),
            action: action.to_string(),
            subject_type: subject_type.to_string(),
            subject_id,
            details,
        }
    }
}

/// Writes entries to `audit_logs` on a detached task
#[derive(Clone)]
pub struct DatabaseAuditSink {
    repository: AuditRepository,
}

impl DatabaseAuditSink {
    pub fn new(repository: AuditRepository) -> Self {
        Self { repository }
    }
}

impl AuditSink for DatabaseAuditSink {
    fn record(&self, entry: AuditEntry) {
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            warn!(action = %entry.action, "No runtime available, audit entry dropped");
            return;
        };

        let repository = self.repository.clone();
        handle.spawn(async move {
            let action = entry.action.clone();
            if let Err(e) = repository.insert(entry).await {
                warn!(action = %action, error = %e, "Failed to write audit entry");
            }
        });
    }
}

/// Discards entries; used when the audit log feature is off
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl AuditSink for NoopAuditSink {
    fn record(&self, entry: AuditEntry) {
        debug!(action = %entry.action, "Audit disabled, entry skipped");
    }
}

/// Keeps entries in memory
#[derive(Debug, Default)]
pub struct MemoryAuditSink {
    entries: Mutex<Vec<AuditEntry>>,
}

impl MemoryAuditSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<AuditEntry> {
        self.entries.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl AuditSink for MemoryAuditSink {
    fn record(&self, entry: AuditEntry) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.push(entry);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::auth::SkRole;
    use serde_json::json;

    #[test]
    fn memory_sink_keeps_entries_in_order() {
        let sink = MemoryAuditSink::new();
        let officer = OfficerContext::stationed(9, SkRole::Kagawad, "Poblacion");
        sink.record(AuditEntry::officer(&officer, "publish_event", "published_event", Some(1), json!({})));
        sink.record(AuditEntry::youth(4, "register", "registered_attendee", Some(2), json!({"type": "participant"})));

        let entries = sink.entries();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].actor_kind, "officer:kagawad");
        assert_eq!(entries[1].actor_id, 4);
    }

    #[test]
    fn noop_sink_accepts_entries() {
        NoopAuditSink.record(AuditEntry::youth(1, "noop", "none", None, json!(null)));
    }
}
