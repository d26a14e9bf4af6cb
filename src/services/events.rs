//! Base event management for SK officers

use serde_json::json;
use tracing::info;

use crate::database::DatabaseService;
use crate::models::{AuditEntry, CreateEventRequest, Event, UpdateEventRequest};
use crate::services::audit::SharedAuditSink;
use crate::services::auth::OfficerContext;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::{non_blank, require_text};
use crate::utils::logging::log_officer_action;

#[derive(Clone)]
pub struct EventService {
    db: DatabaseService,
    audit: SharedAuditSink,
}

impl EventService {
    pub fn new(db: DatabaseService, audit: SharedAuditSink) -> Self {
        Self { db, audit }
    }

    /// Create a base event, defaulting its barangay to the officer's station
    pub async fn create(&self, officer: &OfficerContext, request: CreateEventRequest) -> Result<Event> {
        require_text("name", &request.name)?;
        let barangay = non_blank(request.barangay.as_deref())
            .or(officer.station.as_deref())
            .map(str::to_string)
            .ok_or_else(|| PortalError::InvalidInput("barangay is required".to_string()))?;
        officer.ensure_can_manage(&barangay)?;

        if let Some(ends_at) = request.ends_at {
            if ends_at < request.starts_at {
                return Err(PortalError::InvalidInput("ends_at must not be before starts_at".to_string()));
            }
        }

        let event = self.db.events.create(request, barangay, officer.officer_id).await?;
        info!(event_id = event.id, officer_id = officer.officer_id, barangay = %event.barangay, "Event created");
        self.audit.record(AuditEntry::officer(officer, "create_event", "event", Some(event.id), json!({ "name": event.name })));
        Ok(event)
    }

    pub async fn get(&self, id: i64) -> Result<Event> {
        self.db
            .events
            .find_by_id(id)
            .await?
            .ok_or(PortalError::EventNotFound { event_id: id })
    }

    /// Events visible to the officer; station-bound officers only see their own barangay
    pub async fn list(&self, officer: &OfficerContext, barangay: Option<&str>) -> Result<Vec<Event>> {
        let scope = match (officer.station_scope(), non_blank(barangay)) {
            (Some(station), _) => Some(station),
            (None, requested) => requested,
        };
        self.db.events.list(scope).await
    }

    pub async fn update(&self, officer: &OfficerContext, id: i64, request: UpdateEventRequest) -> Result<Event> {
        let existing = self.get(id).await?;
        officer.ensure_can_manage(&existing.barangay)?;
        if let Some(name) = request.name.as_deref() {
            require_text("name", name)?;
        }

        let event = self.db.events.update(id, request).await?;
        self.audit.record(AuditEntry::officer(officer, "update_event", "event", Some(id), json!({})));
        Ok(event)
    }

    pub async fn delete(&self, officer: &OfficerContext, id: i64) -> Result<()> {
        let existing = self.get(id).await?;
        officer.ensure_can_manage(&existing.barangay)?;

        self.db.events.delete(id).await?;
        log_officer_action(officer.officer_id, "delete_event", Some(&id.to_string()), Some(&existing.name));
        self.audit.record(AuditEntry::officer(officer, "delete_event", "event", Some(id), json!({ "name": existing.name })));
        Ok(())
    }
}
