//! Youth responses to event invitations

use serde_json::json;
use tracing::info;

use crate::database::DatabaseService;
use crate::eligibility::{evaluate, EligibilityPolicy};
use crate::models::{AuditEntry, EventAttendee, RespondInvitationRequest};
use crate::services::audit::SharedAuditSink;
use crate::services::auth::OfficerContext;
use crate::services::profiles::ProfileService;
use crate::utils::errors::{PortalError, Result};

#[derive(Clone)]
pub struct InvitationService {
    db: DatabaseService,
    profiles: ProfileService,
    audit: SharedAuditSink,
    policy: EligibilityPolicy,
}

impl InvitationService {
    pub fn new(db: DatabaseService, profiles: ProfileService, audit: SharedAuditSink, policy: EligibilityPolicy) -> Self {
        Self { db, profiles, audit, policy }
    }

    /// Confirm, decline or tentatively accept an invitation
    pub async fn respond(&self, account_id: i64, request: RespondInvitationRequest) -> Result<EventAttendee> {
        let publish_event_id = request.publish_event_id;
        if !request.status.is_response() {
            return Err(PortalError::InvalidInput(
                "status must be one of attending, declined or maybe".to_string(),
            ));
        }

        let account = self
            .db
            .accounts
            .find_by_id(account_id)
            .await?
            .ok_or(PortalError::AccountNotFound { account_id })?;
        if !account.is_verified {
            return Err(PortalError::PermissionDenied("account must be verified to respond to invitations".to_string()));
        }

        let youth = self
            .profiles
            .demographics_today(account_id)
            .await?
            .ok_or(PortalError::ProfileNotFound { account_id })?;

        let published = self
            .db
            .published_events
            .find_by_id(publish_event_id)
            .await?
            .ok_or(PortalError::PublishedEventNotFound { publish_event_id })?;

        let eligibility = evaluate(
            &published.selected_tags,
            &youth.tags,
            published.needs_volunteers(),
            youth.is_volunteer(),
            self.policy,
        );
        if !eligibility.is_eligible() {
            return Err(PortalError::NotEligible(eligibility.summary()));
        }

        let attendee = self
            .db
            .attendees
            .upsert_response(publish_event_id, youth.profile.id, request.status)
            .await?;

        info!(publish_event_id, account_id, status = ?attendee.status, "Invitation answered");
        self.audit.record(AuditEntry::youth(
            account_id,
            "respond_invitation",
            "event_attendee",
            Some(attendee.id),
            json!({ "publish_event_id": publish_event_id, "status": attendee.status }),
        ));
        Ok(attendee)
    }

    pub async fn list_for_event(&self, officer: &OfficerContext, publish_event_id: i64) -> Result<Vec<EventAttendee>> {
        let published = self
            .db
            .published_events
            .find_by_id(publish_event_id)
            .await?
            .ok_or(PortalError::PublishedEventNotFound { publish_event_id })?;
        officer.ensure_can_manage(&published.barangay)?;

        self.db.attendees.list_for_event(publish_event_id).await
    }
}
