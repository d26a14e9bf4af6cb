//! Event publication and invitation fan-out
//!
//! Publishing inserts the published event and its invited attendee rows in a
//! single transaction. Invitees are either the volunteer roster or the
//! profiles matched by the demographic query.

use serde_json::json;
use tracing::{debug, info};

use crate::database::{DatabaseService, NewPublishedEvent};
use crate::eligibility::{evaluate, EligibilityPolicy, MatchCriteria};
use crate::models::{
    AuditEntry, CountMatchingRequest, PublishEventRequest, PublishedEvent, PublishedEventCreated,
    PublishedEventSummary, UpdatePublishedEventRequest,
};
use crate::services::audit::SharedAuditSink;
use crate::services::auth::OfficerContext;
use crate::services::profiles::YouthDemographics;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::non_blank;
use crate::utils::logging::log_publication;

const DEFAULT_EVENT_TYPE: &str = "program";

#[derive(Clone)]
pub struct PublicationService {
    db: DatabaseService,
    audit: SharedAuditSink,
    policy: EligibilityPolicy,
    invite_batch_size: usize,
}

impl PublicationService {
    pub fn new(db: DatabaseService, audit: SharedAuditSink, policy: EligibilityPolicy, invite_batch_size: usize) -> Self {
        Self { db, audit, policy, invite_batch_size }
    }

    /// Publish a base event once and invite everyone it targets
    pub async fn publish(&self, officer: &OfficerContext, request: PublishEventRequest) -> Result<PublishedEventCreated> {
        let event_id = request.event_id;
        let event = self
            .db
            .events
            .find_by_id(event_id)
            .await?
            .ok_or(PortalError::EventNotFound { event_id })?;

        let requested_barangay = non_blank(request.barangay.as_deref()).map(str::to_string);
        let barangay = requested_barangay.clone().unwrap_or_else(|| event.barangay.clone());
        officer.ensure_can_manage(&barangay)?;

        // Early answer for the common case; the unique index settles races.
        if self.db.published_events.exists_for_event(event_id).await? {
            return Err(PortalError::AlreadyPublished { event_id });
        }

        let scope = requested_barangay.or_else(|| officer.station_scope().map(str::to_string));
        let criteria = if request.need_volunteers.is_yes() {
            MatchCriteria::volunteer_roster(scope)
        } else {
            MatchCriteria::demographic(request.selected_tags.clone(), request.filters.clone(), scope)
        };

        let new = NewPublishedEvent {
            event_id,
            selected_tags: request.selected_tags,
            need_volunteers: request.need_volunteers,
            status: event.status,
            event_type: non_blank(request.event_type.as_deref()).unwrap_or(DEFAULT_EVENT_TYPE).to_string(),
            barangay,
            description: request.description.or(event.description),
            published_by: officer.officer_id,
        };

        let mut tx = self.db.begin().await?;
        let published_event = self.db.published_events.insert_in(&mut tx, new).await?;
        let profile_ids = self.db.profiles.matching_ids_in(&mut tx, &criteria).await?;
        debug!(publish_event_id = published_event.id, matched = profile_ids.len(), "Invitees resolved");
        let invited = self
            .db
            .attendees
            .invite_in(&mut tx, published_event.id, &profile_ids, self.invite_batch_size)
            .await?;
        tx.commit().await?;

        log_publication(published_event.id, event_id, officer.officer_id, invited);
        self.audit.record(AuditEntry::officer(
            officer,
            "publish_event",
            "published_event",
            Some(published_event.id),
            json!({ "event_id": event_id, "invited": invited, "need_volunteers": published_event.need_volunteers }),
        ));

        Ok(PublishedEventCreated {
            published_event,
            attendees_count: invited as i64,
        })
    }

    /// Dry run of the invitee query
    pub async fn count_matching(&self, officer: &OfficerContext, request: CountMatchingRequest) -> Result<i64> {
        let requested = non_blank(request.barangay.as_deref()).map(str::to_string);
        if let Some(barangay) = requested.as_deref() {
            officer.ensure_can_manage(barangay)?;
        }
        let scope = requested.or_else(|| officer.station_scope().map(str::to_string));

        let criteria = if request.need_volunteers.is_yes() {
            MatchCriteria::volunteer_roster(scope)
        } else {
            MatchCriteria::demographic(request.demographics, request.filters, scope)
        };
        self.db.profiles.count_matching(&criteria).await
    }

    pub async fn get(&self, id: i64) -> Result<PublishedEvent> {
        self.db
            .published_events
            .find_by_id(id)
            .await?
            .ok_or(PortalError::PublishedEventNotFound { publish_event_id: id })
    }

    pub async fn update(&self, officer: &OfficerContext, id: i64, request: UpdatePublishedEventRequest) -> Result<PublishedEvent> {
        let existing = self.get(id).await?;
        officer.ensure_can_manage(&existing.barangay)?;

        let updated = self
            .db
            .published_events
            .update(id, request)
            .await?
            .ok_or(PortalError::PublishedEventNotFound { publish_event_id: id })?;

        info!(publish_event_id = id, officer_id = officer.officer_id, "Published event updated");
        self.audit.record(AuditEntry::officer(officer, "update_published_event", "published_event", Some(id), json!({})));
        Ok(updated)
    }

    pub async fn delete(&self, officer: &OfficerContext, id: i64) -> Result<()> {
        let existing = self.get(id).await?;
        officer.ensure_can_manage(&existing.barangay)?;

        self.db.published_events.delete(id).await?;
        info!(publish_event_id = id, officer_id = officer.officer_id, "Published event deleted");
        self.audit.record(AuditEntry::officer(
            officer,
            "delete_published_event",
            "published_event",
            Some(id),
            json!({ "event_id": existing.event_id }),
        ));
        Ok(())
    }

    /// Listing with counts; registration and eligibility flags when a viewer is known
    pub async fn list(&self, barangay: Option<&str>, viewer: Option<&YouthDemographics>) -> Result<Vec<PublishedEventSummary>> {
        let account_id = viewer.map(|v| v.account.id);
        let mut summaries = self
            .db
            .published_events
            .list_summaries(non_blank(barangay), account_id)
            .await?;

        if let Some(viewer) = viewer {
            for summary in &mut summaries {
                summary.is_eligible = Some(self.viewer_eligible(summary, viewer));
            }
        }
        Ok(summaries)
    }

    pub async fn find_summary(&self, id: i64, viewer: Option<&YouthDemographics>) -> Result<PublishedEventSummary> {
        let mut summary = self
            .db
            .published_events
            .find_summary(id, viewer.map(|v| v.account.id))
            .await?
            .ok_or(PortalError::PublishedEventNotFound { publish_event_id: id })?;

        if let Some(viewer) = viewer {
            summary.is_eligible = Some(self.viewer_eligible(&summary, viewer));
        }
        Ok(summary)
    }

    fn viewer_eligible(&self, summary: &PublishedEventSummary, viewer: &YouthDemographics) -> bool {
        evaluate(
            &summary.selected_tags,
            &viewer.tags,
            summary.need_volunteers.is_yes(),
            viewer.is_volunteer(),
            self.policy,
        )
        .is_eligible()
    }
}

