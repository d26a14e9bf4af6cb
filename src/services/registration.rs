//! Event registration
//!
//! A registration is checked and written in one transaction, failing fast on
//! the first violated rule. Eligibility is evaluated from the live profile and
//! does not depend on whether the youth was invited.

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::debug;

use crate::database::DatabaseService;
use crate::eligibility::{evaluate, extract_demographics, EligibilityPolicy};
use crate::models::{
    AttendeeType, AuditEntry, NewRegistration, RegisterAttendeeRequest, RegisteredAttendee,
    RegistrationOutcome, YesNo,
};
use crate::services::audit::SharedAuditSink;
use crate::services::auth::OfficerContext;
use crate::utils::errors::{PortalError, Result};
use crate::utils::helpers::require_text;
use crate::utils::logging::log_registration;

#[derive(Clone)]
pub struct RegistrationService {
    db: DatabaseService,
    audit: SharedAuditSink,
    policy: EligibilityPolicy,
}

impl RegistrationService {
    pub fn new(db: DatabaseService, audit: SharedAuditSink, policy: EligibilityPolicy) -> Self {
        Self { db, audit, policy }
    }

    pub async fn register(&self, account_id: i64, request: RegisterAttendeeRequest) -> Result<RegistrationOutcome> {
        self.register_on(account_id, request, Utc::now().date_naive()).await
    }

    /// Register `account_id` with ages computed as of `today`
    pub async fn register_on(&self, account_id: i64, request: RegisterAttendeeRequest, today: NaiveDate) -> Result<RegistrationOutcome> {
        let new = validate_request(account_id, request)?;
        let publish_event_id = new.publish_event_id;
        let attendee_type = new.attendee_type;

        let result = self.register_in_transaction(new, today).await;
        match &result {
            Ok(outcome) => {
                log_registration(publish_event_id, account_id, attendee_type.as_str(), "registered");
                self.audit.record(AuditEntry::youth(
                    account_id,
                    "register_for_event",
                    "registered_attendee",
                    Some(outcome.registration.id),
                    json!({ "publish_event_id": publish_event_id, "attendee_type": attendee_type }),
                ));
            }
            Err(e) => log_registration(publish_event_id, account_id, attendee_type.as_str(), &e.to_string()),
        }
        result
    }

    async fn register_in_transaction(&self, new: NewRegistration, today: NaiveDate) -> Result<RegistrationOutcome> {
        let (publish_event_id, account_id) = (new.publish_event_id, new.account_id);

        let mut tx = self.db.begin().await?;

        let published = self
            .db
            .published_events
            .find_by_id_in(&mut tx, publish_event_id)
            .await?
            .ok_or(PortalError::PublishedEventNotFound { publish_event_id })?;

        check_attendee_type(published.needs_volunteers(), new.attendee_type)?;

        if self.db.registrations.exists_in(&mut tx, publish_event_id, account_id).await? {
            return Err(PortalError::AlreadyRegistered { publish_event_id, account_id });
        }

        let account = self
            .db
            .accounts
            .find_by_id_in(&mut tx, account_id)
            .await?
            .ok_or(PortalError::AccountNotFound { account_id })?;

        match new.attendee_type {
            AttendeeType::Volunteer => {
                if !account.is_volunteer.is_yes() {
                    return Err(PortalError::NotEligible(
                        "only accounts registered as volunteers may sign up as volunteers".to_string(),
                    ));
                }
            }
            AttendeeType::Participant => {
                let profile = self
                    .db
                    .profiles
                    .find_active_by_account_in(&mut tx, account_id)
                    .await?
                    .ok_or(PortalError::ProfileNotFound { account_id })?;

                let tags = extract_demographics(&profile, today);
                let eligibility = evaluate(&published.selected_tags, &tags, false, account.is_volunteer.is_yes(), self.policy);
                debug!(publish_event_id, account_id, outcome = %eligibility.summary(), "Eligibility evaluated");
                if !eligibility.is_eligible() {
                    return Err(PortalError::NotEligible(eligibility.summary()));
                }
            }
        }

        let registration = self.db.registrations.insert_in(&mut tx, new).await?;
        let counts = self.db.registrations.counts_in(&mut tx, publish_event_id).await?;
        tx.commit().await?;

        Ok(RegistrationOutcome { registration, counts })
    }

    /// Registrations for an event, for the officers of its barangay
    pub async fn list_for_event(&self, officer: &OfficerContext, publish_event_id: i64) -> Result<Vec<RegisteredAttendee>> {
        let published = self
            .db
            .published_events
            .find_by_id(publish_event_id)
            .await?
            .ok_or(PortalError::PublishedEventNotFound { publish_event_id })?;
        officer.ensure_can_manage(&published.barangay)?;

        self.db.registrations.list_for_event(publish_event_id).await
    }

    pub async fn mark_attendance(&self, officer: &OfficerContext, registration_id: i64, attended: YesNo) -> Result<RegisteredAttendee> {
        let registration = self
            .db
            .registrations
            .find_by_id(registration_id)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("registration {registration_id}")))?;
        let published = self
            .db
            .published_events
            .find_by_id(registration.publish_event_id)
            .await?
            .ok_or(PortalError::PublishedEventNotFound { publish_event_id: registration.publish_event_id })?;
        officer.ensure_can_manage(&published.barangay)?;

        let updated = self
            .db
            .registrations
            .set_attended(registration_id, attended)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("registration {registration_id}")))?;

        self.audit.record(AuditEntry::officer(
            officer,
            "mark_attendance",
            "registered_attendee",
            Some(registration_id),
            json!({ "attended": attended }),
        ));
        Ok(updated)
    }
}

/// Field checks that need no database access
pub fn validate_request(account_id: i64, request: RegisterAttendeeRequest) -> Result<NewRegistration> {
    if let Some(claimed) = request.account_id {
        if claimed != account_id {
            return Err(PortalError::PermissionDenied("cannot register on behalf of another account".to_string()));
        }
    }

    require_text("first_name", &request.first_name)?;
    require_text("last_name", &request.last_name)?;
    require_text("barangay", &request.barangay)?;
    let attendee_type: AttendeeType = request.attendee_type.parse().map_err(PortalError::InvalidInput)?;

    Ok(NewRegistration {
        publish_event_id: request.publish_event_id,
        account_id,
        attendee_type,
        first_name: request.first_name.trim().to_string(),
        middle_name: request.middle_name.map(|m| m.trim().to_string()).filter(|m| !m.is_empty()),
        last_name: request.last_name.trim().to_string(),
        barangay: request.barangay.trim().to_string(),
    })
}

/// Volunteer events take volunteers only; other events take participants only
pub fn check_attendee_type(event_needs_volunteers: bool, attendee_type: AttendeeType) -> Result<()> {
    match (event_needs_volunteers, attendee_type) {
        (true, AttendeeType::Volunteer) | (false, AttendeeType::Participant) => Ok(()),
        (false, AttendeeType::Volunteer) => Err(PortalError::NotEligible(
            "this event is not accepting volunteers".to_string(),
        )),
        (true, AttendeeType::Participant) => Err(PortalError::NotEligible(
            "this event is open to volunteers only".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn request() -> RegisterAttendeeRequest {
        RegisterAttendeeRequest {
            publish_event_id: 10,
            account_id: Some(5),
            first_name: " Juan ".into(),
            middle_name: Some("  ".into()),
            last_name: "Dela Cruz".into(),
            barangay: "Poblacion".into(),
            attendee_type: "Participant".into(),
        }
    }

    #[test]
    fn valid_request_is_normalised() {
        let new = validate_request(5, request()).unwrap();
        assert_eq!(new.first_name, "Juan");
        assert_eq!(new.middle_name, None);
        assert_eq!(new.attendee_type, AttendeeType::Participant);
    }

    #[test]
    fn missing_names_are_rejected() {
        let req = RegisterAttendeeRequest { last_name: String::new(), ..request() };
        assert_matches!(validate_request(5, req), Err(PortalError::InvalidInput(msg)) if msg.contains("last_name"));
    }

    #[test]
    fn unknown_attendee_type_is_rejected() {
        let req = RegisterAttendeeRequest { attendee_type: "guest".into(), ..request() };
        assert_matches!(validate_request(5, req), Err(PortalError::InvalidInput(_)));
    }

    #[test]
    fn cannot_register_someone_else() {
        assert_matches!(validate_request(6, request()), Err(PortalError::PermissionDenied(_)));
    }

    #[test]
    fn omitted_account_id_uses_caller() {
        let req = RegisterAttendeeRequest { account_id: None, ..request() };
        assert_eq!(validate_request(8, req).unwrap().account_id, 8);
    }

    #[test]
    fn attendee_type_must_fit_event() {
        assert!(check_attendee_type(true, AttendeeType::Volunteer).is_ok());
        assert!(check_attendee_type(false, AttendeeType::Participant).is_ok());
        assert_matches!(check_attendee_type(false, AttendeeType::Volunteer), Err(PortalError::NotEligible(_)));
        assert_matches!(check_attendee_type(true, AttendeeType::Participant), Err(PortalError::NotEligible(_)));
    }
}
