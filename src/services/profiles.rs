//! Youth profile lifecycle and volunteer status

use chrono::{NaiveDate, Utc};
use serde_json::json;
use tracing::info;

use crate::database::DatabaseService;
use crate::eligibility::{extract_demographics, TagSet};
use crate::models::{Account, AuditEntry, Profile, ProfileArchive, ProfileFields, YesNo};
use crate::services::audit::SharedAuditSink;
use crate::services::auth::OfficerContext;
use crate::utils::errors::{is_unique_violation, PortalError, Result};
use crate::utils::helpers::require_text;
use crate::utils::logging::log_officer_action;

/// Demographic view of an account used for eligibility checks
#[derive(Debug, Clone)]
pub struct YouthDemographics {
    pub account: Account,
    pub profile: Profile,
    pub tags: TagSet,
}

impl YouthDemographics {
    pub fn is_volunteer(&self) -> bool {
        self.account.is_volunteer.is_yes()
    }
}

#[derive(Clone)]
pub struct ProfileService {
    db: DatabaseService,
    audit: SharedAuditSink,
}

impl ProfileService {
    pub fn new(db: DatabaseService, audit: SharedAuditSink) -> Self {
        Self { db, audit }
    }

    /// Complete a profile; an account holds at most one active profile
    pub async fn create(&self, account_id: i64, fields: ProfileFields) -> Result<Profile> {
        validate_fields(&fields)?;

        let mut tx = self.db.begin().await?;
        // Serializes concurrent creates for the same account.
        if self.db.accounts.lock_in(&mut tx, account_id).await?.is_none() {
            return Err(PortalError::AccountNotFound { account_id });
        }
        if self.db.profiles.find_active_by_account_in(&mut tx, account_id).await?.is_some() {
            return Err(PortalError::Conflict("an active profile already exists for this account".to_string()));
        }
        let profile = self.db.profiles.create_in(&mut tx, account_id, fields).await?;
        tx.commit().await?;

        info!(account_id = account_id, profile_id = profile.id, "Profile created");
        self.audit.record(AuditEntry::youth(account_id, "create_profile", "profile", Some(profile.id), json!({})));
        Ok(profile)
    }

    pub async fn get_active(&self, account_id: i64) -> Result<Profile> {
        self.db
            .profiles
            .find_active_by_account(account_id)
            .await?
            .ok_or(PortalError::ProfileNotFound { account_id })
    }

    pub async fn update_active(&self, account_id: i64, fields: ProfileFields) -> Result<Profile> {
        validate_fields(&fields)?;
        let existing = self.get_active(account_id).await?;
        let profile = self.db.profiles.update(existing.id, fields).await?;
        self.audit.record(AuditEntry::youth(account_id, "update_profile", "profile", Some(profile.id), json!({})));
        Ok(profile)
    }

    /// Soft-archive a profile; archived profiles drop out of matching
    pub async fn archive(&self, officer: &OfficerContext, profile_id: i64, reason: Option<String>) -> Result<ProfileArchive> {
        let profile = self
            .db
            .profiles
            .find_by_id(profile_id)
            .await?
            .ok_or_else(|| PortalError::NotFound(format!("profile {profile_id}")))?;
        officer.ensure_can_manage(&profile.barangay)?;

        let archive = match self.db.profiles.archive(profile_id, officer.officer_id, reason.clone()).await {
            Ok(archive) => archive,
            Err(PortalError::Database(e)) if is_unique_violation(&e) => {
                return Err(PortalError::Conflict(format!("profile {profile_id} is already archived")));
            }
            Err(e) => return Err(e),
        };

        log_officer_action(officer.officer_id, "archive_profile", Some(&profile_id.to_string()), reason.as_deref());
        self.audit.record(AuditEntry::officer(officer, "archive_profile", "profile", Some(profile_id), json!({ "reason": reason })));
        Ok(archive)
    }

    pub async fn set_volunteer_status(&self, account_id: i64, is_volunteer: YesNo) -> Result<Account> {
        let account = self
            .db
            .accounts
            .set_volunteer_status(account_id, is_volunteer)
            .await?
            .ok_or(PortalError::AccountNotFound { account_id })?;

        info!(account_id = account_id, is_volunteer = account.is_volunteer.is_yes(), "Volunteer status changed");
        self.audit.record(AuditEntry::youth(account_id, "set_volunteer_status", "account", Some(account_id), json!({ "is_volunteer": is_volunteer })));
        Ok(account)
    }

    /// Account, active profile and derived tags; `None` when either is missing
    pub async fn demographics(&self, account_id: i64, today: NaiveDate) -> Result<Option<YouthDemographics>> {
        let Some(account) = self.db.accounts.find_by_id(account_id).await? else {
            return Ok(None);
        };
        let Some(profile) = self.db.profiles.find_active_by_account(account_id).await? else {
            return Ok(None);
        };
        let tags = extract_demographics(&profile, today);
        Ok(Some(YouthDemographics { account, profile, tags }))
    }

    pub async fn demographics_today(&self, account_id: i64) -> Result<Option<YouthDemographics>> {
        self.demographics(account_id, Utc::now().date_naive()).await
    }
}

fn validate_fields(fields: &ProfileFields) -> Result<()> {
    require_text("first_name", &fields.first_name)?;
    require_text("last_name", &fields.last_name)?;
    require_text("barangay", &fields.barangay)?;
    if let Some(birthdate) = fields.birthdate {
        if birthdate > Utc::now().date_naive() {
            return Err(PortalError::InvalidInput("birthdate must not be in the future".to_string()));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn profile_fields_need_names_and_barangay() {
        let fields = ProfileFields {
            first_name: "Ana".into(),
            last_name: "Reyes".into(),
            barangay: " ".into(),
            ..Default::default()
        };
        assert_matches!(validate_fields(&fields), Err(PortalError::InvalidInput(msg)) if msg.contains("barangay"));
    }

    #[test]
    fn future_birthdate_is_rejected() {
        let fields = ProfileFields {
            first_name: "Ana".into(),
            last_name: "Reyes".into(),
            barangay: "Poblacion".into(),
            birthdate: Some(Utc::now().date_naive() + chrono::Duration::days(2)),
            ..Default::default()
        };
        assert!(validate_fields(&fields).is_err());
    }
}
