//! Profile model

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: i64,
    pub account_id: i64,
    pub barangay: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub civil_status: Option<String>,
    pub educational_background: Option<String>,
    pub work_status: Option<String>,
    pub studying_level: Option<String>,
    pub school_name: Option<String>,
    pub pwd: Option<String>,
    pub athlete: Option<String>,
    pub sk_voter: Option<String>,
    pub national_voter: Option<String>,
    pub lgbtqia_member: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Demographic answers submitted when completing or editing a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileFields {
    pub barangay: String,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub gender: Option<String>,
    pub birthdate: Option<NaiveDate>,
    pub civil_status: Option<String>,
    pub educational_background: Option<String>,
    pub work_status: Option<String>,
    pub studying_level: Option<String>,
    pub school_name: Option<String>,
    pub pwd: Option<String>,
    pub athlete: Option<String>,
    pub sk_voter: Option<String>,
    pub national_voter: Option<String>,
    pub lgbtqia_member: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProfileArchive {
    pub id: i64,
    pub profile_id: i64,
    pub archived_by: i64,
    pub reason: Option<String>,
    pub archived_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ArchiveProfileRequest {
    pub reason: Option<String>,
}
