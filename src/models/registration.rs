//! Registered attendee model

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::common::YesNo;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RegisteredAttendee {
    pub id: i64,
    pub publish_event_id: i64,
    pub account_id: i64,
    pub attendee_type: AttendeeType,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub barangay: String,
    pub attended: YesNo,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum AttendeeType {
    Participant,
    Volunteer,
}

impl AttendeeType {
    pub fn as_str(self) -> &'static str {
        match self {
            AttendeeType::Participant => "participant",
            AttendeeType::Volunteer => "volunteer",
        }
    }
}

impl fmt::Display for AttendeeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AttendeeType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "participant" => Ok(AttendeeType::Participant),
            "volunteer" => Ok(AttendeeType::Volunteer),
            other => Err(format!("attendee_type must be participant or volunteer, got '{other}'")),
        }
    }
}

/// Registration form as submitted by the youth
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterAttendeeRequest {
    pub publish_event_id: i64,
    /// Must match the authenticated account when present
    pub account_id: Option<i64>,
    #[serde(default)]
    pub first_name: String,
    pub middle_name: Option<String>,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub barangay: String,
    #[serde(default)]
    pub attendee_type: String,
}

/// Validated insert for the registered_attendees table
#[derive(Debug, Clone)]
pub struct NewRegistration {
    pub publish_event_id: i64,
    pub account_id: i64,
    pub attendee_type: AttendeeType,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub barangay: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationCounts {
    pub participants_count: i64,
    pub volunteers_count: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegistrationOutcome {
    pub registration: RegisteredAttendee,
    #[serde(flatten)]
    pub counts: RegistrationCounts,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceUpdate {
    pub attended: YesNo,
}
