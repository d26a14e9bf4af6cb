//! Invited attendee model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct EventAttendee {
    pub id: i64,
    pub publish_event_id: i64,
    pub profile_id: i64,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "text", rename_all = "lowercase")]
pub enum InvitationStatus {
    Invited,
    Attending,
    Declined,
    Maybe,
}

impl InvitationStatus {
    /// Statuses a youth may answer an invitation with
    pub fn is_response(self) -> bool {
        !matches!(self, InvitationStatus::Invited)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RespondInvitationRequest {
    pub publish_event_id: i64,
    pub status: InvitationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_status_but_invited_is_a_response() {
        assert!(InvitationStatus::Attending.is_response());
        assert!(InvitationStatus::Declined.is_response());
        assert!(InvitationStatus::Maybe.is_response());
        assert!(!InvitationStatus::Invited.is_response());
    }

    #[test]
    fn statuses_use_lowercase_names() {
        let status: InvitationStatus = serde_json::from_str("\"maybe\"").unwrap();
        assert_eq!(status, InvitationStatus::Maybe);
    }
}
