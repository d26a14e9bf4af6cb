//! Published event model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;

use super::common::{EventStatus, YesNo};
use crate::eligibility::{ProfileFilters, TagSet};

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublishedEvent {
    pub id: i64,
    pub event_id: i64,
    pub selected_tags: Json<TagSet>,
    pub need_volunteers: YesNo,
    pub status: EventStatus,
    pub event_type: String,
    pub barangay: String,
    pub description: Option<String>,
    pub published_by: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PublishedEvent {
    pub fn needs_volunteers(&self) -> bool {
        self.need_volunteers.is_yes()
    }
}

/// Listing row with derived counts for the requesting youth
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct PublishedEventSummary {
    pub id: i64,
    pub event_id: i64,
    pub event_name: String,
    pub location: Option<String>,
    pub starts_at: DateTime<Utc>,
    pub selected_tags: Json<TagSet>,
    pub need_volunteers: YesNo,
    pub status: EventStatus,
    pub event_type: String,
    pub barangay: String,
    pub description: Option<String>,
    pub attendees_count: i64,
    pub participants_count: i64,
    pub volunteers_count: i64,
    #[serde(rename = "isRegistered")]
    pub is_registered: bool,
    #[sqlx(skip)]
    #[serde(rename = "isEligible", skip_serializing_if = "Option::is_none")]
    pub is_eligible: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PublishEventRequest {
    pub event_id: i64,
    #[serde(default)]
    pub selected_tags: TagSet,
    #[serde(default)]
    pub filters: ProfileFilters,
    #[serde(default)]
    pub need_volunteers: YesNo,
    /// Defaults to the base event's barangay
    pub barangay: Option<String>,
    pub description: Option<String>,
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdatePublishedEventRequest {
    pub selected_tags: Option<TagSet>,
    pub need_volunteers: Option<YesNo>,
    pub description: Option<String>,
    pub status: Option<EventStatus>,
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PublishedEventCreated {
    pub published_event: PublishedEvent,
    pub attendees_count: i64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PublishedEventQuery {
    pub barangay: Option<String>,
    /// Viewer to report registration and eligibility for; honoured for officers only
    pub user_id: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CountMatchingRequest {
    #[serde(default)]
    pub demographics: TagSet,
    #[serde(default)]
    pub filters: ProfileFilters,
    #[serde(default)]
    pub need_volunteers: YesNo,
    pub barangay: Option<String>,
}
