//! Invitation endpoints

use axum::extract::{Path, State};
use axum::Json;

use crate::middleware::{CurrentOfficer, CurrentYouth};
use crate::models::{EventAttendee, RespondInvitationRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn respond(
    State(state): State<AppState>,
    CurrentYouth(account_id): CurrentYouth,
    Json(request): Json<RespondInvitationRequest>,
) -> Result<Json<EventAttendee>> {
    let attendee = state.services.invitation_service.respond(account_id, request).await?;
    Ok(Json(attendee))
}

pub async fn list_for_event(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Path(publish_event_id): Path<i64>,
) -> Result<Json<Vec<EventAttendee>>> {
    let attendees = state
        .services
        .invitation_service
        .list_for_event(&officer, publish_event_id)
        .await?;
    Ok(Json(attendees))
}
