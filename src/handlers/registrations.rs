//! Registration and attendance endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::middleware::{CurrentOfficer, CurrentYouth};
use crate::models::{AttendanceUpdate, RegisterAttendeeRequest, RegisteredAttendee, RegistrationOutcome};
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn register(
    State(state): State<AppState>,
    CurrentYouth(account_id): CurrentYouth,
    Json(request): Json<RegisterAttendeeRequest>,
) -> Result<(StatusCode, Json<RegistrationOutcome>)> {
    if let Some(limiter) = &state.registration_limiter {
        limiter.check(account_id)?;
    }

    let outcome = state.services.registration_service.register(account_id, request).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

pub async fn list_for_event(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Path(publish_event_id): Path<i64>,
) -> Result<Json<Vec<RegisteredAttendee>>> {
    let registrations = state
        .services
        .registration_service
        .list_for_event(&officer, publish_event_id)
        .await?;
    Ok(Json(registrations))
}

pub async fn mark_attendance(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Path(registration_id): Path<i64>,
    Json(update): Json<AttendanceUpdate>,
) -> Result<Json<RegisteredAttendee>> {
    let registration = state
        .services
        .registration_service
        .mark_attendance(&officer, registration_id, update.attended)
        .await?;
    Ok(Json(registration))
}
