//! Profile endpoints

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

use crate::middleware::{CurrentOfficer, CurrentYouth};
use crate::models::{ArchiveProfileRequest, Profile, ProfileArchive, ProfileFields};
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn create(
    State(state): State<AppState>,
    CurrentYouth(account_id): CurrentYouth,
    Json(fields): Json<ProfileFields>,
) -> Result<(StatusCode, Json<Profile>)> {
    let profile = state.services.profile_service.create(account_id, fields).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

pub async fn show_mine(
    State(state): State<AppState>,
    CurrentYouth(account_id): CurrentYouth,
) -> Result<Json<Profile>> {
    Ok(Json(state.services.profile_service.get_active(account_id).await?))
}

pub async fn update_mine(
    State(state): State<AppState>,
    CurrentYouth(account_id): CurrentYouth,
    Json(fields): Json<ProfileFields>,
) -> Result<Json<Profile>> {
    let profile = state.services.profile_service.update_active(account_id, fields).await?;
    Ok(Json(profile))
}

pub async fn archive(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Path(profile_id): Path<i64>,
    body: Option<Json<ArchiveProfileRequest>>,
) -> Result<(StatusCode, Json<ProfileArchive>)> {
    let reason = body.and_then(|Json(request)| request.reason);
    let archive = state.services.profile_service.archive(&officer, profile_id, reason).await?;
    Ok((StatusCode::CREATED, Json(archive)))
}
