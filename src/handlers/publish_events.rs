//! Published event endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde_json::{json, Value};

use crate::middleware::{CurrentOfficer, MaybePrincipal};
use crate::models::{
    CountMatchingRequest, PublishEventRequest, PublishedEvent, PublishedEventCreated,
    PublishedEventQuery, PublishedEventSummary, UpdatePublishedEventRequest,
};
use crate::services::{Principal, YouthDemographics};
use crate::state::AppState;
use crate::utils::errors::Result;

pub async fn publish(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Json(request): Json<PublishEventRequest>,
) -> Result<(StatusCode, Json<PublishedEventCreated>)> {
    let created = state.services.publication_service.publish(&officer, request).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

pub async fn list(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Query(query): Query<PublishedEventQuery>,
) -> Result<Json<Vec<PublishedEventSummary>>> {
    let viewer = resolve_viewer(&state, principal, query.user_id).await?;
    let summaries = state
        .services
        .publication_service
        .list(query.barangay.as_deref(), viewer.as_ref())
        .await?;
    Ok(Json(summaries))
}

pub async fn show(
    State(state): State<AppState>,
    MaybePrincipal(principal): MaybePrincipal,
    Path(id): Path<i64>,
) -> Result<Json<PublishedEventSummary>> {
    let viewer = resolve_viewer(&state, principal, None).await?;
    let summary = state
        .services
        .publication_service
        .find_summary(id, viewer.as_ref())
        .await?;
    Ok(Json(summary))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Path(id): Path<i64>,
    Json(request): Json<UpdatePublishedEventRequest>,
) -> Result<Json<PublishedEvent>> {
    let updated = state.services.publication_service.update(&officer, id, request).await?;
    Ok(Json(updated))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.services.publication_service.delete(&officer, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn count_matching_profiles(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Json(request): Json<CountMatchingRequest>,
) -> Result<Json<Value>> {
    let count = state.services.publication_service.count_matching(&officer, request).await?;
    Ok(Json(json!({ "count": count })))
}

/// Youth see their own flags; officers may ask on behalf of `user_id`
async fn resolve_viewer(
    state: &AppState,
    principal: Option<Principal>,
    requested_user: Option<i64>,
) -> Result<Option<YouthDemographics>> {
    let account_id = match principal {
        Some(Principal::Youth { account_id }) => Some(account_id),
        Some(Principal::Officer(_)) => requested_user,
        None => None,
    };

    match account_id {
        Some(account_id) => state.services.profile_service.demographics_today(account_id).await,
        None => Ok(None),
    }
}
