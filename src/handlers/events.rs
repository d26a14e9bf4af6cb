//! Base event endpoints

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;

use crate::middleware::CurrentOfficer;
use crate::models::{CreateEventRequest, Event, UpdateEventRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

#[derive(Debug, Default, Deserialize)]
pub struct EventListQuery {
    pub barangay: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Json(request): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>)> {
    let event = state.services.event_service.create(&officer, request).await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Query(query): Query<EventListQuery>,
) -> Result<Json<Vec<Event>>> {
    let events = state
        .services
        .event_service
        .list(&officer, query.barangay.as_deref())
        .await?;
    Ok(Json(events))
}

pub async fn show(
    State(state): State<AppState>,
    CurrentOfficer(_officer): CurrentOfficer,
    Path(id): Path<i64>,
) -> Result<Json<Event>> {
    Ok(Json(state.services.event_service.get(id).await?))
}

pub async fn update(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Path(id): Path<i64>,
    Json(request): Json<UpdateEventRequest>,
) -> Result<Json<Event>> {
    let event = state.services.event_service.update(&officer, id, request).await?;
    Ok(Json(event))
}

pub async fn remove(
    State(state): State<AppState>,
    CurrentOfficer(officer): CurrentOfficer,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    state.services.event_service.delete(&officer, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
