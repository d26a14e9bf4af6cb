use axum::extract::State;
use axum::Json;

use crate::middleware::CurrentYouth;
use crate::models::{Account, UpdateVolunteerStatusRequest};
use crate::state::AppState;
use crate::utils::errors::Result;

/// Toggle whether the youth is on the volunteer roster
pub async fn set_volunteer_status(
    State(state): State<AppState>,
    CurrentYouth(account_id): CurrentYouth,
    Json(request): Json<UpdateVolunteerStatusRequest>,
) -> Result<Json<Account>> {
    let account = state
        .services
        .profile_service
        .set_volunteer_status(account_id, request.is_volunteer)
        .await?;
    Ok(Json(account))
}
