//! HTTP handlers module
//!
//! Routes are grouped by resource:
//! - Publication, listing and dry-run counts of published events
//! - Registrations and attendance
//! - Invitation responses
//! - Base events, profiles and volunteer status

pub mod accounts;
pub mod attendees;
pub mod events;
pub mod health;
pub mod profiles;
pub mod publish_events;
pub mod registrations;

use axum::middleware::from_fn;
use axum::routing::{get, patch, post, put};
use axum::Router;

use crate::middleware::request_logging;
use crate::state::AppState;

/// Full application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health))
        .nest("/api", api_routes())
        .layer(from_fn(request_logging))
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/publish-events",
            post(publish_events::publish).get(publish_events::list),
        )
        .route(
            "/publish-events/count-matching-profiles",
            get(publish_events::count_matching_profiles).post(publish_events::count_matching_profiles),
        )
        .route(
            "/publish-events/:id",
            get(publish_events::show)
                .put(publish_events::update)
                .delete(publish_events::remove),
        )
        .route(
            "/publish-events/:id/registered-attendees",
            get(registrations::list_for_event),
        )
        .route("/publish-events/:id/attendees", get(attendees::list_for_event))
        .route("/registered-attendees", post(registrations::register))
        .route(
            "/registered-attendees/:id/attendance",
            patch(registrations::mark_attendance),
        )
        .route("/event-attendees", post(attendees::respond))
        .route("/events", post(events::create).get(events::list))
        .route(
            "/events/:id",
            get(events::show).put(events::update).delete(events::remove),
        )
        .route("/profiles", post(profiles::create))
        .route("/profiles/me", get(profiles::show_mine).put(profiles::update_mine))
        .route("/profiles/:id/archive", post(profiles::archive))
        .route("/accounts/me/volunteer", put(accounts::set_volunteer_status))
}
