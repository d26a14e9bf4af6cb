//! Publication and registration through the HTTP router against a real database

mod helpers;

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use serial_test::serial;
use tower::ServiceExt;

use helpers::*;
use sk_portal::models::Account;
use sk_portal::services::{AuthService, MemoryAuditSink};
use sk_portal::{build_router, AppState};

fn router(db: &TestDatabase) -> Router {
    let mut settings = test_settings();
    settings.features.rate_limiting = false;
    let state = AppState::with_audit_sink(settings, db.service(), Arc::new(MemoryAuditSink::new()))
        .expect("state");
    build_router(state)
}

fn auth() -> AuthService {
    AuthService::new(&test_settings().auth)
}

fn officer_token() -> String {
    auth().issue_officer_token(&officer()).expect("officer token")
}

fn youth_token(account: &Account) -> String {
    auth().issue_youth_token(account.id).expect("youth token")
}

async fn send(app: &Router, method: &str, uri: &str, token: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    let response: Response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
    (status, body)
}

async fn publish(app: &Router, event_id: i64, tags: &[&str], need_volunteers: &str) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/api/publish-events",
        &officer_token(),
        json!({ "event_id": event_id, "selected_tags": tags, "need_volunteers": need_volunteers }),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["published_event"]["id"].as_i64().expect("published event id")
}

fn registration_body(publish_event_id: i64, account: &Account, attendee_type: &str) -> Value {
    json!({
        "publish_event_id": publish_event_id,
        "account_id": account.id,
        "first_name": account.first_name,
        "last_name": account.last_name,
        "barangay": account.barangay,
        "attendee_type": attendee_type,
    })
}

#[tokio::test]
#[serial]
async fn eligible_participant_gets_created() {
    let db = crate::require_db!();
    let app = router(&db);

    let account = create_account(&db, false).await;
    create_profile(&db, account.id, profile_fields(20, "Male")).await;
    let event = create_event(&db, BARANGAY).await;
    let publish_event_id = publish(&app, event.id, &["Core Youth(18-24 yrs old)"], "no").await;

    let (status, body) = send(
        &app,
        "POST",
        "/api/registered-attendees",
        &youth_token(&account),
        registration_body(publish_event_id, &account, "participant"),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["participants_count"], 1);
    assert_eq!(body["volunteers_count"], 0);
}

#[tokio::test]
#[serial]
async fn missing_required_tag_is_forbidden() {
    let db = crate::require_db!();
    let app = router(&db);

    let account = create_account(&db, false).await;
    create_profile(&db, account.id, profile_fields(20, "Male")).await;
    let event = create_event(&db, BARANGAY).await;
    let publish_event_id = publish(&app, event.id, &["PWD"], "no").await;

    let (status, _) = send(
        &app,
        "POST",
        "/api/registered-attendees",
        &youth_token(&account),
        registration_body(publish_event_id, &account, "participant"),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(db.count_records("registered_attendees").await.unwrap(), 0);
}

#[tokio::test]
#[serial]
async fn volunteer_event_rejects_participants() {
    let db = crate::require_db!();
    let app = router(&db);

    let account = create_account(&db, true).await;
    create_profile(&db, account.id, profile_fields(22, "Female")).await;
    let event = create_event(&db, BARANGAY).await;
    let publish_event_id = publish(&app, event.id, &[], "yes").await;
    let token = youth_token(&account);

    let (status, body) = send(
        &app,
        "POST",
        "/api/registered-attendees",
        &token,
        registration_body(publish_event_id, &account, "volunteer"),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    assert_eq!(body["volunteers_count"], 1);

    let (status, _) = send(
        &app,
        "POST",
        "/api/registered-attendees",
        &token,
        registration_body(publish_event_id, &account, "participant"),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
#[serial]
async fn second_registration_conflicts() {
    let db = crate::require_db!();
    let app = router(&db);

    let account = create_account(&db, false).await;
    create_profile(&db, account.id, profile_fields(19, "Female")).await;
    let event = create_event(&db, BARANGAY).await;
    let publish_event_id = publish(&app, event.id, &[], "no").await;
    let token = youth_token(&account);
    let body = registration_body(publish_event_id, &account, "participant");

    let (first, _) = send(&app, "POST", "/api/registered-attendees", &token, body.clone()).await;
    let (second, _) = send(&app, "POST", "/api/registered-attendees", &token, body).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CONFLICT);
    assert_eq!(db.count_records("registered_attendees").await.unwrap(), 1);
}

#[tokio::test]
#[serial]
async fn count_matching_profiles_answers_get_and_post() {
    let db = crate::require_db!();
    let app = router(&db);

    for (age, gender) in [(17, "Male"), (20, "Female")] {
        let account = create_account(&db, false).await;
        create_profile(&db, account.id, profile_fields(age, gender)).await;
    }
    let body = json!({ "filters": { "gender": { "female": true } }, "barangay": BARANGAY });

    for method in ["GET", "POST"] {
        let (status, response) = send(
            &app,
            method,
            "/api/publish-events/count-matching-profiles",
            &officer_token(),
            body.clone(),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{method}: {response}");
        assert_eq!(response, json!({ "count": 1 }));
    }
}
