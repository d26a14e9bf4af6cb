//! Test data builders
//!
//! Accounts, profiles and events inserted through the crate's own
//! repositories, with generated names.

use std::sync::Arc;

use chrono::{Months, NaiveDate, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use uuid::Uuid;

use sk_portal::config::Settings;
use sk_portal::models::{
    Account, CreateAccountRequest, CreateEventRequest, Event, EventStatus, Profile, ProfileFields,
    RegisterAttendeeRequest, YesNo,
};
use sk_portal::services::{MemoryAuditSink, OfficerContext, ServiceFactory};

use super::TestDatabase;

pub const BARANGAY: &str = "Poblacion";
pub const OTHER_BARANGAY: &str = "San Isidro";

pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Birthdate giving `age` completed years today
pub fn birthdate_for_age(age: u32) -> NaiveDate {
    today()
        .checked_sub_months(Months::new(age * 12 + 1))
        .expect("valid birthdate")
}

pub fn officer() -> OfficerContext {
    OfficerContext::federasyon(900)
}

pub fn test_settings() -> Settings {
    let mut settings = Settings::default();
    settings.auth.jwt_secret = "integration-test-secret-0123456789abcdef".to_string();
    settings
}

pub fn services(db: &TestDatabase) -> (ServiceFactory, Arc<MemoryAuditSink>) {
    let audit = Arc::new(MemoryAuditSink::new());
    let services = ServiceFactory::new(&test_settings(), db.service(), audit.clone());
    (services, audit)
}

/// Profile answers for a youth of the given age with every flag set to "No"
pub fn profile_fields(age: u32, gender: &str) -> ProfileFields {
    ProfileFields {
        barangay: BARANGAY.to_string(),
        first_name: FirstName().fake(),
        last_name: LastName().fake(),
        gender: Some(gender.to_string()),
        birthdate: Some(birthdate_for_age(age)),
        civil_status: Some("Single".to_string()),
        educational_background: Some("High School Grad".to_string()),
        work_status: Some("Unemployed".to_string()),
        studying_level: Some("Not Studying".to_string()),
        school_name: None,
        pwd: Some("No".to_string()),
        athlete: Some("No".to_string()),
        sk_voter: Some("No".to_string()),
        national_voter: Some("No".to_string()),
        lgbtqia_member: Some("No".to_string()),
        ..Default::default()
    }
}

pub async fn create_account(db: &TestDatabase, volunteer: bool) -> Account {
    let email: String = SafeEmail().fake();
    let account = db
        .service()
        .accounts
        .create(CreateAccountRequest {
            email: format!("{}-{email}", Uuid::new_v4().simple()),
            first_name: FirstName().fake(),
            middle_name: None,
            last_name: LastName().fake(),
            barangay: BARANGAY.to_string(),
            is_verified: true,
        })
        .await
        .expect("create account");

    if volunteer {
        db.service()
            .accounts
            .set_volunteer_status(account.id, YesNo::Yes)
            .await
            .expect("set volunteer")
            .expect("account exists")
    } else {
        account
    }
}

pub async fn create_profile(db: &TestDatabase, account_id: i64, fields: ProfileFields) -> Profile {
    let mut conn = db.pool.acquire().await.expect("acquire connection");
    db.service()
        .profiles
        .create_in(&mut conn, account_id, fields)
        .await
        .expect("create profile")
}

pub async fn create_event(db: &TestDatabase, barangay: &str) -> Event {
    db.service()
        .events
        .create(
            CreateEventRequest {
                name: "Youth Leadership Summit".to_string(),
                description: Some("Annual summit".to_string()),
                location: Some("Covered Court".to_string()),
                starts_at: Utc::now() + chrono::Duration::days(14),
                ends_at: None,
                status: EventStatus::Upcoming,
                barangay: None,
            },
            barangay.to_string(),
            officer().officer_id,
        )
        .await
        .expect("create event")
}

pub fn registration(publish_event_id: i64, account: &Account, attendee_type: &str) -> RegisterAttendeeRequest {
    RegisterAttendeeRequest {
        publish_event_id,
        account_id: Some(account.id),
        first_name: account.first_name.clone(),
        middle_name: None,
        last_name: account.last_name.clone(),
        barangay: account.barangay.clone(),
        attendee_type: attendee_type.to_string(),
    }
}
