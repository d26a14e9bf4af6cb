//! Services module
//!
//! This module contains business logic services

pub mod audit;
pub mod auth;
pub mod events;
pub mod invitation;
pub mod profiles;
pub mod publication;
pub mod registration;

// Re-export commonly used services
pub use audit::{AuditSink, DatabaseAuditSink, MemoryAuditSink, NoopAuditSink, SharedAuditSink};
pub use auth::{AuthService, Claims, OfficerContext, Principal, PrincipalKind, SkRole};
pub use events::EventService;
pub use invitation::InvitationService;
pub use profiles::{ProfileService, YouthDemographics};
pub use publication::PublicationService;
pub use registration::RegistrationService;

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::eligibility::EligibilityPolicy;

/// Service factory for creating and managing all services
#[derive(Clone)]
pub struct ServiceFactory {
    pub auth_service: AuthService,
    pub event_service: EventService,
    pub profile_service: ProfileService,
    pub publication_service: PublicationService,
    pub registration_service: RegistrationService,
    pub invitation_service: InvitationService,
}

impl ServiceFactory {
    /// Create all services over one database handle
    pub fn new(settings: &Settings, db: DatabaseService, audit: SharedAuditSink) -> Self {
        let policy = EligibilityPolicy::from(&settings.eligibility);
        let profile_service = ProfileService::new(db.clone(), audit.clone());

        Self {
            auth_service: AuthService::new(&settings.auth),
            event_service: EventService::new(db.clone(), audit.clone()),
            publication_service: PublicationService::new(
                db.clone(),
                audit.clone(),
                policy,
                settings.publication.invite_batch_size,
            ),
            registration_service: RegistrationService::new(db.clone(), audit.clone(), policy),
            invitation_service: InvitationService::new(db, profile_service.clone(), audit, policy),
            profile_service,
        }
    }

    /// Audit sink matching the feature switch
    pub fn audit_sink(settings: &Settings, db: &DatabaseService) -> SharedAuditSink {
        if settings.features.audit_log {
            Arc::new(DatabaseAuditSink::new(db.audit.clone()))
        } else {
            Arc::new(NoopAuditSink)
        }
    }
}
