//! Shared application state handed to every request handler

use std::sync::Arc;

use crate::config::Settings;
use crate::database::DatabaseService;
use crate::middleware::rate_limit::RegistrationRateLimiter;
use crate::services::{SharedAuditSink, ServiceFactory};
use crate::utils::errors::Result;

#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub db: DatabaseService,
    pub services: ServiceFactory,
    /// Absent when rate limiting is switched off
    pub registration_limiter: Option<Arc<RegistrationRateLimiter>>,
}

impl AppState {
    pub fn new(settings: Settings, db: DatabaseService) -> Result<Self> {
        let audit = ServiceFactory::audit_sink(&settings, &db);
        Self::with_audit_sink(settings, db, audit)
    }

    pub fn with_audit_sink(settings: Settings, db: DatabaseService, audit: SharedAuditSink) -> Result<Self> {
        let services = ServiceFactory::new(&settings, db.clone(), audit);
        let registration_limiter = if settings.features.rate_limiting {
            Some(Arc::new(RegistrationRateLimiter::new(&settings.rate_limit)?))
        } else {
            None
        };

        Ok(Self {
            settings: Arc::new(settings),
            db,
            services,
            registration_limiter,
        })
    }
}
