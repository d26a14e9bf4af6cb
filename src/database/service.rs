//! Database service layer
//!
//! Groups the repositories over one pool and hands out transactions.

use sqlx::{Postgres, Transaction};

use crate::database::{
    AccountRepository, AttendeeRepository, AuditRepository, DatabasePool, EventRepository,
    ProfileRepository, PublishedEventRepository, RegistrationRepository,
};
use crate::utils::errors::PortalError;

#[derive(Debug, Clone)]
pub struct DatabaseService {
    pool: DatabasePool,
    pub accounts: AccountRepository,
    pub profiles: ProfileRepository,
    pub events: EventRepository,
    pub published_events: PublishedEventRepository,
    pub attendees: AttendeeRepository,
    pub registrations: RegistrationRepository,
    pub audit: AuditRepository,
}

impl DatabaseService {
    pub fn new(pool: DatabasePool) -> Self {
        Self {
            accounts: AccountRepository::new(pool.clone()),
            profiles: ProfileRepository::new(pool.clone()),
            events: EventRepository::new(pool.clone()),
            published_events: PublishedEventRepository::new(pool.clone()),
            attendees: AttendeeRepository::new(pool.clone()),
            registrations: RegistrationRepository::new(pool.clone()),
            audit: AuditRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &DatabasePool {
        &self.pool
    }

    /// Start a transaction; dropping it without commit rolls back
    pub async fn begin(&self) -> Result<Transaction<'static, Postgres>, PortalError> {
        Ok(self.pool.begin().await?)
    }
}
