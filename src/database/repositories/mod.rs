//! Database repositories module
//!
//! This module contains all repository implementations for data access

pub mod account;
pub mod attendee;
pub mod audit;
pub mod event;
pub mod profile;
pub mod published_event;
pub mod registration;

// Re-export repositories
pub use account::AccountRepository;
pub use attendee::AttendeeRepository;
pub use audit::AuditRepository;
pub use event::EventRepository;
pub use profile::ProfileRepository;
pub use published_event::{NewPublishedEvent, PublishedEventRepository};
pub use registration::RegistrationRepository;
