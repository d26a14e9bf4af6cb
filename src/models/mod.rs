//! Data models module
//!
//! This module contains all data structures used throughout the application

pub mod account;
pub mod attendee;
pub mod audit;
pub mod common;
pub mod event;
pub mod profile;
pub mod published_event;
pub mod registration;

// Re-export commonly used models
pub use account::{Account, CreateAccountRequest, UpdateVolunteerStatusRequest};
pub use attendee::{EventAttendee, InvitationStatus, RespondInvitationRequest};
pub use audit::{AuditEntry, AuditLog};
pub use common::{EventStatus, YesNo};
pub use event::{CreateEventRequest, Event, UpdateEventRequest};
pub use profile::{ArchiveProfileRequest, Profile, ProfileArchive, ProfileFields};
pub use published_event::{
    CountMatchingRequest, PublishEventRequest, PublishedEvent, PublishedEventCreated,
    PublishedEventQuery, PublishedEventSummary, UpdatePublishedEventRequest,
};
pub use registration::{
    AttendanceUpdate, AttendeeType, NewRegistration, RegisterAttendeeRequest, RegisteredAttendee,
    RegistrationCounts, RegistrationOutcome,
};
