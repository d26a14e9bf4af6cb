//! Middleware module
//!
//! This module contains middleware for request processing

pub mod auth;
pub mod logging;
pub mod rate_limit;

// Re-export commonly used middleware
pub use auth::{CurrentOfficer, CurrentYouth, MaybePrincipal};
pub use logging::{request_logging, RequestId, REQUEST_ID_HEADER};
pub use rate_limit::RegistrationRateLimiter;
