//! SK Youth Portal
//!
//! Backend for a Sangguniang Kabataan youth portal. The core of the crate is
//! event eligibility: deriving demographic tags from youth profiles, matching
//! them against the tags an event targets, inviting matching youth when an
//! event is published and recording registrations.

pub mod config;
pub mod database;
pub mod eligibility;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod services;
pub mod state;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use utils::errors::{PortalError, Result};

// Re-export main components for easy access
pub use database::DatabaseService;
pub use handlers::build_router;
pub use services::ServiceFactory;
pub use state::AppState;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Get library information
pub fn info() -> String {
    format!("{} v{}", NAME, VERSION)
}
