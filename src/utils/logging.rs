//! Logging configuration and setup
//!
//! This module provides logging initialization and structured logging utilities
//! for the portal.

use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, Layer};

use crate::config::LoggingConfig;
use crate::utils::errors::{PortalError, Result};

/// Initialize logging based on configuration.
///
/// The returned guard flushes the file writer on drop and must live as long as the process.
pub fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .map_err(|e| PortalError::Config(format!("invalid log filter: {e}")))?;

    let stdout_layer = if config.json {
        tracing_subscriber::fmt::layer().json().with_writer(std::io::stdout).boxed()
    } else {
        tracing_subscriber::fmt::layer().with_writer(std::io::stdout).boxed()
    };

    let (file_layer, guard) = if config.file_path.is_empty() {
        (None, None)
    } else {
        let file_appender = tracing_appender::rolling::daily(&config.file_path, "sk-portal.log");
        let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
        let layer = tracing_subscriber::fmt::layer()
            .with_ansi(false)
            .with_writer(non_blocking);
        (Some(layer), Some(guard))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(stdout_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| PortalError::Config(format!("logging already initialised: {e}")))?;

    info!("Logging initialized with level: {}", config.level);
    Ok(guard)
}

/// Log a registration attempt outcome
pub fn log_registration(publish_event_id: i64, account_id: i64, attendee_type: &str, outcome: &str) {
    info!(
        publish_event_id = publish_event_id,
        account_id = account_id,
        attendee_type = attendee_type,
        outcome = outcome,
        "Registration processed"
    );
}

/// Log an event publication and its invitation fan-out
pub fn log_publication(publish_event_id: i64, event_id: i64, officer_id: i64, invited: u64) {
    info!(
        publish_event_id = publish_event_id,
        event_id = event_id,
        officer_id = officer_id,
        invited = invited,
        "Event published"
    );
}

/// Log officer actions on administrative records
pub fn log_officer_action(officer_id: i64, action: &str, target: Option<&str>, details: Option<&str>) {
    warn!(
        officer_id = officer_id,
        action = action,
        target = target,
        details = details,
        "Officer action performed"
    );
}
