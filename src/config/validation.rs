//! Configuration validation module
//!
//! This module provides validation functions for application configuration
//! to ensure all required settings are properly configured.

use super::Settings;
use crate::utils::errors::{PortalError, Result};

/// Validate all configuration settings
pub fn validate_settings(settings: &Settings) -> Result<()> {
    validate_server_config(&settings.server)?;
    validate_database_config(&settings.database)?;
    validate_auth_config(&settings.auth)?;
    validate_logging_config(&settings.logging)?;
    validate_publication_config(&settings.publication)?;

    if settings.features.rate_limiting {
        validate_rate_limit_config(&settings.rate_limit)?;
    }

    Ok(())
}

fn validate_server_config(config: &super::ServerConfig) -> Result<()> {
    if config.host.is_empty() {
        return Err(PortalError::Config("Server host is required".to_string()));
    }

    config.socket_addr()?;
    Ok(())
}

/// Validate database configuration
fn validate_database_config(config: &super::DatabaseConfig) -> Result<()> {
    if config.url.is_empty() {
        return Err(PortalError::Config("Database URL is required".to_string()));
    }

    if config.max_connections == 0 {
        return Err(PortalError::Config(
            "Max connections must be greater than 0".to_string(),
        ));
    }

    if config.min_connections > config.max_connections {
        return Err(PortalError::Config(
            "Min connections cannot be greater than max connections".to_string(),
        ));
    }

    Ok(())
}

fn validate_auth_config(config: &super::AuthConfig) -> Result<()> {
    if config.jwt_secret.len() < 32 {
        return Err(PortalError::Config(
            "JWT secret must be at least 32 characters".to_string(),
        ));
    }

    if config.token_ttl_minutes <= 0 {
        return Err(PortalError::Config(
            "Token TTL must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

/// Validate logging configuration
fn validate_logging_config(config: &super::LoggingConfig) -> Result<()> {
    if config.level.is_empty() {
        return Err(PortalError::Config("Log level is required".to_string()));
    }

    let valid_levels = ["trace", "debug", "info", "warn", "error"];
    if !valid_levels.contains(&config.level.as_str()) {
        return Err(PortalError::Config(format!(
            "Invalid log level: {}. Valid levels: {:?}",
            config.level, valid_levels
        )));
    }

    Ok(())
}

fn validate_publication_config(config: &super::PublicationConfig) -> Result<()> {
    // Postgres caps bind parameters at 65535; each invite row binds 5.
    if config.invite_batch_size == 0 || config.invite_batch_size > 10_000 {
        return Err(PortalError::Config(
            "Invite batch size must be between 1 and 10000".to_string(),
        ));
    }

    Ok(())
}

fn validate_rate_limit_config(config: &super::RateLimitConfig) -> Result<()> {
    if config.registrations_per_minute == 0 {
        return Err(PortalError::Config(
            "Registrations per minute must be greater than 0".to_string(),
        ));
    }

    if config.burst == 0 {
        return Err(PortalError::Config(
            "Rate limit burst must be greater than 0".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.auth.jwt_secret = "0123456789abcdef0123456789abcdef".to_string();
        settings
    }

    #[test]
    fn default_settings_with_secret_are_valid() {
        assert!(validate_settings(&valid_settings()).is_ok());
    }

    #[test]
    fn short_jwt_secret_is_rejected() {
        let mut settings = valid_settings();
        settings.auth.jwt_secret = "short".to_string();
        assert_matches!(validate_settings(&settings), Err(PortalError::Config(_)));
    }

    #[test]
    fn min_connections_above_max_is_rejected() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert_matches!(validate_settings(&settings), Err(PortalError::Config(_)));
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let mut settings = valid_settings();
        settings.logging.level = "verbose".to_string();
        assert_matches!(validate_settings(&settings), Err(PortalError::Config(_)));
    }

    #[test]
    fn oversized_invite_batch_is_rejected() {
        let mut settings = valid_settings();
        settings.publication.invite_batch_size = 50_000;
        assert_matches!(validate_settings(&settings), Err(PortalError::Config(_)));
    }

    #[test]
    fn rate_limit_is_only_checked_when_enabled() {
        let mut settings = valid_settings();
        settings.rate_limit.registrations_per_minute = 0;
        assert!(validate_settings(&settings).is_err());

        settings.features.rate_limiting = false;
        assert!(validate_settings(&settings).is_ok());
    }
}
