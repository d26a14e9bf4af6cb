//! Application settings management
//!
//! This module defines the configuration structure and provides methods
//! for loading settings from TOML files and environment variables.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Main application configuration structure
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub logging: LoggingConfig,
    pub eligibility: EligibilityConfig,
    pub publication: PublicationConfig,
    pub rate_limit: RateLimitConfig,
    pub features: FeaturesConfig,
}

/// HTTP listener configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl ServerConfig {
    pub fn socket_addr(&self) -> Result<SocketAddr, crate::utils::errors::PortalError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| crate::utils::errors::PortalError::Config(format!("invalid listen address: {e}")))
    }
}

/// Database configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_seconds: u64,
}

/// Bearer token configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub token_ttl_minutes: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    /// Directory for the daily rolling log file; empty disables file output
    pub file_path: String,
    pub json: bool,
}

/// Eligibility matching policy
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EligibilityConfig {
    /// Volunteers pass the demographic check on events that do not need volunteers
    pub volunteers_bypass_demographics: bool,
}

/// Publication fan-out configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PublicationConfig {
    pub invite_batch_size: usize,
}

/// Registration rate limiting
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RateLimitConfig {
    pub registrations_per_minute: u32,
    pub burst: u32,
}

/// Feature flags configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeaturesConfig {
    pub audit_log: bool,
    pub rate_limiting: bool,
}

impl Settings {
    /// Load settings from configuration file and environment variables
    pub fn new() -> Result<Self, config::ConfigError> {
        Self::load(config::File::with_name("config").required(false))
    }

    /// Load settings from an explicit file, still honouring environment overrides
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, config::ConfigError> {
        Self::load(config::File::from(path.as_ref()).required(true))
    }

    fn load<S>(file: S) -> Result<Self, config::ConfigError>
    where
        S: config::Source + Send + Sync + 'static,
    {
        let settings = config::Config::builder()
            .add_source(config::Config::try_from(&Settings::default())?)
            .add_source(file)
            .add_source(config::Environment::with_prefix("SKPORTAL").separator("__"))
            .build()?;

        settings.try_deserialize()
    }

    /// Validate configuration settings
    pub fn validate(&self) -> Result<(), crate::utils::errors::PortalError> {
        super::validation::validate_settings(self)
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgresql://localhost/sk_portal".to_string(),
                max_connections: 10,
                min_connections: 1,
                acquire_timeout_seconds: 30,
            },
            auth: AuthConfig {
                jwt_secret: String::new(),
                token_ttl_minutes: 120,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file_path: String::new(),
                json: false,
            },
            eligibility: EligibilityConfig::default(),
            publication: PublicationConfig {
                invite_batch_size: 500,
            },
            rate_limit: RateLimitConfig {
                registrations_per_minute: 10,
                burst: 5,
            },
            features: FeaturesConfig {
                audit_log: true,
                rate_limiting: true,
            },
        }
    }
}
