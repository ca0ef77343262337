//! Configuration management for Kitaverse
//!
//! Defaults, optionally overridden by a TOML file, optionally overridden by
//! `KITAVERSE_*` environment variables.

use crate::core_space::EntryPolicy;
use crate::logging::{LogConfig, LogLevel};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

mod error;

pub use error::ConfigError;

/// Prefix shared by every environment variable the service reads
pub const ENV_PREFIX: &str = "KITAVERSE_";

/// Main application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// HTTP server configuration
    pub server: ServerConfig,

    /// Membership registry configuration
    pub registry: RegistryConfig,

    /// Logging configuration
    pub logging: LogConfig,

    /// Metrics configuration
    pub metrics: MetricsConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server bind address
    pub bind_address: SocketAddr,

    /// How long in-flight requests may run after a shutdown signal
    #[serde(with = "humantime_serde")]
    pub shutdown_timeout: Duration,

    /// Allow cross-origin requests from browser clients
    pub enable_cors: bool,
}

/// Membership registry configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// How entering a Space treats an existing membership
    pub entry_policy: EntryPolicy,
}

/// Metrics configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Install the Prometheus recorder and serve `GET /metrics`
    pub enabled: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 8000)),
            shutdown_timeout: Duration::from_secs(30),
            enable_cors: true,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self { enabled: true }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables follow the pattern: KITAVERSE_<SECTION>_<KEY>
    /// Example: KITAVERSE_SERVER_BIND_ADDRESS=0.0.0.0:8000
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::default();
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;

        let config = Self::from_toml(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        toml::from_str(contents).map_err(|e| ConfigError::ParseError(e.to_string()))
    }

    /// Override fields from the process environment
    pub fn apply_env(&mut self) -> Result<(), ConfigError> {
        let vars: HashMap<String, String> = env::vars()
            .filter(|(key, _)| key.starts_with(ENV_PREFIX))
            .collect();
        self.apply_vars(&vars)
    }

    /// Override fields from a `KITAVERSE_*` variable map
    pub fn apply_vars(&mut self, vars: &HashMap<String, String>) -> Result<(), ConfigError> {
        let get = |key: &str| vars.get(&format!("{}{}", ENV_PREFIX, key));

        // Server config
        if let Some(addr) = get("SERVER_BIND_ADDRESS") {
            self.server.bind_address = addr
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid bind address: {}", e)))?;
        }
        if let Some(timeout) = get("SERVER_SHUTDOWN_TIMEOUT") {
            self.server.shutdown_timeout = humantime_serde::re::humantime::parse_duration(timeout)
                .map_err(|e| {
                    ConfigError::InvalidValue(format!("Invalid shutdown timeout: {}", e))
                })?;
        }
        if let Some(enable_cors) = get("SERVER_ENABLE_CORS") {
            self.server.enable_cors = enable_cors
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid CORS flag: {}", e)))?;
        }

        // Registry config
        if let Some(policy) = get("REGISTRY_ENTRY_POLICY") {
            self.registry.entry_policy = policy.parse().map_err(ConfigError::InvalidValue)?;
        }

        // Logging config
        if let Some(level) = get("LOG_LEVEL") {
            self.logging.level = level
                .parse::<LogLevel>()
                .map_err(|e| ConfigError::InvalidValue(e.to_string()))?;
        }
        if let Some(json) = get("LOG_JSON") {
            self.logging.json_format = json
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid JSON flag: {}", e)))?;
        }

        // Metrics config
        if let Some(enabled) = get("METRICS_ENABLED") {
            self.metrics.enabled = enabled
                .parse()
                .map_err(|e| ConfigError::InvalidValue(format!("Invalid metrics flag: {}", e)))?;
        }

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.shutdown_timeout.is_zero() {
            return Err(ConfigError::ValidationFailed(
                "shutdown_timeout must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Render configuration as TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Save configuration to file
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let contents = self.to_toml()?;

        std::fs::write(path, contents).map_err(|e| ConfigError::FileWriteError(e.to_string()))?;

        Ok(())
    }
}
