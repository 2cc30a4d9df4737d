//! Configuration management for the tool runner.
//!
//! This module provides a centralized configuration structure that is
//! populated from environment variables (and a `.env` file) over defaults.

use super::error::{Error, Result};
use super::transport::TransportConfig;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::info;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server identification, reported by `initialize`.
    pub server: ServerConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Plugin discovery configuration.
    pub plugins: PluginsConfig,

    /// Transport used by `--mcp-server`.
    pub transport: TransportConfig,
}

/// Server identification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// The name of the server as reported to clients.
    pub name: String,

    /// The version of the server.
    pub version: String,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "warn", "info", "debug").
    pub level: String,

    /// Whether to include timestamps in log output.
    pub with_timestamps: bool,
}

/// Plugin discovery configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginsConfig {
    /// Directory scanned for plugin executables. Builtins only when unset.
    pub directory: Option<PathBuf>,

    /// How long a plugin may take to answer `--describe`.
    pub describe_timeout_secs: u64,
}

impl Default for PluginsConfig {
    fn default() -> Self {
        Self {
            directory: None,
            describe_timeout_secs: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                name: env!("CARGO_PKG_NAME").to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
            logging: LoggingConfig {
                level: "warn".to_string(),
                with_timestamps: true,
            },
            plugins: PluginsConfig::default(),
            transport: TransportConfig::default(),
        }
    }
}

impl Config {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables.
    ///
    /// Environment variables are prefixed with `TOOLBELT_`, for example
    /// `TOOLBELT_LOG_LEVEL` or `TOOLBELT_PLUGIN_DIR`.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let mut config = Self::default();

        if let Ok(name) = std::env::var("TOOLBELT_SERVER_NAME") {
            config.server.name = name;
        }

        if let Ok(level) = std::env::var("TOOLBELT_LOG_LEVEL") {
            config.logging.level = level;
        }

        if let Ok(timestamps) = std::env::var("TOOLBELT_LOG_TIMESTAMPS") {
            config.logging.with_timestamps =
                !matches!(timestamps.to_lowercase().as_str(), "false" | "0" | "no" | "off");
        }

        if let Ok(directory) = std::env::var("TOOLBELT_PLUGIN_DIR") {
            if !directory.is_empty() {
                config.plugins.directory = Some(PathBuf::from(directory));
                info!("Plugin directory set to {:?}", config.plugins.directory);
            }
        }

        if let Some(timeout) = parse_env::<u64>("TOOLBELT_PLUGIN_TIMEOUT_SECS")? {
            config.plugins.describe_timeout_secs = timeout;
        }

        // Load transport configuration from environment
        config.transport = TransportConfig::from_env()?;

        Ok(config)
    }
}

/// Read and parse an optional environment variable.
pub(crate) fn parse_env<T: std::str::FromStr>(key: &str) -> Result<Option<T>> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| Error::config(format!("{key} has an invalid value: '{raw}'"))),
        Err(_) => Ok(None),
    }
}

// Mutex to ensure env var tests run serially
#[cfg(test)]
pub(crate) static ENV_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());
