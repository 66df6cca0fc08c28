//! Application configuration
//!
//! Sources, later ones overriding earlier ones:
//!
//! 1. Built-in defaults
//! 2. `config.toml` in the working directory (optional), or an explicit file
//! 3. Environment variables prefixed with `WAYPOINT_`, nested with `__`
//!    (e.g. `WAYPOINT_ROUTING__DIRECTIONS__API_KEY`)

mod routing;

use std::path::Path;

use application::RouteCacheConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub use routing::RoutingConfig;

use crate::telemetry::TelemetryConfig;

const ENV_PREFIX: &str = "WAYPOINT";

/// Error while loading or validating configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A source could not be read or did not match the schema
    #[error("Failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),

    /// The configuration was read but is not usable
    #[error("Invalid configuration: {0}")]
    Invalid(String),

    /// A routing backend client could not be built from its settings
    #[error("Failed to initialize routing backend: {0}")]
    Backend(#[from] integration_routing::RoutingError),
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Routing backends
    #[serde(default)]
    pub routing: RoutingConfig,

    /// Leg memoization
    #[serde(default)]
    pub cache: RouteCacheConfig,

    /// Logging
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from file and environment
    ///
    /// With `path` set the file must exist; otherwise `config.toml` in the
    /// working directory is used when present.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let file = match path {
            Some(path) => config::File::from(path).required(true),
            None => config::File::with_name("config").required(false),
        };

        let builder = config::Config::builder().add_source(file).add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        Self::from_builder(builder)
    }

    /// Load configuration from a TOML document, without environment overrides
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        let builder = config::Config::builder()
            .add_source(config::File::from_str(toml, config::FileFormat::Toml));
        Self::from_builder(builder)
    }

    fn from_builder(
        builder: config::ConfigBuilder<config::builder::DefaultState>,
    ) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        config.validate()?;
        debug!(?config, "Configuration loaded");
        Ok(config)
    }

    /// Validate all sections
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.routing.validate().map_err(ConfigError::Invalid)?;
        if self.cache.max_entries == 0 {
            return Err(ConfigError::Invalid(
                "cache.max_entries must be greater than 0".to_string(),
            ));
        }
        self.telemetry
            .validate()
            .map_err(|e| ConfigError::Invalid(format!("telemetry: {e}")))
    }
}
