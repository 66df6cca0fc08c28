//! Routing backend configuration

use std::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};

fn default_directions_base_url() -> String {
    "https://maps.googleapis.com".to_string()
}

fn default_hiking_base_url() -> String {
    "https://api.openrouteservice.org".to_string()
}

fn default_hiking_profile() -> String {
    "foot-hiking".to_string()
}

fn default_transit_base_url() -> String {
    "https://v6.db.transport.rest".to_string()
}

const fn default_timeout_secs() -> u64 {
    10
}

const fn default_true() -> bool {
    true
}

const fn default_false() -> bool {
    false
}

fn redacted(key: Option<&SecretString>) -> Option<&'static str> {
    key.map(|_| "[REDACTED]")
}

fn validate_common(base_url: &str, timeout_secs: u64) -> Result<(), String> {
    if base_url.is_empty() {
        return Err("base_url must not be empty".to_string());
    }

    if timeout_secs == 0 {
        return Err("timeout_secs must be greater than 0".to_string());
    }

    Ok(())
}

// ==============================
// Directions (driving, bicycling)
// ==============================

/// Configuration for the directions API used for driving and cycling
#[derive(Clone, Serialize, Deserialize)]
pub struct DirectionsConfig {
    /// Whether the backend should be used at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the directions API
    #[serde(default = "default_directions_base_url")]
    pub base_url: String,

    /// API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for DirectionsConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectionsConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for DirectionsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_directions_base_url(),
            api_key: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl DirectionsConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some(SecretString::from("test-directions-key")),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// The API key, if one is configured and non-empty
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_common(&self.base_url, self.timeout_secs)
    }
}

// ==============================
// Hiking (walking)
// ==============================

/// Configuration for the hiking directions API used for walking legs
#[derive(Clone, Serialize, Deserialize)]
pub struct HikingConfig {
    /// Whether the backend should be used at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL of the hiking directions API
    #[serde(default = "default_hiking_base_url")]
    pub base_url: String,

    /// API key (sensitive - uses SecretString)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Routing profile name appended to the directions path
    #[serde(default = "default_hiking_profile")]
    pub profile: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl fmt::Debug for HikingConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HikingConfig")
            .field("enabled", &self.enabled)
            .field("base_url", &self.base_url)
            .field("api_key", &redacted(self.api_key.as_ref()))
            .field("profile", &self.profile)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for HikingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_hiking_base_url(),
            api_key: None,
            profile: default_hiking_profile(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl HikingConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            api_key: Some(SecretString::from("test-hiking-key")),
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// The API key, if one is configured and non-empty
    #[must_use]
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_ref()
            .map(|key| key.expose_secret())
            .filter(|key| !key.is_empty())
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_common(&self.base_url, self.timeout_secs)?;

        if self.profile.is_empty() || self.profile.contains('/') {
            return Err("profile must be a single non-empty path segment".to_string());
        }

        Ok(())
    }
}

// ==============================
// Transit (HAFAS)
// ==============================

/// Configuration for the public transit service (transport.rest / HAFAS)
#[allow(clippy::struct_excessive_bools)] // Configuration needs multiple boolean flags
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransitConfig {
    /// Whether the backend should be used at all
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Base URL for the transport.rest API
    #[serde(default = "default_transit_base_url")]
    pub base_url: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Include bus connections
    #[serde(default = "default_true")]
    pub products_bus: bool,

    /// Include S-Bahn connections
    #[serde(default = "default_true")]
    pub products_suburban: bool,

    /// Include U-Bahn connections
    #[serde(default = "default_true")]
    pub products_subway: bool,

    /// Include tram connections
    #[serde(default = "default_true")]
    pub products_tram: bool,

    /// Include regional train connections (RB/RE)
    #[serde(default = "default_true")]
    pub products_regional: bool,

    /// Include national train connections (IC/EC)
    #[serde(default = "default_false")]
    pub products_national: bool,

    /// Include national express connections (ICE)
    #[serde(default = "default_false")]
    pub products_national_express: bool,
}

impl Default for TransitConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_transit_base_url(),
            timeout_secs: default_timeout_secs(),
            products_bus: true,
            products_suburban: true,
            products_subway: true,
            products_tram: true,
            products_regional: true,
            products_national: false,
            products_national_express: false,
        }
    }
}

impl TransitConfig {
    /// Create a configuration suitable for testing
    #[must_use]
    pub fn for_testing() -> Self {
        Self {
            timeout_secs: 5,
            ..Default::default()
        }
    }

    /// Validate the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> Result<(), String> {
        validate_common(&self.base_url, self.timeout_secs)
    }
}
