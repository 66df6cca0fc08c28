//! Routing backend configuration

use integration_routing::{DirectionsConfig, HikingConfig, TransitConfig};
use serde::{Deserialize, Serialize};

use crate::adapters::CircuitBreakerConfig;

/// Settings for all routing backends
///
/// Every backend is optional: a disabled or unconfigured backend leaves its
/// modes to the geometric fallback estimate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingConfig {
    /// Directions API, used for driving and cycling legs
    #[serde(default)]
    pub directions: DirectionsConfig,

    /// Hiking directions API, used for walking legs
    #[serde(default)]
    pub hiking: HikingConfig,

    /// HAFAS transit API, used for public transport legs
    #[serde(default)]
    pub transit: TransitConfig,

    /// Wrap every backend in a circuit breaker
    #[serde(default = "default_true")]
    pub circuit_breaker_enabled: bool,

    /// Circuit breaker thresholds, shared by all backends
    #[serde(default)]
    pub circuit_breaker: CircuitBreakerConfig,
}

const fn default_true() -> bool {
    true
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            directions: DirectionsConfig::default(),
            hiking: HikingConfig::default(),
            transit: TransitConfig::default(),
            circuit_breaker_enabled: true,
            circuit_breaker: CircuitBreakerConfig::default(),
        }
    }
}

impl RoutingConfig {
    /// Configuration that never leaves the process: every backend disabled
    #[must_use]
    pub fn offline() -> Self {
        Self {
            directions: DirectionsConfig {
                enabled: false,
                ..DirectionsConfig::default()
            },
            hiking: HikingConfig {
                enabled: false,
                ..HikingConfig::default()
            },
            transit: TransitConfig {
                enabled: false,
                ..TransitConfig::default()
            },
            ..Self::default()
        }
    }

    /// Validate the enabled backends
    ///
    /// # Errors
    ///
    /// Returns the first problem found, prefixed with its section.
    pub fn validate(&self) -> Result<(), String> {
        if self.directions.enabled {
            self.directions
                .validate()
                .map_err(|e| format!("routing.directions: {e}"))?;
        }
        if self.hiking.enabled {
            self.hiking
                .validate()
                .map_err(|e| format!("routing.hiking: {e}"))?;
        }
        if self.transit.enabled {
            self.transit
                .validate()
                .map_err(|e| format!("routing.transit: {e}"))?;
        }
        if self.circuit_breaker_enabled {
            self.circuit_breaker
                .validate()
                .map_err(|e| format!("routing.circuit_breaker: {e}"))?;
        }
        Ok(())
    }
}
