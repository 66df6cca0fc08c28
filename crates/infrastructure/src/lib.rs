//! Infrastructure layer - Adapters for external systems
//!
//! Implements the route provider port on top of the routing backend clients,
//! and hosts configuration loading, logging setup and service wiring.

pub mod adapters;
pub mod config;
pub mod telemetry;
pub mod wiring;

pub use adapters::*;
pub use config::{AppConfig, ConfigError, RoutingConfig};
pub use telemetry::{TelemetryConfig, TelemetryError, init_logging};
pub use wiring::{build_provider_registry, build_route_service};
