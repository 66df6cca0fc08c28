//! Route service assembly
//!
//! Builds the provider registry from configuration: one adapter per
//! backend, optionally behind a circuit breaker, registered for the modes
//! the backend serves.

use std::sync::Arc;

use application::ports::RouteProviderPort;
use application::{ProviderRegistry, RouteCache, RouteService};
use domain::TransportMode;
use integration_routing::{
    DirectionsClient, HafasTransitClient, HikingClient, RoutingClient, TravelProfile,
};
use tracing::{info, warn};

use crate::adapters::RouteProviderAdapter;
use crate::config::{AppConfig, ConfigError, RoutingConfig};

/// Build a ready-to-use route service
///
/// Modes without an enabled and configured backend are estimated
/// geometrically.
pub fn build_route_service(config: &AppConfig) -> Result<RouteService, ConfigError> {
    let registry = build_provider_registry(&config.routing)?;
    let cache = Arc::new(RouteCache::with_config(&config.cache));
    Ok(RouteService::new(registry, cache))
}

/// Build the registry of routing backends
pub fn build_provider_registry(config: &RoutingConfig) -> Result<ProviderRegistry, ConfigError> {
    let mut registry = ProviderRegistry::new();

    if config.directions.enabled {
        if config.directions.api_key().is_some() {
            for (mode, profile) in [
                (TransportMode::Driving, TravelProfile::Driving),
                (TransportMode::Bicycle, TravelProfile::Bicycling),
            ] {
                let client = DirectionsClient::new(&config.directions, profile)?;
                registry.register(mode, adapter(client, config));
            }
        } else {
            warn!("Directions API key missing, driving and cycling legs use fallback estimates");
        }
    }

    if config.hiking.enabled {
        if config.hiking.api_key().is_some() {
            let client = HikingClient::new(&config.hiking)?;
            registry.register(TransportMode::Walking, adapter(client, config));
        } else {
            warn!("Hiking API key missing, walking legs use fallback estimates");
        }
    }

    if config.transit.enabled {
        let client = HafasTransitClient::new(&config.transit)?;
        registry.register(TransportMode::PublicTransport, adapter(client, config));
    }

    info!(?registry, "Routing backends configured");
    Ok(registry)
}

fn adapter(
    client: impl RoutingClient + 'static,
    config: &RoutingConfig,
) -> Arc<dyn RouteProviderPort> {
    let adapter = RouteProviderAdapter::new(client);
    if config.circuit_breaker_enabled {
        Arc::new(adapter.with_circuit_breaker_config(config.circuit_breaker.clone()))
    } else {
        Arc::new(adapter)
    }
}
