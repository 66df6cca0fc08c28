//! Route provider adapter - Implements RouteProviderPort using integration_routing

use std::sync::Arc;

use application::ports::{ProviderError, RouteProviderPort};
use async_trait::async_trait;
use domain::geometry::decode_polyline;
use domain::{EstimateSource, GeoLocation, RouteEstimate};
use integration_routing::{RouteResponse, RoutePath, RoutingClient, RoutingError};
use tracing::{debug, instrument};

use super::{CircuitBreaker, CircuitBreakerConfig, CircuitBreakerError};

/// Adapter exposing one routing backend client as a route provider
///
/// Converts meters and seconds to kilometers and whole minutes, decodes
/// encoded paths, and folds backend errors into [`ProviderError`].
pub struct RouteProviderAdapter {
    client: Arc<dyn RoutingClient>,
    circuit_breaker: Option<CircuitBreaker>,
}

impl std::fmt::Debug for RouteProviderAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteProviderAdapter")
            .field("client", &self.client.name())
            .field(
                "circuit_breaker",
                &self.circuit_breaker.as_ref().map(CircuitBreaker::state),
            )
            .finish()
    }
}

impl RouteProviderAdapter {
    /// Create an adapter without circuit breaker
    pub fn new(client: impl RoutingClient + 'static) -> Self {
        Self::from_arc(Arc::new(client))
    }

    /// Create an adapter around a shared client
    #[must_use]
    pub fn from_arc(client: Arc<dyn RoutingClient>) -> Self {
        Self {
            client,
            circuit_breaker: None,
        }
    }

    /// Enable circuit breaker with default configuration
    #[must_use]
    pub fn with_circuit_breaker(self) -> Self {
        self.with_circuit_breaker_config(CircuitBreakerConfig::default())
    }

    /// Enable circuit breaker with custom configuration
    #[must_use]
    pub fn with_circuit_breaker_config(mut self, config: CircuitBreakerConfig) -> Self {
        self.circuit_breaker = Some(CircuitBreaker::with_config(self.client.name(), config));
        self
    }

    /// Name of the wrapped backend
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.client.name()
    }

    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, ProviderError> {
        let Some(cb) = &self.circuit_breaker else {
            return self
                .client
                .route(origin, destination)
                .await
                .map_err(convert_error);
        };

        cb.call(
            || self.client.route(origin, destination),
            RoutingError::is_outage,
        )
        .await
        .map_err(|e| match e {
            CircuitBreakerError::CircuitOpen(open) => ProviderError::unavailable(open.to_string()),
            CircuitBreakerError::ServiceError(e) => convert_error(e),
        })
    }

    fn to_estimate(&self, response: RouteResponse) -> RouteEstimate {
        let distance_km = response.distance_meters / 1000.0;
        let mut duration_minutes = seconds_to_minutes(response.duration_seconds);
        if duration_minutes == 0 && distance_km > 0.0 {
            duration_minutes = 1;
        }

        let estimate = RouteEstimate::new(distance_km, duration_minutes, EstimateSource::Provider);
        match response.path {
            RoutePath::None => estimate,
            RoutePath::Points(points) => estimate.with_path(points),
            RoutePath::Encoded(encoded) => match decode_polyline(&encoded) {
                Ok(points) => estimate.with_path(points),
                Err(e) => {
                    debug!(backend = self.client.name(), error = %e, "Dropping undecodable path");
                    estimate
                },
            },
        }
    }
}

#[async_trait]
impl RouteProviderPort for RouteProviderAdapter {
    #[instrument(skip(self, origin, destination), fields(backend = self.client.name(), from = %origin, to = %destination))]
    async fn fetch(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteEstimate, ProviderError> {
        let response = self.route(origin, destination).await?;
        Ok(self.to_estimate(response))
    }
}

/// Whole minutes, rounded to nearest
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)] // Clamped to the u32 range first
fn seconds_to_minutes(seconds: f64) -> u32 {
    (seconds / 60.0).round().clamp(0.0, f64::from(u32::MAX)) as u32
}

/// Map a backend error onto the three outcomes the route service knows
fn convert_error(error: RoutingError) -> ProviderError {
    match error {
        RoutingError::NoRouteFound { .. } => ProviderError::NoRouteFound,
        RoutingError::RateLimitExceeded { retry_after_secs } => {
            ProviderError::RateLimited { retry_after_secs }
        },
        other => ProviderError::unavailable(other.to_string()),
    }
}
