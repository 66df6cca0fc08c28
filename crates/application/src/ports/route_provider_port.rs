//! Route provider port
//!
//! Defines the interface for external routing backends. Adapters in the
//! infrastructure layer implement this port, one per transport mode family.

use async_trait::async_trait;
use domain::{GeoLocation, RouteEstimate};
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

/// Why a routing backend could not produce a route
///
/// The route service recovers from all three by falling back to a
/// geometric estimate; they are kept apart for logging and future policy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderError {
    /// No configuration, network failure, or a non-OK answer
    #[error("Provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// The backend was reached but knows no route between the points
    #[error("No route found")]
    NoRouteFound,

    /// The backend refused the request because of its quota
    #[error("Rate limited (retry after {retry_after_secs:?} seconds)")]
    RateLimited {
        /// Seconds to wait before retrying (if provided by the backend)
        retry_after_secs: Option<u64>,
    },
}

impl ProviderError {
    /// Create an unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::ProviderUnavailable(reason.into())
    }

    /// Short machine-friendly tag for structured logs
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::ProviderUnavailable(_) => "provider_unavailable",
            Self::NoRouteFound => "no_route_found",
            Self::RateLimited { .. } => "rate_limited",
        }
    }
}

/// Port for a routing backend serving one mode family
///
/// Implementations convert units (kilometers, whole minutes) and decode
/// paths before returning. They must never retry internally.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait RouteProviderPort: Send + Sync {
    /// Fetch a route between two points
    async fn fetch(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteEstimate, ProviderError>;
}
