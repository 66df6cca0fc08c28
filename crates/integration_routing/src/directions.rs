//! Directions API client for driving and cycling
//!
//! Speaks the Google Directions JSON format: the body carries a `status`
//! string next to the routes, so an HTTP 200 can still be a failure.

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::{RoutingClient, build_http_client, get_body, lat_lon, no_route};
use crate::config::DirectionsConfig;
use crate::error::RoutingError;
use crate::models::{RouteResponse, RoutePath, TravelProfile};

/// Directions client bound to one travel profile
#[derive(Debug)]
pub struct DirectionsClient {
    client: Client,
    config: DirectionsConfig,
    profile: TravelProfile,
}

impl DirectionsClient {
    /// Create a new directions client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &DirectionsConfig, profile: TravelProfile) -> Result<Self, RoutingError> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            config: config.clone(),
            profile,
        })
    }

    /// The travel profile requested from the API
    #[must_use]
    pub const fn profile(&self) -> TravelProfile {
        self.profile
    }

    /// Parse a directions body into a route
    fn parse_response(
        body: &str,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, RoutingError> {
        let raw: RawDirectionsResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        match raw.status.as_str() {
            "OK" => {},
            "ZERO_RESULTS" | "NOT_FOUND" => return Err(no_route(origin, destination)),
            "OVER_QUERY_LIMIT" => {
                return Err(RoutingError::RateLimitExceeded {
                    retry_after_secs: None,
                });
            },
            _ => {
                return Err(RoutingError::ProviderStatus {
                    status: raw.status,
                    message: raw.error_message,
                });
            },
        }

        let Some(route) = raw.routes.into_iter().next() else {
            return Err(no_route(origin, destination));
        };

        let distance_meters = route.legs.iter().map(|leg| leg.distance.value).sum();
        let duration_seconds = route.legs.iter().map(|leg| leg.duration.value).sum();
        let path = route
            .overview_polyline
            .map(|polyline| polyline.points)
            .filter(|points| !points.is_empty())
            .map_or(RoutePath::None, RoutePath::Encoded);

        Ok(RouteResponse::new(distance_meters, duration_seconds).with_path(path))
    }
}

#[async_trait]
impl RoutingClient for DirectionsClient {
    fn name(&self) -> &'static str {
        match self.profile {
            TravelProfile::Driving => "directions-driving",
            TravelProfile::Bicycling => "directions-bicycling",
        }
    }

    #[instrument(skip(self, origin, destination), fields(profile = %self.profile, from = %origin, to = %destination))]
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, RoutingError> {
        let Some(api_key) = self.config.api_key() else {
            return Err(RoutingError::NotConfigured(
                "directions API key is missing".to_string(),
            ));
        };

        let url = format!("{}/maps/api/directions/json", self.config.base_url);
        let params = [
            ("origin", lat_lon(origin)),
            ("destination", lat_lon(destination)),
            ("mode", self.profile.as_query().to_string()),
            ("key", api_key.to_string()),
        ];

        let body = get_body(&self.client, &url, &params, self.config.timeout_secs).await?;
        let route = Self::parse_response(&body, origin, destination)?;

        debug!(
            distance_meters = route.distance_meters,
            duration_seconds = route.duration_seconds,
            "Directions route found"
        );
        Ok(route)
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawDirectionsResponse {
    status: String,
    #[serde(default)]
    error_message: Option<String>,
    #[serde(default)]
    routes: Vec<RawRoute>,
}

#[derive(Debug, Deserialize)]
struct RawRoute {
    #[serde(default)]
    legs: Vec<RawLeg>,
    overview_polyline: Option<RawPolyline>,
}

#[derive(Debug, Deserialize)]
struct RawLeg {
    distance: RawValue,
    duration: RawValue,
}

#[derive(Debug, Deserialize)]
struct RawValue {
    value: f64,
}

#[derive(Debug, Deserialize)]
struct RawPolyline {
    points: String,
}
