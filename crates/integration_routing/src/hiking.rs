//! Hiking directions client for walking legs
//!
//! Speaks the OpenRouteService GeoJSON directions format, where the route is
//! a feature whose geometry lists `[longitude, latitude]` pairs.

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::{RoutingClient, build_http_client, get_body, lon_lat, no_route};
use crate::config::HikingConfig;
use crate::error::RoutingError;
use crate::models::{RouteResponse, RoutePath};

/// Hiking directions client
#[derive(Debug)]
pub struct HikingClient {
    client: Client,
    config: HikingConfig,
}

impl HikingClient {
    /// Create a new hiking client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &HikingConfig) -> Result<Self, RoutingError> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            config: config.clone(),
        })
    }

    /// Parse a GeoJSON directions body into a route
    fn parse_response(
        body: &str,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, RoutingError> {
        let raw: RawFeatureCollection =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        let Some(feature) = raw.features.into_iter().next() else {
            return Err(no_route(origin, destination));
        };

        let summary = feature.properties.summary;
        let path = feature
            .geometry
            .map_or(RoutePath::None, |geometry| Self::convert_geometry(&geometry.coordinates));

        Ok(RouteResponse::new(summary.distance, summary.duration).with_path(path))
    }

    /// Convert `[lon, lat(, elevation)]` positions into locations
    ///
    /// The whole path is dropped if any position is malformed.
    fn convert_geometry(coordinates: &[Vec<f64>]) -> RoutePath {
        let points: Option<Vec<GeoLocation>> = coordinates
            .iter()
            .map(|position| match position.as_slice() {
                [lon, lat, ..] => GeoLocation::new(*lat, *lon).ok(),
                _ => None,
            })
            .collect();

        match points {
            Some(points) if !points.is_empty() => RoutePath::Points(points),
            Some(_) => RoutePath::None,
            None => {
                debug!("Discarding malformed hiking geometry");
                RoutePath::None
            },
        }
    }
}

#[async_trait]
impl RoutingClient for HikingClient {
    fn name(&self) -> &'static str {
        "hiking"
    }

    #[instrument(
        skip(self, origin, destination),
        fields(profile = %self.config.profile, from = %origin, to = %destination)
    )]
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, RoutingError> {
        let Some(api_key) = self.config.api_key() else {
            return Err(RoutingError::NotConfigured(
                "hiking API key is missing".to_string(),
            ));
        };

        let url = format!(
            "{}/v2/directions/{}",
            self.config.base_url, self.config.profile
        );
        let params = [
            ("api_key", api_key.to_string()),
            ("start", lon_lat(origin)),
            ("end", lon_lat(destination)),
        ];

        let body = match get_body(&self.client, &url, &params, self.config.timeout_secs).await {
            // The service answers 404 when a point cannot be snapped to a path
            Err(RoutingError::RequestFailed { status: 404 }) => {
                return Err(no_route(origin, destination));
            },
            other => other?,
        };
        let route = Self::parse_response(&body, origin, destination)?;

        debug!(
            distance_meters = route.distance_meters,
            duration_seconds = route.duration_seconds,
            "Hiking route found"
        );
        Ok(route)
    }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
struct RawFeatureCollection {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Debug, Deserialize)]
struct RawFeature {
    geometry: Option<RawGeometry>,
    properties: RawProperties,
}

#[derive(Debug, Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Vec<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct RawProperties {
    #[serde(default)]
    summary: RawSummary,
}

/// Both fields are omitted by the service for zero-length routes
#[derive(Debug, Default, Deserialize)]
struct RawSummary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(body: &str) -> Result<RouteResponse, RoutingError> {
        HikingClient::parse_response(body, &GeoLocation::berlin(), &GeoLocation::munich())
    }

    #[test]
    fn test_parse_feature() {
        let body = r#"{
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": [[13.405, 52.52], [13.41, 52.53, 40.5]]
                },
                "properties": {"summary": {"distance": 1234.5, "duration": 900.0}}
            }]
        }"#;

        let route = parse(body).unwrap();
        assert!((route.distance_meters - 1234.5).abs() < f64::EPSILON);
        assert!((route.duration_seconds - 900.0).abs() < f64::EPSILON);

        let RoutePath::Points(points) = route.path else {
            unreachable!("expected explicit points");
        };
        assert_eq!(points.len(), 2);
        assert!((points[0].latitude() - 52.52).abs() < f64::EPSILON);
        assert!((points[0].longitude() - 13.405).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_empty_summary() {
        let body = r#"{"features": [{"properties": {"summary": {}}}]}"#;
        let route = parse(body).unwrap();
        assert!(route.distance_meters.abs() < f64::EPSILON);
        assert!(route.path.is_none());
    }

    #[test]
    fn test_parse_no_features() {
        let body = r#"{"type": "FeatureCollection", "features": []}"#;
        assert!(matches!(parse(body), Err(RoutingError::NoRouteFound { .. })));
    }

    #[test]
    fn test_malformed_geometry_is_dropped() {
        let coordinates = vec![vec![13.405, 52.52], vec![13.41]];
        assert!(HikingClient::convert_geometry(&coordinates).is_none());

        let out_of_range = vec![vec![13.405, 152.52]];
        assert!(HikingClient::convert_geometry(&out_of_range).is_none());
    }

    #[test]
    fn test_parse_invalid_json() {
        assert!(matches!(parse("{"), Err(RoutingError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_missing_key_is_not_configured() {
        let client = HikingClient::new(&HikingConfig::default()).unwrap();
        let result = client
            .route(&GeoLocation::berlin(), &GeoLocation::munich())
            .await;
        assert!(matches!(result, Err(RoutingError::NotConfigured(_))));
    }
}
