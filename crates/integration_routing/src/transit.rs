//! HAFAS transit client via transport.rest API
//!
//! Plans a single journey with the public
//! [v6.db.transport.rest](https://v6.db.transport.rest) API and reduces it to
//! a route: door-to-door time from first departure to last arrival, and the
//! great-circle length of the chain of stops the journey visits.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::GeoLocation;
use domain::geometry::path_length_km;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::client::{RoutingClient, build_http_client, get_body, lat_lon, no_route};
use crate::config::TransitConfig;
use crate::error::RoutingError;
use crate::models::{RouteResponse, RoutePath};

/// HAFAS-based transit client using the transport.rest API
#[derive(Debug)]
pub struct HafasTransitClient {
    client: Client,
    config: TransitConfig,
}

impl HafasTransitClient {
    /// Create a new HAFAS transit client
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(config: &TransitConfig) -> Result<Self, RoutingError> {
        Ok(Self {
            client: build_http_client(config.timeout_secs)?,
            config: config.clone(),
        })
    }

    /// Build product query parameters based on config
    fn product_params(&self) -> [(&'static str, &'static str); 7] {
        [
            ("bus", bool_str(self.config.products_bus)),
            ("suburban", bool_str(self.config.products_suburban)),
            ("subway", bool_str(self.config.products_subway)),
            ("tram", bool_str(self.config.products_tram)),
            ("regional", bool_str(self.config.products_regional)),
            ("national", bool_str(self.config.products_national)),
            (
                "nationalExpress",
                bool_str(self.config.products_national_express),
            ),
        ]
    }

    /// Parse the raw HAFAS JSON journey response into a route
    fn parse_journeys_response(
        body: &str,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, RoutingError> {
        let raw: RawJourneysResponse =
            serde_json::from_str(body).map_err(|e| RoutingError::ParseError(e.to_string()))?;

        let Some(journey) = raw.journeys.into_iter().find(|j| !j.legs.is_empty()) else {
            return Err(no_route(origin, destination));
        };

        Self::convert_journey(&journey)
    }

    /// Reduce a journey to duration, distance and visited stops
    fn convert_journey(journey: &RawJourney) -> Result<RouteResponse, RoutingError> {
        let (Some(first), Some(last)) = (journey.legs.first(), journey.legs.last()) else {
            return Err(RoutingError::ParseError("journey has no legs".to_string()));
        };

        let departure = first.departure_time().ok_or_else(|| {
            RoutingError::ParseError("first leg has no departure time".to_string())
        })?;
        let arrival = last
            .arrival_time()
            .ok_or_else(|| RoutingError::ParseError("last leg has no arrival time".to_string()))?;

        #[allow(clippy::cast_precision_loss)] // Journey durations are far below 2^52 seconds
        let duration_seconds = (arrival - departure).num_seconds().max(0) as f64;

        let path = Self::visited_locations(journey);
        let distance_meters = path_length_km(&path) * 1000.0;
        let path = if path.len() >= 2 {
            RoutePath::Points(path)
        } else {
            RoutePath::None
        };

        Ok(RouteResponse::new(distance_meters, duration_seconds).with_path(path))
    }

    /// Locations of each leg's origin and destination, without repeats
    fn visited_locations(journey: &RawJourney) -> Vec<GeoLocation> {
        let mut path: Vec<GeoLocation> = Vec::with_capacity(journey.legs.len() + 1);

        let ends = journey
            .legs
            .iter()
            .flat_map(|leg| [&leg.origin, &leg.destination]);
        for location in ends.filter_map(RawStop::geo_location) {
            if path.last() != Some(&location) {
                path.push(location);
            }
        }

        path
    }
}

#[async_trait]
impl RoutingClient for HafasTransitClient {
    fn name(&self) -> &'static str {
        "hafas-transit"
    }

    #[instrument(skip(self, origin, destination), fields(from = %origin, to = %destination))]
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, RoutingError> {
        let url = format!("{}/journeys", self.config.base_url);

        let mut params: Vec<(&str, String)> = vec![
            ("from.latitude", origin.latitude().to_string()),
            ("from.longitude", origin.longitude().to_string()),
            ("from.address", lat_lon(origin)),
            ("to.latitude", destination.latitude().to_string()),
            ("to.longitude", destination.longitude().to_string()),
            ("to.address", lat_lon(destination)),
            ("results", "1".to_string()),
            ("stopovers", "false".to_string()),
            ("remarks", "false".to_string()),
        ];

        for (key, val) in self.product_params() {
            params.push((key, val.to_string()));
        }

        let body = get_body(&self.client, &url, &params, self.config.timeout_secs).await?;
        let route = Self::parse_journeys_response(&body, origin, destination)?;

        debug!(
            distance_meters = route.distance_meters,
            duration_seconds = route.duration_seconds,
            "Transit journey found"
        );
        Ok(route)
    }
}

/// Convert bool to "true"/"false" str for query params
const fn bool_str(val: bool) -> &'static str {
    if val { "true" } else { "false" }
}

// --- Raw API response types for deserialization ---

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJourneysResponse {
    #[serde(default)]
    journeys: Vec<RawJourney>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawJourney {
    #[serde(default)]
    legs: Vec<RawLeg>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLeg {
    origin: RawStop,
    destination: RawStop,
    departure: Option<DateTime<Utc>>,
    planned_departure: Option<DateTime<Utc>>,
    arrival: Option<DateTime<Utc>>,
    planned_arrival: Option<DateTime<Utc>>,
}

impl RawLeg {
    /// Realtime departure, falling back to the schedule
    fn departure_time(&self) -> Option<DateTime<Utc>> {
        self.departure.or(self.planned_departure)
    }

    /// Realtime arrival, falling back to the schedule
    fn arrival_time(&self) -> Option<DateTime<Utc>> {
        self.arrival.or(self.planned_arrival)
    }
}

#[derive(Debug, Deserialize)]
struct RawStop {
    location: Option<RawLocation>,
}

impl RawStop {
    fn geo_location(&self) -> Option<GeoLocation> {
        self.location
            .as_ref()
            .and_then(|loc| GeoLocation::new(loc.latitude, loc.longitude).ok())
    }
}

#[derive(Debug, Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_LEG_JOURNEY: &str = r#"{
        "journeys": [{
            "legs": [
                {
                    "origin": {"location": {"latitude": 52.521508, "longitude": 13.411267}},
                    "destination": {"location": {"latitude": 52.506891, "longitude": 13.332711}},
                    "departure": "2026-02-11T10:00:00+00:00",
                    "arrival": "2026-02-11T10:18:00+00:00"
                },
                {
                    "origin": {"location": {"latitude": 52.506891, "longitude": 13.332711}},
                    "destination": {"location": {"latitude": 52.5251, "longitude": 13.3694}},
                    "departure": null,
                    "plannedDeparture": "2026-02-11T10:22:00+00:00",
                    "arrival": "2026-02-11T10:35:30+00:00",
                    "walking": true,
                    "distance": 420
                }
            ]
        }]
    }"#;

    fn parse(body: &str) -> Result<RouteResponse, RoutingError> {
        HafasTransitClient::parse_journeys_response(
            body,
            &GeoLocation::berlin(),
            &GeoLocation::munich(),
        )
    }

    #[test]
    fn test_duration_spans_whole_journey() {
        let route = parse(TWO_LEG_JOURNEY).unwrap();
        assert!((route.duration_seconds - 2130.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_path_skips_repeated_transfer_stop() {
        let route = parse(TWO_LEG_JOURNEY).unwrap();
        let RoutePath::Points(points) = route.path else {
            unreachable!("expected stop locations");
        };
        assert_eq!(points.len(), 3);
        assert!((route.distance_meters - path_length_km(&points) * 1000.0).abs() < 1e-6);
        assert!(route.distance_meters > 5000.0);
    }

    #[test]
    fn test_planned_times_are_used_when_realtime_missing() {
        let body = r#"{"journeys": [{"legs": [{
            "origin": {"location": {"latitude": 52.52, "longitude": 13.40}},
            "destination": {"location": {"latitude": 52.53, "longitude": 13.41}},
            "plannedDeparture": "2026-02-11T10:00:00+00:00",
            "plannedArrival": "2026-02-11T10:10:00+00:00"
        }]}]}"#;
        let route = parse(body).unwrap();
        assert!((route.duration_seconds - 600.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_missing_times_are_a_parse_error() {
        let body = r#"{"journeys": [{"legs": [{
            "origin": {"location": {"latitude": 52.52, "longitude": 13.40}},
            "destination": {"location": {"latitude": 52.53, "longitude": 13.41}}
        }]}]}"#;
        assert!(matches!(parse(body), Err(RoutingError::ParseError(_))));
    }

    #[test]
    fn test_no_journeys() {
        assert!(matches!(
            parse(r#"{"journeys": []}"#),
            Err(RoutingError::NoRouteFound { .. })
        ));
        assert!(matches!(
            parse(r#"{"journeys": [{"legs": []}]}"#),
            Err(RoutingError::NoRouteFound { .. })
        ));
    }

    #[test]
    fn test_stops_without_location_give_no_path() {
        let body = r#"{"journeys": [{"legs": [{
            "origin": {"id": "1"},
            "destination": {"id": "2"},
            "departure": "2026-02-11T10:00:00+00:00",
            "arrival": "2026-02-11T10:05:00+00:00"
        }]}]}"#;
        let route = parse(body).unwrap();
        assert!(route.path.is_none());
        assert!(route.distance_meters.abs() < f64::EPSILON);
    }

    #[test]
    fn test_bool_str() {
        assert_eq!(bool_str(true), "true");
        assert_eq!(bool_str(false), "false");
    }

    #[test]
    fn test_product_params_follow_config() {
        let config = TransitConfig {
            products_bus: false,
            products_national_express: true,
            ..TransitConfig::for_testing()
        };
        let client = HafasTransitClient::new(&config).unwrap();
        let params = client.product_params();
        assert!(params.contains(&("bus", "false")));
        assert!(params.contains(&("nationalExpress", "true")));
    }
}
