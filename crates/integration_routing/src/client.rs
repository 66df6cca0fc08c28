//! Routing client trait and shared HTTP plumbing

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
use reqwest::{Client, Response, StatusCode};
use tracing::debug;

use crate::error::RoutingError;
use crate::models::RouteResponse;

/// Trait for routing backend clients
#[async_trait]
pub trait RoutingClient: Send + Sync {
    /// Short backend name for logs
    fn name(&self) -> &'static str;

    /// Fetch the best route between two points
    async fn route(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
    ) -> Result<RouteResponse, RoutingError>;
}

/// Build the HTTP client shared by all backends
pub(crate) fn build_http_client(timeout_secs: u64) -> Result<Client, RoutingError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .user_agent(concat!("Waypoint/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| RoutingError::ConnectionFailed(e.to_string()))
}

/// Issue a GET request and return the body of a successful response
///
/// Maps timeouts, connection failures, HTTP 429 and other non-success
/// statuses to [`RoutingError`]. The query is not logged since it may carry
/// an API key.
pub(crate) async fn get_body(
    client: &Client,
    url: &str,
    params: &[(&str, String)],
    timeout_secs: u64,
) -> Result<String, RoutingError> {
    debug!(%url, "Requesting route");

    let response = client
        .get(url)
        .query(params)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                RoutingError::Timeout { timeout_secs }
            } else {
                RoutingError::ConnectionFailed(e.to_string())
            }
        })?;

    let response = check_status(response)?;

    response
        .text()
        .await
        .map_err(|e| RoutingError::ParseError(e.to_string()))
}

fn check_status(response: Response) -> Result<Response, RoutingError> {
    let status = response.status();

    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(RoutingError::RateLimitExceeded {
            retry_after_secs: response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse().ok()),
        });
    }

    if !status.is_success() {
        return Err(RoutingError::RequestFailed {
            status: status.as_u16(),
        });
    }

    Ok(response)
}

/// `lat,lon` as used in query strings and error messages
pub(crate) fn lat_lon(location: &GeoLocation) -> String {
    format!("{},{}", location.latitude(), location.longitude())
}

/// `lon,lat` as used by GeoJSON-oriented APIs
pub(crate) fn lon_lat(location: &GeoLocation) -> String {
    format!("{},{}", location.longitude(), location.latitude())
}

/// Error for a backend that found nothing between two points
pub(crate) fn no_route(origin: &GeoLocation, destination: &GeoLocation) -> RoutingError {
    RoutingError::NoRouteFound {
        from: lat_lon(origin),
        to: lat_lon(destination),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_formats() {
        let loc = GeoLocation::new(52.52, 13.405).unwrap();
        assert_eq!(lat_lon(&loc), "52.52,13.405");
        assert_eq!(lon_lat(&loc), "13.405,52.52");
    }

    #[test]
    fn test_no_route_names_both_points() {
        let err = no_route(&GeoLocation::berlin(), &GeoLocation::munich());
        let message = err.to_string();
        assert!(message.contains("52.52,13.405"));
        assert!(message.contains("48.1351,11.582"));
    }

    #[test]
    fn test_http_client_builds() {
        assert!(build_http_client(5).is_ok());
    }
}
