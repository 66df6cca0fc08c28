//! Integration tests for the routing clients (wiremock-based)

use domain::GeoLocation;
use secrecy::SecretString;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use integration_routing::{
    DirectionsClient, DirectionsConfig, HafasTransitClient, HikingClient, HikingConfig,
    RoutePath, RoutingClient, RoutingError, TransitConfig, TravelProfile,
};

fn berlin() -> GeoLocation {
    GeoLocation::new(52.52, 13.405).unwrap()
}

fn potsdam() -> GeoLocation {
    GeoLocation::new(52.3906, 13.0645).unwrap()
}

fn directions_config(base_url: &str) -> DirectionsConfig {
    DirectionsConfig {
        base_url: base_url.to_string(),
        api_key: Some(SecretString::from("test-key")),
        timeout_secs: 5,
        ..DirectionsConfig::default()
    }
}

fn hiking_config(base_url: &str) -> HikingConfig {
    HikingConfig {
        base_url: base_url.to_string(),
        api_key: Some(SecretString::from("test-key")),
        timeout_secs: 5,
        ..HikingConfig::default()
    }
}

fn transit_config(base_url: &str) -> TransitConfig {
    TransitConfig {
        base_url: base_url.to_string(),
        timeout_secs: 5,
        ..TransitConfig::default()
    }
}

const fn sample_directions_json() -> &'static str {
    r#"{
        "status": "OK",
        "routes": [{
            "legs": [{
                "distance": {"text": "35.2 km", "value": 35210},
                "duration": {"text": "38 mins", "value": 2290}
            }],
            "overview_polyline": {"points": "_p~iF~ps|U_ulLnnqC_mqNvxq`@"}
        }]
    }"#
}

const fn sample_hiking_json() -> &'static str {
    r#"{
        "type": "FeatureCollection",
        "features": [{
            "type": "Feature",
            "properties": {"summary": {"distance": 31870.4, "duration": 25496.3}},
            "geometry": {
                "type": "LineString",
                "coordinates": [[13.405, 52.52], [13.2, 52.45], [13.0645, 52.3906]]
            }
        }]
    }"#
}

const fn sample_journeys_json() -> &'static str {
    r#"{
        "journeys": [{
            "legs": [
                {
                    "origin": {
                        "id": "900100003",
                        "name": "S+U Alexanderplatz",
                        "location": { "latitude": 52.521508, "longitude": 13.411267 }
                    },
                    "destination": {
                        "id": "900230999",
                        "name": "S Potsdam Hauptbahnhof",
                        "location": { "latitude": 52.391659, "longitude": 13.066711 }
                    },
                    "departure": "2026-02-11T10:00:00+00:00",
                    "plannedDeparture": "2026-02-11T10:00:00+00:00",
                    "arrival": "2026-02-11T10:48:00+00:00",
                    "plannedArrival": "2026-02-11T10:48:00+00:00",
                    "line": { "name": "S7", "product": "suburban", "mode": "train" }
                }
            ]
        }]
    }"#
}

// ==============================
// Directions
// ==============================

#[tokio::test]
async fn test_directions_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/directions/json"))
        .and(query_param("mode", "driving"))
        .and(query_param("origin", "52.52,13.405"))
        .and(query_param("key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_directions_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        DirectionsClient::new(&directions_config(&server.uri()), TravelProfile::Driving).unwrap();

    let route = client.route(&berlin(), &potsdam()).await.unwrap();

    assert!((route.distance_meters - 35210.0).abs() < f64::EPSILON);
    assert!((route.duration_seconds - 2290.0).abs() < f64::EPSILON);
    assert!(matches!(route.path, RoutePath::Encoded(_)));
}

#[tokio::test]
async fn test_directions_bicycling_mode_param() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/directions/json"))
        .and(query_param("mode", "bicycling"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_directions_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client =
        DirectionsClient::new(&directions_config(&server.uri()), TravelProfile::Bicycling)
            .unwrap();

    assert!(client.route(&berlin(), &potsdam()).await.is_ok());
}

#[tokio::test]
async fn test_directions_zero_results() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/directions/json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(r#"{"status": "ZERO_RESULTS", "routes": []}"#),
        )
        .mount(&server)
        .await;

    let client =
        DirectionsClient::new(&directions_config(&server.uri()), TravelProfile::Driving).unwrap();

    let result = client.route(&berlin(), &potsdam()).await;
    assert!(matches!(result, Err(RoutingError::NoRouteFound { .. })));
}

#[tokio::test]
async fn test_directions_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/directions/json"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client =
        DirectionsClient::new(&directions_config(&server.uri()), TravelProfile::Driving).unwrap();

    let result = client.route(&berlin(), &potsdam()).await;
    assert!(matches!(
        result,
        Err(RoutingError::RateLimitExceeded {
            retry_after_secs: Some(30)
        })
    ));
}

#[tokio::test]
async fn test_directions_server_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/maps/api/directions/json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client =
        DirectionsClient::new(&directions_config(&server.uri()), TravelProfile::Driving).unwrap();

    let result = client.route(&berlin(), &potsdam()).await;
    assert!(matches!(
        result,
        Err(RoutingError::RequestFailed { status: 500 })
    ));
}

#[tokio::test]
async fn test_directions_without_key_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = DirectionsConfig {
        api_key: None,
        ..directions_config(&server.uri())
    };
    let client = DirectionsClient::new(&config, TravelProfile::Driving).unwrap();

    let result = client.route(&berlin(), &potsdam()).await;
    assert!(matches!(result, Err(RoutingError::NotConfigured(_))));
}

// ==============================
// Hiking
// ==============================

#[tokio::test]
async fn test_hiking_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/directions/foot-hiking"))
        .and(query_param("start", "13.405,52.52"))
        .and(query_param("end", "13.0645,52.3906"))
        .and(query_param("api_key", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_hiking_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = HikingClient::new(&hiking_config(&server.uri())).unwrap();

    let route = client.route(&berlin(), &potsdam()).await.unwrap();

    assert!((route.distance_meters - 31870.4).abs() < 1e-6);
    let RoutePath::Points(points) = route.path else {
        panic!("expected explicit points");
    };
    assert_eq!(points.len(), 3);
}

#[tokio::test]
async fn test_hiking_not_found_maps_to_no_route() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/directions/foot-hiking"))
        .respond_with(ResponseTemplate::new(404).set_body_string(
            r#"{"error": {"code": 2010, "message": "Could not find routable point"}}"#,
        ))
        .mount(&server)
        .await;

    let client = HikingClient::new(&hiking_config(&server.uri())).unwrap();

    let result = client.route(&berlin(), &potsdam()).await;
    assert!(matches!(result, Err(RoutingError::NoRouteFound { .. })));
}

#[tokio::test]
async fn test_hiking_malformed_body() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v2/directions/foot-hiking"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let client = HikingClient::new(&hiking_config(&server.uri())).unwrap();

    let result = client.route(&berlin(), &potsdam()).await;
    assert!(matches!(result, Err(RoutingError::ParseError(_))));
}

// ==============================
// Transit
// ==============================

#[tokio::test]
async fn test_transit_success() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/journeys"))
        .and(query_param("results", "1"))
        .and(query_param("from.latitude", "52.52"))
        .respond_with(ResponseTemplate::new(200).set_body_string(sample_journeys_json()))
        .expect(1)
        .mount(&server)
        .await;

    let client = HafasTransitClient::new(&transit_config(&server.uri())).unwrap();

    let route = client.route(&berlin(), &potsdam()).await.unwrap();

    assert!((route.duration_seconds - 2880.0).abs() < f64::EPSILON);
    assert!(route.distance_meters > 20_000.0);
    assert!(matches!(route.path, RoutePath::Points(ref p) if p.len() == 2));
}

#[tokio::test]
async fn test_transit_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/journeys"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let client = HafasTransitClient::new(&transit_config(&server.uri())).unwrap();

    let result = client.route(&berlin(), &potsdam()).await;
    assert!(matches!(
        result,
        Err(RoutingError::RateLimitExceeded {
            retry_after_secs: None
        })
    ));
}

#[tokio::test]
async fn test_transit_empty_journeys() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/journeys"))
        .respond_with(ResponseTemplate::new(200).set_body_string(r#"{ "journeys": [] }"#))
        .mount(&server)
        .await;

    let client = HafasTransitClient::new(&transit_config(&server.uri())).unwrap();

    let result = client.route(&berlin(), &potsdam()).await;
    assert!(matches!(result, Err(RoutingError::NoRouteFound { .. })));
}

#[tokio::test]
async fn test_transit_connection_refused() {
    // Nothing listens on the discard port
    let client = HafasTransitClient::new(&transit_config("http://127.0.0.1:9")).unwrap();

    let result = client.route(&berlin(), &potsdam()).await;
    let err = result.unwrap_err();
    assert!(err.is_outage());
    assert!(matches!(
        err,
        RoutingError::ConnectionFailed(_) | RoutingError::Timeout { .. }
    ));
}
