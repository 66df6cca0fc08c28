//! Routing response models
//!
//! Backend-neutral representation of a single route as returned by any of
//! the clients in this crate. Units are those of the wire: meters and
//! seconds. Conversion into kilometers and minutes happens in the adapter.

use domain::GeoLocation;
use serde::{Deserialize, Serialize};

/// Geometry of a route as delivered by the backend
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum RoutePath {
    /// The backend sent no geometry
    #[default]
    None,
    /// An encoded polyline (five decimal places)
    Encoded(String),
    /// Explicit coordinates
    Points(Vec<GeoLocation>),
}

impl RoutePath {
    /// Check whether any geometry was returned
    #[must_use]
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// One route between two points
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteResponse {
    /// Travel distance in meters
    pub distance_meters: f64,
    /// Travel duration in seconds
    pub duration_seconds: f64,
    /// Route geometry
    #[serde(default)]
    pub path: RoutePath,
}

impl RouteResponse {
    /// Create a response without geometry
    #[must_use]
    pub const fn new(distance_meters: f64, duration_seconds: f64) -> Self {
        Self {
            distance_meters,
            duration_seconds,
            path: RoutePath::None,
        }
    }

    /// Attach geometry
    #[must_use]
    pub fn with_path(mut self, path: RoutePath) -> Self {
        self.path = path;
        self
    }
}

/// Travel profile understood by the directions API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelProfile {
    /// Car routing
    Driving,
    /// Bicycle routing
    Bicycling,
}

impl TravelProfile {
    /// Value of the `mode` query parameter
    #[must_use]
    pub const fn as_query(&self) -> &'static str {
        match self {
            Self::Driving => "driving",
            Self::Bicycling => "bicycling",
        }
    }
}

impl std::fmt::Display for TravelProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_query())
    }
}
