//! Route segments - computed results for one leg of a trip

use serde::{Deserialize, Serialize};

use super::Stop;
use crate::value_objects::{GeoLocation, TransportMode};

/// Where a leg estimate came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimateSource {
    /// An external routing backend answered
    Provider,
    /// Geometric approximation (no backend, or the backend failed)
    Fallback,
}

/// Distance and duration for travelling between two points
///
/// This is what routing backends and the fallback estimator produce, and
/// what gets memoized; it knows nothing about the stops it connects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteEstimate {
    /// Travel distance in kilometers (never negative)
    pub distance_km: f64,
    /// Travel duration in whole minutes
    pub duration_minutes: u32,
    /// Actual path; `None` means a straight line is implied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<GeoLocation>>,
    /// Origin of the numbers
    pub source: EstimateSource,
}

impl RouteEstimate {
    /// Create an estimate without a path
    ///
    /// Negative or non-finite distances are clamped to zero.
    #[must_use]
    pub fn new(distance_km: f64, duration_minutes: u32, source: EstimateSource) -> Self {
        let distance_km = if distance_km.is_finite() {
            distance_km.max(0.0)
        } else {
            0.0
        };
        Self {
            distance_km,
            duration_minutes,
            path: None,
            source,
        }
    }

    /// Attach a path; an empty path is treated as absent
    #[must_use]
    pub fn with_path(mut self, path: Vec<GeoLocation>) -> Self {
        self.path = if path.is_empty() { None } else { Some(path) };
        self
    }
}

/// Role of a segment within a trip calculation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SegmentKind {
    /// A leg between two chronologically consecutive stops
    Primary,
    /// A synthesized driving leg showing where the vehicle went while the
    /// traveler was on foot or bike
    Continuity,
}

/// A computed leg between two stops
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteSegment {
    /// Departure stop
    pub origin: Stop,
    /// Arrival stop
    pub destination: Stop,
    /// Resolved transport mode
    pub mode: TransportMode,
    /// Travel distance in kilometers
    pub distance_km: f64,
    /// Travel duration in whole minutes
    pub duration_minutes: u32,
    /// Actual path; `None` means a straight line is implied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<Vec<GeoLocation>>,
    /// Primary or continuity
    pub kind: SegmentKind,
    /// Provider or fallback
    pub source: EstimateSource,
}

impl RouteSegment {
    /// Bind an estimate to the stops it connects
    #[must_use]
    pub fn from_estimate(
        origin: Stop,
        destination: Stop,
        mode: TransportMode,
        estimate: RouteEstimate,
        kind: SegmentKind,
    ) -> Self {
        Self {
            origin,
            destination,
            mode,
            distance_km: estimate.distance_km,
            duration_minutes: estimate.duration_minutes,
            path: estimate.path,
            kind,
            source: estimate.source,
        }
    }

    /// Check if this is a synthesized continuity segment
    #[must_use]
    pub fn is_continuity(&self) -> bool {
        self.kind == SegmentKind::Continuity
    }

    /// The path to draw: the provider path, or the straight line between
    /// the two stops when none was returned
    #[must_use]
    pub fn path_or_straight_line(&self) -> Vec<GeoLocation> {
        if let Some(path) = &self.path {
            return path.clone();
        }
        self.origin
            .location
            .into_iter()
            .chain(self.destination.location)
            .collect()
    }
}
