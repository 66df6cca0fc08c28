//! Trip route calculation - the assembled result for a whole itinerary

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::RouteSegment;
use crate::value_objects::TransportMode;

/// Accumulated distance and duration for one transport mode
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ModeTotals {
    /// Total distance in kilometers
    pub distance_km: f64,
    /// Total duration in minutes
    pub duration_minutes: u32,
}

impl ModeTotals {
    fn add(&mut self, segment: &RouteSegment) {
        self.distance_km += segment.distance_km;
        self.duration_minutes = self.duration_minutes.saturating_add(segment.duration_minutes);
    }
}

/// Segments and per-mode totals for a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripRouteCalculation {
    /// Primary segments in stop order, followed by continuity segments
    pub segments: Vec<RouteSegment>,
    /// Totals keyed by mode (every routable mode is always present)
    pub totals: BTreeMap<TransportMode, ModeTotals>,
}

impl Default for TripRouteCalculation {
    fn default() -> Self {
        Self::empty()
    }
}

impl TripRouteCalculation {
    /// A calculation with no segments and all-zero totals
    #[must_use]
    pub fn empty() -> Self {
        Self {
            segments: Vec::new(),
            totals: TransportMode::ROUTABLE
                .into_iter()
                .map(|mode| (mode, ModeTotals::default()))
                .collect(),
        }
    }

    /// Append a segment and fold it into the totals of its mode
    pub fn push_segment(&mut self, segment: RouteSegment) {
        self.totals.entry(segment.mode).or_default().add(&segment);
        self.segments.push(segment);
    }

    /// Totals for a mode (zero if the mode was never used)
    #[must_use]
    pub fn totals_for(&self, mode: TransportMode) -> ModeTotals {
        self.totals.get(&mode).copied().unwrap_or_default()
    }

    /// Sum of distances over all modes
    #[must_use]
    pub fn total_distance_km(&self) -> f64 {
        self.totals.values().map(|t| t.distance_km).sum()
    }

    /// Sum of durations over all modes
    #[must_use]
    pub fn total_duration_minutes(&self) -> u32 {
        self.totals
            .values()
            .fold(0_u32, |acc, t| acc.saturating_add(t.duration_minutes))
    }

    /// Segments between consecutive stops
    pub fn primary_segments(&self) -> impl Iterator<Item = &RouteSegment> {
        self.segments.iter().filter(|s| !s.is_continuity())
    }

    /// Synthesized vehicle-relocation segments
    pub fn continuity_segments(&self) -> impl Iterator<Item = &RouteSegment> {
        self.segments.iter().filter(|s| s.is_continuity())
    }

    /// Check if no segment was produced
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
