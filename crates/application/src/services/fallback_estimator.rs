//! Geometric fallback estimates
//!
//! Used when no provider is configured for a mode or the provider call
//! failed. The estimate is a pure function of the two points and the mode:
//! great-circle distance, scaled by a road indirection factor, divided by a
//! distance-banded average speed, with a per-mode minimum duration.

use domain::geometry::haversine_distance_km;
use domain::{EstimateSource, GeoLocation, RouteEstimate, TransportMode};

/// Speed and detour assumptions for one mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeHeuristic {
    /// Road distance divided by straight-line distance
    pub indirection_factor: f64,
    /// `(upper bound km, speed km/h)` bands, checked in order
    pub speed_bands: &'static [(f64, f64)],
    /// Speed used beyond the last band
    pub cruise_speed_kmh: f64,
    /// Lower bound on any estimate's duration
    pub min_duration_minutes: u32,
}

impl ModeHeuristic {
    /// Average speed for a leg of the given road distance
    #[must_use]
    pub fn speed_for(&self, road_distance_km: f64) -> f64 {
        self.speed_bands
            .iter()
            .find(|(upper, _)| road_distance_km < *upper)
            .map_or(self.cruise_speed_kmh, |(_, speed)| *speed)
    }
}

const DRIVING: ModeHeuristic = ModeHeuristic {
    indirection_factor: 1.4,
    speed_bands: &[(5.0, 30.0), (50.0, 60.0), (200.0, 80.0)],
    cruise_speed_kmh: 90.0,
    min_duration_minutes: 10,
};

const WALKING: ModeHeuristic = ModeHeuristic {
    indirection_factor: 1.2,
    speed_bands: &[],
    cruise_speed_kmh: 4.5,
    min_duration_minutes: 5,
};

const BICYCLE: ModeHeuristic = ModeHeuristic {
    indirection_factor: 1.3,
    speed_bands: &[(5.0, 12.0), (20.0, 15.0)],
    cruise_speed_kmh: 18.0,
    min_duration_minutes: 10,
};

const PUBLIC_TRANSPORT: ModeHeuristic = ModeHeuristic {
    indirection_factor: 1.6,
    speed_bands: &[(10.0, 20.0), (50.0, 35.0)],
    cruise_speed_kmh: 50.0,
    min_duration_minutes: 10,
};

const GENERIC: ModeHeuristic = ModeHeuristic {
    indirection_factor: 1.4,
    speed_bands: &[],
    cruise_speed_kmh: 50.0,
    min_duration_minutes: 10,
};

/// Produces deterministic estimates for any mode; never fails
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackEstimator;

impl FallbackEstimator {
    /// Create an estimator
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Heuristic applied to a mode
    ///
    /// Flight and train have no table of their own and use the generic row.
    #[must_use]
    pub const fn heuristic(mode: TransportMode) -> &'static ModeHeuristic {
        match mode {
            TransportMode::Driving => &DRIVING,
            TransportMode::Walking => &WALKING,
            TransportMode::Bicycle => &BICYCLE,
            TransportMode::PublicTransport => &PUBLIC_TRANSPORT,
            TransportMode::Flight | TransportMode::Train => &GENERIC,
        }
    }

    /// Estimate a leg between two points
    ///
    /// The returned distance is the road distance (straight line times the
    /// indirection factor). No path is attached.
    #[must_use]
    pub fn estimate(
        &self,
        origin: &GeoLocation,
        destination: &GeoLocation,
        mode: TransportMode,
    ) -> RouteEstimate {
        let heuristic = Self::heuristic(mode);
        let road_distance_km =
            haversine_distance_km(origin, destination) * heuristic.indirection_factor;
        let speed = heuristic.speed_for(road_distance_km);
        let minutes = whole_minutes(road_distance_km / speed * 60.0)
            .max(heuristic.min_duration_minutes);

        RouteEstimate::new(road_distance_km, minutes, EstimateSource::Fallback)
    }
}

/// Round a non-negative minute count to a whole number, saturating
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn whole_minutes(minutes: f64) -> u32 {
    if minutes.is_finite() && minutes > 0.0 {
        minutes.round().min(f64::from(u32::MAX)) as u32
    } else {
        0
    }
}
