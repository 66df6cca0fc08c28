//! Stop entity - A place on a trip itinerary

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value_objects::{ArrivalTransport, GeoLocation, StopId, TransportAnnotation, TransportMode};

/// A stop on a trip, as supplied by the caller
///
/// The routing engine only reads stops; their storage belongs to the caller.
/// Stops without a location stay in the itinerary but are never routed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    /// Caller-assigned identifier
    pub id: StopId,
    /// Display name
    pub name: String,
    /// Coordinates, if the stop has been placed on the map
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLocation>,
    /// How the traveler reached this stop
    #[serde(default, skip_serializing_if = "TransportAnnotation::is_absent")]
    pub arrival_transport: TransportAnnotation,
    /// Base stop this one is an excursion from (round trip on foot or bike)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_to: Option<StopId>,
}

impl Stop {
    /// Create a stop without location or transport annotation
    #[must_use]
    pub fn new(id: impl Into<StopId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            location: None,
            arrival_transport: TransportAnnotation::Absent,
            return_to: None,
        }
    }

    /// Set the stop's location
    #[must_use]
    pub fn with_location(mut self, location: GeoLocation) -> Self {
        self.location = Some(location);
        self
    }

    /// Set the arrival mode only
    #[must_use]
    pub fn arriving_by(mut self, mode: TransportMode) -> Self {
        self.arrival_transport = TransportAnnotation::mode_only(mode);
        self
    }

    /// Set the full arrival transport annotation
    #[must_use]
    pub fn with_arrival_transport(mut self, arrival: ArrivalTransport) -> Self {
        self.arrival_transport = TransportAnnotation::Present(arrival);
        self
    }

    /// Mark this stop as an excursion returning to `base`
    #[must_use]
    pub fn returning_to(mut self, base: impl Into<StopId>) -> Self {
        self.return_to = Some(base.into());
        self
    }

    /// Check if the stop can take part in routing
    #[must_use]
    pub const fn is_routable(&self) -> bool {
        self.location.is_some()
    }

    /// The annotated arrival mode, if any
    #[must_use]
    pub const fn arrival_mode(&self) -> Option<TransportMode> {
        self.arrival_transport.mode()
    }

    /// Check if the stop carries a return-to link
    #[must_use]
    pub const fn is_excursion(&self) -> bool {
        self.return_to.is_some()
    }
}

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
