//! Transport mode value object

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// How a traveler moves along a leg
///
/// `Flight` and `Train` are recognized so itineraries round-trip, but no
/// routing backend handles them; they are always estimated geometrically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", try_from = "String")]
pub enum TransportMode {
    /// Private car
    Driving,
    /// On foot
    Walking,
    /// Bicycle
    Bicycle,
    /// Bus, tram, metro, regional rail
    PublicTransport,
    /// Scheduled flight
    Flight,
    /// Long-distance train
    Train,
}

impl TransportMode {
    /// Modes that have a routing backend and always appear in trip totals
    pub const ROUTABLE: [Self; 4] = [
        Self::Driving,
        Self::Walking,
        Self::Bicycle,
        Self::PublicTransport,
    ];

    /// Canonical upper-snake-case name
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Driving => "DRIVING",
            Self::Walking => "WALKING",
            Self::Bicycle => "BICYCLE",
            Self::PublicTransport => "PUBLIC_TRANSPORT",
            Self::Flight => "FLIGHT",
            Self::Train => "TRAIN",
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Driving => "Car",
            Self::Walking => "Walk",
            Self::Bicycle => "Bike",
            Self::PublicTransport => "Public transport",
            Self::Flight => "Flight",
            Self::Train => "Train",
        }
    }

    /// Whether the traveler moves under their own power (walking or cycling)
    ///
    /// These are the modes that leave a parked vehicle behind.
    #[must_use]
    pub const fn is_self_propelled(&self) -> bool {
        matches!(self, Self::Walking | Self::Bicycle)
    }
}

impl fmt::Display for TransportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransportMode {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().replace(['-', ' '], "_").as_str() {
            "DRIVING" | "DRIVE" | "CAR" => Ok(Self::Driving),
            "WALKING" | "WALK" | "FOOT" => Ok(Self::Walking),
            "BICYCLE" | "BICYCLING" | "BIKE" | "CYCLING" => Ok(Self::Bicycle),
            "PUBLIC_TRANSPORT" | "TRANSIT" | "PUBLIC" => Ok(Self::PublicTransport),
            "FLIGHT" | "PLANE" | "FLY" => Ok(Self::Flight),
            "TRAIN" | "RAIL" => Ok(Self::Train),
            _ => Err(DomainError::UnknownTransportMode(s.to_string())),
        }
    }
}

impl TryFrom<String> for TransportMode {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
