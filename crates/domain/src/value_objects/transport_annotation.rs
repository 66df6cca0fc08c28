//! Arrival transport annotation attached to a stop

use serde::{Deserialize, Serialize};

use super::TransportMode;

/// How the traveler says they reached a stop
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArrivalTransport {
    /// Mode used for the leg into the stop
    pub mode: TransportMode,
    /// Duration entered by the traveler, in minutes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_minutes: Option<u32>,
    /// Distance entered by the traveler, in kilometers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Free-text note ("ferry from the north pier", ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ArrivalTransport {
    /// Create an annotation carrying only a mode
    #[must_use]
    pub const fn new(mode: TransportMode) -> Self {
        Self {
            mode,
            duration_minutes: None,
            distance_km: None,
            note: None,
        }
    }

    /// Attach a note
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

/// Arrival transport of a stop: either stated or not
///
/// On the wire this is an optional [`ArrivalTransport`] object; `null` or a
/// missing field both mean [`TransportAnnotation::Absent`].
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Option<ArrivalTransport>", into = "Option<ArrivalTransport>")]
pub enum TransportAnnotation {
    /// The stop has no arrival transport recorded
    #[default]
    Absent,
    /// The stop records how it was reached
    Present(ArrivalTransport),
}

impl TransportAnnotation {
    /// Shorthand for an annotation carrying only a mode
    #[must_use]
    pub const fn mode_only(mode: TransportMode) -> Self {
        Self::Present(ArrivalTransport::new(mode))
    }

    /// The annotated mode, if any
    #[must_use]
    pub const fn mode(&self) -> Option<TransportMode> {
        match self {
            Self::Present(arrival) => Some(arrival.mode),
            Self::Absent => None,
        }
    }

    /// Check whether no annotation is present
    #[must_use]
    pub const fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }
}

impl From<Option<ArrivalTransport>> for TransportAnnotation {
    fn from(value: Option<ArrivalTransport>) -> Self {
        value.map_or(Self::Absent, Self::Present)
    }
}

impl From<TransportAnnotation> for Option<ArrivalTransport> {
    fn from(value: TransportAnnotation) -> Self {
        match value {
            TransportAnnotation::Present(arrival) => Some(arrival),
            TransportAnnotation::Absent => None,
        }
    }
}
