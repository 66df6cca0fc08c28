//! Transport mode resolution for itinerary legs
//!
//! The mode of a leg normally comes from the arrival annotation of the stop
//! it leads into, defaulting to driving. Excursions are the exception: when a
//! stop is marked as returning to a base and was itself reached on foot or by
//! bike, the leg leaving it keeps that mode, whatever the next stop says.

use domain::{Stop, TransportMode};

/// Decides which transport mode applies to each leg of an itinerary
#[derive(Debug, Clone, Copy, Default)]
pub struct TransportModeResolver;

impl TransportModeResolver {
    /// Create a resolver
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Mode for the leg from `from` into `to`
    ///
    /// `previous` is the stop before `from` in the sequence; the current
    /// policy does not consult it.
    #[must_use]
    pub fn resolve(&self, _previous: Option<&Stop>, from: &Stop, to: &Stop) -> TransportMode {
        excursion_mode(from)
            .or_else(|| to.arrival_mode())
            .unwrap_or(TransportMode::Driving)
    }

    /// Resolve every consecutive leg; the result has one entry per pair
    #[must_use]
    pub fn resolve_legs(&self, stops: &[&Stop]) -> Vec<TransportMode> {
        stops
            .windows(2)
            .enumerate()
            .map(|(index, pair)| {
                let previous = index.checked_sub(1).and_then(|p| stops.get(p)).copied();
                self.resolve(previous, pair[0], pair[1])
            })
            .collect()
    }
}

/// Mode an excursion stop imposes on its outbound leg
fn excursion_mode(from: &Stop) -> Option<TransportMode> {
    if !from.is_excursion() {
        return None;
    }
    from.arrival_mode().filter(TransportMode::is_self_propelled)
}
