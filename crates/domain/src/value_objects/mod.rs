//! Value Objects - Immutable, identity-less domain primitives

mod geo_location;
mod stop_id;
mod transport_annotation;
mod transport_mode;

pub use geo_location::GeoLocation;
pub use stop_id::StopId;
pub use transport_annotation::{ArrivalTransport, TransportAnnotation};
pub use transport_mode::TransportMode;
