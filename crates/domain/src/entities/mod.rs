//! Domain entities - Objects with identity and lifecycle

mod route_segment;
mod stop;
mod trip_route;

pub use route_segment::{EstimateSource, RouteEstimate, RouteSegment, SegmentKind};
pub use stop::Stop;
pub use trip_route::{ModeTotals, TripRouteCalculation};
