//! Port definitions for application layer
//!
//! Ports are interfaces that define how the application interacts with
//! external systems. Adapters in the infrastructure layer implement these ports.

mod route_provider_port;

#[cfg(test)]
pub use route_provider_port::MockRouteProviderPort;
pub use route_provider_port::{ProviderError, RouteProviderPort};
