//! Routing backend integration for Waypoint
//!
//! HTTP clients for the external routing services behind each transport
//! mode:
//!
//! - [`DirectionsClient`] for driving and cycling (Google Directions JSON)
//! - [`HikingClient`] for walking (OpenRouteService GeoJSON)
//! - [`HafasTransitClient`] for public transport (transport.rest / HAFAS)
//!
//! # Architecture
//!
//! The crate follows a client-trait pattern consistent with other integration crates.
//! [`RoutingClient`] defines a single `route` call returning a [`RouteResponse`] in
//! wire units (meters, seconds) with the raw geometry. Unit conversion, polyline
//! decoding and mapping onto the application port happen in the infrastructure
//! adapter. Clients never retry.
//!
//! # Example
//!
//! ```rust,ignore
//! use integration_routing::{DirectionsClient, DirectionsConfig, RoutingClient, TravelProfile};
//!
//! let config = DirectionsConfig::default();
//! let client = DirectionsClient::new(&config, TravelProfile::Driving)?;
//!
//! let route = client.route(&GeoLocation::berlin(), &GeoLocation::munich()).await?;
//! ```

mod client;
mod config;
mod directions;
mod error;
mod hiking;
mod models;
mod transit;

pub use client::RoutingClient;
pub use config::{DirectionsConfig, HikingConfig, TransitConfig};
pub use directions::DirectionsClient;
pub use error::RoutingError;
pub use hiking::HikingClient;
pub use models::{RoutePath, RouteResponse, TravelProfile};
pub use transit::HafasTransitClient;
