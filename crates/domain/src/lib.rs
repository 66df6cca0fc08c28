//! Domain layer for Waypoint
//!
//! Contains the trip routing vocabulary: stops, transport modes, route
//! segments and trip calculations, plus the pure geometry they rely on.
//! This layer performs no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod geometry;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
