//! Application layer - Use cases and orchestration
//!
//! Contains the trip routing services and the port through which they reach
//! external routing backends. Orchestrates domain objects and infrastructure
//! adapters.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
