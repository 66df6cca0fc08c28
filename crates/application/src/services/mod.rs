//! Application services
//!
//! Use-case orchestration on top of the ports: mode resolution, fallback
//! estimation, memoization and trip assembly.

mod fallback_estimator;
mod mode_resolver;
mod provider_registry;
mod route_cache;
mod route_service;

pub use fallback_estimator::{FallbackEstimator, ModeHeuristic};
pub use mode_resolver::TransportModeResolver;
pub use provider_registry::ProviderRegistry;
pub use route_cache::{CacheKey, RouteCache, RouteCacheConfig, RouteCacheStats};
pub use route_service::RouteService;
