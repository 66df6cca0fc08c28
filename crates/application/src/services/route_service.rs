//! Trip route service
//!
//! Resolves a transport mode for every leg of an itinerary, obtains each
//! leg through the cache (provider first, geometric fallback on failure),
//! aggregates per-mode totals and adds continuity segments that reconnect
//! driving stops separated by walking or cycling detours.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use domain::{
    GeoLocation, RouteEstimate, RouteSegment, SegmentKind, Stop, TransportMode,
    TripRouteCalculation,
};
use futures::future::try_join_all;
use tracing::{debug, info, instrument, warn};

use super::fallback_estimator::FallbackEstimator;
use super::mode_resolver::TransportModeResolver;
use super::provider_registry::ProviderRegistry;
use super::route_cache::{CacheKey, RouteCache, RouteCacheStats};
use crate::error::ApplicationError;

/// A leg computation that started after its generation was superseded
#[derive(Debug, Clone, Copy)]
struct Superseded;

/// Computes single legs and whole itineraries
///
/// The cache lives as long as the service; reuse one instance across
/// calculations to benefit from memoized legs.
#[derive(Debug)]
pub struct RouteService {
    registry: ProviderRegistry,
    cache: Arc<RouteCache>,
    resolver: TransportModeResolver,
    estimator: FallbackEstimator,
    generation: AtomicU64,
}

impl RouteService {
    /// Create a service from configured providers and a cache
    #[must_use]
    pub fn new(registry: ProviderRegistry, cache: Arc<RouteCache>) -> Self {
        Self {
            registry,
            cache,
            resolver: TransportModeResolver::new(),
            estimator: FallbackEstimator::new(),
            generation: AtomicU64::new(0),
        }
    }

    /// Create a service without any provider; every leg is estimated
    #[must_use]
    pub fn fallback_only() -> Self {
        Self::new(ProviderRegistry::new(), Arc::new(RouteCache::new()))
    }

    /// Registered providers
    #[must_use]
    pub const fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Compute one leg with an explicit mode
    ///
    /// The mode resolver is not consulted; callers pick the mode.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::MissingCoordinates` if either stop has no
    /// location, or `ApplicationError::Cancelled` if [`Self::cancel_pending`]
    /// was called while the leg was being computed.
    #[instrument(
        skip(self, origin, destination),
        fields(origin = %origin.id, destination = %destination.id, mode = %mode)
    )]
    pub async fn calculate_route(
        &self,
        origin: &Stop,
        destination: &Stop,
        mode: TransportMode,
    ) -> Result<RouteSegment, ApplicationError> {
        let generation = self.current_generation();
        self.segment(origin, destination, mode, SegmentKind::Primary, generation)
            .await
    }

    /// Compute every leg of an itinerary plus its continuity segments
    ///
    /// Stops without coordinates are skipped. Fewer than two routable stops
    /// yield an empty calculation.
    ///
    /// # Errors
    ///
    /// Returns `ApplicationError::Cancelled` if [`Self::cancel_pending`] was
    /// called before the calculation finished; nothing from it is cached.
    #[instrument(skip(self, stops), fields(stops = stops.len()))]
    pub async fn calculate_trip_route(
        &self,
        stops: &[Stop],
    ) -> Result<TripRouteCalculation, ApplicationError> {
        let generation = self.current_generation();
        let routable: Vec<&Stop> = stops.iter().filter(|stop| stop.is_routable()).collect();

        if routable.len() < 2 {
            debug!(routable = routable.len(), "Not enough routable stops");
            return Ok(TripRouteCalculation::empty());
        }

        let modes = self.resolver.resolve_legs(&routable);
        let gaps = continuity_pairs(&modes);

        let primary = routable
            .windows(2)
            .zip(&modes)
            .map(|(pair, &mode)| {
                self.segment(pair[0], pair[1], mode, SegmentKind::Primary, generation)
            });
        let continuity = gaps.iter().map(|&(from, to)| {
            self.segment(
                routable[from],
                routable[to],
                TransportMode::Driving,
                SegmentKind::Continuity,
                generation,
            )
        });

        let (primary, continuity) =
            futures::try_join!(try_join_all(primary), try_join_all(continuity))?;

        if !self.is_current(generation) {
            info!("Trip route calculation cancelled");
            return Err(ApplicationError::Cancelled);
        }

        let mut calculation = TripRouteCalculation::empty();
        for segment in primary.into_iter().chain(continuity) {
            calculation.push_segment(segment);
        }

        debug!(
            segments = calculation.segments.len(),
            continuity = gaps.len(),
            "Trip route calculated"
        );
        Ok(calculation)
    }

    /// Discard every memoized leg
    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Abandon all calculations currently in flight
    ///
    /// They return `ApplicationError::Cancelled` and store nothing.
    pub fn cancel_pending(&self) {
        let previous = self.generation.fetch_add(1, Ordering::SeqCst);
        info!(generation = previous + 1, "Pending route calculations cancelled");
    }

    /// Cache hit/miss/entry counters
    pub async fn cache_stats(&self) -> RouteCacheStats {
        self.cache.stats().await
    }

    fn current_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    fn is_current(&self, generation: u64) -> bool {
        self.current_generation() == generation
    }

    async fn segment(
        &self,
        origin: &Stop,
        destination: &Stop,
        mode: TransportMode,
        kind: SegmentKind,
        generation: u64,
    ) -> Result<RouteSegment, ApplicationError> {
        let from = location_of(origin)?;
        let to = location_of(destination)?;
        let key = CacheKey::new(origin.id.clone(), destination.id.clone(), mode);

        loop {
            let fresh = AtomicBool::new(false);
            let computed = self
                .cache
                .get_or_compute(key.clone(), self.compute_leg(&key, from, to, generation, &fresh))
                .await;

            match computed {
                Ok(estimate) if self.is_current(generation) => {
                    return Ok(RouteSegment::from_estimate(
                        origin.clone(),
                        destination.clone(),
                        mode,
                        estimate,
                        kind,
                    ));
                },
                Ok(_) => {
                    // The entry was inserted before the cancellation was seen
                    if fresh.load(Ordering::SeqCst) {
                        self.cache.invalidate(&key).await;
                        debug!(key = %key, "Discarding leg computed for a cancelled calculation");
                    }
                    return Err(ApplicationError::Cancelled);
                },
                // We waited on a computation started by an older generation
                Err(_) if self.is_current(generation) => continue,
                Err(_) => return Err(ApplicationError::Cancelled),
            }
        }
    }

    async fn compute_leg(
        &self,
        key: &CacheKey,
        from: GeoLocation,
        to: GeoLocation,
        generation: u64,
        fresh: &AtomicBool,
    ) -> Result<RouteEstimate, Superseded> {
        if !self.is_current(generation) {
            return Err(Superseded);
        }

        let estimate = self.fetch_or_estimate(key, &from, &to).await;
        fresh.store(true, Ordering::SeqCst);
        Ok(estimate)
    }

    async fn fetch_or_estimate(
        &self,
        key: &CacheKey,
        from: &GeoLocation,
        to: &GeoLocation,
    ) -> RouteEstimate {
        let Some(provider) = self.registry.get(key.mode) else {
            debug!(mode = %key.mode, "No provider configured, using fallback estimate");
            return self.estimator.estimate(from, to, key.mode);
        };

        provider.fetch(from, to).await.unwrap_or_else(|error| {
            warn!(
                mode = %key.mode,
                origin = %key.origin,
                destination = %key.destination,
                error = %error,
                kind = error.kind(),
                "Routing provider failed, using fallback estimate"
            );
            self.estimator.estimate(from, to, key.mode)
        })
    }
}

fn location_of(stop: &Stop) -> Result<GeoLocation, ApplicationError> {
    stop.location.ok_or_else(|| ApplicationError::missing_coordinates(&stop.id))
}

/// Pairs of car-accessible stop indices that need a continuity segment
///
/// `modes[i]` is the resolved mode of the leg arriving at stop `i + 1`. A
/// stop is car-accessible if it is the first one or is reached by driving.
/// Two consecutive car-accessible stops get a continuity segment when the
/// stops between them include one reached on foot or by bike.
fn continuity_pairs(modes: &[TransportMode]) -> Vec<(usize, usize)> {
    let accessible: Vec<usize> = std::iter::once(0)
        .chain(
            modes
                .iter()
                .enumerate()
                .filter(|(_, mode)| **mode == TransportMode::Driving)
                .map(|(leg, _)| leg + 1),
        )
        .collect();

    accessible
        .windows(2)
        .filter(|pair| pair[1] > pair[0] + 1)
        .filter(|pair| {
            modes[pair[0]..pair[1] - 1]
                .iter()
                .any(TransportMode::is_self_propelled)
        })
        .map(|pair| (pair[0], pair[1]))
        .collect()
}
