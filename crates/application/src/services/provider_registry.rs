//! Mode-to-provider lookup

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use domain::TransportMode;

use crate::ports::RouteProviderPort;

/// Routing backends keyed by the mode they serve
///
/// A mode without an entry is estimated by the fallback alone. One provider
/// may be registered under several modes.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<TransportMode, Arc<dyn RouteProviderPort>>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut modes: Vec<_> = self.providers.keys().copied().collect();
        modes.sort();
        f.debug_struct("ProviderRegistry")
            .field("modes", &modes)
            .finish()
    }
}

impl ProviderRegistry {
    /// Create an empty registry
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a provider for a mode, replacing any previous one
    #[must_use]
    pub fn with_provider(
        mut self,
        mode: TransportMode,
        provider: Arc<dyn RouteProviderPort>,
    ) -> Self {
        self.register(mode, provider);
        self
    }

    /// Register a provider for a mode, replacing any previous one
    pub fn register(&mut self, mode: TransportMode, provider: Arc<dyn RouteProviderPort>) {
        self.providers.insert(mode, provider);
    }

    /// Provider serving `mode`, if any
    #[must_use]
    pub fn get(&self, mode: TransportMode) -> Option<&Arc<dyn RouteProviderPort>> {
        self.providers.get(&mode)
    }

    /// Whether a provider serves `mode`
    #[must_use]
    pub fn has(&self, mode: TransportMode) -> bool {
        self.providers.contains_key(&mode)
    }

    /// Whether no provider is registered at all
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
