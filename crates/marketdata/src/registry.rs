//! Provider registry with capability-based filtering.

use std::fmt;
use std::sync::Arc;

use tracing::debug;

use marketdata_core::{MarketDataError, MarketDataProvider, Operation, Result};

/// Providers in priority order, filterable by capability.
///
/// Registration order is priority order: the first registered provider
/// capable of an operation is tried first. The order is fixed once
/// registration is done; nothing reorders providers at runtime.
#[derive(Default)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn MarketDataProvider>>,
}

impl fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field(
                "providers",
                &self.providers.iter().map(|p| p.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl ProviderRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a provider at the lowest priority.
    pub fn register(&mut self, provider: Arc<dyn MarketDataProvider>) {
        debug!(
            provider = provider.name(),
            capabilities = ?provider.capabilities(),
            "registering provider"
        );
        self.providers.push(provider);
    }

    /// Number of registered providers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.providers.len()
    }

    /// Returns true if no providers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// The providers supporting `operation`, in priority order.
    ///
    /// An empty result is a configuration error: the caller asked for an
    /// operation no registered provider can serve.
    pub fn providers_for(&self, operation: Operation) -> Result<Vec<Arc<dyn MarketDataProvider>>> {
        let capable: Vec<_> = self
            .providers
            .iter()
            .filter(|p| p.supports(operation))
            .cloned()
            .collect();
        if capable.is_empty() {
            return Err(MarketDataError::Configuration(format!(
                "no registered provider supports {operation}"
            )));
        }
        Ok(capable)
    }
}
