//! Manager configuration.

use std::collections::HashMap;
use std::time::Duration;

use marketdata_core::CachePolicy;

/// Default deadline for a single provider call.
pub const DEFAULT_PROVIDER_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for a [`MarketDataManager`](crate::MarketDataManager).
///
/// Built once at construction and immutable afterwards. Credentials are
/// not part of this struct; they live inside provider constructors and
/// are opaque to the orchestration core.
#[derive(Clone, Debug)]
pub struct ManagerConfig {
    /// Deadline for each provider call, unless overridden per provider.
    pub provider_timeout: Duration,
    /// Per-provider timeout overrides, keyed by provider name.
    pub provider_timeout_overrides: HashMap<String, Duration>,
    /// Per-operation cache TTLs.
    pub cache_policy: CachePolicy,
    /// Entry ceiling for the manager-owned in-memory cache.
    pub max_cache_entries: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            provider_timeout: DEFAULT_PROVIDER_TIMEOUT,
            provider_timeout_overrides: HashMap::new(),
            cache_policy: CachePolicy::default(),
            max_cache_entries: marketdata_cache::DEFAULT_MAX_ENTRIES,
        }
    }
}

impl ManagerConfig {
    /// Creates a config with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the default provider call deadline.
    #[must_use]
    pub fn with_provider_timeout(mut self, timeout: Duration) -> Self {
        self.provider_timeout = timeout;
        self
    }

    /// Overrides the call deadline for one provider.
    #[must_use]
    pub fn with_timeout_override(mut self, provider: impl Into<String>, timeout: Duration) -> Self {
        self.provider_timeout_overrides
            .insert(provider.into(), timeout);
        self
    }

    /// Sets the cache TTL policy.
    #[must_use]
    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    /// Sets the cache entry ceiling.
    #[must_use]
    pub fn with_max_cache_entries(mut self, max_entries: usize) -> Self {
        self.max_cache_entries = max_entries;
        self
    }

    /// The call deadline for the named provider.
    #[must_use]
    pub fn timeout_for(&self, provider: &str) -> Duration {
        self.provider_timeout_overrides
            .get(provider)
            .copied()
            .unwrap_or(self.provider_timeout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_beats_default() {
        let config = ManagerConfig::new()
            .with_provider_timeout(Duration::from_secs(5))
            .with_timeout_override("slow-vendor", Duration::from_secs(30));
        assert_eq!(config.timeout_for("slow-vendor"), Duration::from_secs(30));
        assert_eq!(config.timeout_for("anything-else"), Duration::from_secs(5));
    }
}
