//! No-op cache implementation.

use async_trait::async_trait;
use tracing::trace;

use marketdata_core::cache::{CacheKey, CachedValue, MarketDataCache};
use marketdata_core::{Result, Symbol};

/// A cache that stores nothing.
///
/// Every `get` misses and every `put` is discarded. Useful for disabling
/// caching without changing router or manager code paths.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCache;

impl NoopCache {
    /// Creates a new no-op cache.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MarketDataCache for NoopCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>> {
        trace!(key = %key, "noop cache get");
        Ok(None)
    }

    async fn put(&self, key: CacheKey, _value: CachedValue) -> Result<()> {
        trace!(key = %key, "noop cache put");
        Ok(())
    }

    async fn clear_symbol(&self, _symbol: &Symbol) -> Result<usize> {
        Ok(0)
    }

    async fn clear(&self) -> Result<()> {
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use marketdata_core::Quote;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn never_stores() {
        let cache = NoopCache::new();
        let key = CacheKey::quote(&Symbol::new("AAPL"));
        let value = CachedValue::Quote(Quote::new(
            Symbol::new("AAPL"),
            Utc.with_ymd_and_hms(2024, 1, 15, 15, 30, 0).unwrap(),
            dec!(149.99),
            dec!(100),
            dec!(150.01),
            dec!(200),
        ));

        cache.put(key.clone(), value).await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_none());
        assert_eq!(cache.purge_expired().await.unwrap(), 0);
    }
}
