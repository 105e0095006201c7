//! In-memory cache with per-operation TTLs and LRU eviction.

use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Instant;
use tokio::sync::Mutex;
use tracing::debug;

use marketdata_core::cache::{CacheKey, CachePolicy, CachedValue, MarketDataCache};
use marketdata_core::{Result, Symbol};

/// Default entry-count ceiling before LRU eviction kicks in.
pub const DEFAULT_MAX_ENTRIES: usize = 1024;

#[derive(Debug)]
struct Entry {
    value: CachedValue,
    fetched_at: Instant,
    last_used: u64,
}

#[derive(Debug, Default)]
struct Inner {
    entries: HashMap<CacheKey, Entry>,
    // Monotonic recency counter; bumped on every touch.
    tick: u64,
}

impl Inner {
    fn next_tick(&mut self) -> u64 {
        self.tick += 1;
        self.tick
    }
}

/// Bounded in-memory cache.
///
/// Entries expire after the operation's TTL from [`CachePolicy`]; once the
/// entry ceiling is reached, the least-recently-used entry is evicted on
/// insert. Expiry and eviction are independent: an entry may be evicted
/// under pressure well before it expires. `put` is last-write-wins with no
/// provider bias, and lookups/inserts on the same key are serialized by a
/// single lock, so readers always observe a complete entry.
#[derive(Debug)]
pub struct MemoryCache {
    inner: Mutex<Inner>,
    policy: CachePolicy,
    max_entries: usize,
}

impl MemoryCache {
    /// Creates a cache with the given TTL policy and default entry ceiling.
    #[must_use]
    pub fn new(policy: CachePolicy) -> Self {
        Self::with_max_entries(policy, DEFAULT_MAX_ENTRIES)
    }

    /// Creates a cache with the given TTL policy and entry ceiling.
    ///
    /// A ceiling of zero is treated as one: the cache always holds the most
    /// recent insert.
    #[must_use]
    pub fn with_max_entries(policy: CachePolicy, max_entries: usize) -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            policy,
            max_entries: max_entries.max(1),
        }
    }

    /// Number of live entries, including any not yet purged after expiry.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.entries.len()
    }

    /// Returns true if the cache holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn is_expired(&self, key: &CacheKey, entry: &Entry) -> bool {
        entry.fetched_at.elapsed() >= self.policy.ttl(key.operation)
    }
}

#[async_trait]
impl MarketDataCache for MemoryCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>> {
        let mut inner = self.inner.lock().await;
        let Some(entry) = inner.entries.get(key) else {
            debug!(key = %key, "cache miss");
            return Ok(None);
        };
        if self.is_expired(key, entry) {
            inner.entries.remove(key);
            debug!(key = %key, "cache entry expired");
            return Ok(None);
        }
        let tick = inner.next_tick();
        let entry = inner
            .entries
            .get_mut(key)
            .ok_or_else(|| marketdata_core::MarketDataError::Cache("entry vanished".into()))?;
        entry.last_used = tick;
        debug!(key = %key, "cache hit");
        Ok(Some(entry.value.clone()))
    }

    async fn put(&self, key: CacheKey, value: CachedValue) -> Result<()> {
        let mut inner = self.inner.lock().await;
        let tick = inner.next_tick();
        inner.entries.insert(
            key,
            Entry {
                value,
                fetched_at: Instant::now(),
                last_used: tick,
            },
        );

        while inner.entries.len() > self.max_entries {
            let Some(oldest) = inner
                .entries
                .iter()
                .min_by_key(|(_, e)| e.last_used)
                .map(|(k, _)| k.clone())
            else {
                break;
            };
            inner.entries.remove(&oldest);
            debug!(key = %oldest, "evicted least-recently-used cache entry");
        }
        Ok(())
    }

    async fn clear_symbol(&self, symbol: &Symbol) -> Result<usize> {
        let mut inner = self.inner.lock().await;
        let before = inner.entries.len();
        inner.entries.retain(|k, _| &k.symbol != symbol);
        Ok(before - inner.entries.len())
    }

    async fn clear(&self) -> Result<()> {
        self.inner.lock().await.entries.clear();
        Ok(())
    }

    async fn purge_expired(&self) -> Result<usize> {
        let mut inner = self.inner.lock().await;
        let before = inner.entries.len();
        let policy = &self.policy;
        inner
            .entries
            .retain(|k, e| e.fetched_at.elapsed() < policy.ttl(k.operation));
        let removed = before - inner.entries.len();
        if removed > 0 {
            debug!(removed, "purged expired cache entries");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use marketdata_core::{Operation, Quote, Timeframe};
    use rust_decimal_macros::dec;
    use std::time::Duration;

    fn quote(symbol: &str) -> CachedValue {
        CachedValue::Quote(Quote::new(
            Symbol::new(symbol),
            Utc.with_ymd_and_hms(2024, 1, 15, 15, 30, 0).unwrap(),
            dec!(149.99),
            dec!(100),
            dec!(150.01),
            dec!(200),
        ))
    }

    #[tokio::test]
    async fn get_returns_fresh_entry() {
        let cache = MemoryCache::new(CachePolicy::default());
        let key = CacheKey::quote(&Symbol::new("AAPL"));

        assert!(cache.get(&key).await.unwrap().is_none());
        cache.put(key.clone(), quote("AAPL")).await.unwrap();
        assert_eq!(cache.get(&key).await.unwrap(), Some(quote("AAPL")));
    }

    #[tokio::test]
    async fn zero_ttl_always_misses() {
        let policy = CachePolicy::default().with_ttl(Operation::Quote, Duration::ZERO);
        let cache = MemoryCache::new(policy);
        let key = CacheKey::quote(&Symbol::new("AAPL"));

        cache.put(key.clone(), quote("AAPL")).await.unwrap();
        assert!(cache.get(&key).await.unwrap().is_none());
        // The stale entry was dropped on the failed lookup.
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn expiry_honors_per_operation_ttl() {
        let policy = CachePolicy::default()
            .with_ttl(Operation::Quote, Duration::from_millis(20))
            .with_ttl(Operation::TickerInfo, Duration::from_secs(60));
        let cache = MemoryCache::new(policy);
        let quote_key = CacheKey::quote(&Symbol::new("AAPL"));
        let info_key = CacheKey::ticker_info(&Symbol::new("AAPL"));

        cache.put(quote_key.clone(), quote("AAPL")).await.unwrap();
        cache
            .put(
                info_key.clone(),
                CachedValue::TickerInfo(marketdata_core::TickerInfo::new(
                    Symbol::new("AAPL"),
                    "Apple Inc.",
                )),
            )
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(40)).await;
        assert!(cache.get(&quote_key).await.unwrap().is_none());
        assert!(cache.get(&info_key).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn lru_eviction_at_ceiling() {
        let cache = MemoryCache::with_max_entries(CachePolicy::default(), 2);
        let a = CacheKey::quote(&Symbol::new("AAPL"));
        let b = CacheKey::quote(&Symbol::new("MSFT"));
        let c = CacheKey::quote(&Symbol::new("GOOG"));

        cache.put(a.clone(), quote("AAPL")).await.unwrap();
        cache.put(b.clone(), quote("MSFT")).await.unwrap();
        // Touch AAPL so MSFT becomes the LRU entry.
        assert!(cache.get(&a).await.unwrap().is_some());
        cache.put(c.clone(), quote("GOOG")).await.unwrap();

        assert_eq!(cache.len().await, 2);
        assert!(cache.get(&b).await.unwrap().is_none());
        assert!(cache.get(&a).await.unwrap().is_some());
        assert!(cache.get(&c).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn put_overwrites_last_write_wins() {
        let cache = MemoryCache::new(CachePolicy::default());
        let key = CacheKey::quote(&Symbol::new("AAPL"));

        cache.put(key.clone(), quote("AAPL")).await.unwrap();
        let replacement = CachedValue::Quote(Quote::new(
            Symbol::new("AAPL"),
            Utc.with_ymd_and_hms(2024, 1, 15, 15, 31, 0).unwrap(),
            dec!(150.10),
            dec!(300),
            dec!(150.12),
            dec!(100),
        ));
        cache.put(key.clone(), replacement.clone()).await.unwrap();

        assert_eq!(cache.get(&key).await.unwrap(), Some(replacement));
        assert_eq!(cache.len().await, 1);
    }

    #[tokio::test]
    async fn clear_symbol_removes_only_that_symbol() {
        let cache = MemoryCache::new(CachePolicy::default());
        let aapl = Symbol::new("AAPL");
        let msft = Symbol::new("MSFT");

        cache
            .put(CacheKey::quote(&aapl), quote("AAPL"))
            .await
            .unwrap();
        cache
            .put(CacheKey::ticker_info(&aapl), quote("AAPL"))
            .await
            .unwrap();
        cache
            .put(CacheKey::quote(&msft), quote("MSFT"))
            .await
            .unwrap();

        let removed = cache.clear_symbol(&aapl).await.unwrap();
        assert_eq!(removed, 2);
        assert_eq!(cache.len().await, 1);
        assert!(cache.get(&CacheKey::quote(&msft)).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn purge_expired_counts_removed() {
        let policy = CachePolicy::default().with_ttl(Operation::Quote, Duration::ZERO);
        let cache = MemoryCache::new(policy);
        cache
            .put(CacheKey::quote(&Symbol::new("AAPL")), quote("AAPL"))
            .await
            .unwrap();
        cache
            .put(CacheKey::quote(&Symbol::new("MSFT")), quote("MSFT"))
            .await
            .unwrap();

        assert_eq!(cache.purge_expired().await.unwrap(), 2);
        assert!(cache.is_empty().await);
    }

    #[tokio::test]
    async fn bars_key_is_timeframe_scoped() {
        let cache = MemoryCache::new(CachePolicy::default());
        let symbol = Symbol::new("AAPL");
        let start = chrono::NaiveDate::from_ymd_opt(2024, 1, 2).unwrap();
        let end = chrono::NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();

        let daily = CacheKey::bars(&symbol, Timeframe::OneDay, start, end);
        let minute = CacheKey::bars(&symbol, Timeframe::OneMinute, start, end);
        cache.put(daily.clone(), CachedValue::Bars(vec![])).await.unwrap();

        assert!(cache.get(&daily).await.unwrap().is_some());
        assert!(cache.get(&minute).await.unwrap().is_none());
    }
}
