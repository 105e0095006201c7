//! Manager facade over the registry, router, and cache.

use std::sync::Arc;

use chrono::NaiveDate;
use futures::FutureExt;

use marketdata_cache::MemoryCache;
use marketdata_core::{
    Bar, CacheKey, DividendEvent, EarningsEvent, MarketDataCache, MarketDataError,
    MarketDataProvider, Operation, Quote, Result, Snapshot, Symbol, TickerInfo, Timeframe,
    calendar, quality,
};

use crate::cancel::CancelToken;
use crate::config::ManagerConfig;
use crate::router::{FallbackRouter, Fetched};

/// The single entry point for fetching market data.
///
/// Owns the provider registry, the cache, and the fallback router.
/// Providers are registered in priority order; every operation checks
/// its parameters locally, then goes cache-first through the provider
/// chain. The manager is `Send + Sync` and is meant to be shared behind
/// an `Arc` once registration is done.
///
/// # Example
///
/// ```
/// use marketdata::{CancelToken, ManagerConfig, MarketDataManager, MockProvider, Symbol};
/// use std::sync::Arc;
///
/// # async fn example() -> marketdata::Result<()> {
/// let mut manager = MarketDataManager::new(ManagerConfig::default());
/// manager.register(Arc::new(MockProvider::new()));
///
/// let quote = manager
///     .get_quote(&Symbol::new("AAPL"), &CancelToken::new())
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct MarketDataManager {
    cache: Arc<dyn MarketDataCache>,
    router: FallbackRouter,
}

impl MarketDataManager {
    /// Creates a manager owning an in-memory cache built from `config`.
    #[must_use]
    pub fn new(config: ManagerConfig) -> Self {
        let cache = Arc::new(MemoryCache::with_max_entries(
            config.cache_policy.clone(),
            config.max_cache_entries,
        ));
        Self::with_cache(config, cache)
    }

    /// Creates a manager with a caller-supplied cache backend.
    #[must_use]
    pub fn with_cache(config: ManagerConfig, cache: Arc<dyn MarketDataCache>) -> Self {
        Self {
            cache: Arc::clone(&cache),
            router: FallbackRouter::new(cache, config),
        }
    }

    /// Registers a provider at the lowest priority.
    pub fn register(&mut self, provider: Arc<dyn MarketDataProvider>) {
        self.router.register(provider);
    }

    /// Fetches historical OHLCV bars for an inclusive date range.
    pub async fn get_bars(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        timeframe: Timeframe,
        cancel: &CancelToken,
    ) -> Result<Fetched<Vec<Bar>>> {
        check_symbol(symbol)?;
        if start > end {
            return Err(MarketDataError::InvalidParameter(format!(
                "start {start} is after end {end}"
            )));
        }
        let owned = symbol.clone();
        self.router
            .dispatch(
                Operation::Bars,
                CacheKey::bars(symbol, timeframe, start, end),
                cancel,
                move |p| {
                    let symbol = owned.clone();
                    async move { p.fetch_bars(&symbol, start, end, timeframe).await }.boxed()
                },
                |bars: &Vec<Bar>| quality::validate_bars(bars),
            )
            .await
    }

    /// Fetches the current bid/ask quote.
    pub async fn get_quote(&self, symbol: &Symbol, cancel: &CancelToken) -> Result<Fetched<Quote>> {
        check_symbol(symbol)?;
        let owned = symbol.clone();
        self.router
            .dispatch(
                Operation::Quote,
                CacheKey::quote(symbol),
                cancel,
                move |p| {
                    let symbol = owned.clone();
                    async move { p.fetch_quote(&symbol).await }.boxed()
                },
                quality::validate_quote,
            )
            .await
    }

    /// Fetches quotes for several symbols, sequentially.
    ///
    /// Each symbol gets its own full cache-and-fallback pass; one
    /// symbol's failure does not affect the others.
    pub async fn get_quotes(
        &self,
        symbols: &[Symbol],
        cancel: &CancelToken,
    ) -> Vec<(Symbol, Result<Fetched<Quote>>)> {
        let mut results = Vec::with_capacity(symbols.len());
        for symbol in symbols {
            let result = self.get_quote(symbol, cancel).await;
            results.push((symbol.clone(), result));
        }
        results
    }

    /// Fetches a point-in-time snapshot.
    pub async fn get_snapshot(
        &self,
        symbol: &Symbol,
        cancel: &CancelToken,
    ) -> Result<Fetched<Snapshot>> {
        check_symbol(symbol)?;
        let owned = symbol.clone();
        self.router
            .dispatch(
                Operation::Snapshot,
                CacheKey::snapshot(symbol),
                cancel,
                move |p| {
                    let symbol = owned.clone();
                    async move { p.fetch_snapshot(&symbol).await }.boxed()
                },
                quality::validate_snapshot,
            )
            .await
    }

    /// Fetches ticker reference data.
    pub async fn get_ticker_info(
        &self,
        symbol: &Symbol,
        cancel: &CancelToken,
    ) -> Result<Fetched<TickerInfo>> {
        check_symbol(symbol)?;
        let owned = symbol.clone();
        self.router
            .dispatch(
                Operation::TickerInfo,
                CacheKey::ticker_info(symbol),
                cancel,
                move |p| {
                    let symbol = owned.clone();
                    async move { p.fetch_ticker_info(&symbol).await }.boxed()
                },
                quality::validate_ticker_info,
            )
            .await
    }

    /// Fetches the most recent earnings events, newest first.
    pub async fn get_earnings(
        &self,
        symbol: &Symbol,
        limit: usize,
        cancel: &CancelToken,
    ) -> Result<Fetched<Vec<EarningsEvent>>> {
        check_symbol(symbol)?;
        check_limit(limit)?;
        let owned = symbol.clone();
        self.router
            .dispatch(
                Operation::Earnings,
                CacheKey::earnings(symbol, limit),
                cancel,
                move |p| {
                    let symbol = owned.clone();
                    async move { p.fetch_earnings(&symbol, limit).await }.boxed()
                },
                |events: &Vec<EarningsEvent>| quality::validate_earnings(events),
            )
            .await
    }

    /// Fetches the most recent dividend events, newest first.
    pub async fn get_dividends(
        &self,
        symbol: &Symbol,
        limit: usize,
        cancel: &CancelToken,
    ) -> Result<Fetched<Vec<DividendEvent>>> {
        check_symbol(symbol)?;
        check_limit(limit)?;
        let owned = symbol.clone();
        self.router
            .dispatch(
                Operation::Dividends,
                CacheKey::dividends(symbol, limit),
                cancel,
                move |p| {
                    let symbol = owned.clone();
                    async move { p.fetch_dividends(&symbol, limit).await }.boxed()
                },
                |events: &Vec<DividendEvent>| quality::validate_dividends(events),
            )
            .await
    }

    /// NYSE trading dates in an inclusive range. Purely local, no
    /// provider or cache involvement.
    pub fn trading_dates(&self, start: NaiveDate, end: NaiveDate) -> Result<Vec<NaiveDate>> {
        if start > end {
            return Err(MarketDataError::InvalidParameter(format!(
                "start {start} is after end {end}"
            )));
        }
        Ok(calendar::trading_dates(start, end))
    }

    /// Drops every cached entry for one symbol. Returns the number
    /// removed.
    pub async fn clear_cache(&self, symbol: &Symbol) -> Result<usize> {
        self.cache.clear_symbol(symbol).await
    }

    /// Drops every cached entry.
    pub async fn clear_all_cache(&self) -> Result<()> {
        self.cache.clear().await
    }
}

fn check_symbol(symbol: &Symbol) -> Result<()> {
    if symbol.is_empty() {
        return Err(MarketDataError::InvalidParameter(
            "symbol must not be empty".to_string(),
        ));
    }
    Ok(())
}

fn check_limit(limit: usize) -> Result<()> {
    if limit == 0 {
        return Err(MarketDataError::InvalidParameter(
            "limit must be at least 1".to_string(),
        ));
    }
    Ok(())
}
