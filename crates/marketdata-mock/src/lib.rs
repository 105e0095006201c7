#![doc = include_str!("../README.md")]
#![doc(issue_tracker_base_url = "https://github.com/quantfold/marketdata/issues/")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

//! Mock market data provider.
//!
//! # Example
//!
//! ```
//! use marketdata_mock::MockProvider;
//! use marketdata_core::{MarketDataProvider, Symbol, Timeframe};
//! use chrono::NaiveDate;
//!
//! # async fn example() -> marketdata_core::Result<()> {
//! let provider = MockProvider::new();
//! let bars = provider
//!     .fetch_bars(
//!         &Symbol::new("AAPL"),
//!         NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!         NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
//!         Timeframe::OneDay,
//!     )
//!     .await?;
//! assert!(!bars.is_empty());
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeZone, Utc, Weekday};
use rust_decimal::Decimal;
use std::collections::HashMap;
use std::sync::{Mutex, PoisonError, RwLock};
use std::time::Duration;
use tokio::time::sleep;

use marketdata_core::{
    Bar, DividendEvent, EarningsEvent, MarketDataError, MarketDataProvider, Operation,
    ProviderErrorKind, Quote, Result, Snapshot, Symbol, TickerInfo, Timeframe,
};

/// Base price for synthetic data, in cents.
const SYNTHETIC_BASE_PRICE_CENTS: i64 = 15_000;

/// Minutes in a regular trading session.
const SESSION_MINUTES: u32 = 390;

#[derive(Debug, Default)]
struct CannedData {
    bars: HashMap<Symbol, Vec<Bar>>,
    quotes: HashMap<Symbol, Quote>,
    snapshots: HashMap<Symbol, Snapshot>,
    ticker_info: HashMap<Symbol, TickerInfo>,
    earnings: HashMap<Symbol, Vec<EarningsEvent>>,
    dividends: HashMap<Symbol, Vec<DividendEvent>>,
}

#[derive(Debug, Clone)]
struct InjectedFailure {
    kind: ProviderErrorKind,
    message: String,
}

/// In-memory provider returning configurable static data.
///
/// Symbols without canned data get deterministic synthetic values, so the
/// provider works out of the box. Failure injection and latency make it
/// suitable for exercising fallback and timeout paths.
#[derive(Debug)]
pub struct MockProvider {
    name: String,
    capabilities: Vec<Operation>,
    data: RwLock<CannedData>,
    failures: RwLock<HashMap<Operation, InjectedFailure>>,
    latency: RwLock<Option<Duration>>,
    calls: Mutex<HashMap<Operation, usize>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl MockProvider {
    /// Creates a mock provider named "mock" supporting every operation.
    #[must_use]
    pub fn new() -> Self {
        Self::named("mock")
    }

    /// Creates a mock provider with a custom name, supporting every
    /// operation.
    #[must_use]
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            capabilities: Operation::ALL.to_vec(),
            data: RwLock::new(CannedData::default()),
            failures: RwLock::new(HashMap::new()),
            latency: RwLock::new(None),
            calls: Mutex::new(HashMap::new()),
        }
    }

    /// Restricts the advertised capability set.
    #[must_use]
    pub fn with_capabilities(mut self, capabilities: Vec<Operation>) -> Self {
        self.capabilities = capabilities;
        self
    }

    // --- Pre-load helpers ---

    /// Pre-loads bars for a symbol.
    pub fn set_bars(&self, symbol: &Symbol, bars: Vec<Bar>) {
        self.write_data().bars.insert(symbol.clone(), bars);
    }

    /// Pre-loads a quote for a symbol.
    pub fn set_quote(&self, symbol: &Symbol, quote: Quote) {
        self.write_data().quotes.insert(symbol.clone(), quote);
    }

    /// Pre-loads a snapshot for a symbol.
    pub fn set_snapshot(&self, symbol: &Symbol, snapshot: Snapshot) {
        self.write_data().snapshots.insert(symbol.clone(), snapshot);
    }

    /// Pre-loads ticker info for a symbol.
    pub fn set_ticker_info(&self, symbol: &Symbol, info: TickerInfo) {
        self.write_data().ticker_info.insert(symbol.clone(), info);
    }

    /// Pre-loads earnings events for a symbol.
    pub fn set_earnings(&self, symbol: &Symbol, events: Vec<EarningsEvent>) {
        self.write_data().earnings.insert(symbol.clone(), events);
    }

    /// Pre-loads dividend events for a symbol.
    pub fn set_dividends(&self, symbol: &Symbol, events: Vec<DividendEvent>) {
        self.write_data().dividends.insert(symbol.clone(), events);
    }

    // --- Failure and latency injection ---

    /// Makes every call for `operation` fail with the given kind.
    pub fn fail_operation(
        &self,
        operation: Operation,
        kind: ProviderErrorKind,
        message: impl Into<String>,
    ) {
        self.failures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                operation,
                InjectedFailure {
                    kind,
                    message: message.into(),
                },
            );
    }

    /// Removes an injected failure.
    pub fn clear_failure(&self, operation: Operation) {
        self.failures
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&operation);
    }

    /// Delays every call by `latency` before responding.
    pub fn set_latency(&self, latency: Duration) {
        *self
            .latency
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(latency);
    }

    /// Number of calls made for `operation` so far.
    #[must_use]
    pub fn call_count(&self, operation: Operation) -> usize {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&operation)
            .copied()
            .unwrap_or(0)
    }

    // --- Internal ---

    fn write_data(&self) -> std::sync::RwLockWriteGuard<'_, CannedData> {
        self.data.write().unwrap_or_else(PoisonError::into_inner)
    }

    fn read_data(&self) -> std::sync::RwLockReadGuard<'_, CannedData> {
        self.data.read().unwrap_or_else(PoisonError::into_inner)
    }

    async fn enter(&self, operation: Operation) -> Result<()> {
        *self
            .calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(operation)
            .or_insert(0) += 1;

        let latency = *self.latency.read().unwrap_or_else(PoisonError::into_inner);
        if let Some(latency) = latency {
            sleep(latency).await;
        }

        let failure = self
            .failures
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&operation)
            .cloned();
        if let Some(failure) = failure {
            return Err(MarketDataError::Provider {
                provider: self.name.clone(),
                kind: failure.kind,
                message: failure.message,
            });
        }
        Ok(())
    }

    fn synthetic_quote(&self, symbol: &Symbol) -> Quote {
        Quote::new(
            symbol.clone(),
            Utc::now(),
            Decimal::new(SYNTHETIC_BASE_PRICE_CENTS - 1, 2),
            Decimal::new(100, 0),
            Decimal::new(SYNTHETIC_BASE_PRICE_CENTS + 1, 2),
            Decimal::new(200, 0),
        )
        .with_last(
            Decimal::new(SYNTHETIC_BASE_PRICE_CENTS, 2),
            Decimal::new(50, 0),
        )
    }

    fn synthetic_bars(
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        timeframe: Timeframe,
    ) -> Vec<Bar> {
        let minutes = (timeframe.duration().as_secs() / 60) as u32;
        let bars_per_day = (SESSION_MINUTES / minutes).max(1);
        let mut bars = Vec::new();

        for day in start.iter_days().take_while(|d| *d <= end) {
            if matches!(day.weekday(), Weekday::Sat | Weekday::Sun) {
                continue;
            }
            let open_time = NaiveTime::from_hms_opt(14, 30, 0).unwrap_or_default();
            let session_open: DateTime<Utc> = Utc.from_utc_datetime(&day.and_time(open_time));

            for i in 0..bars_per_day {
                let ts = session_open + chrono::TimeDelta::minutes(i64::from(i * minutes));
                let open = Decimal::new(SYNTHETIC_BASE_PRICE_CENTS + i64::from(i % 5) * 10, 2);
                let high = open + Decimal::new(25, 2);
                let low = open - Decimal::new(15, 2);
                let close = open + Decimal::new(5, 2);
                let vwap = (open + high + low + close) / Decimal::new(4, 0);
                bars.push(
                    Bar::new(
                        symbol.clone(),
                        ts,
                        timeframe,
                        open,
                        high,
                        low,
                        close,
                        10_000 + u64::from(i) * 100,
                    )
                    .with_vwap(vwap)
                    .with_num_trades(50 + i),
                );
            }
        }

        bars
    }
}

#[async_trait]
impl MarketDataProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    fn capabilities(&self) -> &[Operation] {
        &self.capabilities
    }

    async fn fetch_bars(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>> {
        self.enter(Operation::Bars).await?;
        let canned = self.read_data().bars.get(symbol).cloned();
        match canned {
            Some(bars) => Ok(bars
                .into_iter()
                .filter(|b| {
                    let d = b.timestamp.date_naive();
                    start <= d && d <= end
                })
                .collect()),
            None => Ok(Self::synthetic_bars(symbol, start, end, timeframe)),
        }
    }

    async fn fetch_quote(&self, symbol: &Symbol) -> Result<Quote> {
        self.enter(Operation::Quote).await?;
        let canned = self.read_data().quotes.get(symbol).cloned();
        Ok(canned.unwrap_or_else(|| self.synthetic_quote(symbol)))
    }

    async fn fetch_snapshot(&self, symbol: &Symbol) -> Result<Snapshot> {
        self.enter(Operation::Snapshot).await?;
        let canned = self.read_data().snapshots.get(symbol).cloned();
        Ok(canned.unwrap_or_else(|| {
            let quote = self.synthetic_quote(symbol);
            Snapshot::new(symbol.clone(), quote.timestamp, quote)
        }))
    }

    async fn fetch_ticker_info(&self, symbol: &Symbol) -> Result<TickerInfo> {
        self.enter(Operation::TickerInfo).await?;
        let canned = self.read_data().ticker_info.get(symbol).cloned();
        Ok(canned.unwrap_or_else(|| TickerInfo::new(symbol.clone(), format!("{symbol} Inc."))))
    }

    async fn fetch_earnings(&self, symbol: &Symbol, limit: usize) -> Result<Vec<EarningsEvent>> {
        self.enter(Operation::Earnings).await?;
        let mut events = self.read_data().earnings.get(symbol).cloned().unwrap_or_default();
        events.truncate(limit);
        Ok(events)
    }

    async fn fetch_dividends(&self, symbol: &Symbol, limit: usize) -> Result<Vec<DividendEvent>> {
        self.enter(Operation::Dividends).await?;
        let mut events = self.read_data().dividends.get(symbol).cloned().unwrap_or_default();
        events.truncate(limit);
        Ok(events)
    }
}
