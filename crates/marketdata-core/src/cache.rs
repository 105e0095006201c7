//! Cache abstraction for fetched market data.
//!
//! The cache maps a composite [`CacheKey`] - operation kind plus normalized
//! parameters - to a [`CachedValue`] recorded with its fetch time. Each
//! operation kind carries its own TTL via [`CachePolicy`]. Implementations
//! live in the `marketdata-cache` crate.

use async_trait::async_trait;
use chrono::NaiveDate;
use std::fmt;
use std::time::Duration;

use crate::error::{MarketDataError, Result};
use crate::provider::Operation;
use crate::timeframe::Timeframe;
use crate::types::{Bar, DividendEvent, EarningsEvent, Quote, Snapshot, Symbol, TickerInfo};

/// Composite cache key: operation kind, symbol, and the remaining request
/// parameters in normalized string form.
///
/// Two requests with equal keys are interchangeable within the operation's
/// TTL. The provider identity is deliberately absent: the cache is
/// last-write-wins with no provider bias.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CacheKey {
    /// Operation this entry belongs to.
    pub operation: Operation,
    /// Symbol the request was for.
    pub symbol: Symbol,
    /// Remaining request parameters, pipe-joined.
    pub params: String,
}

impl CacheKey {
    /// Key for a bars request.
    #[must_use]
    pub fn bars(symbol: &Symbol, timeframe: Timeframe, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            operation: Operation::Bars,
            symbol: symbol.clone(),
            params: format!("{timeframe}|{start}|{end}"),
        }
    }

    /// Key for a quote request.
    #[must_use]
    pub fn quote(symbol: &Symbol) -> Self {
        Self {
            operation: Operation::Quote,
            symbol: symbol.clone(),
            params: String::new(),
        }
    }

    /// Key for a snapshot request.
    #[must_use]
    pub fn snapshot(symbol: &Symbol) -> Self {
        Self {
            operation: Operation::Snapshot,
            symbol: symbol.clone(),
            params: String::new(),
        }
    }

    /// Key for a ticker info request.
    #[must_use]
    pub fn ticker_info(symbol: &Symbol) -> Self {
        Self {
            operation: Operation::TickerInfo,
            symbol: symbol.clone(),
            params: String::new(),
        }
    }

    /// Key for an earnings request.
    #[must_use]
    pub fn earnings(symbol: &Symbol, limit: usize) -> Self {
        Self {
            operation: Operation::Earnings,
            symbol: symbol.clone(),
            params: limit.to_string(),
        }
    }

    /// Key for a dividends request.
    #[must_use]
    pub fn dividends(symbol: &Symbol, limit: usize) -> Self {
        Self {
            operation: Operation::Dividends,
            symbol: symbol.clone(),
            params: limit.to_string(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}|{}", self.operation, self.symbol)
        } else {
            write!(f, "{}|{}|{}", self.operation, self.symbol, self.params)
        }
    }
}

/// A canonical payload stored in the cache.
#[derive(Clone, Debug, PartialEq)]
pub enum CachedValue {
    /// A bar sequence.
    Bars(Vec<Bar>),
    /// A single quote.
    Quote(Quote),
    /// A snapshot.
    Snapshot(Snapshot),
    /// Ticker reference data.
    TickerInfo(TickerInfo),
    /// An earnings event sequence.
    Earnings(Vec<EarningsEvent>),
    /// A dividend event sequence.
    Dividends(Vec<DividendEvent>),
}

impl CachedValue {
    fn type_name(&self) -> &'static str {
        match self {
            Self::Bars(_) => "bars",
            Self::Quote(_) => "quote",
            Self::Snapshot(_) => "snapshot",
            Self::TickerInfo(_) => "ticker_info",
            Self::Earnings(_) => "earnings",
            Self::Dividends(_) => "dividends",
        }
    }

    fn mismatch(&self, expected: &'static str) -> MarketDataError {
        MarketDataError::Cache(format!(
            "cached value holds {} where {expected} was expected",
            self.type_name()
        ))
    }
}

macro_rules! cached_value_conversions {
    ($($variant:ident => $ty:ty, $name:literal;)*) => {
        $(
            impl From<$ty> for CachedValue {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }

            impl TryFrom<CachedValue> for $ty {
                type Error = MarketDataError;

                fn try_from(value: CachedValue) -> Result<Self> {
                    match value {
                        CachedValue::$variant(inner) => Ok(inner),
                        other => Err(other.mismatch($name)),
                    }
                }
            }
        )*
    };
}

cached_value_conversions! {
    Bars => Vec<Bar>, "bars";
    Quote => Quote, "quote";
    Snapshot => Snapshot, "snapshot";
    TickerInfo => TickerInfo, "ticker_info";
    Earnings => Vec<EarningsEvent>, "earnings";
    Dividends => Vec<DividendEvent>, "dividends";
}

/// Per-operation cache TTLs.
///
/// Defaults reflect how quickly each data kind goes stale: quotes and
/// snapshots in seconds, reference data in hours, closed-day bars for a
/// full day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CachePolicy {
    /// TTL for bar sequences.
    pub bars: Duration,
    /// TTL for quotes.
    pub quote: Duration,
    /// TTL for snapshots.
    pub snapshot: Duration,
    /// TTL for ticker reference data.
    pub ticker_info: Duration,
    /// TTL for earnings events.
    pub earnings: Duration,
    /// TTL for dividend events.
    pub dividends: Duration,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            bars: Duration::from_secs(24 * 60 * 60),
            quote: Duration::from_secs(5),
            snapshot: Duration::from_secs(5),
            ticker_info: Duration::from_secs(6 * 60 * 60),
            earnings: Duration::from_secs(12 * 60 * 60),
            dividends: Duration::from_secs(12 * 60 * 60),
        }
    }
}

impl CachePolicy {
    /// TTL for the given operation.
    #[must_use]
    pub const fn ttl(&self, operation: Operation) -> Duration {
        match operation {
            Operation::Bars => self.bars,
            Operation::Quote => self.quote,
            Operation::Snapshot => self.snapshot,
            Operation::TickerInfo => self.ticker_info,
            Operation::Earnings => self.earnings,
            Operation::Dividends => self.dividends,
        }
    }

    /// Sets the TTL for one operation.
    #[must_use]
    pub const fn with_ttl(mut self, operation: Operation, ttl: Duration) -> Self {
        match operation {
            Operation::Bars => self.bars = ttl,
            Operation::Quote => self.quote = ttl,
            Operation::Snapshot => self.snapshot = ttl,
            Operation::TickerInfo => self.ticker_info = ttl,
            Operation::Earnings => self.earnings = ttl,
            Operation::Dividends => self.dividends = ttl,
        }
        self
    }
}

/// Trait for caching fetched market data.
///
/// `get` must return a value only while it is fresh under the operation's
/// TTL; `put` overwrites unconditionally and records the current time.
/// Failed fetches never reach `put`, so there is no negative caching.
#[async_trait]
pub trait MarketDataCache: Send + Sync + fmt::Debug {
    /// Returns the cached value for `key` if present and fresh.
    async fn get(&self, key: &CacheKey) -> Result<Option<CachedValue>>;

    /// Stores `value` under `key`, replacing any previous entry.
    async fn put(&self, key: CacheKey, value: CachedValue) -> Result<()>;

    /// Removes all entries for one symbol. Returns the number removed.
    async fn clear_symbol(&self, symbol: &Symbol) -> Result<usize>;

    /// Removes every entry.
    async fn clear(&self) -> Result<()>;

    /// Removes entries past their TTL. Returns the number removed.
    async fn purge_expired(&self) -> Result<usize>;
}
