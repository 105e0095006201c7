//! Provider capability interface.
//!
//! Every vendor collaborator implements [`MarketDataProvider`]: a single
//! trait with one fetch method per [`Operation`]. A provider advertises
//! the operations it supports through [`MarketDataProvider::capabilities`]
//! and implements only those; the rest keep their default bodies, which
//! fail with [`MarketDataError::Unsupported`]. The capability set is a
//! fixed property of the provider, never mutated at runtime.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{MarketDataError, Result};
use crate::timeframe::Timeframe;
use crate::types::{Bar, DividendEvent, EarningsEvent, Quote, Snapshot, Symbol, TickerInfo};

/// The operations the orchestration core can route.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operation {
    /// Historical OHLCV bars.
    Bars,
    /// Current bid/ask quote.
    Quote,
    /// Quote plus day-level aggregates.
    Snapshot,
    /// Ticker reference data.
    TickerInfo,
    /// Earnings events.
    Earnings,
    /// Dividend events.
    Dividends,
}

impl Operation {
    /// All routable operations.
    pub const ALL: [Self; 6] = [
        Self::Bars,
        Self::Quote,
        Self::Snapshot,
        Self::TickerInfo,
        Self::Earnings,
        Self::Dividends,
    ];

    /// Canonical name, as used in cache keys and log fields.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Bars => "bars",
            Self::Quote => "quote",
            Self::Snapshot => "snapshot",
            Self::TickerInfo => "ticker_info",
            Self::Earnings => "earnings",
            Self::Dividends => "dividends",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A market data vendor behind the capability interface.
///
/// Implementations are I/O-bound network clients; the orchestration core
/// only ever talks to them through this trait and applies its own timeout
/// around every call.
#[async_trait]
pub trait MarketDataProvider: Send + Sync + fmt::Debug {
    /// Name of this provider (e.g. "polygon").
    fn name(&self) -> &str;

    /// The operations this provider supports. Fixed at construction.
    fn capabilities(&self) -> &[Operation];

    /// Returns true if this provider supports `operation`.
    fn supports(&self, operation: Operation) -> bool {
        self.capabilities().contains(&operation)
    }

    /// Fetches historical OHLCV bars, ordered by timestamp ascending.
    ///
    /// `start` and `end` are inclusive dates.
    async fn fetch_bars(
        &self,
        symbol: &Symbol,
        start: NaiveDate,
        end: NaiveDate,
        timeframe: Timeframe,
    ) -> Result<Vec<Bar>> {
        let _ = (symbol, start, end, timeframe);
        Err(self.unsupported(Operation::Bars))
    }

    /// Fetches the current bid/ask quote.
    async fn fetch_quote(&self, symbol: &Symbol) -> Result<Quote> {
        let _ = symbol;
        Err(self.unsupported(Operation::Quote))
    }

    /// Fetches a point-in-time snapshot.
    async fn fetch_snapshot(&self, symbol: &Symbol) -> Result<Snapshot> {
        let _ = symbol;
        Err(self.unsupported(Operation::Snapshot))
    }

    /// Fetches ticker reference data.
    async fn fetch_ticker_info(&self, symbol: &Symbol) -> Result<TickerInfo> {
        let _ = symbol;
        Err(self.unsupported(Operation::TickerInfo))
    }

    /// Fetches the most recent earnings events, newest first.
    async fn fetch_earnings(&self, symbol: &Symbol, limit: usize) -> Result<Vec<EarningsEvent>> {
        let _ = (symbol, limit);
        Err(self.unsupported(Operation::Earnings))
    }

    /// Fetches the most recent dividend events, newest first.
    async fn fetch_dividends(&self, symbol: &Symbol, limit: usize) -> Result<Vec<DividendEvent>> {
        let _ = (symbol, limit);
        Err(self.unsupported(Operation::Dividends))
    }

    /// Error value for an operation this provider does not implement.
    fn unsupported(&self, operation: Operation) -> MarketDataError {
        MarketDataError::Unsupported {
            provider: self.name().to_string(),
            operation,
        }
    }
}
