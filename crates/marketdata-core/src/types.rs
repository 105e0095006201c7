//! Canonical market data types.
//!
//! This module defines the vendor-neutral record types all other components
//! operate on:
//!
//! - [`Symbol`] - Trading symbol/ticker
//! - [`Bar`] - OHLCV price bar
//! - [`Quote`] - Bid/ask quote with optional last trade
//! - [`Snapshot`] - Quote plus day-level aggregates
//! - [`TickerInfo`] - Reference data for a ticker
//! - [`EarningsEvent`] - Earnings report event
//! - [`DividendEvent`] - Dividend distribution event
//!
//! All records are immutable values: they are created by a provider adapter
//! when a response is parsed, passed by value through validation and
//! caching, and never mutated in place.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::timeframe::Timeframe;

/// A trading symbol/ticker.
///
/// Symbols are automatically uppercased on creation, so `"aapl"` and
/// `"AAPL"` produce equal keys everywhere a symbol participates in one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Symbol(String);

impl Symbol {
    /// Creates a new symbol from a string, converting to uppercase.
    #[must_use]
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into().to_uppercase())
    }

    /// Returns the symbol as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if the symbol is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Symbol {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Symbol {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for Symbol {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

/// A single OHLCV price bar.
///
/// The timestamp marks the start of the bar period; [`Timeframe`] gives the
/// period length. Volume is unsigned, so the volume invariant holds by
/// construction. The OHLC ordering invariant (low <= open/close <= high) is
/// checked by [`quality::validate_bars`](crate::quality::validate_bars).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Symbol this bar belongs to.
    pub symbol: Symbol,
    /// Start of the bar period.
    pub timestamp: DateTime<Utc>,
    /// Period length of the bar.
    pub timeframe: Timeframe,
    /// Opening price.
    pub open: Decimal,
    /// Highest price during the period.
    pub high: Decimal,
    /// Lowest price during the period.
    pub low: Decimal,
    /// Closing price.
    pub close: Decimal,
    /// Trading volume.
    pub volume: u64,
    /// Volume-weighted average price, when the provider supplies one.
    pub vwap: Option<Decimal>,
    /// Number of trades in this bar, when the provider supplies it.
    pub num_trades: Option<u32>,
}

impl Bar {
    /// Creates a new bar with the required fields.
    #[allow(clippy::too_many_arguments)]
    #[must_use]
    pub const fn new(
        symbol: Symbol,
        timestamp: DateTime<Utc>,
        timeframe: Timeframe,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        close: Decimal,
        volume: u64,
    ) -> Self {
        Self {
            symbol,
            timestamp,
            timeframe,
            open,
            high,
            low,
            close,
            volume,
            vwap: None,
            num_trades: None,
        }
    }

    /// Sets the volume-weighted average price.
    #[must_use]
    pub const fn with_vwap(mut self, vwap: Decimal) -> Self {
        self.vwap = Some(vwap);
        self
    }

    /// Sets the trade count.
    #[must_use]
    pub const fn with_num_trades(mut self, num_trades: u32) -> Self {
        self.num_trades = Some(num_trades);
        self
    }
}

/// A bid/ask quote with an optional last trade.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Quote {
    /// Symbol this quote belongs to.
    pub symbol: Symbol,
    /// Quote timestamp.
    pub timestamp: DateTime<Utc>,
    /// Best bid price.
    pub bid_price: Decimal,
    /// Size at the best bid.
    pub bid_size: Decimal,
    /// Best ask price.
    pub ask_price: Decimal,
    /// Size at the best ask.
    pub ask_size: Decimal,
    /// Last trade price, when available.
    pub last_price: Option<Decimal>,
    /// Last trade size, when available.
    pub last_size: Option<Decimal>,
}

impl Quote {
    /// Creates a new quote with the required fields.
    #[must_use]
    pub const fn new(
        symbol: Symbol,
        timestamp: DateTime<Utc>,
        bid_price: Decimal,
        bid_size: Decimal,
        ask_price: Decimal,
        ask_size: Decimal,
    ) -> Self {
        Self {
            symbol,
            timestamp,
            bid_price,
            bid_size,
            ask_price,
            ask_size,
            last_price: None,
            last_size: None,
        }
    }

    /// Sets the last trade price and size.
    #[must_use]
    pub const fn with_last(mut self, price: Decimal, size: Decimal) -> Self {
        self.last_price = Some(price);
        self.last_size = Some(size);
        self
    }

    /// Bid-ask spread.
    #[must_use]
    pub fn spread(&self) -> Decimal {
        self.ask_price - self.bid_price
    }

    /// Midpoint between bid and ask.
    #[must_use]
    pub fn mid_price(&self) -> Decimal {
        (self.bid_price + self.ask_price) / Decimal::TWO
    }
}

/// Point-in-time snapshot combining a quote with day-level aggregates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Symbol this snapshot belongs to.
    pub symbol: Symbol,
    /// Snapshot timestamp.
    pub timestamp: DateTime<Utc>,
    /// Current bid/ask quote.
    pub quote: Quote,
    /// Latest trade price.
    pub last_price: Option<Decimal>,
    /// Today's opening price.
    pub day_open: Option<Decimal>,
    /// Today's high.
    pub day_high: Option<Decimal>,
    /// Today's low.
    pub day_low: Option<Decimal>,
    /// Today's cumulative volume.
    pub day_volume: Option<u64>,
    /// Previous trading day's close.
    pub prev_close: Option<Decimal>,
}

impl Snapshot {
    /// Creates a new snapshot around a quote.
    #[must_use]
    pub const fn new(symbol: Symbol, timestamp: DateTime<Utc>, quote: Quote) -> Self {
        Self {
            symbol,
            timestamp,
            quote,
            last_price: None,
            day_open: None,
            day_high: None,
            day_low: None,
            day_volume: None,
            prev_close: None,
        }
    }

    /// Sets the latest trade price.
    #[must_use]
    pub const fn with_last_price(mut self, last_price: Decimal) -> Self {
        self.last_price = Some(last_price);
        self
    }

    /// Sets the day-level aggregates.
    #[must_use]
    pub const fn with_day_range(
        mut self,
        open: Decimal,
        high: Decimal,
        low: Decimal,
        volume: u64,
    ) -> Self {
        self.day_open = Some(open);
        self.day_high = Some(high);
        self.day_low = Some(low);
        self.day_volume = Some(volume);
        self
    }

    /// Sets the previous trading day's close.
    #[must_use]
    pub const fn with_prev_close(mut self, prev_close: Decimal) -> Self {
        self.prev_close = Some(prev_close);
        self
    }

    /// Dollar change from the previous close, when both sides are known.
    #[must_use]
    pub fn change(&self) -> Option<Decimal> {
        Some(self.last_price? - self.prev_close?)
    }
}

/// Reference data for a ticker.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TickerInfo {
    /// Symbol this record describes.
    pub symbol: Symbol,
    /// Full legal name.
    pub name: String,
    /// Security type (e.g. "CS" for common stock, "ETF", "ADR").
    pub security_type: String,
    /// Primary exchange.
    pub exchange: Option<String>,
    /// GICS sector.
    pub sector: Option<String>,
    /// GICS industry.
    pub industry: Option<String>,
    /// SEC CIK number.
    pub cik: Option<String>,
    /// OpenFIGI composite identifier.
    pub composite_figi: Option<String>,
    /// OpenFIGI share class identifier.
    pub share_class_figi: Option<String>,
    /// Market capitalization in the trading currency.
    pub market_cap: Option<Decimal>,
    /// Total shares outstanding.
    pub shares_outstanding: Option<u64>,
    /// Whether the ticker is actively traded.
    pub active: bool,
}

impl TickerInfo {
    /// Creates ticker info with the required identifying fields.
    ///
    /// Security type defaults to common stock and the ticker to active.
    #[must_use]
    pub fn new(symbol: Symbol, name: impl Into<String>) -> Self {
        Self {
            symbol,
            name: name.into(),
            security_type: "CS".to_string(),
            exchange: None,
            sector: None,
            industry: None,
            cik: None,
            composite_figi: None,
            share_class_figi: None,
            market_cap: None,
            shares_outstanding: None,
            active: true,
        }
    }

    /// Sets the security type.
    #[must_use]
    pub fn with_security_type(mut self, security_type: impl Into<String>) -> Self {
        self.security_type = security_type.into();
        self
    }

    /// Sets the primary exchange.
    #[must_use]
    pub fn with_exchange(mut self, exchange: impl Into<String>) -> Self {
        self.exchange = Some(exchange.into());
        self
    }

    /// Sets the sector and industry classification.
    #[must_use]
    pub fn with_classification(
        mut self,
        sector: impl Into<String>,
        industry: impl Into<String>,
    ) -> Self {
        self.sector = Some(sector.into());
        self.industry = Some(industry.into());
        self
    }

    /// Sets the SEC CIK number.
    #[must_use]
    pub fn with_cik(mut self, cik: impl Into<String>) -> Self {
        self.cik = Some(cik.into());
        self
    }

    /// Sets the OpenFIGI identifiers.
    #[must_use]
    pub fn with_figi(
        mut self,
        composite: impl Into<String>,
        share_class: impl Into<String>,
    ) -> Self {
        self.composite_figi = Some(composite.into());
        self.share_class_figi = Some(share_class.into());
        self
    }

    /// Sets the market capitalization.
    #[must_use]
    pub const fn with_market_cap(mut self, market_cap: Decimal) -> Self {
        self.market_cap = Some(market_cap);
        self
    }

    /// Sets the shares outstanding.
    #[must_use]
    pub const fn with_shares_outstanding(mut self, shares: u64) -> Self {
        self.shares_outstanding = Some(shares);
        self
    }

    /// Marks the ticker as inactive (delisted or suspended).
    #[must_use]
    pub const fn inactive(mut self) -> Self {
        self.active = false;
        self
    }
}

/// When an earnings call occurs relative to the trading session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CallTime {
    /// Before market open.
    BeforeOpen,
    /// After market close.
    AfterClose,
    /// During market hours.
    DuringHours,
    /// Timing not known.
    #[default]
    Unknown,
}

/// An earnings report event.
///
/// Estimate and actual figures are optional until reported.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EarningsEvent {
    /// Symbol this event belongs to.
    pub symbol: Symbol,
    /// Date of the earnings report.
    pub report_date: NaiveDate,
    /// Fiscal year.
    pub fiscal_year: Option<i32>,
    /// Fiscal quarter (1-4).
    pub fiscal_quarter: Option<u8>,
    /// When the call occurs relative to the session.
    pub call_time: CallTime,
    /// Consensus EPS estimate.
    pub eps_estimate: Option<Decimal>,
    /// Reported EPS.
    pub eps_actual: Option<Decimal>,
    /// Consensus revenue estimate.
    pub revenue_estimate: Option<Decimal>,
    /// Reported revenue.
    pub revenue_actual: Option<Decimal>,
}

impl EarningsEvent {
    /// Creates an earnings event with the required fields.
    #[must_use]
    pub const fn new(symbol: Symbol, report_date: NaiveDate) -> Self {
        Self {
            symbol,
            report_date,
            fiscal_year: None,
            fiscal_quarter: None,
            call_time: CallTime::Unknown,
            eps_estimate: None,
            eps_actual: None,
            revenue_estimate: None,
            revenue_actual: None,
        }
    }

    /// Sets the fiscal period.
    #[must_use]
    pub const fn with_fiscal_period(mut self, year: i32, quarter: u8) -> Self {
        self.fiscal_year = Some(year);
        self.fiscal_quarter = Some(quarter);
        self
    }

    /// Sets the call time.
    #[must_use]
    pub const fn with_call_time(mut self, call_time: CallTime) -> Self {
        self.call_time = call_time;
        self
    }

    /// Sets the EPS estimate and, once reported, the actual.
    #[must_use]
    pub const fn with_eps(mut self, estimate: Option<Decimal>, actual: Option<Decimal>) -> Self {
        self.eps_estimate = estimate;
        self.eps_actual = actual;
        self
    }

    /// Sets the revenue estimate and, once reported, the actual.
    #[must_use]
    pub const fn with_revenue(
        mut self,
        estimate: Option<Decimal>,
        actual: Option<Decimal>,
    ) -> Self {
        self.revenue_estimate = estimate;
        self.revenue_actual = actual;
        self
    }
}

/// Payment cadence of a dividend.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DividendFrequency {
    /// One payment per year.
    Annual,
    /// Two payments per year.
    SemiAnnual,
    /// Four payments per year.
    Quarterly,
    /// Twelve payments per year.
    Monthly,
}

impl DividendFrequency {
    /// Number of payments per year.
    #[must_use]
    pub const fn payments_per_year(self) -> u8 {
        match self {
            Self::Annual => 1,
            Self::SemiAnnual => 2,
            Self::Quarterly => 4,
            Self::Monthly => 12,
        }
    }
}

/// Whether a dividend is a regular distribution or a special one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DividendType {
    /// Regular recurring dividend.
    #[default]
    Regular,
    /// Special one-off dividend.
    Special,
}

/// A dividend distribution event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DividendEvent {
    /// Symbol this event belongs to.
    pub symbol: Symbol,
    /// Ex-dividend date.
    pub ex_date: NaiveDate,
    /// Record date.
    pub record_date: Option<NaiveDate>,
    /// Payment date.
    pub pay_date: Option<NaiveDate>,
    /// Declaration date.
    pub declaration_date: Option<NaiveDate>,
    /// Dividend amount per share.
    pub amount: Decimal,
    /// Regular or special.
    pub dividend_type: DividendType,
    /// Payment cadence, when known.
    pub frequency: Option<DividendFrequency>,
    /// Currency code.
    pub currency: String,
}

impl DividendEvent {
    /// Creates a dividend event with the required fields.
    ///
    /// The dividend defaults to a regular USD distribution.
    #[must_use]
    pub fn new(symbol: Symbol, ex_date: NaiveDate, amount: Decimal) -> Self {
        Self {
            symbol,
            ex_date,
            record_date: None,
            pay_date: None,
            declaration_date: None,
            amount,
            dividend_type: DividendType::Regular,
            frequency: None,
            currency: "USD".to_string(),
        }
    }

    /// Sets the record, payment and declaration dates.
    #[must_use]
    pub const fn with_dates(
        mut self,
        record: Option<NaiveDate>,
        pay: Option<NaiveDate>,
        declaration: Option<NaiveDate>,
    ) -> Self {
        self.record_date = record;
        self.pay_date = pay;
        self.declaration_date = declaration;
        self
    }

    /// Sets the payment cadence.
    #[must_use]
    pub const fn with_frequency(mut self, frequency: DividendFrequency) -> Self {
        self.frequency = Some(frequency);
        self
    }

    /// Marks the dividend as a special distribution.
    #[must_use]
    pub const fn special(mut self) -> Self {
        self.dividend_type = DividendType::Special;
        self
    }

    /// Sets the currency code.
    #[must_use]
    pub fn with_currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn quote() -> Quote {
        Quote::new(
            Symbol::new("aapl"),
            Utc.with_ymd_and_hms(2024, 1, 15, 15, 30, 0).unwrap(),
            dec!(149.99),
            dec!(100),
            dec!(150.01),
            dec!(200),
        )
    }

    #[test]
    fn symbol_uppercases() {
        assert_eq!(Symbol::new("aapl").as_str(), "AAPL");
        assert_eq!(Symbol::from("msft"), Symbol::new("MSFT"));
    }

    #[test]
    fn quote_spread_and_mid() {
        let q = quote();
        assert_eq!(q.spread(), dec!(0.02));
        assert_eq!(q.mid_price(), dec!(150.00));
    }

    #[test]
    fn snapshot_change_requires_both_sides() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 15, 30, 0).unwrap();
        let snap = Snapshot::new(Symbol::new("AAPL"), ts, quote());
        assert_eq!(snap.change(), None);

        let snap = snap.with_last_price(dec!(150.00)).with_prev_close(dec!(148.50));
        assert_eq!(snap.change(), Some(dec!(1.50)));
    }

    #[test]
    fn dividend_frequency_payments() {
        assert_eq!(DividendFrequency::Quarterly.payments_per_year(), 4);
        assert_eq!(DividendFrequency::Monthly.payments_per_year(), 12);
    }

    #[test]
    fn bar_serde_round_trip() {
        let bar = Bar::new(
            Symbol::new("AAPL"),
            Utc.with_ymd_and_hms(2024, 1, 2, 14, 30, 0).unwrap(),
            Timeframe::OneDay,
            dec!(150.00),
            dec!(152.25),
            dec!(149.10),
            dec!(151.40),
            1_000_000,
        )
        .with_vwap(dec!(150.69));

        let json = serde_json::to_string(&bar).unwrap();
        let back: Bar = serde_json::from_str(&json).unwrap();
        assert_eq!(back, bar);
    }
}
