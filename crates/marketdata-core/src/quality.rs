//! Data quality validation.
//!
//! Pure, stateless checks applied to canonical records before they are
//! cached or returned. Each check lands on one of three levels:
//!
//! - `Pass` - the check found nothing.
//! - `Warn` - the data is usable but suspect; surfaced to the caller as
//!   metadata and never blocks a result.
//! - `Fail` - the data is unusable; the router treats the fetch as failed
//!   and falls back to the next provider.

use chrono::{TimeDelta, Utc};
use rust_decimal::Decimal;

use crate::types::{Bar, DividendEvent, EarningsEvent, Quote, Snapshot, TickerInfo};

/// How far in the future a timestamp may sit before it fails validation,
/// in seconds. Covers ordinary clock skew between this host and a provider.
pub const CLOCK_SKEW_TOLERANCE_SECS: i64 = 5;

fn skew_tolerance() -> TimeDelta {
    TimeDelta::seconds(CLOCK_SKEW_TOLERANCE_SECS)
}

/// Close-to-close move beyond which a bar is flagged as suspect: 10%.
const MAX_BAR_MOVE_PCT: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Spread wider than this fraction of the mid price is suspect: 10%.
const MAX_SPREAD_PCT: Decimal = Decimal::from_parts(1, 0, 0, false, 1);

/// Severity of a single quality check.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QualityStatus {
    /// Nothing found.
    Pass,
    /// Suspect but usable.
    Warn,
    /// Unusable.
    Fail,
}

/// Outcome of one named quality check.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QualityCheck {
    /// Stable check name (e.g. "ohlc_consistency").
    pub name: &'static str,
    /// Severity of the finding.
    pub status: QualityStatus,
    /// Human-readable detail for WARN/FAIL findings.
    pub message: String,
}

impl QualityCheck {
    fn pass(name: &'static str) -> Self {
        Self {
            name,
            status: QualityStatus::Pass,
            message: String::new(),
        }
    }

    fn warn(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: QualityStatus::Warn,
            message: message.into(),
        }
    }

    fn fail(name: &'static str, message: impl Into<String>) -> Self {
        Self {
            name,
            status: QualityStatus::Fail,
            message: message.into(),
        }
    }
}

/// Aggregate result of validating one record or sequence.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct QualityReport {
    /// Every check that ran, in order.
    pub checks: Vec<QualityCheck>,
}

impl QualityReport {
    /// Worst status across all checks.
    #[must_use]
    pub fn status(&self) -> QualityStatus {
        self.checks
            .iter()
            .map(|c| c.status)
            .max()
            .unwrap_or(QualityStatus::Pass)
    }

    /// Returns true if no check failed (WARNs allowed).
    #[must_use]
    pub fn usable(&self) -> bool {
        self.status() != QualityStatus::Fail
    }

    /// WARN-level checks, for attaching to a result as metadata.
    #[must_use]
    pub fn warnings(&self) -> Vec<QualityCheck> {
        self.checks
            .iter()
            .filter(|c| c.status == QualityStatus::Warn)
            .cloned()
            .collect()
    }

    /// FAIL-level check messages, for error reporting.
    #[must_use]
    pub fn failures(&self) -> Vec<String> {
        self.checks
            .iter()
            .filter(|c| c.status == QualityStatus::Fail)
            .map(|c| format!("{}: {}", c.name, c.message))
            .collect()
    }

    fn push(&mut self, check: QualityCheck) {
        self.checks.push(check);
    }
}

/// Validates a bar sequence returned for a single request.
///
/// Structural breaks (empty response, OHLC bound violations, out-of-order
/// or duplicate timestamps) fail; statistical oddities (large intraday
/// gaps, >10% close-to-close moves) only warn, since markets close and
/// prices do jump.
#[must_use]
pub fn validate_bars(bars: &[Bar]) -> QualityReport {
    let mut report = QualityReport::default();

    if bars.is_empty() {
        report.push(QualityCheck::fail("not_empty", "no bars returned"));
        return report;
    }
    report.push(QualityCheck::pass("not_empty"));

    let mut inconsistent = 0usize;
    for bar in bars {
        let bounds_ok = bar.low <= bar.open
            && bar.low <= bar.close
            && bar.open <= bar.high
            && bar.close <= bar.high
            && bar.low <= bar.high;
        if !bounds_ok {
            inconsistent += 1;
        }
    }
    if inconsistent > 0 {
        report.push(QualityCheck::fail(
            "ohlc_consistency",
            format!("{inconsistent} bars violate low <= open/close <= high"),
        ));
    } else {
        report.push(QualityCheck::pass("ohlc_consistency"));
    }

    let mut out_of_order = 0usize;
    let mut duplicates = 0usize;
    for pair in bars.windows(2) {
        if pair[1].timestamp == pair[0].timestamp {
            duplicates += 1;
        } else if pair[1].timestamp < pair[0].timestamp {
            out_of_order += 1;
        }
    }
    if out_of_order > 0 || duplicates > 0 {
        report.push(QualityCheck::fail(
            "timestamp_order",
            format!("{out_of_order} out of order, {duplicates} duplicate timestamps"),
        ));
    } else {
        report.push(QualityCheck::pass("timestamp_order"));
    }

    // Gap detection: same-session holes larger than 5 bar periods are
    // flagged, overnight gaps are normal.
    let mut gaps = 0usize;
    for pair in bars.windows(2) {
        if pair[1].timestamp.date_naive() != pair[0].timestamp.date_naive() {
            continue;
        }
        let gap = pair[1].timestamp - pair[0].timestamp;
        let limit = TimeDelta::from_std(pair[0].timeframe.duration() * 5)
            .unwrap_or(TimeDelta::MAX);
        if gap > limit {
            gaps += 1;
        }
    }
    if gaps > 0 {
        report.push(QualityCheck::warn(
            "gap_detection",
            format!("{gaps} intraday gaps wider than 5 bar periods"),
        ));
    } else {
        report.push(QualityCheck::pass("gap_detection"));
    }

    let mut extreme = 0usize;
    for pair in bars.windows(2) {
        let prev_close = pair[0].close;
        if prev_close > Decimal::ZERO {
            let pct = ((pair[1].close - prev_close) / prev_close).abs();
            if pct > MAX_BAR_MOVE_PCT {
                extreme += 1;
            }
        }
    }
    if extreme > 0 {
        report.push(QualityCheck::warn(
            "price_sanity",
            format!("{extreme} bars with close-to-close move over 10%"),
        ));
    } else {
        report.push(QualityCheck::pass("price_sanity"));
    }

    report
}

fn check_quote_into(report: &mut QualityReport, quote: &Quote) {
    if quote.bid_price < Decimal::ZERO
        || quote.ask_price < Decimal::ZERO
        || quote.last_price.is_some_and(|p| p < Decimal::ZERO)
    {
        report.push(QualityCheck::fail("price_sign", "negative price"));
    } else {
        report.push(QualityCheck::pass("price_sign"));
    }

    if quote.bid_size < Decimal::ZERO
        || quote.ask_size < Decimal::ZERO
        || quote.last_size.is_some_and(|s| s < Decimal::ZERO)
    {
        report.push(QualityCheck::fail("size_sign", "negative size"));
    } else {
        report.push(QualityCheck::pass("size_sign"));
    }

    // A crossed market from a single feed is broken data. One-sided
    // quotes (either side zero) are fine.
    if quote.bid_price > Decimal::ZERO
        && quote.ask_price > Decimal::ZERO
        && quote.bid_price > quote.ask_price
    {
        report.push(QualityCheck::fail(
            "crossed_market",
            format!("bid {} above ask {}", quote.bid_price, quote.ask_price),
        ));
    } else {
        report.push(QualityCheck::pass("crossed_market"));
    }

    if quote.timestamp - Utc::now() > skew_tolerance() {
        report.push(QualityCheck::fail(
            "timestamp_skew",
            format!("quote timestamp {} is in the future", quote.timestamp),
        ));
    } else {
        report.push(QualityCheck::pass("timestamp_skew"));
    }

    let mid = quote.mid_price();
    if quote.bid_price > Decimal::ZERO
        && quote.ask_price > Decimal::ZERO
        && mid > Decimal::ZERO
        && quote.spread() / mid > MAX_SPREAD_PCT
    {
        report.push(QualityCheck::warn(
            "spread_sanity",
            format!("spread {} exceeds 10% of mid {mid}", quote.spread()),
        ));
    } else {
        report.push(QualityCheck::pass("spread_sanity"));
    }
}

/// Validates a single quote.
#[must_use]
pub fn validate_quote(quote: &Quote) -> QualityReport {
    let mut report = QualityReport::default();
    check_quote_into(&mut report, quote);
    report
}

/// Validates a snapshot: the embedded quote plus day-level aggregates.
#[must_use]
pub fn validate_snapshot(snapshot: &Snapshot) -> QualityReport {
    let mut report = QualityReport::default();
    check_quote_into(&mut report, &snapshot.quote);

    let day_ok = match (snapshot.day_low, snapshot.day_high) {
        (Some(low), Some(high)) => {
            low <= high && snapshot.day_open.is_none_or(|open| low <= open && open <= high)
        }
        _ => true,
    };
    if day_ok {
        report.push(QualityCheck::pass("day_range"));
    } else {
        report.push(QualityCheck::fail(
            "day_range",
            "day low/high do not bracket the day open",
        ));
    }

    if snapshot.timestamp - Utc::now() > skew_tolerance() {
        report.push(QualityCheck::fail(
            "snapshot_timestamp_skew",
            format!("snapshot timestamp {} is in the future", snapshot.timestamp),
        ));
    } else {
        report.push(QualityCheck::pass("snapshot_timestamp_skew"));
    }

    report
}

/// Validates ticker reference data: identifying fields must be present.
#[must_use]
pub fn validate_ticker_info(info: &TickerInfo) -> QualityReport {
    let mut report = QualityReport::default();
    if info.symbol.is_empty() || info.name.trim().is_empty() {
        report.push(QualityCheck::fail(
            "identity_fields",
            "symbol and name must be non-empty",
        ));
    } else {
        report.push(QualityCheck::pass("identity_fields"));
    }
    report
}

/// Validates an earnings event sequence.
#[must_use]
pub fn validate_earnings(events: &[EarningsEvent]) -> QualityReport {
    let mut report = QualityReport::default();
    let missing = events.iter().filter(|e| e.symbol.is_empty()).count();
    if missing > 0 {
        report.push(QualityCheck::fail(
            "identity_fields",
            format!("{missing} earnings events without a symbol"),
        ));
    } else {
        report.push(QualityCheck::pass("identity_fields"));
    }
    report
}

/// Validates a dividend event sequence.
#[must_use]
pub fn validate_dividends(events: &[DividendEvent]) -> QualityReport {
    let mut report = QualityReport::default();

    let missing = events.iter().filter(|e| e.symbol.is_empty()).count();
    if missing > 0 {
        report.push(QualityCheck::fail(
            "identity_fields",
            format!("{missing} dividend events without a symbol"),
        ));
    } else {
        report.push(QualityCheck::pass("identity_fields"));
    }

    let negative = events
        .iter()
        .filter(|e| e.amount < Decimal::ZERO)
        .count();
    if negative > 0 {
        report.push(QualityCheck::fail(
            "amount_sign",
            format!("{negative} dividend events with a negative amount"),
        ));
    } else {
        report.push(QualityCheck::pass("amount_sign"));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timeframe::Timeframe;
    use crate::types::Symbol;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    fn bar(minute: u32, open: f64, high: f64, low: f64, close: f64) -> Bar {
        Bar::new(
            Symbol::new("AAPL"),
            Utc.with_ymd_and_hms(2024, 1, 15, 14, 30 + minute, 0).unwrap(),
            Timeframe::OneMinute,
            Decimal::try_from(open).unwrap(),
            Decimal::try_from(high).unwrap(),
            Decimal::try_from(low).unwrap(),
            Decimal::try_from(close).unwrap(),
            10_000,
        )
    }

    fn good_quote() -> Quote {
        Quote::new(
            Symbol::new("AAPL"),
            Utc::now(),
            dec!(149.99),
            dec!(100),
            dec!(150.01),
            dec!(200),
        )
    }

    #[test]
    fn clean_bars_pass() {
        let bars = vec![
            bar(0, 150.0, 150.3, 149.9, 150.1),
            bar(1, 150.1, 150.4, 150.0, 150.2),
        ];
        let report = validate_bars(&bars);
        assert_eq!(report.status(), QualityStatus::Pass);
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn empty_bars_fail() {
        let report = validate_bars(&[]);
        assert_eq!(report.status(), QualityStatus::Fail);
        assert!(report.failures()[0].contains("not_empty"));
    }

    #[test]
    fn high_below_low_fails() {
        // high < low is structurally broken even if the fetch succeeded
        let broken = bar(0, 150.0, 149.0, 150.5, 150.1);
        let report = validate_bars(&[broken]);
        assert_eq!(report.status(), QualityStatus::Fail);
    }

    #[test]
    fn duplicate_timestamps_fail() {
        let bars = vec![bar(0, 150.0, 150.3, 149.9, 150.1); 2];
        let report = validate_bars(&bars);
        assert_eq!(report.status(), QualityStatus::Fail);
    }

    #[test]
    fn out_of_order_timestamps_fail() {
        let bars = vec![
            bar(1, 150.1, 150.4, 150.0, 150.2),
            bar(0, 150.0, 150.3, 149.9, 150.1),
        ];
        let report = validate_bars(&bars);
        assert_eq!(report.status(), QualityStatus::Fail);
    }

    #[test]
    fn intraday_gap_only_warns() {
        let bars = vec![
            bar(0, 150.0, 150.3, 149.9, 150.1),
            bar(20, 150.1, 150.4, 150.0, 150.2),
        ];
        let report = validate_bars(&bars);
        assert_eq!(report.status(), QualityStatus::Warn);
        assert_eq!(report.warnings()[0].name, "gap_detection");
        assert!(report.usable());
    }

    #[test]
    fn large_move_only_warns() {
        let bars = vec![
            bar(0, 150.0, 150.3, 149.9, 150.0),
            bar(1, 150.0, 180.0, 150.0, 175.0),
        ];
        let report = validate_bars(&bars);
        assert_eq!(report.status(), QualityStatus::Warn);
        assert!(report.warnings().iter().any(|c| c.name == "price_sanity"));
    }

    #[test]
    fn clean_quote_passes() {
        assert_eq!(validate_quote(&good_quote()).status(), QualityStatus::Pass);
    }

    #[test]
    fn crossed_quote_fails() {
        let mut q = good_quote();
        q.bid_price = dec!(150.05);
        let report = validate_quote(&q);
        assert_eq!(report.status(), QualityStatus::Fail);
        assert!(report.failures().iter().any(|m| m.contains("crossed_market")));
    }

    #[test]
    fn one_sided_quote_is_not_crossed() {
        let mut q = good_quote();
        q.ask_price = dec!(0);
        let report = validate_quote(&q);
        assert!(
            !report
                .checks
                .iter()
                .any(|c| c.name == "crossed_market" && c.status == QualityStatus::Fail)
        );
    }

    #[test]
    fn future_quote_fails() {
        let mut q = good_quote();
        q.timestamp = Utc::now() + TimeDelta::minutes(10);
        assert_eq!(validate_quote(&q).status(), QualityStatus::Fail);
    }

    #[test]
    fn wide_spread_warns() {
        let mut q = good_quote();
        q.bid_price = dec!(100);
        q.ask_price = dec!(120);
        let report = validate_quote(&q);
        assert_eq!(report.status(), QualityStatus::Warn);
    }

    #[test]
    fn snapshot_day_range_checked() {
        let snap = Snapshot::new(Symbol::new("AAPL"), Utc::now(), good_quote())
            .with_day_range(dec!(155), dec!(151), dec!(149), 1_000_000);
        let report = validate_snapshot(&snap);
        assert_eq!(report.status(), QualityStatus::Fail);
    }

    #[test]
    fn ticker_info_requires_name() {
        let info = TickerInfo::new(Symbol::new("AAPL"), "");
        assert_eq!(validate_ticker_info(&info).status(), QualityStatus::Fail);

        let info = TickerInfo::new(Symbol::new("AAPL"), "Apple Inc.");
        assert_eq!(validate_ticker_info(&info).status(), QualityStatus::Pass);
    }

    #[test]
    fn negative_dividend_amount_fails() {
        let ex = chrono::NaiveDate::from_ymd_opt(2024, 2, 9).unwrap();
        let div = DividendEvent::new(Symbol::new("AAPL"), ex, dec!(-0.24));
        assert_eq!(validate_dividends(&[div]).status(), QualityStatus::Fail);
    }
}
