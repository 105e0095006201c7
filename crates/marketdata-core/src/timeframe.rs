//! Bar period lengths.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::MarketDataError;

/// Period length of a price bar.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    /// One-minute bars.
    #[default]
    OneMinute,
    /// Five-minute bars.
    FiveMinute,
    /// Fifteen-minute bars.
    FifteenMinute,
    /// Hourly bars.
    OneHour,
    /// Daily bars.
    OneDay,
}

impl Timeframe {
    /// Wall-clock length of one bar period.
    ///
    /// A daily bar covers the 6.5-hour regular trading session.
    #[must_use]
    pub const fn duration(self) -> Duration {
        match self {
            Self::OneMinute => Duration::from_secs(60),
            Self::FiveMinute => Duration::from_secs(5 * 60),
            Self::FifteenMinute => Duration::from_secs(15 * 60),
            Self::OneHour => Duration::from_secs(60 * 60),
            Self::OneDay => Duration::from_secs(390 * 60),
        }
    }

    /// Returns true for sub-daily bar sizes.
    #[must_use]
    pub const fn is_intraday(self) -> bool {
        !matches!(self, Self::OneDay)
    }

    /// Canonical string form, as used in cache keys and provider requests.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OneMinute => "1min",
            Self::FiveMinute => "5min",
            Self::FifteenMinute => "15min",
            Self::OneHour => "1hour",
            Self::OneDay => "1day",
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = MarketDataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1min" => Ok(Self::OneMinute),
            "5min" => Ok(Self::FiveMinute),
            "15min" => Ok(Self::FifteenMinute),
            "1hour" => Ok(Self::OneHour),
            "1day" => Ok(Self::OneDay),
            other => Err(MarketDataError::InvalidParameter(format!(
                "unknown timeframe: {other}"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for tf in [
            Timeframe::OneMinute,
            Timeframe::FiveMinute,
            Timeframe::FifteenMinute,
            Timeframe::OneHour,
            Timeframe::OneDay,
        ] {
            assert_eq!(tf.as_str().parse::<Timeframe>().unwrap(), tf);
        }
    }

    #[test]
    fn rejects_unknown_timeframe() {
        assert!("2min".parse::<Timeframe>().is_err());
    }

    #[test]
    fn intraday_classification() {
        assert!(Timeframe::OneMinute.is_intraday());
        assert!(!Timeframe::OneDay.is_intraday());
    }
}
