//! NYSE trading calendar.
//!
//! Hardcoded holiday rules for NYSE: fixed-date holidays with observed-date
//! shifting, Nth-weekday rules, and Good Friday via the Easter computus.
//! Date-level only; intraday session times are reported as naive Eastern
//! clock times.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use std::collections::HashSet;

fn observed_fixed(year: i32, month: u32, day: u32) -> Option<NaiveDate> {
    let d = NaiveDate::from_ymd_opt(year, month, day)?;
    match d.weekday() {
        // Saturday holidays are observed the Friday before; Sunday the
        // Monday after.
        Weekday::Sat => d.pred_opt(),
        Weekday::Sun => d.succ_opt(),
        _ => Some(d),
    }
}

fn new_years(year: i32) -> Option<NaiveDate> {
    let d = NaiveDate::from_ymd_opt(year, 1, 1)?;
    // A Saturday Jan 1 is not observed in the prior year on NYSE.
    match d.weekday() {
        Weekday::Sun => d.succ_opt(),
        Weekday::Sat => None,
        _ => Some(d),
    }
}

fn nth_weekday(year: i32, month: u32, weekday: Weekday, n: u32) -> Option<NaiveDate> {
    NaiveDate::from_weekday_of_month_opt(year, month, weekday, n as u8)
}

fn last_weekday(year: i32, month: u32, weekday: Weekday) -> Option<NaiveDate> {
    let mut n = 5;
    while n > 0 {
        if let Some(d) = nth_weekday(year, month, weekday, n) {
            return Some(d);
        }
        n -= 1;
    }
    None
}

/// Good Friday, two days before Easter (anonymous Gregorian computus).
fn good_friday(year: i32) -> Option<NaiveDate> {
    let a = year % 19;
    let b = year / 100;
    let c = year % 100;
    let d = b / 4;
    let e = b % 4;
    let f = (b + 8) / 25;
    let g = (b - f + 1) / 3;
    let h = (19 * a + b - d - g + 15) % 30;
    let i = c / 4;
    let k = c % 4;
    let l = (32 + 2 * e + 2 * i - h - k) % 7;
    let m = (a + 11 * h + 22 * l) / 451;
    let month = (h + l - 7 * m + 114) / 31;
    let day = ((h + l - 7 * m + 114) % 31) + 1;
    let easter = NaiveDate::from_ymd_opt(year, month as u32, day as u32)?;
    easter.checked_sub_days(chrono::Days::new(2))
}

fn holidays(year: i32) -> HashSet<NaiveDate> {
    let mut days = HashSet::new();
    let mut add = |d: Option<NaiveDate>| {
        if let Some(d) = d {
            days.insert(d);
        }
    };

    add(new_years(year));
    add(nth_weekday(year, 1, Weekday::Mon, 3)); // MLK Day
    add(nth_weekday(year, 2, Weekday::Mon, 3)); // Presidents' Day
    add(good_friday(year));
    add(last_weekday(year, 5, Weekday::Mon)); // Memorial Day
    if year >= 2022 {
        add(observed_fixed(year, 6, 19)); // Juneteenth
    }
    add(observed_fixed(year, 7, 4)); // Independence Day
    add(nth_weekday(year, 9, Weekday::Mon, 1)); // Labor Day
    add(nth_weekday(year, 11, Weekday::Thu, 4)); // Thanksgiving
    add(observed_fixed(year, 12, 25)); // Christmas

    days
}

fn half_days(year: i32) -> HashSet<NaiveDate> {
    let mut days = HashSet::new();
    let year_holidays = holidays(year);

    // Day before Independence Day, when it falls on a weekday.
    if let Some(before) = observed_fixed(year, 7, 4).and_then(|d| d.pred_opt()) {
        if is_weekday(before) {
            days.insert(before);
        }
    }

    // Black Friday.
    if let Some(bf) = nth_weekday(year, 11, Weekday::Thu, 4).and_then(|d| d.succ_opt()) {
        days.insert(bf);
    }

    // Christmas Eve, when it is a weekday and not itself a holiday.
    if let Some(dec24) = NaiveDate::from_ymd_opt(year, 12, 24) {
        if is_weekday(dec24) && !year_holidays.contains(&dec24) {
            days.insert(dec24);
        }
    }

    days
}

fn is_weekday(d: NaiveDate) -> bool {
    !matches!(d.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Returns true if `d` is an NYSE holiday.
#[must_use]
pub fn is_holiday(d: NaiveDate) -> bool {
    holidays(d.year()).contains(&d)
}

/// Returns true if `d` is an NYSE early-close day.
#[must_use]
pub fn is_half_day(d: NaiveDate) -> bool {
    half_days(d.year()).contains(&d)
}

/// Returns true if `d` is a trading day: a weekday that is not a holiday.
#[must_use]
pub fn is_trading_day(d: NaiveDate) -> bool {
    is_weekday(d) && !is_holiday(d)
}

/// All trading dates in `[start, end]`, ascending.
#[must_use]
pub fn trading_dates(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    start
        .iter_days()
        .take_while(|d| *d <= end)
        .filter(|d| is_trading_day(*d))
        .collect()
}

/// Regular market open, 9:30 Eastern.
#[must_use]
pub fn market_open_time(_d: NaiveDate) -> NaiveTime {
    NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default()
}

/// Market close: 13:00 Eastern on half days, 16:00 otherwise.
#[must_use]
pub fn market_close_time(d: NaiveDate) -> NaiveTime {
    let hour = if is_half_day(d) { 13 } else { 16 };
    NaiveTime::from_hms_opt(hour, 0, 0).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn known_2024_holidays() {
        assert!(is_holiday(date(2024, 1, 1))); // New Year's
        assert!(is_holiday(date(2024, 1, 15))); // MLK Day
        assert!(is_holiday(date(2024, 3, 29))); // Good Friday
        assert!(is_holiday(date(2024, 5, 27))); // Memorial Day
        assert!(is_holiday(date(2024, 6, 19))); // Juneteenth
        assert!(is_holiday(date(2024, 7, 4))); // Independence Day
        assert!(is_holiday(date(2024, 9, 2))); // Labor Day
        assert!(is_holiday(date(2024, 11, 28))); // Thanksgiving
        assert!(is_holiday(date(2024, 12, 25))); // Christmas
    }

    #[test]
    fn observed_shift() {
        // July 4 2026 is a Saturday, observed Friday July 3.
        assert!(is_holiday(date(2026, 7, 3)));
        // Christmas 2022 is a Sunday, observed Monday Dec 26.
        assert!(is_holiday(date(2022, 12, 26)));
    }

    #[test]
    fn juneteenth_starts_in_2022() {
        assert!(!is_holiday(date(2021, 6, 18)));
        assert!(is_holiday(date(2023, 6, 19)));
    }

    #[test]
    fn weekends_are_not_trading_days() {
        assert!(!is_trading_day(date(2024, 1, 13))); // Saturday
        assert!(!is_trading_day(date(2024, 1, 14))); // Sunday
        assert!(is_trading_day(date(2024, 1, 16))); // Tuesday
    }

    #[test]
    fn trading_dates_skip_weekend_and_holiday() {
        // Jan 12 2024 (Fri) through Jan 16 (Tue), with MLK day on the 15th.
        let dates = trading_dates(date(2024, 1, 12), date(2024, 1, 16));
        assert_eq!(dates, vec![date(2024, 1, 12), date(2024, 1, 16)]);
    }

    #[test]
    fn black_friday_closes_early() {
        let bf = date(2024, 11, 29);
        assert!(is_half_day(bf));
        assert_eq!(market_close_time(bf), NaiveTime::from_hms_opt(13, 0, 0).unwrap());
        assert_eq!(
            market_close_time(date(2024, 11, 26)),
            NaiveTime::from_hms_opt(16, 0, 0).unwrap()
        );
    }
}
