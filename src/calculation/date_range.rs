//! Date range resolution.
//!
//! This module turns caller-supplied `YYYY-MM-DD` text into a validated,
//! inclusive [`DateRange`] that can be walked one calendar day at a time.
//! Parsing and ordering are checked here, before any record is read.

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// The only accepted textual date format.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Number of days covered by a weekly payroll period.
pub const WEEK_DAYS: u32 = 7;

/// Number of days covered by a monthly payroll period.
pub const MONTH_DAYS: u32 = 30;

/// Parses a `YYYY-MM-DD` date.
///
/// Surrounding whitespace is ignored. Anything else that is not a zero-padded
/// four-digit year, two-digit month and two-digit day naming a real calendar
/// date fails with [`EngineError::InvalidDateFormat`].
///
/// # Example
///
/// ```
/// use sales_payroll::calculation::parse_date;
/// use chrono::NaiveDate;
///
/// assert_eq!(
///     parse_date("2024-02-29").unwrap(),
///     NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
/// );
/// assert!(parse_date("2023-02-29").is_err());
/// assert!(parse_date("2024-2-1").is_err());
/// ```
pub fn parse_date(text: &str) -> EngineResult<NaiveDate> {
    let trimmed = text.trim();
    let invalid = || EngineError::InvalidDateFormat {
        input: text.to_string(),
    };

    let bytes = trimmed.as_bytes();
    let well_shaped = bytes.len() == 10
        && bytes[4] == b'-'
        && bytes[7] == b'-'
        && bytes
            .iter()
            .enumerate()
            .all(|(i, b)| i == 4 || i == 7 || b.is_ascii_digit());
    if !well_shaped {
        return Err(invalid());
    }

    NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|_| invalid())
}

/// An inclusive, non-empty range of calendar days.
///
/// # Example
///
/// ```
/// use sales_payroll::calculation::DateRange;
///
/// let range = DateRange::parse("2024-01-30", "2024-02-02").unwrap();
/// let days: Vec<String> = range.days().map(|d| d.to_string()).collect();
/// assert_eq!(days, ["2024-01-30", "2024-01-31", "2024-02-01", "2024-02-02"]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    /// Creates a range, failing with [`EngineError::InvalidRange`] if start is
    /// after end.
    pub fn new(start: NaiveDate, end: NaiveDate) -> EngineResult<Self> {
        if start > end {
            return Err(EngineError::InvalidRange { start, end });
        }
        Ok(Self { start, end })
    }

    /// A range covering exactly one day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// Parses and validates a `(start, end)` pair of date strings.
    pub fn parse(start: &str, end: &str) -> EngineResult<Self> {
        let start = parse_date(start)?;
        let end = parse_date(end)?;
        Self::new(start, end)
    }

    /// Parses a single date string into a one-day range.
    pub fn parse_single(date: &str) -> EngineResult<Self> {
        parse_date(date).map(Self::single)
    }

    /// The `days` calendar days ending on `end`, inclusive.
    ///
    /// A zero-day request is treated as one day. The start is clamped to the
    /// earliest representable date.
    pub fn trailing(end: NaiveDate, days: u32) -> Self {
        let back = u64::from(days.max(1) - 1);
        let start = end.checked_sub_days(Days::new(back)).unwrap_or(NaiveDate::MIN);
        Self { start, end }
    }

    /// The seven days ending on `end`.
    pub fn trailing_week(end: NaiveDate) -> Self {
        Self::trailing(end, WEEK_DAYS)
    }

    /// The thirty days ending on `end`.
    pub fn trailing_month(end: NaiveDate) -> Self {
        Self::trailing(end, MONTH_DAYS)
    }

    /// First day of the range.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the range.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of days in the range. Always at least one.
    pub fn day_count(&self) -> u64 {
        (self.end - self.start).num_days().unsigned_abs() + 1
    }

    /// Returns true if the date falls inside the range.
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }

    /// Iterates over every day from start to end, inclusive.
    pub fn days(&self) -> impl Iterator<Item = NaiveDate> + use<> {
        let end = self.end;
        self.start.iter_days().take_while(move |d| *d <= end)
    }
}

impl std::fmt::Display for DateRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}..={}", self.start, self.end)
        }
    }
}

/// A named trailing payroll period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PayrollPeriod {
    /// The last seven days.
    Week,
    /// The last thirty days.
    Month,
}

impl PayrollPeriod {
    /// Resolves the period into the range ending on `end`.
    pub fn ending_on(self, end: NaiveDate) -> DateRange {
        match self {
            PayrollPeriod::Week => DateRange::trailing_week(end),
            PayrollPeriod::Month => DateRange::trailing_month(end),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// DR-001: valid date parses
    #[test]
    fn test_parse_valid_date() {
        assert_eq!(parse_date("2024-01-01").unwrap(), d(2024, 1, 1));
    }

    /// DR-002: surrounding whitespace is ignored
    #[test]
    fn test_parse_trims_whitespace() {
        assert_eq!(parse_date("  2024-12-12\n").unwrap(), d(2024, 12, 12));
    }

    /// DR-003: wrong shape is rejected
    #[test]
    fn test_parse_rejects_other_formats() {
        for input in ["12/12/2024", "2024-1-01", "2024/01/01", "20240101", "", "abcd-ef-gh"] {
            match parse_date(input) {
                Err(EngineError::InvalidDateFormat { input: got }) => assert_eq!(got, input),
                other => panic!("Expected InvalidDateFormat for {:?}, got {:?}", input, other),
            }
        }
    }

    /// DR-004: impossible calendar dates are rejected
    #[test]
    fn test_parse_rejects_impossible_dates() {
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("2023-02-29").is_err());
        assert!(parse_date("2024-04-31").is_err());
    }

    /// DR-005: start after end is an invalid range
    #[test]
    fn test_start_after_end_is_invalid_range() {
        match DateRange::parse("2024-01-05", "2024-01-01") {
            Err(EngineError::InvalidRange { start, end }) => {
                assert_eq!(start, d(2024, 1, 5));
                assert_eq!(end, d(2024, 1, 1));
            }
            other => panic!("Expected InvalidRange, got {:?}", other),
        }
    }

    /// DR-006: format errors win over ordering errors
    #[test]
    fn test_bad_end_date_reports_format_error() {
        assert!(matches!(
            DateRange::parse("2024-01-05", "yesterday"),
            Err(EngineError::InvalidDateFormat { .. })
        ));
    }

    #[test]
    fn test_single_date_is_range_of_one() {
        let range = DateRange::parse_single("2024-03-10").unwrap();
        assert_eq!(range.day_count(), 1);
        assert_eq!(range.days().collect::<Vec<_>>(), vec![d(2024, 3, 10)]);
        assert_eq!(range, DateRange::parse("2024-03-10", "2024-03-10").unwrap());
    }

    #[test]
    fn test_days_cross_month_and_leap_day() {
        let range = DateRange::parse("2024-02-28", "2024-03-01").unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days, vec![d(2024, 2, 28), d(2024, 2, 29), d(2024, 3, 1)]);
        assert_eq!(range.day_count(), 3);
    }

    #[test]
    fn test_days_are_contiguous_and_ordered() {
        let range = DateRange::parse("2023-12-01", "2024-01-31").unwrap();
        let days: Vec<_> = range.days().collect();
        assert_eq!(days.len() as u64, range.day_count());
        assert!(days.windows(2).all(|w| w[1] == w[0].succ_opt().unwrap()));
        assert_eq!(days.first(), Some(&range.start()));
        assert_eq!(days.last(), Some(&range.end()));
    }

    #[test]
    fn test_trailing_week_covers_seven_days() {
        let range = DateRange::trailing_week(d(2024, 1, 10));
        assert_eq!(range.start(), d(2024, 1, 4));
        assert_eq!(range.end(), d(2024, 1, 10));
        assert_eq!(range.day_count(), 7);
    }

    #[test]
    fn test_trailing_month_covers_thirty_days() {
        let range = DateRange::trailing_month(d(2024, 3, 1));
        assert_eq!(range.start(), d(2024, 2, 1));
        assert_eq!(range.day_count(), 30);
    }

    #[test]
    fn test_trailing_zero_days_is_one_day() {
        let range = DateRange::trailing(d(2024, 1, 1), 0);
        assert_eq!(range.day_count(), 1);
    }

    #[test]
    fn test_period_resolution() {
        let end = d(2024, 5, 31);
        assert_eq!(PayrollPeriod::Week.ending_on(end).day_count(), 7);
        assert_eq!(PayrollPeriod::Month.ending_on(end).day_count(), 30);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::parse("2024-01-01", "2024-01-03").unwrap();
        assert!(range.contains(d(2024, 1, 1)));
        assert!(range.contains(d(2024, 1, 3)));
        assert!(!range.contains(d(2024, 1, 4)));
    }

    #[test]
    fn test_display() {
        assert_eq!(DateRange::single(d(2024, 1, 1)).to_string(), "2024-01-01");
        assert_eq!(
            DateRange::parse("2024-01-01", "2024-01-07").unwrap().to_string(),
            "2024-01-01..=2024-01-07"
        );
    }

    #[test]
    fn test_period_deserializes_from_snake_case() {
        let period: PayrollPeriod = serde_json::from_str("\"month\"").unwrap();
        assert_eq!(period, PayrollPeriod::Month);
    }
}
