//! Clock-time parsing for bedtime and wake-up inputs.
//!
//! Accepts either free text in the `H{1,2}:MM[:SS][ ](AM|PM)` grammar
//! (case-insensitive) or a calendar instant that has already been resolved
//! by the caller. Both paths produce a [`ClockTime`] in 24-hour form.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeZone, Timelike};

use crate::error::SleepError;

/// A bedtime or wake-up input as supplied by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimeExpression {
    /// Clock text such as `"22:30"`, `"10:30 PM"` or `"07:15:30"`.
    Text(String),
    /// A calendar instant; only its wall-clock fields are used.
    Resolved(NaiveDateTime),
}

impl From<&str> for TimeExpression {
    fn from(s: &str) -> Self {
        TimeExpression::Text(s.to_string())
    }
}

impl From<String> for TimeExpression {
    fn from(s: String) -> Self {
        TimeExpression::Text(s)
    }
}

impl From<NaiveDateTime> for TimeExpression {
    fn from(dt: NaiveDateTime) -> Self {
        TimeExpression::Resolved(dt)
    }
}

impl<T: TimeZone> From<DateTime<T>> for TimeExpression {
    /// Keeps the wall-clock value as seen in the instant's own zone.
    fn from(dt: DateTime<T>) -> Self {
        TimeExpression::Resolved(dt.naive_local())
    }
}

/// An hour/minute/second triple in 24-hour form.
///
/// Always within `00:00:00..=23:59:59`; sub-second precision is dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClockTime(NaiveTime);

impl ClockTime {
    /// Build a clock time, rejecting out-of-range components.
    pub fn new(hour: u32, minute: u32, second: u32) -> Result<Self, SleepError> {
        if hour > 23 {
            return Err(SleepError::Range(format!("hour {hour} is not in 0-23")));
        }
        if minute > 59 {
            return Err(SleepError::Range(format!("minute {minute} is not in 0-59")));
        }
        if second > 59 {
            return Err(SleepError::Range(format!("second {second} is not in 0-59")));
        }
        NaiveTime::from_hms_opt(hour, minute, second)
            .map(ClockTime)
            .ok_or_else(|| SleepError::Range(format!("{hour:02}:{minute:02}:{second:02}")))
    }

    pub fn hour(&self) -> u32 {
        self.0.hour()
    }

    pub fn minute(&self) -> u32 {
        self.0.minute()
    }

    pub fn second(&self) -> u32 {
        self.0.second()
    }

    /// Seconds elapsed since midnight.
    pub fn seconds_from_midnight(&self) -> u32 {
        self.0.num_seconds_from_midnight()
    }

    pub fn as_naive_time(&self) -> NaiveTime {
        self.0
    }
}

impl From<NaiveTime> for ClockTime {
    fn from(t: NaiveTime) -> Self {
        ClockTime(t.with_nanosecond(0).unwrap_or(t))
    }
}

impl fmt::Display for ClockTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%H:%M:%S"))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Meridiem {
    Am,
    Pm,
}

/// Resolve a [`TimeExpression`] into a [`ClockTime`].
///
/// # Errors
///
/// Returns [`SleepError::Format`] for text that does not follow the clock
/// grammar and [`SleepError::Range`] for out-of-range components.
pub fn parse_time_expression(expr: &TimeExpression) -> Result<ClockTime, SleepError> {
    match expr {
        TimeExpression::Resolved(dt) => Ok(ClockTime::from(dt.time())),
        TimeExpression::Text(s) => parse_time_string(s),
    }
}

/// Parse clock text: `"22:30"`, `"7:05:09"`, `"10:30 PM"`, `"12:00am"`.
///
/// `pm` adds 12 to any hour except 12; `am` maps hour 12 to 0. Other
/// combinations pass through unchanged, so `"13:00 pm"` is a range error.
///
/// # Errors
///
/// Returns [`SleepError::Format`] if the text does not match the grammar and
/// [`SleepError::Range`] if hour, minute or second is out of bounds after the
/// 12-hour conversion.
///
/// # Examples
///
/// ```
/// use sleep_engine::parser::parse_time_string;
///
/// let t = parse_time_string("10:30 PM").unwrap();
/// assert_eq!((t.hour(), t.minute(), t.second()), (22, 30, 0));
/// ```
pub fn parse_time_string(input: &str) -> Result<ClockTime, SleepError> {
    let s = input.trim().to_ascii_lowercase();

    // At most one space may separate the clock from the marker.
    let (clock, meridiem) = if let Some(rest) = s.strip_suffix("pm") {
        (rest.strip_suffix(' ').unwrap_or(rest), Some(Meridiem::Pm))
    } else if let Some(rest) = s.strip_suffix("am") {
        (rest.strip_suffix(' ').unwrap_or(rest), Some(Meridiem::Am))
    } else {
        (s.as_str(), None)
    };

    let format_error = || SleepError::Format(format!("'{}'", input.trim()));

    let parts: Vec<&str> = clock.split(':').collect();
    let (hour, minute, second) = match parts.as_slice() {
        [h, m] => (
            parse_digits(h, 1, 2).ok_or_else(format_error)?,
            parse_digits(m, 2, 2).ok_or_else(format_error)?,
            0,
        ),
        [h, m, sec] => (
            parse_digits(h, 1, 2).ok_or_else(format_error)?,
            parse_digits(m, 2, 2).ok_or_else(format_error)?,
            parse_digits(sec, 2, 2).ok_or_else(format_error)?,
        ),
        _ => return Err(format_error()),
    };

    let hour = match (meridiem, hour) {
        (Some(Meridiem::Pm), h) if h != 12 => h + 12,
        (Some(Meridiem::Am), 12) => 0,
        (_, h) => h,
    };

    ClockTime::new(hour, minute, second)
        .map_err(|e| SleepError::Range(format!("'{}': {}", input.trim(), range_detail(&e))))
}

/// Parse a calendar date in `YYYY-MM-DD` form.
///
/// # Errors
///
/// Returns [`SleepError::InvalidDate`] for anything else.
pub fn parse_date(input: &str) -> Result<NaiveDate, SleepError> {
    NaiveDate::parse_from_str(input.trim(), "%Y-%m-%d")
        .map_err(|e| SleepError::InvalidDate(format!("'{}': {}", input.trim(), e)))
}

/// Parse a run of ASCII digits whose length lies in `min..=max`.
fn parse_digits(s: &str, min: usize, max: usize) -> Option<u32> {
    if s.len() < min || s.len() > max || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

fn range_detail(err: &SleepError) -> String {
    match err {
        SleepError::Range(detail) => detail.clone(),
        other => other.to_string(),
    }
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn hms(s: &str) -> (u32, u32, u32) {
        let t = parse_time_string(s).unwrap();
        (t.hour(), t.minute(), t.second())
    }

    #[test]
    fn test_parse_24_hour() {
        assert_eq!(hms("22:30"), (22, 30, 0));
        assert_eq!(hms("07:15"), (7, 15, 0));
        assert_eq!(hms("7:15"), (7, 15, 0));
        assert_eq!(hms("00:00"), (0, 0, 0));
        assert_eq!(hms("23:59:59"), (23, 59, 59));
    }

    #[test]
    fn test_parse_12_hour_pm() {
        assert_eq!(hms("10:30 PM"), (22, 30, 0));
        assert_eq!(hms("1:05pm"), (13, 5, 0));
        assert_eq!(hms("12:00 PM"), (12, 0, 0));
    }

    #[test]
    fn test_parse_12_hour_am() {
        assert_eq!(hms("6:45 AM"), (6, 45, 0));
        assert_eq!(hms("12:00 AM"), (0, 0, 0));
        assert_eq!(hms("12:30:15am"), (0, 30, 15));
    }

    #[test]
    fn test_parse_meridiem_case_insensitive() {
        assert_eq!(hms("10:30 pm"), (22, 30, 0));
        assert_eq!(hms("10:30 Pm"), (22, 30, 0));
        assert_eq!(hms("  6:45AM  "), (6, 45, 0));
    }

    #[test]
    fn test_parse_zero_hour_am_passes_through() {
        assert_eq!(hms("0:30 am"), (0, 30, 0));
    }

    #[test]
    fn test_parse_out_of_range_is_range_error() {
        let err = parse_time_string("25:61").unwrap_err();
        assert!(matches!(err, SleepError::Range(_)), "got: {err}");
        assert!(matches!(
            parse_time_string("23:60").unwrap_err(),
            SleepError::Range(_)
        ));
        assert!(matches!(
            parse_time_string("23:00:60").unwrap_err(),
            SleepError::Range(_)
        ));
    }

    #[test]
    fn test_parse_pm_pushes_hour_out_of_range() {
        let err = parse_time_string("13:00 PM").unwrap_err();
        assert!(matches!(err, SleepError::Range(_)), "got: {err}");
    }

    #[test]
    fn test_parse_bad_marker_is_format_error() {
        let err = parse_time_string("7:30xm").unwrap_err();
        assert!(matches!(err, SleepError::Format(_)), "got: {err}");
        assert!(err.to_string().contains("7:30xm"));
    }

    #[test]
    fn test_parse_malformed_inputs_are_format_errors() {
        for input in [
            "",
            "7",
            "7:3",
            "730",
            "123:00",
            "7:300",
            "7:30:5",
            "a:bc",
            "7:30:00:00",
            "7 :30",
            "10:30  PM",
            "10:30\tpm",
            "10:30\n am",
        ] {
            let err = parse_time_string(input).unwrap_err();
            assert!(matches!(err, SleepError::Format(_)), "{input:?} gave {err}");
        }
    }

    #[test]
    fn test_resolved_instant_skips_text_parsing() {
        let dt = NaiveDate::from_ymd_opt(2026, 3, 10)
            .unwrap()
            .and_hms_milli_opt(23, 4, 5, 678)
            .unwrap();
        let t = parse_time_expression(&TimeExpression::from(dt)).unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (23, 4, 5));
    }

    #[test]
    fn test_resolved_zoned_instant_uses_its_own_wall_clock() {
        let tokyo = chrono_tz::Asia::Tokyo
            .with_ymd_and_hms(2026, 1, 5, 6, 30, 0)
            .unwrap();
        let t = parse_time_expression(&TimeExpression::from(tokyo)).unwrap();
        assert_eq!(t.to_string(), "06:30:00");
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2026-03-10").unwrap(), NaiveDate::from_ymd_opt(2026, 3, 10).unwrap());
        let err = parse_date("2026-02-30").unwrap_err();
        assert!(matches!(err, SleepError::InvalidDate(_)), "got: {err}");
        assert!(parse_date("10/03/2026").is_err());
    }

    #[test]
    fn test_clock_time_display_is_zero_padded() {
        assert_eq!(ClockTime::new(7, 5, 9).unwrap().to_string(), "07:05:09");
        assert_eq!(ClockTime::new(7, 5, 9).unwrap().seconds_from_midnight(), 25509);
    }
}
