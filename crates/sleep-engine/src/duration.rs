//! Sleep duration between two normalized instants.

use chrono::{DateTime, Days, Utc};
use chrono_tz::Tz;
use serde::Serialize;

use crate::error::SleepError;
use crate::timezone::{out_of_range, resolve_local, NormalizedInstant};

const MS_PER_MINUTE: i64 = 60_000;

/// The outcome of one bedtime/wake-up calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecord {
    pub bedtime: NormalizedInstant,
    /// Always after `bedtime`.
    pub wake_up_time: NormalizedInstant,
    /// `wake_up_time - bedtime`, including seconds and milliseconds.
    pub duration_ms: i64,
    /// Whole hours of sleep.
    pub hours: i64,
    /// Remaining whole minutes (0-59).
    pub minutes: i64,
    pub timezone: Option<String>,
}

impl SleepRecord {
    /// Duration in fractional hours, ignoring seconds.
    pub fn total_hours(&self) -> f64 {
        self.hours as f64 + self.minutes as f64 / 60.0
    }
}

/// Build a [`SleepRecord`] from a bedtime and a wake-up instant.
///
/// When `wake_up` is not after `bedtime`, it is moved to the same wall-clock
/// time on the next calendar day in `host`. Across a DST transition that day
/// is 23 or 25 hours long rather than 24.
///
/// # Errors
///
/// Returns [`SleepError::InvalidDate`] when the next calendar day is past
/// the last representable date.
pub fn compute_sleep_record(
    bedtime: NormalizedInstant,
    wake_up: NormalizedInstant,
    host: &Tz,
    timezone: Option<String>,
) -> Result<SleepRecord, SleepError> {
    let wake_up = if wake_up.instant <= bedtime.instant {
        NormalizedInstant {
            instant: next_calendar_day(wake_up.instant, host)?,
            timezone: wake_up.timezone,
        }
    } else {
        wake_up
    };

    let duration_ms = wake_up.timestamp_millis() - bedtime.timestamp_millis();
    let total_minutes = duration_ms.div_euclid(MS_PER_MINUTE);

    Ok(SleepRecord {
        bedtime,
        wake_up_time: wake_up,
        duration_ms,
        hours: total_minutes / 60,
        minutes: total_minutes % 60,
        timezone,
    })
}

/// Render a record as English prose: `"8 hours and 45 minutes"`, `"5 hours"`.
///
/// A zero-valued unit is omitted; an empty duration reads `"0 minutes"`.
pub fn format_sleep_duration(record: &SleepRecord) -> String {
    let mut parts = Vec::new();
    if record.hours > 0 {
        parts.push(plural(record.hours, "hour"));
    }
    if record.minutes > 0 || parts.is_empty() {
        parts.push(plural(record.minutes, "minute"));
    }
    parts.join(" and ")
}

fn plural(n: i64, unit: &str) -> String {
    format!("{} {}{}", n, unit, if n == 1 { "" } else { "s" })
}

/// Same wall-clock time one calendar day later in `host`.
fn next_calendar_day(instant: DateTime<Utc>, host: &Tz) -> Result<DateTime<Utc>, SleepError> {
    let local = instant.with_timezone(host).naive_local();
    let next = local
        .checked_add_days(Days::new(1))
        .ok_or_else(|| out_of_range(&local))?;
    Ok(resolve_local(host, next)?.with_timezone(&Utc))
}

// ── Tests ───────────────────────────────────────────────────────────────────
