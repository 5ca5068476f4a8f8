//! Timezone and DST normalization.
//!
//! A naive wall-clock value is first anchored in the host zone (the zone of
//! the "local system clock"), then optionally shifted to account for DST
//! drift in the requested zone. The drift check compares the zone's offset
//! on the target date with its offset at the current moment. It does not
//! walk the zone's transition rules, so it is an approximation: a target
//! date and "now" on the same side of a transition never shift, even when
//! the host and target zones observe DST differently.
//!
//! The host zone and "now" are explicit inputs ([`NormalizeContext`]) so
//! every function here is deterministic under test.

use chrono::{
    DateTime, Duration, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc,
};
use chrono_tz::Tz;
use serde::Serialize;
use tracing::{debug, warn};

use crate::error::SleepError;
use crate::parser::ClockTime;

/// Zone used when the host environment's timezone cannot be determined.
pub const FALLBACK_TIMEZONE: &str = "UTC";

/// An absolute instant plus the timezone identifier that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedInstant {
    /// The instant in UTC.
    pub instant: DateTime<Utc>,
    /// IANA identifier used during normalization.
    pub timezone: String,
}

impl NormalizedInstant {
    /// Milliseconds since the Unix epoch.
    pub fn timestamp_millis(&self) -> i64 {
        self.instant.timestamp_millis()
    }
}

/// Summary of a timezone at a given moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimezoneInfo {
    /// The IANA timezone name.
    pub name: String,
    /// Minutes east of UTC (`UTC + offset = local`).
    pub offset: i32,
    /// Short display form, e.g. `"EST"` or `"+0545"`.
    pub abbreviation: String,
}

/// Explicit environment for [`normalize_instant`].
#[derive(Debug, Clone, Copy)]
pub struct NormalizeContext {
    /// Zone the wall-clock value is first interpreted in.
    pub host: Tz,
    /// The "current moment" used for the DST drift comparison.
    pub now: DateTime<Utc>,
}

/// Anchor `date` + `clock` and adjust for DST drift in `timezone`.
///
/// 1. The wall-clock value is resolved in `ctx.host`.
/// 2. When `handle_dst` is set, the offset of `timezone` at that instant is
///    compared with its offset at `ctx.now`; any difference is applied as a
///    shift of `current - target` minutes.
/// 3. If `timezone` cannot be resolved the baseline instant is returned
///    unchanged and a warning is logged.
///
/// # Errors
///
/// Returns [`SleepError::InvalidDate`] when the anchored or shifted instant
/// falls outside the representable date range.
pub fn normalize_instant(
    date: NaiveDate,
    clock: ClockTime,
    timezone: &str,
    handle_dst: bool,
    ctx: &NormalizeContext,
) -> Result<NormalizedInstant, SleepError> {
    let naive = date.and_time(clock.as_naive_time());
    let baseline = resolve_local(&ctx.host, naive)?.with_timezone(&Utc);

    if !handle_dst {
        return Ok(NormalizedInstant {
            instant: baseline,
            timezone: timezone.to_string(),
        });
    }

    let tz = match parse_timezone(timezone) {
        Ok(tz) => tz,
        Err(e) => {
            warn!(
                timezone,
                host = ctx.host.name(),
                error = %e,
                "timezone conversion failed, using local time"
            );
            return Ok(NormalizedInstant {
                instant: baseline,
                timezone: ctx.host.name().to_string(),
            });
        }
    };

    let target_offset = offset_minutes(&tz, &baseline);
    let current_offset = offset_minutes(&tz, &ctx.now);

    let instant = if target_offset != current_offset {
        let shift = current_offset - target_offset;
        debug!(
            timezone,
            target_offset, current_offset, shift, "applying DST offset drift"
        );
        baseline
            .checked_add_signed(Duration::minutes(i64::from(shift)))
            .ok_or_else(|| out_of_range(&naive))?
    } else {
        baseline
    };

    Ok(NormalizedInstant {
        instant,
        timezone: timezone.to_string(),
    })
}

/// Offset of `timezone` at `at`, in signed minutes (`UTC + offset = local`).
///
/// # Errors
///
/// Returns [`SleepError::InvalidTimezone`] for an unknown identifier.
pub fn timezone_offset(at: DateTime<Utc>, timezone: &str) -> Result<i32, SleepError> {
    let tz = parse_timezone(timezone)?;
    Ok(offset_minutes(&tz, &at))
}

/// Name, current offset and abbreviation for `timezone` as of `now`.
///
/// # Errors
///
/// Returns [`SleepError::InvalidTimezone`] if the identifier cannot be resolved.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use sleep_engine::timezone::timezone_info;
///
/// let now = Utc.with_ymd_and_hms(2026, 1, 15, 12, 0, 0).unwrap();
/// let info = timezone_info("America/New_York", now).unwrap();
/// assert_eq!(info.offset, -300);
/// assert_eq!(info.abbreviation, "EST");
/// ```
pub fn timezone_info(timezone: &str, now: DateTime<Utc>) -> Result<TimezoneInfo, SleepError> {
    let tz = parse_timezone(timezone)?;
    let local = now.with_timezone(&tz);

    Ok(TimezoneInfo {
        name: tz.name().to_string(),
        offset: local.offset().fix().local_minus_utc() / 60,
        abbreviation: local.format("%Z").to_string(),
    })
}

/// Render `instant` as zero-padded 24-hour `HH:MM:SS` in `timezone`.
///
/// Falls back to the host zone (with a warning) when `timezone` is unknown.
pub fn format_time_in_timezone(instant: DateTime<Utc>, timezone: &str, host: &Tz) -> String {
    match parse_timezone(timezone) {
        Ok(tz) => instant.with_timezone(&tz).format("%H:%M:%S").to_string(),
        Err(e) => {
            warn!(timezone, error = %e, "formatting in local time instead");
            instant.with_timezone(host).format("%H:%M:%S").to_string()
        }
    }
}

/// The host environment's IANA zone, or [`FALLBACK_TIMEZONE`].
pub fn host_timezone_name() -> String {
    match iana_time_zone::get_timezone() {
        Ok(name) if parse_timezone(&name).is_ok() => name,
        Ok(name) => {
            warn!(timezone = %name, "host timezone is not a known IANA zone, using UTC");
            FALLBACK_TIMEZONE.to_string()
        }
        Err(e) => {
            warn!(error = %e, "could not detect host timezone, using UTC");
            FALLBACK_TIMEZONE.to_string()
        }
    }
}

/// Parse an IANA timezone string into `Tz`.
pub fn parse_timezone(s: &str) -> Result<Tz, SleepError> {
    s.parse::<Tz>()
        .map_err(|_| SleepError::InvalidTimezone(format!("'{}'", s)))
}

/// Resolve a wall-clock value in `tz`.
///
/// Ambiguous values (fall-back overlap) take the earlier instant. Values in
/// a spring-forward gap are read with the offset in force before the gap,
/// which moves them forward by the gap length.
pub(crate) fn resolve_local(tz: &Tz, naive: NaiveDateTime) -> Result<DateTime<Tz>, SleepError> {
    match tz.from_local_datetime(&naive) {
        LocalResult::Single(dt) => Ok(dt),
        LocalResult::Ambiguous(earliest, _) => Ok(earliest),
        LocalResult::None => {
            let day_before = naive
                .checked_sub_signed(Duration::days(1))
                .ok_or_else(|| out_of_range(&naive))?;
            let before = tz
                .offset_from_utc_datetime(&day_before)
                .fix()
                .local_minus_utc();
            let utc = naive
                .checked_sub_signed(Duration::seconds(i64::from(before)))
                .ok_or_else(|| out_of_range(&naive))?;
            Ok(tz.from_utc_datetime(&utc))
        }
    }
}

pub(crate) fn out_of_range(naive: &NaiveDateTime) -> SleepError {
    SleepError::InvalidDate(format!("'{naive}' is outside the supported date range"))
}

fn offset_minutes(tz: &Tz, at: &DateTime<Utc>) -> i32 {
    tz.offset_from_utc_datetime(&at.naive_utc())
        .fix()
        .local_minus_utc()
        / 60
}

// ── Tests ───────────────────────────────────────────────────────────────────
