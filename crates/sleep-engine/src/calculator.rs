//! The [`SleepCalculator`] facade.
//!
//! Holds the guideline table and default date/timezone, and chains parsing,
//! normalization and duration computation into a single call.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use tracing::debug;

use crate::classifier::{classify, GuidelineOverrides, SleepGuidelines, ValidationResult};
use crate::duration::{compute_sleep_record, format_sleep_duration, SleepRecord};
use crate::error::SleepError;
use crate::parser::{parse_time_expression, TimeExpression};
use crate::timezone::{
    format_time_in_timezone, host_timezone_name, normalize_instant, parse_timezone,
    timezone_info, NormalizeContext, TimezoneInfo,
};

/// Construction-time settings for [`SleepCalculator`].
///
/// Every field is optional. Deserializes from camel-case JSON:
///
/// ```json
/// { "guidelines": { "excessive": 11 }, "defaultDate": "2026-03-10",
///   "defaultTimezone": "America/New_York", "hostTimezone": "UTC" }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CalculatorConfig {
    /// Overrides merged onto [`SleepGuidelines::default`].
    pub guidelines: Option<GuidelineOverrides>,
    /// Calendar date bedtimes are placed on. Defaults to today in the host zone.
    pub default_date: Option<NaiveDate>,
    /// Target zone when a call does not name one. Defaults to the host zone.
    pub default_timezone: Option<String>,
    /// Zone wall-clock inputs are first read in. Defaults to the detected host zone.
    pub host_timezone: Option<String>,
}

/// Per-call options for [`SleepCalculator::calculate_sleep_duration`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalculationOptions {
    /// Target timezone; the calculator default when `None`.
    pub timezone: Option<String>,
    /// Base date; the calculator default when `None`.
    pub date: Option<NaiveDate>,
    /// Apply the DST drift adjustment.
    pub handle_dst: bool,
}

impl Default for CalculationOptions {
    fn default() -> Self {
        Self {
            timezone: None,
            date: None,
            handle_dst: true,
        }
    }
}

/// Sleep duration calculator with mutable guideline and default settings.
#[derive(Debug, Clone)]
pub struct SleepCalculator {
    guidelines: SleepGuidelines,
    default_date: NaiveDate,
    default_timezone: String,
    host: Tz,
}

impl Default for SleepCalculator {
    fn default() -> Self {
        let host = detected_host();
        Self {
            guidelines: SleepGuidelines::default(),
            default_date: today_in(&host),
            default_timezone: host.name().to_string(),
            host,
        }
    }
}

impl SleepCalculator {
    /// Build a calculator from `config`, filling gaps from the host environment.
    ///
    /// # Errors
    ///
    /// Returns [`SleepError::InvalidTimezone`] if `config.host_timezone` is set
    /// but not a known IANA zone. An unknown `default_timezone` is accepted and
    /// falls back to local time when used.
    pub fn new(config: CalculatorConfig) -> Result<Self, SleepError> {
        let host = match config.host_timezone.as_deref() {
            Some(name) => parse_timezone(name)?,
            None => detected_host(),
        };

        let guidelines = match &config.guidelines {
            Some(overrides) => SleepGuidelines::default().merged(overrides),
            None => SleepGuidelines::default(),
        };

        Ok(Self {
            guidelines,
            default_date: config.default_date.unwrap_or_else(|| today_in(&host)),
            default_timezone: config
                .default_timezone
                .unwrap_or_else(|| host.name().to_string()),
            host,
        })
    }

    /// Compute the sleep between `bedtime` and `wake_up`.
    ///
    /// Both inputs are placed on the option's date (or the default date),
    /// normalized for the target timezone, and a wake-up at or before the
    /// bedtime is moved to the next day.
    ///
    /// # Errors
    ///
    /// Any failure is returned as [`SleepError::Calculation`] wrapping the
    /// original [`SleepError::Format`], [`SleepError::Range`] or, for a base
    /// date at the edge of the calendar, [`SleepError::InvalidDate`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sleep_engine::{CalculationOptions, CalculatorConfig, SleepCalculator};
    ///
    /// let calc = SleepCalculator::new(CalculatorConfig {
    ///     host_timezone: Some("UTC".into()),
    ///     default_timezone: Some("UTC".into()),
    ///     ..Default::default()
    /// })
    /// .unwrap();
    /// let record = calc
    ///     .calculate_sleep_duration("22:30", "07:15", &CalculationOptions::default())
    ///     .unwrap();
    /// assert_eq!(calc.format_sleep_duration(&record), "8 hours and 45 minutes");
    /// ```
    pub fn calculate_sleep_duration(
        &self,
        bedtime: impl Into<TimeExpression>,
        wake_up: impl Into<TimeExpression>,
        options: &CalculationOptions,
    ) -> Result<SleepRecord, SleepError> {
        self.calculate_sleep_duration_at(Utc::now(), bedtime, wake_up, options)
    }

    /// [`calculate_sleep_duration`](Self::calculate_sleep_duration) with an
    /// explicit "now" for the DST drift comparison.
    pub fn calculate_sleep_duration_at(
        &self,
        now: DateTime<Utc>,
        bedtime: impl Into<TimeExpression>,
        wake_up: impl Into<TimeExpression>,
        options: &CalculationOptions,
    ) -> Result<SleepRecord, SleepError> {
        self.try_calculate(now, &bedtime.into(), &wake_up.into(), options)
            .map_err(SleepError::calculation)
    }

    fn try_calculate(
        &self,
        now: DateTime<Utc>,
        bedtime: &TimeExpression,
        wake_up: &TimeExpression,
        options: &CalculationOptions,
    ) -> Result<SleepRecord, SleepError> {
        let timezone = options
            .timezone
            .as_deref()
            .unwrap_or(&self.default_timezone);
        let date = options.date.unwrap_or(self.default_date);

        let bed_clock = parse_time_expression(bedtime)?;
        let wake_clock = parse_time_expression(wake_up)?;

        let ctx = NormalizeContext {
            host: self.host,
            now,
        };
        let bed = normalize_instant(date, bed_clock, timezone, options.handle_dst, &ctx)?;
        let wake = normalize_instant(date, wake_clock, timezone, options.handle_dst, &ctx)?;

        let record = compute_sleep_record(bed, wake, &self.host, Some(timezone.to_string()))?;
        debug!(
            %date,
            timezone,
            bedtime = %bed_clock,
            wake_up = %wake_clock,
            duration_ms = record.duration_ms,
            "calculated sleep duration"
        );
        Ok(record)
    }

    /// English prose for `record`, e.g. `"8 hours and 15 minutes"`.
    pub fn format_sleep_duration(&self, record: &SleepRecord) -> String {
        format_sleep_duration(record)
    }

    /// Classify `record` against the current guidelines.
    pub fn validate_sleep_duration(&self, record: &SleepRecord) -> ValidationResult {
        let result = classify(record.hours, record.minutes, &self.guidelines);
        debug!(
            status = %result.status,
            total_hours = result.total_hours,
            "classified sleep duration"
        );
        result
    }

    /// Details for `timezone` as of now.
    ///
    /// # Errors
    ///
    /// Returns [`SleepError::InvalidTimezone`] for an unknown identifier.
    pub fn timezone_info(&self, timezone: &str) -> Result<TimezoneInfo, SleepError> {
        timezone_info(timezone, Utc::now())
    }

    /// `HH:MM:SS` for `instant` in `timezone`, or in the host zone if unknown.
    pub fn format_time_in_timezone(&self, instant: DateTime<Utc>, timezone: &str) -> String {
        format_time_in_timezone(instant, timezone, &self.host)
    }

    pub fn guidelines(&self) -> &SleepGuidelines {
        &self.guidelines
    }

    /// Merge `overrides` into the current guidelines.
    pub fn update_guidelines(&mut self, overrides: &GuidelineOverrides) {
        self.guidelines.merge(overrides);
    }

    pub fn default_timezone(&self) -> &str {
        &self.default_timezone
    }

    pub fn set_default_timezone(&mut self, timezone: impl Into<String>) {
        self.default_timezone = timezone.into();
    }

    pub fn default_date(&self) -> NaiveDate {
        self.default_date
    }

    pub fn set_default_date(&mut self, date: NaiveDate) {
        self.default_date = date;
    }

    pub fn host_timezone(&self) -> Tz {
        self.host
    }
}

fn detected_host() -> Tz {
    parse_timezone(&host_timezone_name()).unwrap_or(Tz::UTC)
}

fn today_in(tz: &Tz) -> NaiveDate {
    Utc::now().with_timezone(tz).date_naive()
}

// ── Tests ───────────────────────────────────────────────────────────────────
