//! # sleep-engine
//!
//! Deterministic sleep duration computation.
//!
//! Parses bedtime and wake-up inputs, anchors them in a timezone with an
//! optional DST drift adjustment, applies the cross-midnight rule, and
//! classifies the resulting duration against a configurable guideline table.
//!
//! ## Modules
//!
//! - [`parser`] - clock text / resolved instants → [`ClockTime`]
//! - [`timezone`] - host-zone anchoring, DST drift, offsets and zone info
//! - [`duration`] - cross-midnight duration and English rendering
//! - [`classifier`] - guideline table and status classification
//! - [`calculator`] - the [`SleepCalculator`] facade
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use sleep_engine::{CalculationOptions, CalculatorConfig, SleepCalculator, SleepStatus};
//!
//! let calc = SleepCalculator::new(CalculatorConfig {
//!     host_timezone: Some("UTC".into()),
//!     default_timezone: Some("UTC".into()),
//!     ..Default::default()
//! })
//! .unwrap();
//!
//! let record = calc
//!     .calculate_sleep_duration("10:30 PM", "6:45 AM", &CalculationOptions::default())
//!     .unwrap();
//! assert_eq!(calc.format_sleep_duration(&record), "8 hours and 15 minutes");
//! assert_eq!(calc.validate_sleep_duration(&record).status, SleepStatus::Optimal);
//! ```

pub mod calculator;
pub mod classifier;
pub mod duration;
pub mod error;
pub mod parser;
pub mod timezone;

pub use calculator::{CalculationOptions, CalculatorConfig, SleepCalculator};
pub use classifier::{classify, GuidelineOverrides, SleepGuidelines, SleepStatus, ValidationResult};
pub use duration::{compute_sleep_record, format_sleep_duration, SleepRecord};
pub use error::SleepError;
pub use parser::{parse_date, parse_time_expression, parse_time_string, ClockTime, TimeExpression};
pub use timezone::{
    format_time_in_timezone, normalize_instant, timezone_info, timezone_offset, NormalizeContext,
    NormalizedInstant, TimezoneInfo,
};
