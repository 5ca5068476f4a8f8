//! Error types for sleep-engine operations.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SleepError {
    #[error("Invalid time format: {0}")]
    Format(String),

    #[error("Time out of range: {0}")]
    Range(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Calculation failed: {source}")]
    Calculation {
        #[source]
        source: Box<SleepError>,
    },
}

impl SleepError {
    /// Wrap an error raised during a top-level calculation.
    ///
    /// Already-wrapped errors are returned unchanged so the umbrella never nests.
    pub fn calculation(source: SleepError) -> Self {
        match source {
            SleepError::Calculation { .. } => source,
            other => SleepError::Calculation {
                source: Box::new(other),
            },
        }
    }

    /// The underlying error, looking through a [`SleepError::Calculation`] wrapper.
    pub fn root_cause(&self) -> &SleepError {
        match self {
            SleepError::Calculation { source } => source.root_cause(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, SleepError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_calculation_keeps_original_message() {
        let err = SleepError::calculation(SleepError::Range("hour 25".to_string()));
        assert_eq!(
            err.to_string(),
            "Calculation failed: Time out of range: hour 25"
        );
        assert!(matches!(err.root_cause(), SleepError::Range(_)));
    }

    #[test]
    fn test_calculation_does_not_nest() {
        let once = SleepError::calculation(SleepError::Format("x".to_string()));
        let twice = SleepError::calculation(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_root_cause_of_plain_error_is_itself() {
        let err = SleepError::InvalidTimezone("'Mars/Base'".to_string());
        assert_eq!(err.root_cause(), &err);
    }
}
