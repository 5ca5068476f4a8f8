//! Classification of sleep durations against a guideline table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Hour thresholds used to classify a night's sleep.
///
/// The expected ordering is `insufficient < adequate <= optimal < excessive`,
/// but it is not checked. An inconsistent table still classifies; some bands
/// simply become unreachable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SleepGuidelines {
    pub insufficient: f64,
    pub adequate: f64,
    pub optimal: f64,
    pub excessive: f64,
}

impl Default for SleepGuidelines {
    fn default() -> Self {
        Self {
            insufficient: 6.0,
            adequate: 7.0,
            optimal: 9.0,
            excessive: 10.0,
        }
    }
}

impl SleepGuidelines {
    /// Replace every threshold that `overrides` sets.
    pub fn merge(&mut self, overrides: &GuidelineOverrides) {
        if let Some(v) = overrides.insufficient {
            self.insufficient = v;
        }
        if let Some(v) = overrides.adequate {
            self.adequate = v;
        }
        if let Some(v) = overrides.optimal {
            self.optimal = v;
        }
        if let Some(v) = overrides.excessive {
            self.excessive = v;
        }
    }

    /// Copy of `self` with `overrides` applied.
    pub fn merged(mut self, overrides: &GuidelineOverrides) -> Self {
        self.merge(overrides);
        self
    }
}

/// A partial guideline table; unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GuidelineOverrides {
    pub insufficient: Option<f64>,
    pub adequate: Option<f64>,
    pub optimal: Option<f64>,
    pub excessive: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepStatus {
    Insufficient,
    Adequate,
    Optimal,
    Excessive,
}

impl SleepStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SleepStatus::Insufficient => "insufficient",
            SleepStatus::Adequate => "adequate",
            SleepStatus::Optimal => "optimal",
            SleepStatus::Excessive => "excessive",
        }
    }

    pub fn recommendation(&self) -> &'static str {
        match self {
            SleepStatus::Insufficient => {
                "You are not getting enough sleep. Try going to bed earlier or keeping a consistent sleep schedule."
            }
            SleepStatus::Adequate => {
                "Your sleep is within an acceptable range, but aiming for the optimal range may improve how you feel."
            }
            SleepStatus::Optimal => "Great job! You are getting an optimal amount of sleep.",
            SleepStatus::Excessive => {
                "You may be sleeping more than needed. Oversleeping can leave you groggy; consider a regular wake-up time."
            }
        }
    }
}

impl fmt::Display for SleepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status, advice and rounded total hours for one night.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResult {
    pub status: SleepStatus,
    pub recommendation: String,
    /// Hours plus minutes/60, rounded to two decimals.
    pub total_hours: f64,
}

/// Classify `hours` + `minutes` against `guidelines`.
///
/// Checked in order: below `insufficient`, above `excessive`, within
/// `adequate..=optimal`, and finally `adequate` for whatever remains.
pub fn classify(hours: i64, minutes: i64, guidelines: &SleepGuidelines) -> ValidationResult {
    let total_hours = hours as f64 + minutes as f64 / 60.0;

    let status = if total_hours < guidelines.insufficient {
        SleepStatus::Insufficient
    } else if total_hours > guidelines.excessive {
        SleepStatus::Excessive
    } else if total_hours >= guidelines.adequate && total_hours <= guidelines.optimal {
        SleepStatus::Optimal
    } else {
        SleepStatus::Adequate
    };

    ValidationResult {
        status,
        recommendation: status.recommendation().to_string(),
        total_hours: round_hundredths(total_hours),
    }
}

/// Round half-up on the hundredths digit.
fn round_hundredths(value: f64) -> f64 {
    (value * 100.0 + 0.5).floor() / 100.0
}

// ── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn status(hours: i64, minutes: i64) -> SleepStatus {
        classify(hours, minutes, &SleepGuidelines::default()).status
    }

    #[test]
    fn test_default_bands() {
        assert_eq!(status(5, 0), SleepStatus::Insufficient);
        assert_eq!(status(6, 30), SleepStatus::Adequate);
        assert_eq!(status(8, 45), SleepStatus::Optimal);
        assert_eq!(status(9, 30), SleepStatus::Adequate);
        assert_eq!(status(10, 1), SleepStatus::Excessive);
    }

    #[test]
    fn test_band_edges_are_inclusive() {
        assert_eq!(status(6, 0), SleepStatus::Adequate);
        assert_eq!(status(7, 0), SleepStatus::Optimal);
        assert_eq!(status(9, 0), SleepStatus::Optimal);
        assert_eq!(status(10, 0), SleepStatus::Adequate);
    }

    #[test]
    fn test_total_hours_rounded_to_two_decimals() {
        let r = classify(7, 20, &SleepGuidelines::default());
        assert_eq!(r.total_hours, 7.33);
        let r = classify(7, 25, &SleepGuidelines::default());
        assert_eq!(r.total_hours, 7.42);
        let r = classify(8, 45, &SleepGuidelines::default());
        assert_eq!(r.total_hours, 8.75);
    }

    #[test]
    fn test_recommendation_matches_status() {
        let r = classify(5, 0, &SleepGuidelines::default());
        assert_eq!(r.recommendation, SleepStatus::Insufficient.recommendation());
    }

    #[test]
    fn test_classification_is_idempotent() {
        let g = SleepGuidelines::default();
        assert_eq!(classify(8, 15, &g), classify(8, 15, &g));
    }

    #[test]
    fn test_inverted_thresholds_are_accepted() {
        // adequate > optimal: the optimal band is empty
        let g = SleepGuidelines {
            insufficient: 5.0,
            adequate: 9.0,
            optimal: 7.0,
            excessive: 11.0,
        };
        assert_eq!(classify(8, 0, &g).status, SleepStatus::Adequate);
        assert_eq!(classify(9, 0, &g).status, SleepStatus::Adequate);
    }

    #[test]
    fn test_merge_overrides_only_set_fields() {
        let mut g = SleepGuidelines::default();
        g.merge(&GuidelineOverrides {
            excessive: Some(11.0),
            ..Default::default()
        });
        assert_eq!(g.excessive, 11.0);
        assert_eq!(g.insufficient, 6.0);
        assert_eq!(g.adequate, 7.0);
        assert_eq!(g.optimal, 9.0);
    }

    #[test]
    fn test_status_serializes_lowercase() {
        let r = classify(5, 0, &SleepGuidelines::default());
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json["status"], "insufficient");
        assert_eq!(json["totalHours"], 5.0);
    }

    #[test]
    fn test_overrides_reject_unknown_keys() {
        let err = serde_json::from_str::<GuidelineOverrides>(r#"{"minimum": 4}"#);
        assert!(err.is_err());
    }
}
