//! KPI status evaluation.
//!
//! Classifies a reading against its target expression. Targets look like
//! `"< 30"` or `"> 4.0"`: a comparison operator followed by a numeric
//! threshold. Evaluation is total: malformed targets and unknown metric
//! kinds degrade to a deterministic answer instead of failing.

use crate::source::MetricKind;

/// Health classification for a single KPI reading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum KpiStatus {
    Good,
    Warning,
}

impl KpiStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            KpiStatus::Good => "OK",
            KpiStatus::Warning => "WARN",
        }
    }

    /// Returns the full label for display.
    pub fn label(&self) -> &'static str {
        match self {
            KpiStatus::Good => "Good",
            KpiStatus::Warning => "Warning",
        }
    }
}

/// Extract the numeric threshold from a target expression.
///
/// Every character that is not an ASCII digit or `.` is stripped before
/// parsing, so `"< 30"` yields `30.0`. Returns `NaN` when nothing
/// parseable remains.
pub fn parse_threshold(target: &str) -> f64 {
    let digits: String = target
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    digits.parse().unwrap_or(f64::NAN)
}

/// Classify a reading against its target.
///
/// `lower_better` is Good when the value is below the threshold,
/// `higher_better` when above it. A `NaN` threshold compares false on both
/// branches and therefore yields Warning. Unrecognized metric kinds are
/// treated as Good.
pub fn evaluate(current_value: f64, target: &str, kind: MetricKind) -> KpiStatus {
    let threshold = parse_threshold(target);
    let good = match kind {
        MetricKind::LowerBetter => current_value < threshold,
        MetricKind::HigherBetter => current_value > threshold,
        MetricKind::Other => true,
    };

    if good {
        KpiStatus::Good
    } else {
        KpiStatus::Warning
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_better_good_iff_below_threshold() {
        assert_eq!(evaluate(27.2, "< 30", MetricKind::LowerBetter), KpiStatus::Good);
        assert_eq!(evaluate(30.0, "< 30", MetricKind::LowerBetter), KpiStatus::Warning);
        assert_eq!(evaluate(31.5, "< 30", MetricKind::LowerBetter), KpiStatus::Warning);
    }

    #[test]
    fn test_higher_better_good_iff_above_threshold() {
        assert_eq!(evaluate(3.9, "> 4.0", MetricKind::HigherBetter), KpiStatus::Warning);
        assert_eq!(evaluate(4.0, "> 4.0", MetricKind::HigherBetter), KpiStatus::Warning);
        assert_eq!(evaluate(4.3, "> 4.0", MetricKind::HigherBetter), KpiStatus::Good);
    }

    #[test]
    fn test_malformed_target_is_warning_for_both_kinds() {
        assert_eq!(
            evaluate(0.0, "not a number", MetricKind::LowerBetter),
            KpiStatus::Warning
        );
        assert_eq!(
            evaluate(1_000_000.0, "not a number", MetricKind::HigherBetter),
            KpiStatus::Warning
        );
    }

    #[test]
    fn test_unknown_kind_defaults_to_good() {
        assert_eq!(evaluate(99.0, "< 1", MetricKind::Other), KpiStatus::Good);
    }

    #[test]
    fn test_parse_threshold_strips_operator_and_whitespace() {
        assert_eq!(parse_threshold("< 30"), 30.0);
        assert_eq!(parse_threshold("> 4.0"), 4.0);
        assert_eq!(parse_threshold("<= 95%"), 95.0);
    }

    #[test]
    fn test_parse_threshold_empty_is_nan() {
        assert!(parse_threshold("").is_nan());
        assert!(parse_threshold("> target").is_nan());
    }

    #[test]
    fn test_parse_threshold_multiple_dots_is_nan() {
        // "v1.2.3" strips to "1.2.3" which is not a number
        assert!(parse_threshold("v1.2.3").is_nan());
    }

    #[test]
    fn test_warning_sorts_after_good() {
        assert!(KpiStatus::Warning > KpiStatus::Good);
    }
}
