//! Limit/alarm classification types.

use serde::{Deserialize, Serialize};

/// Alarm severity ladder, least to most severe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimitSeverity {
    Watch,
    Warning,
    Distress,
    Critical,
}

impl LimitSeverity {
    /// CSS class fragment the rendering layer colors alarm markers with.
    pub fn css_class(&self) -> &'static str {
        match self {
            LimitSeverity::Watch => "is-limit--cyan",
            LimitSeverity::Warning => "is-limit--yellow",
            LimitSeverity::Distress => "is-limit--orange",
            LimitSeverity::Critical => "is-limit--red",
        }
    }
}

/// One alarm band: a severity and the value bounds that trip it.
///
/// A band with only `high` set is an upper limit, only `low` a lower limit;
/// both set means either crossing violates it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitBand {
    /// Display name (e.g. "Critical High").
    pub name: String,
    pub severity: LimitSeverity,
    /// Violated when the value is at or below this bound.
    #[serde(default)]
    pub low: Option<f64>,
    /// Violated when the value is at or above this bound.
    #[serde(default)]
    pub high: Option<f64>,
}

impl LimitBand {
    pub fn new(
        name: impl Into<String>,
        severity: LimitSeverity,
        low: Option<f64>,
        high: Option<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            severity,
            low,
            high,
        }
    }

    /// Whether the given range value trips this band.
    pub fn violated_by(&self, value: f64) -> bool {
        let above = self.high.is_some_and(|high| value >= high);
        let below = self.low.is_some_and(|low| value <= low);
        above || below
    }

    /// Whether the violation crossed the upper bound (as opposed to the
    /// lower one). Only meaningful when `violated_by` is true.
    pub fn violates_high(&self, value: f64) -> bool {
        self.high.is_some_and(|high| value >= high)
    }
}

/// A classified limit violation, as produced by a limit evaluator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LimitViolation {
    /// Full CSS class string for the violating point (side + severity).
    pub css_class: String,
    pub severity: LimitSeverity,
    /// Upper bound of the violated band, if it has one.
    pub high: Option<f64>,
    /// Lower bound of the violated band, if it has one.
    pub low: Option<f64>,
    /// Name of the violated band.
    pub name: String,
}

/// Result of classifying one point. Ephemeral: recomputed on demand, never
/// stored in the buffer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    /// CSS class for the point, empty when nothing applies.
    pub css_class: String,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub name: String,
}

impl Evaluation {
    /// The "no violation" classification: no class, no band.
    pub fn nominal(name: impl Into<String>) -> Self {
        Self {
            css_class: String::new(),
            high: None,
            low: None,
            name: name.into(),
        }
    }

    pub fn from_violation(violation: LimitViolation) -> Self {
        Self {
            css_class: violation.css_class,
            high: violation.high,
            low: violation.low,
            name: violation.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_violation_sides() {
        let upper = LimitBand::new("Warning High", LimitSeverity::Warning, None, Some(80.0));
        assert!(upper.violated_by(80.0));
        assert!(upper.violated_by(99.0));
        assert!(!upper.violated_by(79.9));
        assert!(upper.violates_high(85.0));

        let lower = LimitBand::new("Warning Low", LimitSeverity::Warning, Some(10.0), None);
        assert!(lower.violated_by(10.0));
        assert!(lower.violated_by(-3.0));
        assert!(!lower.violated_by(10.1));
        assert!(!lower.violates_high(5.0));
    }

    #[test]
    fn test_severity_ordering() {
        assert!(LimitSeverity::Critical > LimitSeverity::Warning);
        assert!(LimitSeverity::Warning > LimitSeverity::Watch);
    }

    #[test]
    fn test_nominal_evaluation() {
        let evaluation = Evaluation::nominal("Battery Voltage");
        assert!(evaluation.css_class.is_empty());
        assert_eq!(evaluation.high, None);
        assert_eq!(evaluation.low, None);
        assert_eq!(evaluation.name, "Battery Voltage");
    }

    #[test]
    fn test_severity_serialization() {
        let json = serde_json::to_string(&LimitSeverity::Distress).unwrap();
        assert_eq!(json, "\"distress\"");
    }
}
