//! Telemetry sample types shared across the plot subsystem.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Raw telemetry fields for one sample, keyed by field name.
///
/// The buffer never interprets these beyond the configured x/y keys; all
/// other fields ride along untouched so marker tooltips and raw-value
/// inspection keep working downstream.
pub type Datum = Map<String, Value>;

/// One plotted sample: a domain value, an optional range value, and the raw
/// datum it was extracted from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlotPoint {
    /// Domain value (ordering key, usually a millisecond timestamp).
    pub x: f64,
    /// Range value. Always `None` for event series.
    #[serde(default)]
    pub y: Option<f64>,
    /// Raw datum fields, passed through untouched.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub datum: Datum,
}

impl PlotPoint {
    /// Create a point without a raw datum attached.
    pub fn new(x: f64, y: Option<f64>) -> Self {
        Self {
            x,
            y,
            datum: Map::new(),
        }
    }

    /// Create a point carrying its originating datum.
    pub fn with_datum(x: f64, y: Option<f64>, datum: Datum) -> Self {
        Self { x, y, datum }
    }

    /// Whether the domain value can participate in ordering.
    ///
    /// NaN and infinite x values have no defined sort position; a point
    /// without a usable x must never enter a buffer.
    pub fn has_valid_x(&self) -> bool {
        self.x.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_x_validity() {
        assert!(PlotPoint::new(1.0, Some(2.0)).has_valid_x());
        assert!(PlotPoint::new(-0.0, None).has_valid_x());
        assert!(!PlotPoint::new(f64::NAN, Some(2.0)).has_valid_x());
        assert!(!PlotPoint::new(f64::INFINITY, None).has_valid_x());
    }

    #[test]
    fn test_point_serialization() {
        let mut datum = Datum::new();
        datum.insert("utc".to_string(), Value::from(1000.0));
        datum.insert("state".to_string(), Value::from("GO"));

        let point = PlotPoint::with_datum(1000.0, Some(42.5), datum);
        let json = serde_json::to_string(&point).unwrap();
        assert!(json.contains("\"state\":\"GO\""));

        let back: PlotPoint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, point);
    }

    #[test]
    fn test_point_y_defaults_to_none() {
        let point: PlotPoint = serde_json::from_str("{\"x\": 5.0}").unwrap();
        assert_eq!(point.y, None);
        assert!(point.datum.is_empty());
    }
}
