//! Behavioral split between continuous and event series.
//!
//! Storage is shared; only the handling of the range value differs. The
//! divergence lives behind [`SeriesVariant`] so a series can be matched on
//! its tag instead of downcast.

use std::sync::Arc;

use plotstream_core::{
    DiagnosticHub, DiagnosticKind, SharedLimitEvaluator, ValueFormatter, EVENT_CSS_CLASS,
    EVENT_MARKER_SIZE,
};
use plotstream_types::{Evaluation, Interpolate, MarkerShape, PlotPoint, SeriesConfig};

/// Which of the two series behaviors a series carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    /// Numeric telemetry with a range value per point.
    Continuous,
    /// Discrete occurrences with a domain value only.
    Event,
}

/// The per-variant state and behavior of a series.
pub(crate) enum SeriesVariant {
    Continuous {
        format_y: Arc<dyn ValueFormatter>,
        limits: Option<SharedLimitEvaluator>,
    },
    Event,
}

impl SeriesVariant {
    pub(crate) fn kind(&self) -> SeriesKind {
        match self {
            SeriesVariant::Continuous { .. } => SeriesKind::Continuous,
            SeriesVariant::Event => SeriesKind::Event,
        }
    }

    /// Validate or coerce the range value of an incoming point.
    ///
    /// Continuous series refuse points whose range value is missing or
    /// non-finite. Event series accept every point but null out a range
    /// value a producer should not have sent. `None` means the point is
    /// dropped; the caller has already checked the domain value.
    pub(crate) fn prepare(
        &self,
        mut point: PlotPoint,
        series_key: &str,
        diagnostics: &DiagnosticHub,
    ) -> Option<PlotPoint> {
        match self {
            SeriesVariant::Continuous { .. } => {
                if self.is_value_invalid(point.y) {
                    diagnostics.publish(
                        DiagnosticKind::MalformedPoint,
                        series_key,
                        format!(
                            "point at x = {} dropped: missing or non-finite range value",
                            point.x
                        ),
                    );
                    return None;
                }
                Some(point)
            }
            SeriesVariant::Event => {
                if point.y.is_some() {
                    diagnostics.publish(
                        DiagnosticKind::CoercedValue,
                        series_key,
                        format!(
                            "event point at x = {} carried a range value, coerced to null",
                            point.x
                        ),
                    );
                    point.y = None;
                }
                Some(point)
            }
        }
    }

    /// Whether a range value is unusable for this variant.
    pub(crate) fn is_value_invalid(&self, y: Option<f64>) -> bool {
        match self {
            SeriesVariant::Continuous { .. } => y.map_or(true, |y| !y.is_finite()),
            SeriesVariant::Event => false,
        }
    }

    /// Classify a stored point for display.
    pub(crate) fn evaluate(&self, point: &PlotPoint, series_name: &str) -> Evaluation {
        match self {
            SeriesVariant::Continuous { limits, .. } => limits
                .as_ref()
                .and_then(|evaluator| evaluator.evaluate(point))
                .map(Evaluation::from_violation)
                .unwrap_or_else(|| Evaluation::nominal(series_name)),
            SeriesVariant::Event => Evaluation {
                css_class: EVENT_CSS_CLASS.to_string(),
                high: None,
                low: None,
                name: series_name.to_string(),
            },
        }
    }

    /// Render a range value for the legend or a tooltip.
    pub(crate) fn format_y(&self, y: Option<f64>) -> String {
        match self {
            SeriesVariant::Continuous { format_y, .. } => {
                y.map(|y| format_y.format(y)).unwrap_or_default()
            }
            SeriesVariant::Event => String::new(),
        }
    }

    /// Force the configuration fields a variant does not let the host choose.
    pub(crate) fn enforce_config(&self, config: &mut SeriesConfig) {
        match self {
            SeriesVariant::Continuous { .. } => {}
            SeriesVariant::Event => {
                config.unit = None;
                config.y_key = None;
                config.y_axis_id = None;
                config.marker_shape = MarkerShape::VerticalLine;
                config.marker_size = EVENT_MARKER_SIZE;
                config.limit_lines = false;
                config.interpolate = Interpolate::None;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotstream_core::NumberFormat;

    fn continuous() -> SeriesVariant {
        SeriesVariant::Continuous {
            format_y: Arc::new(NumberFormat),
            limits: None,
        }
    }

    #[test]
    fn test_continuous_refuses_invalid_y() {
        let variant = continuous();
        let hub = DiagnosticHub::new();

        assert!(variant
            .prepare(PlotPoint::new(1.0, None), "s", &hub)
            .is_none());
        assert!(variant
            .prepare(PlotPoint::new(1.0, Some(f64::NAN)), "s", &hub)
            .is_none());
        assert!(variant
            .prepare(PlotPoint::new(1.0, Some(2.0)), "s", &hub)
            .is_some());
    }

    #[test]
    fn test_event_coerces_y_to_null() {
        let variant = SeriesVariant::Event;
        let hub = DiagnosticHub::new();

        let point = variant
            .prepare(PlotPoint::new(10.0, Some(7.0)), "s", &hub)
            .unwrap();
        assert_eq!(point.y, None);
        assert_eq!(point.x, 10.0);
    }

    #[test]
    fn test_event_never_invalid() {
        let variant = SeriesVariant::Event;
        assert!(!variant.is_value_invalid(None));
        assert!(!variant.is_value_invalid(Some(f64::NAN)));
    }

    #[test]
    fn test_event_evaluation_is_fixed() {
        let variant = SeriesVariant::Event;
        let eval = variant.evaluate(&PlotPoint::new(1.0, None), "Rocket Launches");
        assert_eq!(eval.css_class, EVENT_CSS_CLASS);
        assert_eq!(eval.high, None);
        assert_eq!(eval.low, None);
        assert_eq!(eval.name, "Rocket Launches");
    }

    #[test]
    fn test_event_format_y_is_empty() {
        assert_eq!(SeriesVariant::Event.format_y(Some(3.5)), "");
        assert_eq!(SeriesVariant::Event.format_y(None), "");
    }

    #[test]
    fn test_event_config_forced() {
        let mut config = SeriesConfig {
            unit: Some("V".to_string()),
            marker_size: 8.0,
            limit_lines: true,
            ..SeriesConfig::default()
        };
        SeriesVariant::Event.enforce_config(&mut config);

        assert_eq!(config.unit, None);
        assert_eq!(config.y_key, None);
        assert_eq!(config.y_axis_id, None);
        assert_eq!(config.marker_shape, MarkerShape::VerticalLine);
        assert_eq!(config.marker_size, EVENT_MARKER_SIZE);
        assert!(!config.limit_lines);
        assert_eq!(config.interpolate, Interpolate::None);
    }
}
