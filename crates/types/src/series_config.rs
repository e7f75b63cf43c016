//! Per-series plot configuration.

use serde::{Deserialize, Serialize};

/// Marker glyph drawn at each point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MarkerShape {
    #[default]
    Point,
    Circle,
    Diamond,
    Square,
    /// Axis-spanning vertical line; the event series default.
    VerticalLine,
}

/// Line interpolation between points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Interpolate {
    /// Markers only, no connecting line.
    #[default]
    None,
    Linear,
    StepAfter,
}

/// How the buffer treats a second point with an already-present x.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DedupPolicy {
    /// Duplicates are stored; the newcomer lands after the existing run.
    #[default]
    Allow,
    /// The existing point wins; the newcomer is dropped.
    KeepFirst,
    /// The newcomer replaces the existing point in place.
    KeepLast,
}

/// Buffer retention limits. Unset fields leave the buffer unbounded on that
/// axis; eviction is always oldest-first and never reorders survivors.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct RetentionPolicy {
    /// Maximum retained point count.
    #[serde(default)]
    pub max_points: Option<usize>,
    /// Maximum x-span kept behind the newest point.
    #[serde(default)]
    pub max_span: Option<f64>,
}

impl RetentionPolicy {
    pub fn is_unbounded(&self) -> bool {
        self.max_points.is_none() && self.max_span.is_none()
    }
}

fn default_x_key() -> String {
    "utc".to_string()
}

fn default_marker_size() -> f64 {
    2.0
}

fn default_y_axis_id() -> Option<u32> {
    Some(1)
}

fn default_true() -> bool {
    true
}

/// Configuration for one plotted series.
///
/// Readable by axis/legend consumers; mutated only through the owning
/// series' setters so every change raises a redraw notification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Display name (defaults to the telemetry object's name).
    #[serde(default)]
    pub name: String,
    /// Unit label shown by legend/axis consumers. Always `None` for event
    /// series.
    #[serde(default)]
    pub unit: Option<String>,
    /// Datum field carrying the domain value.
    #[serde(default = "default_x_key")]
    pub x_key: String,
    /// Datum field carrying the range value. `None` for event series.
    #[serde(default)]
    pub y_key: Option<String>,
    /// Draw point markers.
    #[serde(default = "default_true")]
    pub markers: bool,
    #[serde(default)]
    pub marker_shape: MarkerShape,
    #[serde(default = "default_marker_size")]
    pub marker_size: f64,
    /// Draw distinct markers for limit-violating points.
    #[serde(default = "default_true")]
    pub alarm_markers: bool,
    /// Draw configured limit bounds as horizontal lines.
    #[serde(default)]
    pub limit_lines: bool,
    /// Shared y-axis this series contributes its range to. `None` excludes
    /// the series from y-range aggregation (always the case for events).
    #[serde(default = "default_y_axis_id")]
    pub y_axis_id: Option<u32>,
    #[serde(default)]
    pub interpolate: Interpolate,
    #[serde(default)]
    pub dedup: DedupPolicy,
    #[serde(default)]
    pub retention: RetentionPolicy,
}

impl Default for SeriesConfig {
    fn default() -> Self {
        Self {
            name: String::new(),
            unit: None,
            x_key: default_x_key(),
            y_key: None,
            markers: true,
            marker_shape: MarkerShape::default(),
            marker_size: default_marker_size(),
            alarm_markers: true,
            limit_lines: false,
            y_axis_id: default_y_axis_id(),
            interpolate: Interpolate::default(),
            dedup: DedupPolicy::default(),
            retention: RetentionPolicy::default(),
        }
    }
}

impl SeriesConfig {
    /// Parse a configuration from a host-supplied JSON value.
    pub fn from_value(value: serde_json::Value) -> serde_json::Result<Self> {
        serde_json::from_value(value)
    }

    /// Serialize for host-side persistence.
    pub fn to_value(&self) -> serde_json::Result<serde_json::Value> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = SeriesConfig::default();
        assert_eq!(config.x_key, "utc");
        assert!(config.markers);
        assert!(config.alarm_markers);
        assert!(!config.limit_lines);
        assert_eq!(config.y_axis_id, Some(1));
        assert_eq!(config.interpolate, Interpolate::None);
        assert_eq!(config.dedup, DedupPolicy::Allow);
        assert!(config.retention.is_unbounded());
    }

    #[test]
    fn test_config_from_sparse_value() {
        let config = SeriesConfig::from_value(serde_json::json!({
            "name": "Bus Voltage",
            "y_key": "value",
            "retention": { "max_points": 5000 }
        }))
        .unwrap();
        assert_eq!(config.name, "Bus Voltage");
        assert_eq!(config.y_key.as_deref(), Some("value"));
        assert_eq!(config.retention.max_points, Some(5000));
        assert_eq!(config.retention.max_span, None);
        assert_eq!(config.marker_size, 2.0);
    }

    #[test]
    fn test_enum_serialization() {
        let json = serde_json::to_string(&Interpolate::StepAfter).unwrap();
        assert_eq!(json, "\"step_after\"");

        let shape: MarkerShape = serde_json::from_str("\"vertical_line\"").unwrap();
        assert_eq!(shape, MarkerShape::VerticalLine);

        let dedup: DedupPolicy = serde_json::from_str("\"keep_last\"").unwrap();
        assert_eq!(dedup, DedupPolicy::KeepLast);
    }

    #[test]
    fn test_config_round_trip() {
        let mut config = SeriesConfig::default();
        config.name = "Temps".to_string();
        config.marker_shape = MarkerShape::Diamond;
        config.retention.max_span = Some(60_000.0);

        let value = config.to_value().unwrap();
        let back = SeriesConfig::from_value(value).unwrap();
        assert_eq!(back, config);
    }
}
