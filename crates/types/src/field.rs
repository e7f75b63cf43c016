//! Value descriptor metadata for telemetry sources.

use serde::{Deserialize, Serialize};

/// Role a value plays when plotted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueHint {
    /// Ordering axis (usually time).
    Domain,
    /// Measured value suitable for a y-axis.
    Range,
    /// Discrete occurrence with no measured value.
    Event,
}

/// Metadata describing a single telemetry value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValueMetadata {
    /// Datum field carrying this value.
    pub key: String,
    /// Human-readable name.
    pub name: String,
    /// Unit of measurement (e.g. "°C", "V").
    #[serde(default)]
    pub unit: Option<String>,
    /// Roles this value can play.
    #[serde(default)]
    pub hints: Vec<ValueHint>,
    /// Named formatter for this value; a plain number format is used when
    /// unset.
    #[serde(default)]
    pub format: Option<String>,
}

impl ValueMetadata {
    /// Create value metadata with no hints or unit.
    pub fn new(key: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            name: name.into(),
            unit: None,
            hints: Vec::new(),
            format: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_hint(mut self, hint: ValueHint) -> Self {
        if !self.hints.contains(&hint) {
            self.hints.push(hint);
        }
        self
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    /// Whether this value carries the given hint.
    pub fn has_hint(&self, hint: ValueHint) -> bool {
        self.hints.contains(&hint)
    }
}

/// Full value metadata for one telemetry source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TelemetryMetadata {
    values: Vec<ValueMetadata>,
}

impl TelemetryMetadata {
    pub fn new(values: Vec<ValueMetadata>) -> Self {
        Self { values }
    }

    /// All value descriptors for this source.
    pub fn values(&self) -> &[ValueMetadata] {
        &self.values
    }

    /// Value descriptors carrying at least one of the given hints, in
    /// declaration order.
    pub fn values_for_hints(&self, hints: &[ValueHint]) -> Vec<&ValueMetadata> {
        self.values
            .iter()
            .filter(|value| hints.iter().any(|hint| value.has_hint(*hint)))
            .collect()
    }

    /// First value descriptor carrying the given hint.
    pub fn first_for_hint(&self, hint: ValueHint) -> Option<&ValueMetadata> {
        self.values.iter().find(|value| value.has_hint(hint))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_metadata() -> TelemetryMetadata {
        TelemetryMetadata::new(vec![
            ValueMetadata::new("utc", "Timestamp")
                .with_hint(ValueHint::Domain)
                .with_format("utc"),
            ValueMetadata::new("temp", "Temperature")
                .with_hint(ValueHint::Range)
                .with_unit("°C"),
            ValueMetadata::new("state", "State"),
        ])
    }

    #[test]
    fn test_values_for_hints() {
        let metadata = sample_metadata();
        let domains = metadata.values_for_hints(&[ValueHint::Domain]);
        assert_eq!(domains.len(), 1);
        assert_eq!(domains[0].key, "utc");

        let plottable = metadata.values_for_hints(&[ValueHint::Domain, ValueHint::Range]);
        assert_eq!(plottable.len(), 2);

        assert!(metadata.values_for_hints(&[ValueHint::Event]).is_empty());
    }

    #[test]
    fn test_first_for_hint() {
        let metadata = sample_metadata();
        assert_eq!(
            metadata
                .first_for_hint(ValueHint::Range)
                .map(|v| v.key.as_str()),
            Some("temp")
        );
        assert!(metadata.first_for_hint(ValueHint::Event).is_none());
    }

    #[test]
    fn test_hint_serialization() {
        let json = serde_json::to_string(&ValueHint::Domain).unwrap();
        assert_eq!(json, "\"domain\"");

        let hint: ValueHint = serde_json::from_str("\"range\"").unwrap();
        assert_eq!(hint, ValueHint::Range);
    }
}
