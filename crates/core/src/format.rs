//! Value formatting resolved once per series from telemetry metadata.

use crate::constants::UTC_FORMAT_KEY;
use chrono::{DateTime, SecondsFormat, TimeZone, Utc};
use plotstream_types::TelemetryMetadata;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

/// Formats and parses one telemetry value key.
///
/// `parse` is the bridge from raw datum fields to plottable numbers; `format`
/// is the bridge back to human-readable axis/tooltip text.
pub trait ValueFormatter: Send + Sync {
    /// Human-readable rendering of a numeric value.
    fn format(&self, value: f64) -> String;

    /// Extract a numeric value from a raw datum field.
    fn parse(&self, raw: &Value) -> Option<f64> {
        raw.as_f64()
    }
}

/// Plain numeric formatter; the fallback for values without a named format.
#[derive(Debug, Default)]
pub struct NumberFormat;

impl ValueFormatter for NumberFormat {
    fn format(&self, value: f64) -> String {
        value.to_string()
    }
}

/// Millisecond-epoch UTC timestamp formatter.
///
/// Parses either a numeric epoch value or an RFC 3339 string, so historical
/// pages serialized with string timestamps ingest the same as live numerics.
#[derive(Debug, Default)]
pub struct UtcTimestampFormat;

impl ValueFormatter for UtcTimestampFormat {
    fn format(&self, value: f64) -> String {
        match Utc.timestamp_millis_opt(value as i64).single() {
            Some(timestamp) => timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
            None => value.to_string(),
        }
    }

    fn parse(&self, raw: &Value) -> Option<f64> {
        match raw {
            Value::Number(_) => raw.as_f64(),
            Value::String(text) => DateTime::parse_from_rfc3339(text)
                .ok()
                .map(|timestamp| timestamp.timestamp_millis() as f64),
            _ => None,
        }
    }
}

/// Per-source formatter lookup, shared read-only across all series of the
/// same telemetry type.
#[derive(Clone)]
pub struct FormatMap {
    formats: HashMap<String, Arc<dyn ValueFormatter>>,
    fallback: Arc<dyn ValueFormatter>,
}

impl FormatMap {
    pub fn new() -> Self {
        Self {
            formats: HashMap::new(),
            fallback: Arc::new(NumberFormat),
        }
    }

    /// Build the lookup from metadata format names: `utc` resolves to the
    /// timestamp formatter, everything else to the number fallback.
    pub fn for_metadata(metadata: &TelemetryMetadata) -> Self {
        let mut map = Self::new();
        for value in metadata.values() {
            if value.format.as_deref() == Some(UTC_FORMAT_KEY) {
                map.insert(value.key.clone(), Arc::new(UtcTimestampFormat));
            }
        }
        map
    }

    /// Register a formatter for a value key, replacing any existing one.
    pub fn insert(&mut self, key: impl Into<String>, format: Arc<dyn ValueFormatter>) {
        self.formats.insert(key.into(), format);
    }

    /// Formatter for the given value key, falling back to the plain number
    /// format for unknown keys.
    pub fn get(&self, key: &str) -> Arc<dyn ValueFormatter> {
        self.formats
            .get(key)
            .cloned()
            .unwrap_or_else(|| Arc::clone(&self.fallback))
    }

    /// The formatter used for keys without a registered format.
    pub fn fallback(&self) -> Arc<dyn ValueFormatter> {
        Arc::clone(&self.fallback)
    }

    pub fn format(&self, key: &str, value: f64) -> String {
        self.get(key).format(value)
    }

    pub fn parse(&self, key: &str, raw: &Value) -> Option<f64> {
        self.get(key).parse(raw)
    }
}

impl Default for FormatMap {
    fn default() -> Self {
        Self::new()
    }
}
