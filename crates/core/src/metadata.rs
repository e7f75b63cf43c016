//! Telemetry metadata collaborators consumed by the plot core.

use crate::format::FormatMap;
use plotstream_types::{DomainObject, TelemetryMetadata};
use std::collections::HashMap;
use std::sync::Arc;

/// Read-only metadata lookup the host supplies for its telemetry objects.
///
/// Shared across every series of a plot; series only ever read from it.
pub trait MetadataProvider: Send + Sync {
    /// Whether the object produces telemetry at all.
    fn is_telemetry_object(&self, object: &DomainObject) -> bool;

    /// Value metadata for the object, if any.
    fn metadata(&self, object: &DomainObject) -> Option<TelemetryMetadata>;

    /// Formatter lookup for the object's values.
    fn format_map(&self, metadata: &TelemetryMetadata) -> FormatMap {
        FormatMap::for_metadata(metadata)
    }
}

/// Type-erased provider handle for constructor injection.
pub type SharedMetadataProvider = Arc<dyn MetadataProvider>;

/// Fixed in-memory provider: the host registers metadata per object
/// identifier up front. Suitable for hosts with a static telemetry
/// dictionary, and for tests.
#[derive(Default)]
pub struct StaticMetadataProvider {
    entries: HashMap<String, TelemetryMetadata>,
}

impl StaticMetadataProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register metadata for an object identifier, replacing any existing
    /// entry.
    pub fn insert(&mut self, identifier: impl Into<String>, metadata: TelemetryMetadata) {
        self.entries.insert(identifier.into(), metadata);
    }
}

impl MetadataProvider for StaticMetadataProvider {
    fn is_telemetry_object(&self, object: &DomainObject) -> bool {
        self.entries.contains_key(&object.identifier)
    }

    fn metadata(&self, object: &DomainObject) -> Option<TelemetryMetadata> {
        self.entries.get(&object.identifier).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use plotstream_types::{ValueHint, ValueMetadata};

    #[test]
    fn test_static_provider_lookup() {
        let mut provider = StaticMetadataProvider::new();
        provider.insert(
            "sensor-1",
            TelemetryMetadata::new(vec![
                ValueMetadata::new("utc", "Timestamp").with_hint(ValueHint::Domain)
            ]),
        );

        let known = DomainObject::new("sensor-1", "Sensor 1", "telemetry");
        let unknown = DomainObject::new("sensor-2", "Sensor 2", "telemetry");

        assert!(provider.is_telemetry_object(&known));
        assert!(!provider.is_telemetry_object(&unknown));
        assert_eq!(provider.metadata(&known).unwrap().values().len(), 1);
        assert!(provider.metadata(&unknown).is_none());
    }
}
