//! Minimal view of a host domain object.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

fn generate_identifier() -> String {
    Uuid::new_v4().to_string()
}

/// The slice of the host object model the plot core reads.
///
/// The host's composition system owns the full object graph; the core only
/// needs a stable identity, a display name, and the object's type tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainObject {
    /// Stable identifier. Doubles as the series key inside a plot.
    #[serde(default = "generate_identifier")]
    pub identifier: String,
    /// Human-readable name.
    pub name: String,
    /// Host object type tag (e.g. `plot.overlay` for an overlay plot
    /// container).
    pub kind: String,
}

impl DomainObject {
    pub fn new(
        identifier: impl Into<String>,
        name: impl Into<String>,
        kind: impl Into<String>,
    ) -> Self {
        Self {
            identifier: identifier.into(),
            name: name.into(),
            kind: kind.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identifier_generated_when_missing() {
        let object: DomainObject =
            serde_json::from_str("{\"name\": \"Gyro\", \"kind\": \"telemetry\"}").unwrap();
        assert!(!object.identifier.is_empty());
        assert_eq!(object.name, "Gyro");
    }

    #[test]
    fn test_object_round_trip() {
        let object = DomainObject::new("sensor-1", "Sensor 1", "telemetry");
        let json = serde_json::to_string(&object).unwrap();
        let back: DomainObject = serde_json::from_str(&json).unwrap();
        assert_eq!(back, object);
    }
}
