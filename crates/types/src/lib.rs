//! plotstream-types: Shared data types for the plotstream plot core.
//!
//! This crate contains pure data types (points, value metadata, limit
//! definitions, series configuration) shared across all plotstream crates.
//! These types have no collaborator-trait dependencies, making them suitable
//! as a foundation layer.

pub mod field;
pub mod limits;
pub mod object;
pub mod point;
pub mod series_config;

// Re-export commonly used types at the crate root for convenience
pub use field::{TelemetryMetadata, ValueHint, ValueMetadata};
pub use limits::{Evaluation, LimitBand, LimitSeverity, LimitViolation};
pub use object::DomainObject;
pub use point::{Datum, PlotPoint};
pub use series_config::{
    DedupPolicy, Interpolate, MarkerShape, RetentionPolicy, SeriesConfig,
};
