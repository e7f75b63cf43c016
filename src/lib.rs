//! plotstream: A streaming telemetry plot series core
//!
//! This library provides the buffer layer behind time-series plots in an
//! operator dashboard, including:
//! - Ordered, deduplicated, bounded point storage per telemetry source
//! - Continuous and event series variants behind one capability set
//! - Limit/alarm classification of stored points
//! - The composition policy gating what may join an overlay plot

pub mod collection;
pub mod error;
pub mod policy;
pub mod series;

// Re-export commonly used types
pub use collection::SeriesCollection;
pub use error::{PlotError, PlotResult};
pub use policy::OverlayPlotPolicy;
pub use series::{AddOutcome, PlotSeries, SeriesEvent, SeriesKind};

// Re-export the collaborator surface and data types so hosts need only
// this crate
pub use plotstream_core::{
    BandLimitEvaluator, DiagnosticEvent, DiagnosticHub, DiagnosticKind, FormatMap,
    LimitEvaluator, MetadataProvider, NumberFormat, ObserverId, SharedLimitEvaluator,
    SharedMetadataProvider, StaticMetadataProvider, Subscription, UtcTimestampFormat,
    ValueFormatter, EVENT_CSS_CLASS, OVERLAY_PLOT_KIND,
};
pub use plotstream_types::{
    Datum, DedupPolicy, DomainObject, Evaluation, Interpolate, LimitBand, LimitSeverity,
    LimitViolation, MarkerShape, PlotPoint, RetentionPolicy, SeriesConfig, TelemetryMetadata,
    ValueHint, ValueMetadata,
};
