//! plotstream-core: Collaborator traits and services for plotstream.
//!
//! This crate contains the fundamental traits (MetadataProvider,
//! LimitEvaluator, ValueFormatter), the diagnostic hub, and shared
//! constants.

pub mod constants;
mod diagnostics;
mod format;
mod limits;
mod metadata;
mod notify;
mod subscribe;

pub use constants::{
    EVENT_CSS_CLASS, EVENT_MARKER_SIZE, NUMBER_FORMAT_KEY, OVERLAY_PLOT_KIND, UTC_FORMAT_KEY,
};
pub use diagnostics::{DiagnosticEvent, DiagnosticHub, DiagnosticKind};
pub use format::{FormatMap, NumberFormat, UtcTimestampFormat, ValueFormatter};
pub use limits::{BandLimitEvaluator, LimitEvaluator, SharedLimitEvaluator};
pub use metadata::{MetadataProvider, SharedMetadataProvider, StaticMetadataProvider};
pub use notify::{ObserverId, ObserverList};
pub use subscribe::Subscription;

// Re-export types used in trait signatures for convenience
pub use plotstream_types::{
    DomainObject, Evaluation, LimitViolation, PlotPoint, TelemetryMetadata, ValueHint,
    ValueMetadata,
};
