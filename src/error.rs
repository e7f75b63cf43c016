//! Error types for plot series operations.

use thiserror::Error;

/// Errors raised by series and collection operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlotError {
    /// The object offers no numeric telemetry and cannot back a series.
    #[error("object '{name}' is not plottable: {reason}")]
    NotPlottable { name: String, reason: String },

    /// No metadata is available for the given object.
    #[error("no telemetry metadata for object '{identifier}'")]
    NoMetadata { identifier: String },

    /// A series with this key is already present in the collection.
    #[error("series '{key}' already registered")]
    AlreadyRegistered { key: String },

    /// The named series does not exist in the collection.
    #[error("unknown series '{key}'")]
    UnknownSeries { key: String },
}

/// Result type alias for plot operations.
pub type PlotResult<T> = Result<T, PlotError>;
