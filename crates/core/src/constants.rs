//! Shared constants for the plot core.

/// Object kind string identifying an overlay plot container.
pub const OVERLAY_PLOT_KIND: &str = "plot.overlay";

/// CSS class applied to every event series point.
pub const EVENT_CSS_CLASS: &str = "c-plot-event";

/// Marker size forced onto event series (axis-spanning lines are thin).
pub const EVENT_MARKER_SIZE: f64 = 1.0;

/// Format name resolving to the plain number formatter.
pub const NUMBER_FORMAT_KEY: &str = "number";

/// Format name resolving to the millisecond-epoch UTC timestamp formatter.
pub const UTC_FORMAT_KEY: &str = "utc";
