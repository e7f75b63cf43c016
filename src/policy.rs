//! Composition policy gating what may join an overlay plot.

use plotstream_core::{SharedMetadataProvider, OVERLAY_PLOT_KIND};
use plotstream_types::{DomainObject, ValueHint};

/// Decides whether a candidate object may become a child of a plot
/// container. Invoked by the host's object-composition system at link/drop
/// time.
///
/// Pure with respect to its inputs; safe to call repeatedly and from any
/// thread. The only side effect is debug logging.
pub struct OverlayPlotPolicy {
    metadata: SharedMetadataProvider,
}

impl OverlayPlotPolicy {
    pub fn new(metadata: SharedMetadataProvider) -> Self {
        Self { metadata }
    }

    /// False only when `parent` is an overlay-plot container and `child`
    /// does not qualify as plottable numeric telemetry; permissive for
    /// every other composition.
    pub fn allow(&self, parent: &DomainObject, child: &DomainObject) -> bool {
        if parent.kind == OVERLAY_PLOT_KIND && !self.has_numeric_telemetry(child) {
            log::debug!(
                "OverlayPlotPolicy::allow - rejecting '{}' as child of overlay plot '{}'",
                child.name,
                parent.name
            );
            return false;
        }
        true
    }

    fn has_numeric_telemetry(&self, object: &DomainObject) -> bool {
        if !self.metadata.is_telemetry_object(object) {
            return false;
        }
        let metadata = match self.metadata.metadata(object) {
            Some(metadata) => metadata,
            None => return false,
        };
        let has_values = !metadata.values().is_empty();
        let has_domain = !metadata.values_for_hints(&[ValueHint::Domain]).is_empty();
        log::debug!(
            "OverlayPlotPolicy - '{}' has {} values, domain hint: {}",
            object.name,
            metadata.values().len(),
            has_domain
        );
        has_values && has_domain
    }
}
