//! Plot container: exclusive owner of an ordered set of series.
//!
//! Series are kept in legend (insertion) order and keyed by telemetry
//! object identifier. Objects are qualified against their metadata before
//! a series is built; unqualified objects are rejected with a typed error
//! and a diagnostic, never a panic.

use plotstream_core::{
    DiagnosticHub, DiagnosticKind, ObserverId, ObserverList, SharedLimitEvaluator,
    SharedMetadataProvider,
};
use plotstream_types::{DomainObject, PlotPoint, SeriesConfig, ValueHint};

use crate::error::{PlotError, PlotResult};
use crate::series::{PlotSeries, SeriesEvent};

/// The set of series plotted together in one plot container.
pub struct SeriesCollection {
    series: Vec<PlotSeries>,
    metadata: SharedMetadataProvider,
    limits: Option<SharedLimitEvaluator>,
    diagnostics: DiagnosticHub,
    observers: ObserverList<SeriesEvent>,
}

impl SeriesCollection {
    pub fn new(
        metadata: SharedMetadataProvider,
        limits: Option<SharedLimitEvaluator>,
        diagnostics: DiagnosticHub,
    ) -> Self {
        Self {
            series: Vec::new(),
            metadata,
            limits,
            diagnostics,
            observers: ObserverList::new(),
        }
    }

    /// The diagnostics channel shared with every owned series.
    pub fn diagnostics(&self) -> &DiagnosticHub {
        &self.diagnostics
    }

    /// Qualify `object` and add a series for it at the end of the legend.
    ///
    /// Rejected when the object is already plotted, is not telemetry, or
    /// lacks value/domain descriptors. The created series picks its variant
    /// from the object's metadata.
    pub fn add_object(
        &mut self,
        object: &DomainObject,
        config: Option<SeriesConfig>,
    ) -> PlotResult<&mut PlotSeries> {
        if self.get(&object.identifier).is_some() {
            return Err(PlotError::AlreadyRegistered {
                key: object.identifier.clone(),
            });
        }
        self.qualify(object)?;
        let series = PlotSeries::for_object(
            object,
            config,
            self.metadata.as_ref(),
            self.limits.clone(),
            self.diagnostics.clone(),
        )?;
        self.series.push(series);
        let last = self.series.len() - 1;
        Ok(&mut self.series[last])
    }

    fn qualify(&self, object: &DomainObject) -> PlotResult<()> {
        if !self.metadata.is_telemetry_object(object) {
            return self.reject(object, "not a telemetry object");
        }
        let metadata = self
            .metadata
            .metadata(object)
            .ok_or_else(|| PlotError::NoMetadata {
                identifier: object.identifier.clone(),
            })?;
        if metadata.values().is_empty() {
            return self.reject(object, "no telemetry value descriptors");
        }
        if metadata.values_for_hints(&[ValueHint::Domain]).is_empty() {
            return self.reject(object, "no domain-hinted value descriptor");
        }
        Ok(())
    }

    fn reject(&self, object: &DomainObject, reason: &str) -> PlotResult<()> {
        self.diagnostics.publish(
            DiagnosticKind::NotPlottable,
            &object.identifier,
            format!("'{}' cannot join the plot: {}", object.name, reason),
        );
        Err(PlotError::NotPlottable {
            name: object.name.clone(),
            reason: reason.to_string(),
        })
    }

    /// Tear down and remove the series for `key`. Returns false when no
    /// such series exists.
    pub fn remove_object(&mut self, key: &str) -> bool {
        let idx = match self.series.iter().position(|series| series.key() == key) {
            Some(idx) => idx,
            None => return false,
        };
        let mut series = self.series.remove(idx);
        series.destroy();
        self.observers.notify(&SeriesEvent::Destroyed {
            key: key.to_string(),
        });
        true
    }

    pub fn get(&self, key: &str) -> Option<&PlotSeries> {
        self.series.iter().find(|series| series.key() == key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PlotSeries> {
        self.series.iter_mut().find(|series| series.key() == key)
    }

    /// All series in legend order.
    pub fn series(&self) -> &[PlotSeries] {
        &self.series
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    /// Route a point batch to the series for `key`. Live batches arrive
    /// unsorted; historical pages are pre-sorted. Returns the accepted
    /// count.
    pub fn ingest_batch(
        &mut self,
        key: &str,
        points: Vec<PlotPoint>,
        sorted: bool,
    ) -> PlotResult<usize> {
        let series = self
            .series
            .iter_mut()
            .find(|series| series.key() == key)
            .ok_or_else(|| PlotError::UnknownSeries {
                key: key.to_string(),
            })?;
        let accepted = series.add_batch(points, sorted);
        if accepted > 0 {
            self.observers.notify(&SeriesEvent::PointsAdded {
                key: key.to_string(),
                count: accepted,
            });
        }
        Ok(accepted)
    }

    /// Constrain every series to the visible window `[min, max]`.
    pub fn set_bounds(&mut self, min: f64, max: f64) {
        for series in &mut self.series {
            let before = series.len();
            series.set_bounds(min, max);
            if series.len() < before {
                self.observers.notify(&SeriesEvent::PointsRemoved {
                    key: series.key().to_string(),
                });
            }
        }
    }

    /// Union of the y extents of every continuous series on the given
    /// shared axis. Event series and other axes never contribute.
    pub fn combined_y_range(&self, y_axis_id: u32) -> Option<(f64, f64)> {
        let mut combined: Option<(f64, f64)> = None;
        for series in &self.series {
            if series.config().y_axis_id != Some(y_axis_id) {
                continue;
            }
            if let Some((min, max)) = series.y_range() {
                combined = match combined {
                    Some((lo, hi)) => Some((lo.min(min), hi.max(max))),
                    None => Some((min, max)),
                };
            }
        }
        combined
    }

    /// Register an observer for events on any owned series.
    pub fn on_event(&mut self, observer: impl Fn(&SeriesEvent) + Send + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }
}

// A series never outlives its plot.
impl Drop for SeriesCollection {
    fn drop(&mut self) {
        for series in &mut self.series {
            series.destroy();
        }
    }
}
