//! Plot series: one telemetry source's ordered points plus configuration.
//!
//! A [`PlotSeries`] owns its buffer and its configuration record; the
//! behavioral differences between numeric and event telemetry live behind
//! the variant tag. All collaborators (format map, limit evaluator,
//! diagnostic hub) are injected at construction.

mod buffer;
mod variant;

pub use buffer::{AddOutcome, SeriesBuffer};
pub use variant::SeriesKind;

use std::fmt;
use std::sync::Arc;

use anyhow::{Context, Result};
use uuid::Uuid;

use plotstream_core::{
    DiagnosticHub, DiagnosticKind, FormatMap, MetadataProvider, ObserverId, ObserverList,
    SharedLimitEvaluator, Subscription, ValueFormatter,
};
use plotstream_types::{
    Datum, DedupPolicy, DomainObject, Evaluation, Interpolate, MarkerShape, PlotPoint,
    RetentionPolicy, SeriesConfig, ValueHint,
};

use crate::error::{PlotError, PlotResult};
use variant::SeriesVariant;

/// Redraw notifications raised by a series and fanned out by a collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesEvent {
    /// Points were accepted into the buffer.
    PointsAdded { key: String, count: usize },
    /// Points were removed by a bounds change, eviction or clear.
    PointsRemoved { key: String },
    /// A configuration field changed.
    ConfigChanged { key: String },
    /// The series was torn down.
    Destroyed { key: String },
}

/// Ordered telemetry buffer, configuration and evaluation for one source.
pub struct PlotSeries {
    id: Uuid,
    key: String,
    config: SeriesConfig,
    buffer: SeriesBuffer,
    variant: SeriesVariant,
    format_x: Arc<dyn ValueFormatter>,
    formats: FormatMap,
    diagnostics: DiagnosticHub,
    observers: ObserverList<SeriesEvent>,
    subscription: Option<Subscription>,
}

impl PlotSeries {
    /// Build a numeric series for `object`.
    pub fn continuous(
        object: &DomainObject,
        config: SeriesConfig,
        formats: FormatMap,
        limits: Option<SharedLimitEvaluator>,
        diagnostics: DiagnosticHub,
    ) -> Self {
        let format_y = match config.y_key.as_deref() {
            Some(y_key) => formats.get(y_key),
            None => formats.fallback(),
        };
        let variant = SeriesVariant::Continuous { format_y, limits };
        Self::with_variant(object, config, formats, variant, diagnostics)
    }

    /// Build a discrete event series for `object`.
    pub fn event(
        object: &DomainObject,
        config: SeriesConfig,
        formats: FormatMap,
        diagnostics: DiagnosticHub,
    ) -> Self {
        Self::with_variant(object, config, formats, SeriesVariant::Event, diagnostics)
    }

    /// Build a series for `object`, choosing the variant from its metadata:
    /// a range-hinted value descriptor makes it continuous, its absence
    /// makes it an event series. Fills unset `y_key`/`unit` from the range
    /// descriptor.
    pub fn for_object(
        object: &DomainObject,
        config: Option<SeriesConfig>,
        provider: &dyn MetadataProvider,
        limits: Option<SharedLimitEvaluator>,
        diagnostics: DiagnosticHub,
    ) -> PlotResult<Self> {
        let metadata = provider
            .metadata(object)
            .ok_or_else(|| PlotError::NoMetadata {
                identifier: object.identifier.clone(),
            })?;
        let formats = provider.format_map(&metadata);
        let mut config = config.unwrap_or_default();

        match metadata.first_for_hint(ValueHint::Range) {
            Some(range) => {
                if config.y_key.is_none() {
                    config.y_key = Some(range.key.clone());
                }
                if config.unit.is_none() {
                    config.unit = range.unit.clone();
                }
                Ok(Self::continuous(object, config, formats, limits, diagnostics))
            }
            None => Ok(Self::event(object, config, formats, diagnostics)),
        }
    }

    fn with_variant(
        object: &DomainObject,
        mut config: SeriesConfig,
        formats: FormatMap,
        variant: SeriesVariant,
        diagnostics: DiagnosticHub,
    ) -> Self {
        if config.name.is_empty() {
            config.name = object.name.clone();
        }
        variant.enforce_config(&mut config);
        let format_x = formats.get(&config.x_key);
        let buffer = SeriesBuffer::new(config.dedup, config.retention);
        Self {
            id: Uuid::new_v4(),
            key: object.identifier.clone(),
            config,
            buffer,
            variant,
            format_x,
            formats,
            diagnostics,
            observers: ObserverList::new(),
            subscription: None,
        }
    }

    /// Instance identity, distinct from the telemetry key.
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// The telemetry object identifier this series plots.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn kind(&self) -> SeriesKind {
        self.variant.kind()
    }

    /// Add one point, inserting by binary search when `sorted` is false or
    /// appending when the caller vouches the batch is pre-sorted.
    pub fn add(&mut self, point: PlotPoint, sorted: bool) -> AddOutcome {
        let outcome = self.add_quiet(point, sorted);
        if matches!(outcome, AddOutcome::Inserted | AddOutcome::Replaced) {
            self.notify(SeriesEvent::PointsAdded {
                key: self.key.clone(),
                count: 1,
            });
        }
        outcome
    }

    /// Add a batch, raising a single notification for all accepted points.
    /// Returns the number of points accepted.
    pub fn add_batch(&mut self, points: Vec<PlotPoint>, sorted: bool) -> usize {
        let mut accepted = 0;
        for point in points {
            if matches!(
                self.add_quiet(point, sorted),
                AddOutcome::Inserted | AddOutcome::Replaced
            ) {
                accepted += 1;
            }
        }
        if accepted > 0 {
            self.notify(SeriesEvent::PointsAdded {
                key: self.key.clone(),
                count: accepted,
            });
        }
        accepted
    }

    fn add_quiet(&mut self, point: PlotPoint, sorted: bool) -> AddOutcome {
        debug_assert!(
            !self.buffer.is_retired(),
            "PlotSeries::add called after destroy"
        );
        if self.buffer.is_retired() {
            log::warn!(
                "PlotSeries::add - dropping point, series '{}' is destroyed",
                self.key
            );
            return AddOutcome::Rejected;
        }
        if !point.has_valid_x() {
            self.diagnostics.publish(
                DiagnosticKind::MalformedPoint,
                &self.key,
                format!("point dropped: non-finite domain value {}", point.x),
            );
            return AddOutcome::Rejected;
        }
        let point = match self.variant.prepare(point, &self.key, &self.diagnostics) {
            Some(point) => point,
            None => return AddOutcome::Rejected,
        };
        let x = point.x;
        let outcome = self.buffer.add(point, sorted);
        if outcome == AddOutcome::DroppedDuplicate {
            self.diagnostics.publish(
                DiagnosticKind::DuplicateDropped,
                &self.key,
                format!("duplicate point at x = {x} dropped by first-wins policy"),
            );
        }
        outcome
    }

    /// Build a point from a raw datum using the configured `x_key`/`y_key`
    /// and the per-key parsers, then add it. The full datum rides along on
    /// the stored point.
    pub fn ingest_datum(&mut self, datum: Datum, sorted: bool) -> AddOutcome {
        debug_assert!(
            !self.buffer.is_retired(),
            "PlotSeries::ingest_datum called after destroy"
        );
        if self.buffer.is_retired() {
            log::warn!(
                "PlotSeries::ingest_datum - dropping datum, series '{}' is destroyed",
                self.key
            );
            return AddOutcome::Rejected;
        }
        let x = datum
            .get(self.config.x_key.as_str())
            .and_then(|raw| self.formats.parse(&self.config.x_key, raw));
        let x = match x {
            Some(x) => x,
            None => {
                self.diagnostics.publish(
                    DiagnosticKind::MalformedPoint,
                    &self.key,
                    format!("datum dropped: no parseable '{}' field", self.config.x_key),
                );
                return AddOutcome::Rejected;
            }
        };
        let y = self.config.y_key.as_deref().and_then(|y_key| {
            datum
                .get(y_key)
                .and_then(|raw| self.formats.parse(y_key, raw))
        });
        self.add(PlotPoint::with_datum(x, y, datum), sorted)
    }

    /// The stored points in ascending `x` order. Idempotent between
    /// mutations.
    pub fn points(&self) -> &[PlotPoint] {
        self.buffer.points()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub fn first_x(&self) -> Option<f64> {
        self.buffer.first_x()
    }

    pub fn last_x(&self) -> Option<f64> {
        self.buffer.last_x()
    }

    /// The stored point nearest to `x`.
    pub fn nearest_point(&self, x: f64) -> Option<&PlotPoint> {
        self.buffer.nearest_point(x)
    }

    /// Cached y extent. Always `None` for event series.
    pub fn y_range(&self) -> Option<(f64, f64)> {
        match self.variant {
            SeriesVariant::Continuous { .. } => self.buffer.y_range(),
            SeriesVariant::Event => None,
        }
    }

    /// Whether a range value is unusable for this series' variant.
    pub fn is_value_invalid(&self, y: Option<f64>) -> bool {
        self.variant.is_value_invalid(y)
    }

    /// Classify a point for display. Pure with respect to the point and the
    /// injected limit definitions.
    pub fn evaluate(&self, point: &PlotPoint) -> Evaluation {
        self.variant.evaluate(point, &self.config.name)
    }

    pub fn format_x(&self, x: f64) -> String {
        self.format_x.format(x)
    }

    pub fn format_y(&self, y: Option<f64>) -> String {
        self.variant.format_y(y)
    }

    /// Display name with the unit appended when one is configured.
    pub fn display_name(&self) -> String {
        match self.config.unit.as_deref() {
            Some(unit) if !unit.is_empty() => format!("{} {}", self.config.name, unit),
            _ => self.config.name.clone(),
        }
    }

    /// The current configuration, readable by axis/legend consumers.
    pub fn config(&self) -> &SeriesConfig {
        &self.config
    }

    /// Replace the whole configuration from a host-supplied JSON value.
    pub fn configure(&mut self, value: serde_json::Value) -> Result<()> {
        let parsed = SeriesConfig::from_value(value)
            .context("PlotSeries::configure - invalid series configuration")?;
        self.update_config(|config| *config = parsed);
        Ok(())
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.update_config(|config| config.name = name);
    }

    pub fn set_unit(&mut self, unit: Option<String>) {
        self.update_config(|config| config.unit = unit);
    }

    /// Change the datum field used for the domain value. Stored points were
    /// parsed under the old key, so the buffer is cleared.
    pub fn set_x_key(&mut self, x_key: impl Into<String>) {
        let x_key = x_key.into();
        self.update_config(|config| config.x_key = x_key);
    }

    pub fn set_y_key(&mut self, y_key: Option<String>) {
        self.update_config(|config| config.y_key = y_key);
    }

    pub fn set_markers(&mut self, markers: bool) {
        self.update_config(|config| config.markers = markers);
    }

    pub fn set_marker_shape(&mut self, shape: MarkerShape) {
        self.update_config(|config| config.marker_shape = shape);
    }

    pub fn set_marker_size(&mut self, size: f64) {
        self.update_config(|config| config.marker_size = size);
    }

    pub fn set_alarm_markers(&mut self, alarm_markers: bool) {
        self.update_config(|config| config.alarm_markers = alarm_markers);
    }

    pub fn set_limit_lines(&mut self, limit_lines: bool) {
        self.update_config(|config| config.limit_lines = limit_lines);
    }

    pub fn set_interpolate(&mut self, interpolate: Interpolate) {
        self.update_config(|config| config.interpolate = interpolate);
    }

    pub fn set_y_axis_id(&mut self, y_axis_id: Option<u32>) {
        self.update_config(|config| config.y_axis_id = y_axis_id);
    }

    pub fn set_dedup(&mut self, dedup: DedupPolicy) {
        self.update_config(|config| config.dedup = dedup);
    }

    pub fn set_retention(&mut self, retention: RetentionPolicy) {
        self.update_config(|config| config.retention = retention);
    }

    /// Apply a configuration mutation, re-assert variant constraints, sync
    /// the buffer and notify observers of whatever actually changed.
    fn update_config(&mut self, mutate: impl FnOnce(&mut SeriesConfig)) {
        let before = self.config.clone();
        mutate(&mut self.config);
        self.variant.enforce_config(&mut self.config);
        if self.config == before {
            return;
        }
        if self.config.x_key != before.x_key {
            self.format_x = self.formats.get(&self.config.x_key);
            if !self.buffer.is_empty() {
                self.buffer.clear();
                self.notify(SeriesEvent::PointsRemoved {
                    key: self.key.clone(),
                });
            }
        }
        if self.config.y_key != before.y_key {
            if let SeriesVariant::Continuous { format_y, .. } = &mut self.variant {
                *format_y = match self.config.y_key.as_deref() {
                    Some(y_key) => self.formats.get(y_key),
                    None => self.formats.fallback(),
                };
            }
        }
        if self.config.dedup != before.dedup {
            self.buffer.set_dedup(self.config.dedup);
        }
        if self.config.retention != before.retention {
            let len_before = self.buffer.len();
            self.buffer.set_retention(self.config.retention);
            if self.buffer.len() < len_before {
                self.notify(SeriesEvent::PointsRemoved {
                    key: self.key.clone(),
                });
            }
        }
        self.notify(SeriesEvent::ConfigChanged {
            key: self.key.clone(),
        });
    }

    /// Drop points outside `[min, max]` on the domain axis.
    pub fn set_bounds(&mut self, min: f64, max: f64) {
        let removed = self.buffer.set_bounds(min, max);
        if removed > 0 {
            self.notify(SeriesEvent::PointsRemoved {
                key: self.key.clone(),
            });
        }
    }

    /// Remove points matching the predicate. Returns the removed count.
    pub fn remove_where<F>(&mut self, predicate: F) -> usize
    where
        F: FnMut(&PlotPoint) -> bool,
    {
        let removed = self.buffer.remove_where(predicate);
        if removed > 0 {
            self.notify(SeriesEvent::PointsRemoved {
                key: self.key.clone(),
            });
        }
        removed
    }

    pub fn clear(&mut self) {
        if self.buffer.is_empty() {
            return;
        }
        self.buffer.clear();
        self.notify(SeriesEvent::PointsRemoved {
            key: self.key.clone(),
        });
    }

    /// Register a redraw observer.
    pub fn on_event(&mut self, observer: impl Fn(&SeriesEvent) + Send + 'static) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Hand the series the guard for its telemetry feed. Replacing an
    /// existing guard cancels the old feed.
    pub fn attach_subscription(&mut self, subscription: Subscription) {
        self.subscription = Some(subscription);
    }

    /// Tear the series down: cancel the telemetry feed, retire the buffer
    /// and notify observers once. Idempotent; `add` after this is rejected.
    pub fn destroy(&mut self) {
        if self.buffer.is_retired() {
            return;
        }
        if let Some(subscription) = self.subscription.take() {
            subscription.cancel();
        }
        self.buffer.retire();
        self.notify(SeriesEvent::Destroyed {
            key: self.key.clone(),
        });
        self.observers = ObserverList::new();
    }

    pub fn is_destroyed(&self) -> bool {
        self.buffer.is_retired()
    }

    fn notify(&self, event: SeriesEvent) {
        self.observers.notify(&event);
    }
}

impl fmt::Debug for PlotSeries {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlotSeries")
            .field("key", &self.key)
            .field("kind", &self.kind())
            .field("points", &self.buffer.len())
            .field("destroyed", &self.buffer.is_retired())
            .finish()
    }
}
