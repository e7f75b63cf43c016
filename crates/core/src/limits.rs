//! Limit evaluation collaborator.

use anyhow::{Context, Result};
use plotstream_types::{LimitBand, LimitViolation, PlotPoint};
use std::sync::Arc;

/// Classifies a point against the limit definitions currently in force.
///
/// Implementations must be pure with respect to the point and the
/// definitions; series hold a shared handle and never mutate through it.
pub trait LimitEvaluator: Send + Sync {
    /// The most severe violation for the point, or `None` when the point is
    /// within nominal bounds (or has no range value to measure).
    fn evaluate(&self, point: &PlotPoint) -> Option<LimitViolation>;
}

/// Type-erased evaluator handle for constructor injection.
pub type SharedLimitEvaluator = Arc<dyn LimitEvaluator>;

/// Band-table evaluator: checks the point's range value against a fixed set
/// of limit bands and reports the most severe one violated.
#[derive(Debug, Default)]
pub struct BandLimitEvaluator {
    bands: Vec<LimitBand>,
}

impl BandLimitEvaluator {
    pub fn new(bands: Vec<LimitBand>) -> Self {
        Self { bands }
    }

    /// Parse a band table from a host-supplied JSON array.
    pub fn from_value(value: serde_json::Value) -> Result<Self> {
        let bands: Vec<LimitBand> =
            serde_json::from_value(value).context("invalid limit band definitions")?;
        Ok(Self::new(bands))
    }

    pub fn bands(&self) -> &[LimitBand] {
        &self.bands
    }
}

impl LimitEvaluator for BandLimitEvaluator {
    fn evaluate(&self, point: &PlotPoint) -> Option<LimitViolation> {
        let value = point.y.filter(|y| y.is_finite())?;

        let band = self
            .bands
            .iter()
            .filter(|band| band.violated_by(value))
            .max_by_key(|band| band.severity)?;

        let side = if band.violates_high(value) {
            "is-limit--upr"
        } else {
            "is-limit--lwr"
        };

        Some(LimitViolation {
            css_class: format!("{} {}", side, band.severity.css_class()),
            severity: band.severity,
            high: band.high,
            low: band.low,
            name: band.name.clone(),
        })
    }
}
