//! Structured diagnostics channel.
//!
//! Data-quality problems never raise errors: a single bad sample must not
//! take down a live plot. They are published here for the host (and tests)
//! to observe, and mirrored to the `log` facade so console diagnostics keep
//! working without a subscriber.

use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex};

/// What went wrong with a sample or a candidate object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// Point had a missing/non-finite domain value, or an invalid range
    /// value on a numeric series; the point was dropped.
    MalformedPoint,
    /// Event point carried a range value; the value was nulled and the
    /// point kept.
    CoercedValue,
    /// Duplicate-x point dropped or replaced per the dedup policy.
    DuplicateDropped,
    /// Candidate object failed the numeric-telemetry qualification.
    NotPlottable,
}

/// One diagnostic occurrence.
#[derive(Debug, Clone)]
pub struct DiagnosticEvent {
    pub kind: DiagnosticKind,
    /// Identifier of the series or object the event concerns.
    pub source: String,
    pub message: String,
    pub at: DateTime<Utc>,
}

type Subscriber = Arc<dyn Fn(&DiagnosticEvent) + Send + Sync>;

/// Cheaply-cloneable hub every series of a plot publishes into.
///
/// Subscribers are invoked synchronously on the publishing thread, so they
/// must stay lightweight. Delivery runs against a snapshot taken outside
/// the subscriber lock, so a callback may register further subscribers or
/// publish follow-up events on the same hub.
#[derive(Clone, Default)]
pub struct DiagnosticHub {
    subscribers: Arc<Mutex<Vec<Subscriber>>>,
}

impl DiagnosticHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a subscriber for every subsequent event.
    pub fn subscribe(&self, subscriber: impl Fn(&DiagnosticEvent) + Send + Sync + 'static) {
        if let Ok(mut subscribers) = self.subscribers.lock() {
            subscribers.push(Arc::new(subscriber));
        }
    }

    /// Publish one event to the log facade and all subscribers.
    pub fn publish(&self, kind: DiagnosticKind, source: &str, message: impl Into<String>) {
        let event = DiagnosticEvent {
            kind,
            source: source.to_string(),
            message: message.into(),
            at: Utc::now(),
        };

        match event.kind {
            DiagnosticKind::CoercedValue => {
                log::warn!("{} - {}", event.source, event.message);
            }
            DiagnosticKind::MalformedPoint | DiagnosticKind::NotPlottable => {
                log::debug!("{} - {}", event.source, event.message);
            }
            DiagnosticKind::DuplicateDropped => {
                log::trace!("{} - {}", event.source, event.message);
            }
        }

        // Deliver against a snapshot; callbacks may re-enter the hub.
        let subscribers = match self.subscribers.lock() {
            Ok(subscribers) => subscribers.clone(),
            Err(_) => return,
        };
        for subscriber in subscribers.iter() {
            subscriber(&event);
        }
    }
}
