//! Telemetry subscription teardown guard.

use std::fmt;

/// Owns the live-feed cancellation for one series.
///
/// Dropping the guard runs the cancel action exactly once. Series teardown
/// drops its guard and retires its buffer in the same scoped step, so no
/// late delivery callback can reach freed state.
pub struct Subscription {
    cancel: Option<Box<dyn FnOnce() + Send>>,
}

impl Subscription {
    /// Wrap the unsubscribe action handed back by the host's subscription
    /// service.
    pub fn new(cancel: impl FnOnce() + Send + 'static) -> Self {
        Self {
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Cancel eagerly instead of waiting for drop.
    pub fn cancel(self) {
        // Drop runs the action
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            cancel();
        }
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.cancel.is_some())
            .finish()
    }
}
