//! Explicit observer lists for redraw notification.
//!
//! Configuration and data changes notify through these lists instead of an
//! implicit reactive model, so the host decides exactly what triggers a
//! redraw.

/// Identifies one registered observer for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

type Observer<E> = Box<dyn Fn(&E) + Send>;

/// An ordered list of callbacks invoked synchronously for each event.
pub struct ObserverList<E> {
    next_id: u64,
    observers: Vec<(ObserverId, Observer<E>)>,
}

impl<E> ObserverList<E> {
    pub fn new() -> Self {
        Self {
            next_id: 0,
            observers: Vec::new(),
        }
    }

    /// Register an observer; keep the returned id to unsubscribe.
    pub fn subscribe(&mut self, observer: impl Fn(&E) + Send + 'static) -> ObserverId {
        let id = ObserverId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Remove an observer. Returns false when the id was already gone.
    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(observer_id, _)| *observer_id != id);
        self.observers.len() != before
    }

    /// Invoke every observer with the event, in subscription order.
    pub fn notify(&self, event: &E) {
        for (_, observer) in &self.observers {
            observer(event);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.observers.len()
    }
}

impl<E> Default for ObserverList<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_notify_in_subscription_order() {
        let mut list: ObserverList<&'static str> = ObserverList::new();
        let seen: Arc<Mutex<Vec<String>>> = Arc::default();

        for tag in ["first", "second"] {
            let sink = Arc::clone(&seen);
            list.subscribe(move |event: &&'static str| {
                if let Ok(mut events) = sink.lock() {
                    events.push(format!("{tag}:{event}"));
                }
            });
        }

        list.notify(&"redraw");
        assert_eq!(
            *seen.lock().unwrap(),
            vec!["first:redraw".to_string(), "second:redraw".to_string()]
        );
    }

    #[test]
    fn test_unsubscribe() {
        let mut list: ObserverList<u32> = ObserverList::new();
        let count: Arc<Mutex<u32>> = Arc::default();

        let sink = Arc::clone(&count);
        let id = list.subscribe(move |_| {
            if let Ok(mut count) = sink.lock() {
                *count += 1;
            }
        });

        list.notify(&1);
        assert!(list.unsubscribe(id));
        assert!(!list.unsubscribe(id));
        list.notify(&2);

        assert_eq!(*count.lock().unwrap(), 1);
        assert!(list.is_empty());
    }
}
