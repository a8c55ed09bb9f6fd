use super::{Listener, SessionEvent};

/// Listeners that receive session events.
///
/// Build it at startup and hand it to the gate; it is not changed afterwards.
///
/// # Example
///
/// ```rust
/// use crumbs::events::EventRegistry;
/// use crumbs::events::listeners::LoggingListener;
///
/// let mut registry = EventRegistry::new();
/// registry.listen(LoggingListener::new());
/// assert_eq!(registry.len(), 1);
/// ```
#[derive(Default)]
pub struct EventRegistry {
    listeners: Vec<Box<dyn Listener>>,
}

impl EventRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener to receive events.
    ///
    /// Listeners are called in the order they are registered.
    pub fn listen(&mut self, listener: impl Listener) -> &mut Self {
        self.listeners.push(Box::new(listener));
        self
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Dispatch an event to all registered listeners.
    ///
    /// If no listeners are registered, this is a no-op.
    pub async fn dispatch(&self, event: SessionEvent) {
        for listener in &self.listeners {
            listener.handle(&event).await;
        }
    }
}

impl std::fmt::Debug for EventRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use chrono::Utc;

    use super::*;

    struct Recorder {
        tag: &'static str,
        seen: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Listener for Recorder {
        async fn handle(&self, event: &SessionEvent) {
            self.seen
                .lock()
                .unwrap()
                .push(format!("{}:{}", self.tag, event.name()));
        }
    }

    #[tokio::test]
    async fn test_dispatch_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut registry = EventRegistry::new();
        registry
            .listen(Recorder {
                tag: "a",
                seen: Arc::clone(&seen),
            })
            .listen(Recorder {
                tag: "b",
                seen: Arc::clone(&seen),
            });

        registry
            .dispatch(SessionEvent::AccessDenied { at: Utc::now() })
            .await;

        assert_eq!(
            *seen.lock().unwrap(),
            vec!["a:gate.access.denied", "b:gate.access.denied"]
        );
    }

    #[tokio::test]
    async fn test_dispatch_without_listeners_is_noop() {
        let registry = EventRegistry::new();
        assert!(registry.is_empty());
        registry
            .dispatch(SessionEvent::AccessDenied { at: Utc::now() })
            .await;
    }
}
