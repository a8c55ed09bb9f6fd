use async_trait::async_trait;

use crate::events::{Listener, SessionEvent};

/// Emits session events as tracing events.
///
/// Requires the `tracing` feature to be enabled.
pub struct TracingListener;

#[async_trait]
impl Listener for TracingListener {
    async fn handle(&self, event: &SessionEvent) {
        tracing::info!(
            target: "crumbs::events",
            event_name = event.name(),
            ?event,
            "session event"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[tokio::test]
    async fn test_tracing_listener_handle() {
        let listener = TracingListener;
        let event = SessionEvent::LoginSucceeded {
            user_name: "alice".to_owned(),
            at: Utc::now(),
        };

        // should not panic
        listener.handle(&event).await;
    }
}
