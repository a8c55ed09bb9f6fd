use async_trait::async_trait;

use super::SessionEvent;

/// Trait for handling session events asynchronously.
///
/// # Example
///
/// ```rust,ignore
/// use crumbs::events::{Listener, SessionEvent};
/// use async_trait::async_trait;
///
/// struct RejectedCookieCounter;
///
/// #[async_trait]
/// impl Listener for RejectedCookieCounter {
///     async fn handle(&self, event: &SessionEvent) {
///         if let SessionEvent::CookieRejected { reason, .. } = event {
///             // increment a counter labelled with reason.kind()
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Called for every dispatched event, in registration order.
    async fn handle(&self, event: &SessionEvent);
}
