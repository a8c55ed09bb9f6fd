use async_trait::async_trait;
use log::Level;

use crate::events::{Listener, SessionEvent};

/// Writes session events to the `log` facade under `crumbs::events`.
///
/// Rejected cookies and denied access are logged at `warn` so tampering
/// stands out; everything else uses the listener's base level.
pub struct LoggingListener {
    level: Level,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self { level: Level::Info }
    }

    pub fn with_level(level: Level) -> Self {
        Self { level }
    }

    fn level_for(&self, event: &SessionEvent) -> Level {
        match event {
            SessionEvent::CookieRejected { .. } | SessionEvent::AccessDenied { .. } => {
                Level::Warn.min(self.level)
            }
            _ => self.level,
        }
    }
}

impl Default for LoggingListener {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Listener for LoggingListener {
    async fn handle(&self, event: &SessionEvent) {
        let level = self.level_for(event);
        let name = event.name();
        let at = event.timestamp().to_rfc3339();

        match event {
            SessionEvent::LoginSucceeded { user_name, .. } => log::log!(
                target: "crumbs::events", level,
                "event={name} user=\"{user_name}\" at={at}"
            ),
            SessionEvent::LoginRejected { reason, .. } => log::log!(
                target: "crumbs::events", level,
                "event={name} reason=\"{reason}\" at={at}"
            ),
            SessionEvent::LoggedOut { user_name, .. } => log::log!(
                target: "crumbs::events", level,
                "event={name} user=\"{}\" at={at}",
                user_name.as_deref().unwrap_or("-")
            ),
            SessionEvent::AccessDenied { .. } => log::log!(
                target: "crumbs::events", level,
                "event={name} at={at}"
            ),
            SessionEvent::CookieRejected {
                cookie_name,
                reason,
                ..
            } => log::log!(
                target: "crumbs::events", level,
                "event={name} cookie=\"{cookie_name}\" reason={} at={at}",
                reason.kind()
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::DecodeError;

    #[test]
    fn test_rejections_escalate_to_warn() {
        let listener = LoggingListener::new();
        let rejected = SessionEvent::CookieRejected {
            cookie_name: "cookie-name".to_owned(),
            reason: DecodeError::BadSignature,
            at: Utc::now(),
        };
        let denied = SessionEvent::AccessDenied { at: Utc::now() };
        let login = SessionEvent::LoginSucceeded {
            user_name: "alice".to_owned(),
            at: Utc::now(),
        };

        assert_eq!(listener.level_for(&rejected), Level::Warn);
        assert_eq!(listener.level_for(&denied), Level::Warn);
        assert_eq!(listener.level_for(&login), Level::Info);
    }

    #[test]
    fn test_quieter_base_level_does_not_hide_rejections() {
        let listener = LoggingListener::with_level(Level::Debug);
        let rejected = SessionEvent::CookieRejected {
            cookie_name: "cookie-name".to_owned(),
            reason: DecodeError::Expired,
            at: Utc::now(),
        };
        let logout = SessionEvent::LoggedOut {
            user_name: None,
            at: Utc::now(),
        };

        assert_eq!(listener.level_for(&rejected), Level::Warn);
        assert_eq!(listener.level_for(&logout), Level::Debug);
    }

    #[test]
    fn test_louder_base_level_is_kept() {
        let listener = LoggingListener::with_level(Level::Error);
        let denied = SessionEvent::AccessDenied { at: Utc::now() };
        assert_eq!(listener.level_for(&denied), Level::Error);
    }
}
