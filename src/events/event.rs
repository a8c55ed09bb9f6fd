use chrono::{DateTime, Utc};

use crate::DecodeError;

/// Session and gate events.
///
/// Dispatched by the gate actions to the listeners registered on the gate's
/// [`EventRegistry`](super::EventRegistry). With no listeners they are
/// dropped.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    // gate
    LoginSucceeded {
        user_name: String,
        at: DateTime<Utc>,
    },
    LoginRejected {
        reason: &'static str,
        at: DateTime<Utc>,
    },
    LoggedOut {
        user_name: Option<String>,
        at: DateTime<Utc>,
    },
    AccessDenied {
        at: DateTime<Utc>,
    },

    // cookie
    CookieRejected {
        cookie_name: String,
        reason: DecodeError,
        at: DateTime<Utc>,
    },
}

impl SessionEvent {
    /// Returns a dot-separated event name for logging/tracing.
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginSucceeded { .. } => "gate.login.success",
            Self::LoginRejected { .. } => "gate.login.rejected",
            Self::LoggedOut { .. } => "gate.logout",
            Self::AccessDenied { .. } => "gate.access.denied",
            Self::CookieRejected { .. } => "session.cookie.rejected",
        }
    }

    /// Returns the timestamp when this event occurred.
    pub fn timestamp(&self) -> DateTime<Utc> {
        match self {
            Self::LoginSucceeded { at, .. }
            | Self::LoginRejected { at, .. }
            | Self::LoggedOut { at, .. }
            | Self::AccessDenied { at }
            | Self::CookieRejected { at, .. } => *at,
        }
    }
}
