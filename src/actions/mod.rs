//! One action per gate endpoint.
//!
//! Each action opens the session from the request, applies its transition,
//! saves when the transition changed anything the client must keep, and
//! returns a [`GateResponse`](crate::gate::GateResponse).

mod forbidden;
mod index;
mod login;
mod logout;
mod secret;

use chrono::Utc;
use http::HeaderMap;

pub use forbidden::ViewForbiddenAction;
pub use index::IndexAction;
pub use login::LoginAction;
pub use logout::LogoutAction;
pub use secret::ViewSecretAction;

use crate::events::{EventRegistry, SessionEvent};
use crate::session::{CookieStore, Session};

pub const MSG_MISSING_CODE: &str = "must enter a code";
pub const MSG_INCORRECT_CODE: &str = "the code was incorrect";
pub const MSG_NO_ACCESS: &str = "you dont have access";

/// Loads the gate's session, reporting rejected cookies as events.
async fn open_session(store: &CookieStore, events: &EventRegistry, request: &HeaderMap) -> Session {
    let name = store.cookie_name();
    match store.try_get(request, name) {
        Ok(Some(session)) => session,
        Ok(None) => store.new_session(name),
        Err(reason) => {
            events
                .dispatch(SessionEvent::CookieRejected {
                    cookie_name: name.to_owned(),
                    reason,
                    at: Utc::now(),
                })
                .await;
            store.new_session(name)
        }
    }
}


#[cfg(test)]
mod tests {
    use http::header::{COOKIE, HeaderValue};

    use super::test_support::{Recorder, store};
    use super::*;
    use crate::DecodeError;

    #[tokio::test]
    async fn test_open_session_reports_rejected_cookie() {
        let store = store();
        let recorder = Recorder::default();
        let mut events = EventRegistry::new();
        events.listen(recorder.clone());

        let mut request = HeaderMap::new();
        request.insert(COOKIE, HeaderValue::from_static("cookie-name=garbage"));

        let session = open_session(&store, &events, &request).await;
        assert!(session.is_new());

        let seen = recorder.0.lock().unwrap();
        assert!(matches!(
            seen.as_slice(),
            [SessionEvent::CookieRejected {
                reason: DecodeError::Malformed(_),
                ..
            }]
        ));
    }

    #[tokio::test]
    async fn test_open_session_without_cookie_is_silent() {
        let store = store();
        let recorder = Recorder::default();
        let mut events = EventRegistry::new();
        events.listen(recorder.clone());

        let session = open_session(&store, &events, &HeaderMap::new()).await;
        assert!(session.is_new());
        assert!(recorder.names().is_empty());
    }
}
