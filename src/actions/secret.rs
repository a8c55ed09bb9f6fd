use chrono::Utc;
use http::HeaderMap;

use super::{MSG_NO_ACCESS, open_session};
use crate::SessionError;
use crate::events::{EventRegistry, SessionEvent};
use crate::gate::{GateResponse, Page, paths};
use crate::session::CookieStore;

/// Shows the protected page, or explains why not.
pub struct ViewSecretAction<'a> {
    store: &'a CookieStore,
    events: &'a EventRegistry,
}

impl<'a> ViewSecretAction<'a> {
    pub fn new(store: &'a CookieStore, events: &'a EventRegistry) -> Self {
        ViewSecretAction { store, events }
    }

    /// Renders the secret for an authenticated user without touching the
    /// session. Anyone else gets a flash message and a redirect.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "view_secret", skip_all, err)
    )]
    pub async fn execute(&self, request: &HeaderMap) -> Result<GateResponse, SessionError> {
        let mut session = open_session(self.store, self.events, request).await;
        let user = session.user();

        if user.authenticated {
            return Ok(GateResponse::render(
                Page::Secret {
                    user_name: user.user_name,
                },
                HeaderMap::new(),
            ));
        }

        session.add_flash(MSG_NO_ACCESS);
        let mut headers = HeaderMap::new();
        self.store.save(&session, &mut headers)?;

        self.events
            .dispatch(SessionEvent::AccessDenied { at: Utc::now() })
            .await;

        Ok(GateResponse::redirect(paths::FORBIDDEN, headers))
    }
}
