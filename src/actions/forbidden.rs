use http::HeaderMap;

use super::open_session;
use crate::SessionError;
use crate::events::EventRegistry;
use crate::gate::{GateResponse, PENDING_KEY, Page};
use crate::session::CookieStore;

/// Shows every queued flash message once.
pub struct ViewForbiddenAction<'a> {
    store: &'a CookieStore,
    events: &'a EventRegistry,
}

impl<'a> ViewForbiddenAction<'a> {
    pub fn new(store: &'a CookieStore, events: &'a EventRegistry) -> Self {
        ViewForbiddenAction { store, events }
    }

    /// Drains the flash queue and saves, so the messages are not shown again.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "view_forbidden", skip_all, err)
    )]
    pub async fn execute(&self, request: &HeaderMap) -> Result<GateResponse, SessionError> {
        let mut session = open_session(self.store, self.events, request).await;

        let messages = session.flashes();
        session.values_mut().remove(PENDING_KEY);

        let mut headers = HeaderMap::new();
        self.store.save(&session, &mut headers)?;

        Ok(GateResponse::render(Page::Forbidden { messages }, headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{follow, store};
    use crate::gate::{AuthState, Outcome};

    #[tokio::test]
    async fn test_forbidden_drains_once() {
        let store = store();
        let events = EventRegistry::new();

        let mut session = store.new_session(store.cookie_name());
        session.add_flash("m1");
        session.add_flash("m2");
        session.values_mut().insert(PENDING_KEY, true);
        let mut saved = HeaderMap::new();
        store.save(&session, &mut saved).unwrap();

        let action = ViewForbiddenAction::new(&store, &events);
        let first = action.execute(&follow(&saved)).await.unwrap();
        assert_eq!(
            first.outcome,
            Outcome::Render(Page::Forbidden {
                messages: vec!["m1".to_owned(), "m2".to_owned()]
            })
        );

        let after = store.get(&follow(&first.headers), store.cookie_name());
        assert_eq!(AuthState::of(&after), AuthState::Anonymous);

        let second = action.execute(&follow(&first.headers)).await.unwrap();
        assert_eq!(
            second.outcome,
            Outcome::Render(Page::Forbidden { messages: vec![] })
        );
    }
}
