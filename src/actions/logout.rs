use chrono::Utc;
use http::HeaderMap;

use super::open_session;
use crate::SessionError;
use crate::events::{EventRegistry, SessionEvent};
use crate::gate::{GateResponse, PENDING_KEY, paths};
use crate::session::CookieStore;

/// Signs the user out by telling the client to drop the cookie.
///
/// There is no server-side state to revoke; the removal cookie is the logout.
pub struct LogoutAction<'a> {
    store: &'a CookieStore,
    events: &'a EventRegistry,
}

impl<'a> LogoutAction<'a> {
    pub fn new(store: &'a CookieStore, events: &'a EventRegistry) -> Self {
        LogoutAction { store, events }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "logout", skip_all, err)
    )]
    pub async fn execute(&self, request: &HeaderMap) -> Result<GateResponse, SessionError> {
        let mut session = open_session(self.store, self.events, request).await;
        let user = session.user();

        session.clear_user();
        session.values_mut().remove(PENDING_KEY);
        session.expire();

        let mut headers = HeaderMap::new();
        self.store.save(&session, &mut headers)?;

        log::info!(
            target: "crumbs::gate",
            "msg=\"logout success\""
        );
        self.events
            .dispatch(SessionEvent::LoggedOut {
                user_name: user.authenticated.then_some(user.user_name),
                at: Utc::now(),
            })
            .await;

        Ok(GateResponse::redirect(paths::HOME, headers))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::test_support::{follow, store};
    use crate::gate::Outcome;
    use crate::session::User;

    #[tokio::test]
    async fn test_logout_removes_cookie() {
        let store = store();
        let events = EventRegistry::new();

        let mut session = store.new_session(store.cookie_name());
        session.set_user(User::authenticated("alice"));
        let mut login = HeaderMap::new();
        store.save(&session, &mut login).unwrap();

        let response = LogoutAction::new(&store, &events)
            .execute(&follow(&login))
            .await
            .unwrap();

        assert_eq!(response.outcome, Outcome::Redirect(paths::HOME));
        let header = response.set_cookies().next().unwrap().to_str().unwrap();
        assert!(header.contains("Max-Age=0"));

        let after = store.get(&follow(&response.headers), store.cookie_name());
        assert!(!after.user().authenticated);
    }

    #[tokio::test]
    async fn test_logout_when_anonymous() {
        let store = store();
        let events = EventRegistry::new();

        let response = LogoutAction::new(&store, &events)
            .execute(&HeaderMap::new())
            .await
            .unwrap();
        assert_eq!(response.outcome, Outcome::Redirect(paths::HOME));
    }
}
