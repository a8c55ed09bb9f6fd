use chrono::Utc;
use http::HeaderMap;

use super::{MSG_INCORRECT_CODE, MSG_MISSING_CODE, open_session};
use crate::SessionError;
use crate::events::{EventRegistry, SessionEvent};
use crate::gate::{Challenge, GateResponse, PENDING_KEY, Verdict, paths};
use crate::session::{CookieStore, User};

/// Checks a submitted code and signs the user in.
pub struct LoginAction<'a, C: Challenge> {
    store: &'a CookieStore,
    challenge: &'a C,
    events: &'a EventRegistry,
}

impl<'a, C: Challenge> LoginAction<'a, C> {
    pub fn new(store: &'a CookieStore, challenge: &'a C, events: &'a EventRegistry) -> Self {
        LoginAction {
            store,
            challenge,
            events,
        }
    }

    /// Submits `code` on behalf of `user_name`.
    ///
    /// # Returns
    ///
    /// - redirect to the secret page with the user stored, if the code is accepted
    /// - redirect to the forbidden page with explanation flashes, otherwise
    /// - `Err(SessionError)` if the session cannot be saved
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(name = "login", skip_all, err)
    )]
    pub async fn execute(
        &self,
        request: &HeaderMap,
        code: &str,
        user_name: &str,
    ) -> Result<GateResponse, SessionError> {
        let mut session = open_session(self.store, self.events, request).await;

        let (location, event) = match self.challenge.check(code) {
            Verdict::Accepted => {
                session.set_user(User::authenticated(user_name));
                session.values_mut().remove(PENDING_KEY);
                let event = SessionEvent::LoginSucceeded {
                    user_name: user_name.to_owned(),
                    at: Utc::now(),
                };
                (paths::SECRET, event)
            }
            Verdict::Missing => {
                session.add_flash(MSG_MISSING_CODE);
                session.add_flash(MSG_INCORRECT_CODE);
                session.values_mut().insert(PENDING_KEY, true);
                let event = SessionEvent::LoginRejected {
                    reason: "missing code",
                    at: Utc::now(),
                };
                (paths::FORBIDDEN, event)
            }
            Verdict::Incorrect => {
                session.add_flash(MSG_INCORRECT_CODE);
                session.values_mut().insert(PENDING_KEY, true);
                let event = SessionEvent::LoginRejected {
                    reason: "incorrect code",
                    at: Utc::now(),
                };
                (paths::FORBIDDEN, event)
            }
        };

        let mut headers = HeaderMap::new();
        self.store.save(&session, &mut headers)?;

        log::info!(
            target: "crumbs::gate",
            "msg=\"login attempt\" event=\"{}\"",
            event.name()
        );
        self.events.dispatch(event).await;

        Ok(GateResponse::redirect(location, headers))
    }
}
