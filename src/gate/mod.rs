//! The login gate in front of the protected page.
//!
//! Five endpoints drive the session through three states:
//!
//! * `Anonymous`: no user, nothing pending.
//! * `Pending`: a code was submitted and rejected; the explanation is queued
//!   as flash messages until the forbidden page shows it.
//! * `Authenticated`: a [`User`] with `authenticated = true` is stored.
//!
//! Every endpoint returns a [`GateResponse`] that a routing layer turns into
//! an HTTP response.

mod challenge;

use std::sync::Arc;

use http::HeaderMap;
use http::header::{HeaderValue, SET_COOKIE};

pub use challenge::{Challenge, StaticCode, Verdict};

use crate::SessionError;
use crate::actions::{
    IndexAction, LoginAction, LogoutAction, ViewForbiddenAction, ViewSecretAction,
};
use crate::events::EventRegistry;
use crate::session::{CookieStore, Session, SessionValue, User};

/// Session key marking a rejected challenge whose explanation is unread.
pub const PENDING_KEY: &str = "pending_challenge";

pub mod paths {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const LOGOUT: &str = "/logout";
    pub const SECRET: &str = "/secret";
    pub const FORBIDDEN: &str = "/forbidden";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Anonymous,
    Pending,
    Authenticated,
}

impl AuthState {
    pub fn of(session: &Session) -> Self {
        if session.user().authenticated {
            AuthState::Authenticated
        } else if matches!(
            session.values().get(PENDING_KEY),
            Some(SessionValue::Flag(true))
        ) {
            AuthState::Pending
        } else {
            AuthState::Anonymous
        }
    }
}

/// What the routing layer should render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Page {
    Index(User),
    Secret { user_name: String },
    Forbidden { messages: Vec<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Redirect(&'static str),
    Render(Page),
}

/// Result of one gate endpoint: an outcome plus the headers to send.
#[derive(Debug)]
pub struct GateResponse {
    pub outcome: Outcome,
    pub headers: HeaderMap,
}

impl GateResponse {
    pub fn redirect(location: &'static str, headers: HeaderMap) -> Self {
        Self {
            outcome: Outcome::Redirect(location),
            headers,
        }
    }

    pub fn render(page: Page, headers: HeaderMap) -> Self {
        Self {
            outcome: Outcome::Render(page),
            headers,
        }
    }

    /// `Set-Cookie` values produced by the endpoint.
    pub fn set_cookies(&self) -> impl Iterator<Item = &HeaderValue> {
        self.headers.get_all(SET_COOKIE).iter()
    }
}

/// Shared state for the five gate endpoints.
///
/// Cheap to clone; the store, challenge and listeners are behind `Arc`s and
/// never change after construction.
pub struct AuthGate<C> {
    store: Arc<CookieStore>,
    challenge: Arc<C>,
    events: Arc<EventRegistry>,
}

impl<C> Clone for AuthGate<C> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            challenge: Arc::clone(&self.challenge),
            events: Arc::clone(&self.events),
        }
    }
}

impl<C: Challenge> AuthGate<C> {
    pub fn new(store: Arc<CookieStore>, challenge: C) -> Self {
        Self {
            store,
            challenge: Arc::new(challenge),
            events: Arc::new(EventRegistry::new()),
        }
    }

    #[must_use]
    pub fn with_events(mut self, events: EventRegistry) -> Self {
        self.events = Arc::new(events);
        self
    }

    pub fn store(&self) -> &CookieStore {
        &self.store
    }

    pub async fn index(&self, request: &HeaderMap) -> Result<GateResponse, SessionError> {
        IndexAction::new(&self.store, &self.events)
            .execute(request)
            .await
    }

    pub async fn login(
        &self,
        request: &HeaderMap,
        code: &str,
        user_name: &str,
    ) -> Result<GateResponse, SessionError> {
        LoginAction::new(&self.store, self.challenge.as_ref(), &self.events)
            .execute(request, code, user_name)
            .await
    }

    pub async fn logout(&self, request: &HeaderMap) -> Result<GateResponse, SessionError> {
        LogoutAction::new(&self.store, &self.events)
            .execute(request)
            .await
    }

    pub async fn secret(&self, request: &HeaderMap) -> Result<GateResponse, SessionError> {
        ViewSecretAction::new(&self.store, &self.events)
            .execute(request)
            .await
    }

    pub async fn forbidden(&self, request: &HeaderMap) -> Result<GateResponse, SessionError> {
        ViewForbiddenAction::new(&self.store, &self.events)
            .execute(request)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionOptions;

    #[test]
    fn test_auth_state_of_session() {
        let mut session = Session::new("cookie-name", SessionOptions::default());
        assert_eq!(AuthState::of(&session), AuthState::Anonymous);

        session.values_mut().insert(PENDING_KEY, true);
        assert_eq!(AuthState::of(&session), AuthState::Pending);

        session.set_user(User::authenticated("alice"));
        assert_eq!(AuthState::of(&session), AuthState::Authenticated);

        session.set_user(User {
            user_name: "alice".to_owned(),
            authenticated: false,
        });
        session.values_mut().remove(PENDING_KEY);
        assert_eq!(AuthState::of(&session), AuthState::Anonymous);
    }

    #[test]
    fn test_gate_response_set_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(SET_COOKIE, HeaderValue::from_static("a=1"));
        headers.append(SET_COOKIE, HeaderValue::from_static("b=2"));

        let response = GateResponse::redirect(paths::HOME, headers);
        assert_eq!(response.outcome, Outcome::Redirect("/"));
        assert_eq!(response.set_cookies().count(), 2);
    }
}
