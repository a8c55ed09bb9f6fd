use http::HeaderMap;

use super::open_session;
use crate::SessionError;
use crate::events::EventRegistry;
use crate::gate::{GateResponse, Page};
use crate::session::CookieStore;

/// Renders the landing page for whoever the session says is visiting.
pub struct IndexAction<'a> {
    store: &'a CookieStore,
    events: &'a EventRegistry,
}

impl<'a> IndexAction<'a> {
    pub fn new(store: &'a CookieStore, events: &'a EventRegistry) -> Self {
        IndexAction { store, events }
    }

    pub async fn execute(&self, request: &HeaderMap) -> Result<GateResponse, SessionError> {
        let session = open_session(self.store, self.events, request).await;
        Ok(GateResponse::render(
            Page::Index(session.user()),
            HeaderMap::new(),
        ))
    }
}
