use std::collections::BTreeMap;

use cookie::Cookie;
use http::HeaderMap;
use http::header::{COOKIE, HeaderValue, SET_COOKIE};

use super::Session;
use super::codec::Codec;
use crate::config::{SessionConfig, is_valid_cookie_name};
use crate::crypto::KeyPair;
use crate::{DecodeError, SessionError};

/// Loads and saves sessions kept entirely in signed cookies.
///
/// Built once at startup and read-only afterwards; share it behind an `Arc`.
///
/// # Example
///
/// ```rust
/// use crumbs::{CookieStore, KeyPair, SessionConfig};
///
/// let config = SessionConfig::development();
/// let keys = KeyPair::generate(&config).unwrap();
/// let store = CookieStore::new(config, keys).unwrap();
///
/// let session = store.get(&http::HeaderMap::new(), store.cookie_name());
/// assert!(session.is_new());
/// ```
#[derive(Debug)]
pub struct CookieStore {
    config: SessionConfig,
    codec: Codec,
}

impl CookieStore {
    pub fn new(config: SessionConfig, keys: KeyPair) -> Result<Self, SessionError> {
        Self::with_key_ring(config, vec![keys])
    }

    /// Builds a store that encodes with `keys[0]` and accepts cookies signed
    /// by any of `keys`.
    pub fn with_key_ring(config: SessionConfig, keys: Vec<KeyPair>) -> Result<Self, SessionError> {
        config.validate()?;
        let codec = Codec::new(keys, config.max_cookie_length)?;
        Ok(Self { config, codec })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn codec(&self) -> &Codec {
        &self.codec
    }

    /// The configured session cookie name.
    pub fn cookie_name(&self) -> &str {
        &self.config.cookie_name
    }

    /// A fresh session using the store's default options.
    pub fn new_session(&self, name: &str) -> Session {
        Session::new(name, self.config.options.clone())
    }

    /// Loads the session named `name` from the request's `Cookie` headers.
    ///
    /// Returns `Ok(None)` when the request carries no such cookie and the
    /// decode failure when it carries one that cannot be trusted.
    pub fn try_get(&self, request: &HeaderMap, name: &str) -> Result<Option<Session>, DecodeError> {
        let Some(value) = find_cookie(request, name) else {
            return Ok(None);
        };

        match self.codec.decode(name, &value) {
            Ok(payload) => Ok(Some(Session::restore(
                name,
                self.config.options.clone(),
                payload,
            ))),
            Err(err) => {
                log::warn!(
                    target: "crumbs::session",
                    "msg=\"session cookie rejected\" name=\"{name}\" reason=\"{}\"",
                    err.kind()
                );
                Err(err)
            }
        }
    }

    /// Loads the session named `name`, falling back to a fresh one.
    ///
    /// Never fails: a missing, tampered, expired or unreadable cookie all
    /// produce an empty, anonymous session.
    pub fn get(&self, request: &HeaderMap, name: &str) -> Session {
        self.try_get(request, name)
            .ok()
            .flatten()
            .unwrap_or_else(|| self.new_session(name))
    }

    /// Appends the session's `Set-Cookie` header to `response`.
    ///
    /// A session with a negative max age is written as a removal cookie.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::Configuration` if the session's name is not a
    /// valid cookie name, and `SessionError::Encode` if the payload cannot be
    /// encoded (for example when it exceeds the configured cookie length). In
    /// both cases nothing is appended.
    pub fn save(&self, session: &Session, response: &mut HeaderMap) -> Result<(), SessionError> {
        if !is_valid_cookie_name(session.name()) {
            return Err(SessionError::Configuration(format!(
                "invalid cookie name: {:?}",
                session.name()
            )));
        }

        let options = session.options();
        let cookie = if options.is_removal() {
            options.build_removal_cookie(session.name())
        } else {
            let value = self
                .codec
                .encode(session.name(), &session.payload(), options)?;
            options.build_cookie(session.name(), value)
        };

        let header = HeaderValue::from_str(&cookie.to_string())
            .map_err(|e| SessionError::Configuration(format!("invalid Set-Cookie header: {e}")))?;
        response.append(SET_COOKIE, header);

        log::debug!(
            target: "crumbs::session",
            "msg=\"session saved\" name=\"{}\" removal={}",
            session.name(),
            options.is_removal()
        );
        Ok(())
    }

    /// Per-request cache of sessions keyed by cookie name.
    pub fn registry<'a>(&'a self, request: &'a HeaderMap) -> SessionRegistry<'a> {
        SessionRegistry {
            store: self,
            request,
            sessions: BTreeMap::new(),
        }
    }
}

/// Sessions loaded during one request.
///
/// Each name is decoded at most once; [`save_all`](Self::save_all) writes
/// back every session that was loaded.
pub struct SessionRegistry<'a> {
    store: &'a CookieStore,
    request: &'a HeaderMap,
    sessions: BTreeMap<String, Session>,
}

impl SessionRegistry<'_> {
    pub fn get(&mut self, name: &str) -> &mut Session {
        let (store, request) = (self.store, self.request);
        self.sessions
            .entry(name.to_owned())
            .or_insert_with(|| store.get(request, name))
    }

    pub fn save_all(&self, response: &mut HeaderMap) -> Result<(), SessionError> {
        for session in self.sessions.values() {
            self.store.save(session, response)?;
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

/// First cookie called `name` across all `Cookie` headers.
fn find_cookie(request: &HeaderMap, name: &str) -> Option<String> {
    request
        .get_all(COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == name)
        .map(|cookie| cookie.value().to_owned())
}
