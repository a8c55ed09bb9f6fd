//! Stateless cookie sessions.
//!
//! Session values and flash messages live entirely in a client-held cookie
//! that is MAC-signed (and optionally AES-GCM sealed) by this process. A small
//! login gate built on top shows the intended request flow.
//!
//! ```rust
//! use crumbs::config::SessionConfig;
//! use crumbs::crypto::KeyPair;
//! use crumbs::session::CookieStore;
//!
//! let config = SessionConfig::development();
//! let keys = KeyPair::generate(&config).unwrap();
//! let store = CookieStore::new(config, keys).unwrap();
//!
//! let request = http::HeaderMap::new();
//! let mut session = store.get(&request, "cookie-name");
//! session.add_flash("welcome");
//!
//! let mut response = http::HeaderMap::new();
//! store.save(&session, &mut response).unwrap();
//! assert!(response.contains_key(http::header::SET_COOKIE));
//! ```

pub mod actions;
pub mod api;
pub mod config;
pub mod crypto;
pub mod events;
pub mod gate;
pub mod secret;
pub mod session;

use std::fmt;

pub use config::SessionConfig;
pub use crypto::{EncryptionKey, KeyPair, SigningKey};
pub use gate::{AuthGate, AuthState, Challenge, StaticCode};
pub use secret::SecretKey;
pub use session::{CookieStore, Session, SessionOptions, SessionValue, User};

/// Which key a length error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    Signing,
    Encryption,
}

impl fmt::Display for KeyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyKind::Signing => f.write_str("signing"),
            KeyKind::Encryption => f.write_str("encryption"),
        }
    }
}

/// Errors surfaced to callers of the store and the gate.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The OS random source could not produce key material.
    KeyGeneration(String),
    InvalidKeyLength { kind: KeyKind, length: usize },
    Configuration(String),
    Encode(EncodeError),
}

impl std::error::Error for SessionError {}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::KeyGeneration(msg) => write!(f, "Key generation failed: {msg}"),
            SessionError::InvalidKeyLength { kind, length } => {
                write!(f, "Invalid {kind} key length: {length} bytes")
            }
            SessionError::Configuration(msg) => write!(f, "Configuration error: {msg}"),
            SessionError::Encode(err) => write!(f, "Failed to save session: {err}"),
        }
    }
}

impl From<EncodeError> for SessionError {
    fn from(err: EncodeError) -> Self {
        SessionError::Encode(err)
    }
}

/// Reasons a cookie value is rejected.
///
/// The store treats every variant the same way (a fresh, anonymous session),
/// but they stay distinct for logs and events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    BadSignature,
    Expired,
    Malformed(&'static str),
    UnregisteredType(String),
}

impl DecodeError {
    /// Stable label for logs and metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            DecodeError::BadSignature => "bad_signature",
            DecodeError::Expired => "expired",
            DecodeError::Malformed(_) => "malformed",
            DecodeError::UnregisteredType(_) => "unregistered_type",
        }
    }
}

impl std::error::Error for DecodeError {}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::BadSignature => write!(f, "Cookie signature is invalid"),
            DecodeError::Expired => write!(f, "Cookie has expired"),
            DecodeError::Malformed(what) => write!(f, "Malformed cookie: {what}"),
            DecodeError::UnregisteredType(msg) => {
                write!(f, "Cookie holds an unregistered value type: {msg}")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    Serialization(String),
    Encryption,
    TooLarge { length: usize, limit: usize },
}

impl std::error::Error for EncodeError {}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EncodeError::Serialization(msg) => write!(f, "Serialization error: {msg}"),
            EncodeError::Encryption => write!(f, "Failed to encrypt session payload"),
            EncodeError::TooLarge { length, limit } => {
                write!(f, "Encoded cookie is {length} bytes, limit is {limit}")
            }
        }
    }
}
