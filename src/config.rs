//! Process-wide session configuration.
//!
//! Built once at startup, validated, and then owned by the
//! [`CookieStore`](crate::session::CookieStore). Nothing here changes per
//! request.
//!
//! # Example
//!
//! ```rust
//! use crumbs::config::SessionConfig;
//! use crumbs::session::SessionOptions;
//! use chrono::Duration;
//!
//! // Use defaults
//! let config = SessionConfig::default();
//!
//! // Or customize
//! let config = SessionConfig {
//!     cookie_name: "app_session".to_owned(),
//!     options: SessionOptions {
//!         max_age: Duration::minutes(30).num_seconds(),
//!         ..Default::default()
//!     },
//!     encryption_key_length: Some(32),
//!     ..Default::default()
//! };
//! assert!(config.validate().is_ok());
//! ```

use chrono::Duration;

use crate::SessionError;
use crate::crypto::{DEFAULT_SIGNING_KEY_LENGTH, ENCRYPTION_KEY_LENGTHS, SIGNING_KEY_LENGTHS};
use crate::session::{SameSite, SessionOptions};

/// Browsers commonly cap a single cookie at 4096 bytes.
pub const DEFAULT_MAX_COOKIE_LENGTH: usize = 4096;

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Name of the session cookie.
    pub cookie_name: String,

    /// Default options copied into every new session.
    pub options: SessionOptions,

    /// Signing key length in bytes, 32 or 64.
    ///
    /// Default: 64
    pub signing_key_length: usize,

    /// Encryption key length in bytes (16, 24 or 32), or `None` for
    /// integrity-only cookies.
    ///
    /// Default: `None`
    pub encryption_key_length: Option<usize>,

    /// Longest encoded cookie value accepted or produced. 0 disables the check.
    ///
    /// Default: 4096
    pub max_cookie_length: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "cookie-name".to_owned(),
            options: SessionOptions::default(),
            signing_key_length: DEFAULT_SIGNING_KEY_LENGTH,
            encryption_key_length: None,
            max_cookie_length: DEFAULT_MAX_COOKIE_LENGTH,
        }
    }
}

impl SessionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration for local development over plain HTTP.
    ///
    /// Same as the default, except cookies are not marked `Secure`.
    pub fn development() -> Self {
        Self {
            options: SessionOptions {
                secure: false,
                ..SessionOptions::default()
            },
            ..Self::default()
        }
    }

    /// Shorter sessions, sealed cookies and `SameSite=Strict`.
    pub fn strict() -> Self {
        Self {
            options: SessionOptions {
                max_age: Duration::minutes(5).num_seconds(),
                same_site: SameSite::Strict,
                ..SessionOptions::default()
            },
            encryption_key_length: Some(32),
            ..Self::default()
        }
    }

    /// Checks the cookie name and key lengths.
    pub fn validate(&self) -> Result<(), SessionError> {
        if !is_valid_cookie_name(&self.cookie_name) {
            return Err(SessionError::Configuration(format!(
                "invalid cookie name {:?}",
                self.cookie_name
            )));
        }
        if !SIGNING_KEY_LENGTHS.contains(&self.signing_key_length) {
            return Err(SessionError::InvalidKeyLength {
                kind: crate::KeyKind::Signing,
                length: self.signing_key_length,
            });
        }
        if let Some(length) = self.encryption_key_length {
            if !ENCRYPTION_KEY_LENGTHS.contains(&length) {
                return Err(SessionError::InvalidKeyLength {
                    kind: crate::KeyKind::Encryption,
                    length,
                });
            }
        }
        Ok(())
    }

    /// Returns the default max age as a `chrono::Duration`.
    #[inline]
    pub fn max_age(&self) -> Duration {
        Duration::seconds(self.options.max_age)
    }
}

/// RFC 6265 cookie names are HTTP tokens.
pub(crate) fn is_valid_cookie_name(name: &str) -> bool {
    !name.is_empty()
        && name.bytes().all(|b| {
            b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::default();

        assert_eq!(config.cookie_name, "cookie-name");
        assert_eq!(config.options.max_age, 15 * 60);
        assert!(config.options.http_only);
        assert_eq!(config.options.path, "/");
        assert_eq!(config.signing_key_length, 64);
        assert_eq!(config.encryption_key_length, None);
        assert_eq!(config.max_cookie_length, 4096);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_development_config() {
        let config = SessionConfig::development();
        assert!(!config.options.secure);
        assert!(config.options.http_only);
    }

    #[test]
    fn test_strict_config() {
        let config = SessionConfig::strict();
        assert_eq!(config.max_age(), Duration::minutes(5));
        assert_eq!(config.options.same_site, SameSite::Strict);
        assert_eq!(config.encryption_key_length, Some(32));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_bad_cookie_name() {
        for name in ["", "has space", "semi;colon", "eq=uals"] {
            let config = SessionConfig {
                cookie_name: name.to_owned(),
                ..Default::default()
            };
            assert!(
                matches!(config.validate(), Err(SessionError::Configuration(_))),
                "{name:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_validate_key_lengths() {
        let config = SessionConfig {
            signing_key_length: 48,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            encryption_key_length: Some(64),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = SessionConfig {
            signing_key_length: 32,
            encryption_key_length: Some(16),
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }
}
