use chrono::Duration;
use cookie::time::{Duration as CookieDuration, OffsetDateTime};
use cookie::{Cookie, Expiration, SameSite as CookieSameSite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    None,
    #[default]
    Lax,
    Strict,
}

impl From<SameSite> for CookieSameSite {
    fn from(value: SameSite) -> Self {
        match value {
            SameSite::None => CookieSameSite::None,
            SameSite::Lax => CookieSameSite::Lax,
            SameSite::Strict => CookieSameSite::Strict,
        }
    }
}

/// Cookie attributes and lifetime of a session.
///
/// `max_age` is in seconds: positive values expire the cookie (and the signed
/// payload) after that many seconds, `0` makes it a browser-session cookie
/// with no server-side expiry, and a negative value tells the client to delete
/// it immediately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub path: String,
    pub domain: Option<String>,
    pub max_age: i64,
    pub secure: bool,
    pub http_only: bool,
    pub same_site: SameSite,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            path: "/".to_owned(),
            domain: None,
            max_age: Duration::minutes(15).num_seconds(),
            secure: true,
            http_only: true,
            same_site: SameSite::Lax,
        }
    }
}

impl SessionOptions {
    /// True when saving should delete the cookie instead of writing it.
    pub fn is_removal(&self) -> bool {
        self.max_age < 0
    }

    /// Builds the `Set-Cookie` value for `name=value` with these options.
    pub(crate) fn build_cookie(&self, name: &str, value: String) -> Cookie<'static> {
        let mut builder = Cookie::build((name.to_owned(), value))
            .path(self.path.clone())
            .secure(self.secure)
            .http_only(self.http_only)
            .same_site(self.same_site.into());

        if let Some(ref domain) = self.domain {
            builder = builder.domain(domain.clone());
        }

        builder = match self.max_age {
            age if age > 0 => builder.max_age(CookieDuration::seconds(age)),
            0 => builder,
            _ => builder
                .max_age(CookieDuration::ZERO)
                .expires(Expiration::DateTime(OffsetDateTime::UNIX_EPOCH)),
        };

        builder.build()
    }

    /// Builds a cookie that instructs the client to drop `name`.
    pub(crate) fn build_removal_cookie(&self, name: &str) -> Cookie<'static> {
        let options = Self {
            max_age: -1,
            ..self.clone()
        };
        options.build_cookie(name, String::new())
    }
}
