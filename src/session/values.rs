use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Key under which the gate stores the signed-in [`User`].
pub const USER_KEY: &str = "user";

/// Flash category used by [`Session::add_flash`](super::Session::add_flash).
pub const DEFAULT_FLASH_KEY: &str = "_flash";

/// Account information kept in the session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct User {
    pub user_name: String,
    pub authenticated: bool,
}

impl User {
    pub fn authenticated(user_name: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            authenticated: true,
        }
    }
}

/// The closed set of value types a session can carry.
///
/// Every value is written with an explicit tag. A cookie whose tag or shape
/// does not match one of these variants is rejected as a whole when decoded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum SessionValue {
    User(User),
    Text(String),
    Integer(i64),
    Flag(bool),
}

impl From<User> for SessionValue {
    fn from(user: User) -> Self {
        SessionValue::User(user)
    }
}

impl From<String> for SessionValue {
    fn from(s: String) -> Self {
        SessionValue::Text(s)
    }
}

impl From<&str> for SessionValue {
    fn from(s: &str) -> Self {
        SessionValue::Text(s.to_owned())
    }
}

impl From<i64> for SessionValue {
    fn from(n: i64) -> Self {
        SessionValue::Integer(n)
    }
}

impl From<bool> for SessionValue {
    fn from(b: bool) -> Self {
        SessionValue::Flag(b)
    }
}

/// String-keyed session values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionValues(BTreeMap<String, SessionValue>);

impl SessionValues {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, returning the previous one under `key`.
    pub fn insert(
        &mut self,
        key: impl Into<String>,
        value: impl Into<SessionValue>,
    ) -> Option<SessionValue> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&SessionValue> {
        self.0.get(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<SessionValue> {
        self.0.remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &SessionValue)> {
        self.0.iter()
    }
}

/// Pending flash messages, grouped by category.
///
/// Messages within a category keep their insertion order. Empty categories
/// are never kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FlashQueue(BTreeMap<String, Vec<String>>);

impl FlashQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, category: impl Into<String>, message: impl Into<String>) {
        self.0
            .entry(category.into())
            .or_default()
            .push(message.into());
    }

    /// Removes and returns every message in `category`.
    pub fn take(&mut self, category: &str) -> Vec<String> {
        self.0.remove(category).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.values().all(Vec::is_empty)
    }

    /// Total number of queued messages across categories.
    pub fn len(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }
}
