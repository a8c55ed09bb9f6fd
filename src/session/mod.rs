mod codec;
mod options;
mod store;
mod values;

pub use codec::{Codec, Payload};
pub use options::{SameSite, SessionOptions};
pub use store::{CookieStore, SessionRegistry};
pub use values::{
    DEFAULT_FLASH_KEY, FlashQueue, SessionValue, SessionValues, USER_KEY, User,
};

/// One request's view of the client-held session.
///
/// Obtained from [`CookieStore::get`] and written back with
/// [`CookieStore::save`]. Changes that are never saved are discarded.
#[derive(Debug, Clone)]
pub struct Session {
    name: String,
    values: SessionValues,
    flashes: FlashQueue,
    options: SessionOptions,
    is_new: bool,
}

impl Session {
    /// An empty session that has never been sent to the client.
    pub fn new(name: impl Into<String>, options: SessionOptions) -> Self {
        Self {
            name: name.into(),
            values: SessionValues::new(),
            flashes: FlashQueue::new(),
            options,
            is_new: true,
        }
    }

    pub(crate) fn restore(name: impl Into<String>, options: SessionOptions, payload: Payload) -> Self {
        Self {
            name: name.into(),
            values: payload.values,
            flashes: payload.flashes,
            options,
            is_new: false,
        }
    }

    pub(crate) fn payload(&self) -> Payload {
        Payload {
            values: self.values.clone(),
            flashes: self.flashes.clone(),
        }
    }

    /// Cookie name this session is stored under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// True if no valid cookie backed this session.
    pub fn is_new(&self) -> bool {
        self.is_new
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut SessionOptions {
        &mut self.options
    }

    pub fn values(&self) -> &SessionValues {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut SessionValues {
        &mut self.values
    }

    /// The signed-in user, or an unauthenticated default.
    ///
    /// Anything other than a [`User`] under [`USER_KEY`] reads as anonymous.
    pub fn user(&self) -> User {
        match self.values.get(USER_KEY) {
            Some(SessionValue::User(user)) => user.clone(),
            _ => User::default(),
        }
    }

    pub fn set_user(&mut self, user: User) {
        self.values.insert(USER_KEY, user);
    }

    pub fn clear_user(&mut self) {
        self.values.remove(USER_KEY);
    }

    /// Makes the next save delete the cookie on the client.
    pub fn expire(&mut self) {
        self.options.max_age = -1;
    }

    /// Queues a message in the default category.
    pub fn add_flash(&mut self, message: impl Into<String>) {
        self.flashes.push(DEFAULT_FLASH_KEY, message);
    }

    pub fn add_flash_to(&mut self, category: impl Into<String>, message: impl Into<String>) {
        self.flashes.push(category, message);
    }

    /// Returns and clears the default category's messages, oldest first.
    ///
    /// The clearing only reaches the client when the session is saved
    /// afterwards. Read without saving, the same messages come back on the
    /// next request. Nothing here saves implicitly.
    pub fn flashes(&mut self) -> Vec<String> {
        self.flashes.take(DEFAULT_FLASH_KEY)
    }

    /// Like [`flashes`](Self::flashes) for a named category.
    pub fn flashes_for(&mut self, category: &str) -> Vec<String> {
        self.flashes.take(category)
    }

    /// True if any category still has messages. Does not consume them.
    pub fn has_flashes(&self) -> bool {
        !self.flashes.is_empty()
    }
}
