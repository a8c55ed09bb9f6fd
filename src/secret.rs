//! Sensitive key material.
//!
//! Keys are generated at startup and only ever live in memory, so this type
//! deliberately has no serde support.

use std::fmt;

/// Raw key bytes that never show up in logs.
///
/// `SecretKey` implements `Debug` and `Display` to show `[REDACTED]` instead
/// of the actual bytes.
///
/// # Example
///
/// ```rust
/// use crumbs::SecretKey;
///
/// let key = SecretKey::new(vec![7u8; 32]);
///
/// assert_eq!(format!("{:?}", key), "SecretKey([REDACTED])");
/// assert_eq!(key.len(), 32);
/// ```
#[derive(Clone)]
pub struct SecretKey(Vec<u8>);

impl SecretKey {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    /// Exposes the key bytes.
    ///
    /// Use this only when handing the key to a MAC or cipher.
    #[must_use]
    pub fn expose_secret(&self) -> &[u8] {
        &self.0
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the length of the key in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretKey([REDACTED])")
    }
}

impl fmt::Display for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<Vec<u8>> for SecretKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for SecretKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl PartialEq for SecretKey {
    fn eq(&self, other: &Self) -> bool {
        crate::crypto::constant_time_eq(&self.0, &other.0)
    }
}

impl Eq for SecretKey {}
