//! Key generation, signing and optional sealing of cookie payloads.
//!
//! Signing uses HMAC-SHA256. Sealing uses AES-GCM, with the key length
//! selecting AES-128, AES-192 or AES-256.

use aes_gcm::aead::consts::U12;
use aes_gcm::aead::{Aead, AeadCore, KeyInit};
use aes_gcm::aes::Aes192;
use aes_gcm::{Aes128Gcm, Aes256Gcm, AesGcm, Nonce};
use hmac::{Hmac, Mac};
use rand::RngCore;
use rand::rngs::OsRng;
use sha2::Sha256;

use crate::config::SessionConfig;
use crate::{EncodeError, KeyKind, SecretKey, SessionError};

type HmacSha256 = Hmac<Sha256>;
type Aes192Gcm = AesGcm<Aes192, U12>;

/// Default signing key length in bytes.
pub const DEFAULT_SIGNING_KEY_LENGTH: usize = 64;

/// Accepted signing key lengths.
pub const SIGNING_KEY_LENGTHS: [usize; 2] = [32, 64];

/// Accepted encryption key lengths (AES-128, AES-192, AES-256).
pub const ENCRYPTION_KEY_LENGTHS: [usize; 3] = [16, 24, 32];

/// Length of an HMAC-SHA256 tag.
pub const MAC_LENGTH: usize = 32;

const NONCE_LENGTH: usize = 12;

/// Fills `length` bytes from the operating system's CSPRNG.
///
/// # Errors
///
/// Returns `SessionError::KeyGeneration` if the OS cannot provide entropy.
/// Callers should treat that as fatal at startup.
///
/// # Example
///
/// ```rust
/// use crumbs::crypto::generate_key;
///
/// let key = generate_key(64).unwrap();
/// assert_eq!(key.len(), 64);
/// ```
pub fn generate_key(length: usize) -> Result<SecretKey, SessionError> {
    let mut bytes = vec![0u8; length];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| SessionError::KeyGeneration(e.to_string()))?;
    Ok(SecretKey::new(bytes))
}

/// HMAC-SHA256 key used to authenticate cookie frames.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SigningKey(SecretKey);

impl SigningKey {
    /// Generates a fresh signing key of 32 or 64 bytes.
    pub fn generate(length: usize) -> Result<Self, SessionError> {
        check_length(KeyKind::Signing, length, &SIGNING_KEY_LENGTHS)?;
        Ok(Self(generate_key(length)?))
    }

    /// Wraps existing key bytes, checking the length.
    pub fn from_secret(key: SecretKey) -> Result<Self, SessionError> {
        check_length(KeyKind::Signing, key.len(), &SIGNING_KEY_LENGTHS)?;
        Ok(Self(key))
    }

    /// Computes the tag over the concatenation of `parts`.
    pub fn sign(&self, parts: &[&[u8]]) -> Vec<u8> {
        compute_hmac(parts, self.0.expose_secret())
    }

    /// Checks `tag` against the concatenation of `parts` in constant time.
    pub fn verify(&self, parts: &[&[u8]], tag: &[u8]) -> bool {
        constant_time_eq(&self.sign(parts), tag)
    }
}

/// AES-GCM key used to seal cookie bodies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncryptionKey(SecretKey);

impl EncryptionKey {
    /// Generates a fresh key of 16, 24 or 32 bytes.
    pub fn generate(length: usize) -> Result<Self, SessionError> {
        check_length(KeyKind::Encryption, length, &ENCRYPTION_KEY_LENGTHS)?;
        Ok(Self(generate_key(length)?))
    }

    pub fn from_secret(key: SecretKey) -> Result<Self, SessionError> {
        check_length(KeyKind::Encryption, key.len(), &ENCRYPTION_KEY_LENGTHS)?;
        Ok(Self(key))
    }

    /// Encrypts `plaintext` under a random nonce.
    ///
    /// Returns `nonce || ciphertext || tag`.
    pub fn seal(&self, plaintext: &[u8]) -> Result<Vec<u8>, EncodeError> {
        let mut nonce = [0u8; NONCE_LENGTH];
        OsRng
            .try_fill_bytes(&mut nonce)
            .map_err(|_| EncodeError::Encryption)?;

        let key = self.0.expose_secret();
        let ciphertext = match key.len() {
            16 => seal_with::<Aes128Gcm>(key, &nonce, plaintext),
            24 => seal_with::<Aes192Gcm>(key, &nonce, plaintext),
            _ => seal_with::<Aes256Gcm>(key, &nonce, plaintext),
        }
        .ok_or(EncodeError::Encryption)?;

        let mut sealed = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        sealed.extend_from_slice(&nonce);
        sealed.extend_from_slice(&ciphertext);
        Ok(sealed)
    }

    /// Reverses [`seal`](Self::seal). Returns `None` on any failure.
    pub fn open(&self, sealed: &[u8]) -> Option<Vec<u8>> {
        let (nonce, ciphertext) = sealed.split_at_checked(NONCE_LENGTH)?;
        let key = self.0.expose_secret();
        match key.len() {
            16 => open_with::<Aes128Gcm>(key, nonce, ciphertext),
            24 => open_with::<Aes192Gcm>(key, nonce, ciphertext),
            _ => open_with::<Aes256Gcm>(key, nonce, ciphertext),
        }
    }
}

/// The keys one codec generation uses.
///
/// A store keeps an ordered list of pairs: the first one encodes, all of them
/// are tried when decoding, so old cookies survive a key rotation.
#[derive(Debug, Clone)]
pub struct KeyPair {
    pub signing: SigningKey,
    pub encryption: Option<EncryptionKey>,
}

impl KeyPair {
    pub fn new(signing: SigningKey, encryption: Option<EncryptionKey>) -> Self {
        Self {
            signing,
            encryption,
        }
    }

    /// Generates the keys `config` asks for.
    ///
    /// Call this once at startup, then hand the result to
    /// [`CookieStore::new`](crate::session::CookieStore::new). Generating new
    /// keys later invalidates every cookie in circulation.
    pub fn generate(config: &SessionConfig) -> Result<Self, SessionError> {
        let signing = SigningKey::generate(config.signing_key_length)?;
        let encryption = config
            .encryption_key_length
            .map(EncryptionKey::generate)
            .transpose()?;
        Ok(Self::new(signing, encryption))
    }
}

fn check_length(kind: KeyKind, length: usize, allowed: &[usize]) -> Result<(), SessionError> {
    if allowed.contains(&length) {
        Ok(())
    } else {
        Err(SessionError::InvalidKeyLength { kind, length })
    }
}

fn seal_with<C>(key: &[u8], nonce: &[u8], plaintext: &[u8]) -> Option<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).ok()?;
    cipher.encrypt(Nonce::from_slice(nonce), plaintext).ok()
}

fn open_with<C>(key: &[u8], nonce: &[u8], ciphertext: &[u8]) -> Option<Vec<u8>>
where
    C: KeyInit + Aead + AeadCore<NonceSize = U12>,
{
    let cipher = C::new_from_slice(key).ok()?;
    cipher.decrypt(Nonce::from_slice(nonce), ciphertext).ok()
}

/// Computes HMAC-SHA256 over the concatenation of `parts`.
///
/// # Panics
///
/// This function cannot panic as HMAC accepts keys of any size.
fn compute_hmac(parts: &[&[u8]], key: &[u8]) -> Vec<u8> {
    // SAFETY: HmacSha256::new_from_slice only fails if the key is invalid,
    // but HMAC-SHA256 accepts keys of any length, so this cannot fail.
    #[allow(clippy::expect_used)]
    let mut mac = <HmacSha256 as Mac>::new_from_slice(key).expect("HMAC accepts keys of any size");
    for part in parts {
        mac.update(part);
    }
    mac.finalize().into_bytes().to_vec()
}

/// Constant-time comparison to prevent timing attacks.
pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}
