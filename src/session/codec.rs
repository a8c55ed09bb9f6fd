//! Cookie value encoding.
//!
//! A cookie value is the base64url (unpadded) encoding of
//!
//! ```text
//! version:u8 | issued_at:i64 | expires_at:i64 | body_len:u32 | body | mac[32]
//! ```
//!
//! with integers big-endian. `body` is the JSON payload, sealed with AES-GCM
//! when the key pair has an encryption key. The MAC is HMAC-SHA256 over the
//! cookie name (prefixed with its `u32` length) followed by every byte before the MAC, so the
//! bytes that get parsed are exactly the bytes that were signed. Nothing is
//! parsed until the MAC checks out.

use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::options::SessionOptions;
use super::values::{FlashQueue, SessionValues};
use crate::crypto::{KeyPair, MAC_LENGTH};
use crate::{DecodeError, EncodeError, SessionError};

const VERSION: u8 = 1;
const HEADER_LENGTH: usize = 1 + 8 + 8 + 4;

/// What a cookie carries.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Payload {
    pub values: SessionValues,
    pub flashes: FlashQueue,
}

/// Signs and verifies cookie values with an ordered key ring.
#[derive(Debug, Clone)]
pub struct Codec {
    keys: Vec<KeyPair>,
    max_length: usize,
}

struct Frame<'a> {
    expires_at: i64,
    body: &'a [u8],
}

impl Codec {
    /// `keys[0]` encodes; every pair is tried when decoding.
    ///
    /// `max_length` bounds the encoded value in both directions; 0 disables it.
    pub fn new(keys: Vec<KeyPair>, max_length: usize) -> Result<Self, SessionError> {
        if keys.is_empty() {
            return Err(SessionError::Configuration(
                "at least one key pair is required".to_owned(),
            ));
        }
        Ok(Self { keys, max_length })
    }

    pub fn encode(
        &self,
        name: &str,
        payload: &Payload,
        options: &SessionOptions,
    ) -> Result<String, EncodeError> {
        self.encode_at(name, payload, options, Utc::now())
    }

    /// Encodes as if the current time were `now`.
    pub fn encode_at(
        &self,
        name: &str,
        payload: &Payload,
        options: &SessionOptions,
        now: DateTime<Utc>,
    ) -> Result<String, EncodeError> {
        let json =
            serde_json::to_vec(payload).map_err(|e| EncodeError::Serialization(e.to_string()))?;
        self.seal_body(name, json, options.max_age, now)
    }

    fn seal_body(
        &self,
        name: &str,
        plaintext: Vec<u8>,
        max_age: i64,
        now: DateTime<Utc>,
    ) -> Result<String, EncodeError> {
        let keys = self.primary();
        let body = match &keys.encryption {
            Some(key) => key.seal(&plaintext)?,
            None => plaintext,
        };

        let body_len = u32::try_from(body.len()).map_err(|_| EncodeError::TooLarge {
            length: body.len(),
            limit: u32::MAX as usize,
        })?;

        let issued_at = now.timestamp();
        let expires_at = if max_age == 0 {
            0
        } else {
            issued_at.saturating_add(max_age)
        };

        let mut frame = Vec::with_capacity(HEADER_LENGTH + body.len() + MAC_LENGTH);
        frame.push(VERSION);
        frame.extend_from_slice(&issued_at.to_be_bytes());
        frame.extend_from_slice(&expires_at.to_be_bytes());
        frame.extend_from_slice(&body_len.to_be_bytes());
        frame.extend_from_slice(&body);

        let name_len = name_prefix(name);
        let tag = keys.signing.sign(&[name_len.as_slice(), name.as_bytes(), frame.as_slice()]);
        frame.extend_from_slice(&tag);

        let encoded = URL_SAFE_NO_PAD.encode(&frame);
        if self.max_length > 0 && encoded.len() > self.max_length {
            return Err(EncodeError::TooLarge {
                length: encoded.len(),
                limit: self.max_length,
            });
        }
        Ok(encoded)
    }

    pub fn decode(&self, name: &str, value: &str) -> Result<Payload, DecodeError> {
        self.decode_at(name, value, Utc::now())
    }

    /// Decodes as if the current time were `now`.
    pub fn decode_at(
        &self,
        name: &str,
        value: &str,
        now: DateTime<Utc>,
    ) -> Result<Payload, DecodeError> {
        if self.max_length > 0 && value.len() > self.max_length {
            return Err(DecodeError::Malformed("value exceeds maximum length"));
        }

        let raw = URL_SAFE_NO_PAD
            .decode(value)
            .map_err(|_| DecodeError::Malformed("value is not base64url"))?;
        let split = raw
            .len()
            .checked_sub(MAC_LENGTH)
            .filter(|&at| at >= HEADER_LENGTH)
            .ok_or(DecodeError::Malformed("value is too short"))?;
        let (signed, tag) = raw.split_at(split);

        let name_len = name_prefix(name);
        let keys = self
            .keys
            .iter()
            .find(|keys| keys.signing.verify(&[name_len.as_slice(), name.as_bytes(), signed], tag))
            .ok_or(DecodeError::BadSignature)?;

        let frame = parse_frame(signed)?;
        if frame.expires_at != 0 && now.timestamp() > frame.expires_at {
            return Err(DecodeError::Expired);
        }

        let body = match &keys.encryption {
            Some(key) => key
                .open(frame.body)
                .ok_or(DecodeError::Malformed("body cannot be decrypted"))?,
            None => frame.body.to_vec(),
        };

        let json: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|_| DecodeError::Malformed("body is not JSON"))?;
        serde_json::from_value(json).map_err(|e| DecodeError::UnregisteredType(e.to_string()))
    }

    fn primary(&self) -> &KeyPair {
        // `new` rejects an empty ring.
        #[allow(clippy::indexing_slicing)]
        &self.keys[0]
    }
}

/// Big-endian `u32` length of the cookie name, prepended to the MAC input.
fn name_prefix(name: &str) -> [u8; 4] {
    u32::try_from(name.len()).unwrap_or(u32::MAX).to_be_bytes()
}

fn parse_frame(signed: &[u8]) -> Result<Frame<'_>, DecodeError> {
    let (version, rest) = signed
        .split_first()
        .ok_or(DecodeError::Malformed("missing version"))?;
    if *version != VERSION {
        return Err(DecodeError::Malformed("unknown version"));
    }

    let (_issued_at, rest) = rest
        .split_first_chunk::<8>()
        .ok_or(DecodeError::Malformed("missing timestamp"))?;
    let (expires_at, rest) = rest
        .split_first_chunk::<8>()
        .ok_or(DecodeError::Malformed("missing expiry"))?;
    let (body_len, body) = rest
        .split_first_chunk::<4>()
        .ok_or(DecodeError::Malformed("missing body length"))?;

    if u32::from_be_bytes(*body_len) as usize != body.len() {
        return Err(DecodeError::Malformed("body length mismatch"));
    }

    Ok(Frame {
        expires_at: i64::from_be_bytes(*expires_at),
        body,
    })
}
