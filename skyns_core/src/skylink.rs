//! Skylinks: content-addressed identifiers for immutable Skynet blobs.
//!
//! A skylink is 34 raw bytes (a 2-byte bitfield followed by a 32-byte merkle
//! root). Neither part is interpreted here. The canonical text form is
//! 46 characters of unpadded URL-safe base64; portals also serve skylinks on
//! a subdomain named by the 55 character base32hex form.

use crate::codec::{self, CodecError};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use std::fmt;
use std::str::FromStr;

/// Size of a raw skylink in bytes.
pub const SKYLINK_SIZE: usize = 34;

/// Length of a skylink encoded as unpadded base64.
pub const BASE64_SKYLINK_LEN: usize = 46;

/// Length of a skylink encoded as unpadded base32hex.
pub const BASE32_SKYLINK_LEN: usize = 55;

const URI_SKYNET_PREFIX: &str = "sia:";

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SkylinkError {
    #[error("could not extract skylink from '{0}'")]
    Unrecognized(String),
    #[error("failed to decode skylink: {0}")]
    Decode(#[from] CodecError),
    #[error("invalid skylink length: expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

#[derive(Clone, Copy, Hash, PartialEq, Eq)]
pub struct Skylink([u8; SKYLINK_SIZE]);

impl fmt::Debug for Skylink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Skylink").field(&self.to_base64()).finish()
    }
}

impl Skylink {
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, SkylinkError> {
        let raw: [u8; SKYLINK_SIZE] =
            bytes
                .try_into()
                .map_err(|_| SkylinkError::InvalidLength {
                    expected: SKYLINK_SIZE,
                    actual: bytes.len(),
                })?;
        Ok(Self(raw))
    }

    pub fn as_bytes(&self) -> &[u8; SKYLINK_SIZE] {
        &self.0
    }

    /// Extracts a skylink from user input.
    ///
    /// Accepted forms:
    /// - `XABvi7Jt...` (base64), optionally prefixed with `sia:` or `sia://`
    /// - `bg06v2ti...` (base32)
    /// - `https://siasky.net/XABvi7Jt.../index.html` or `/XABvi7Jt...`
    /// - `https://bg06v2ti....siasky.net/`
    pub fn parse(input: &str) -> Result<Self, SkylinkError> {
        let trimmed = input.trim();
        let unprefixed = trimmed
            .strip_prefix(URI_SKYNET_PREFIX)
            .map(|rest| rest.trim_start_matches('/'))
            .unwrap_or(trimmed);

        if is_base64_token(unprefixed) {
            return Self::from_base64(unprefixed);
        }
        if is_base32_token(unprefixed) {
            return Self::from_base32(unprefixed);
        }

        if let Ok(url) = url::Url::parse(unprefixed) {
            if let Some(label) = url.host_str().and_then(|host| host.split('.').next())
                && is_base32_token(label)
            {
                return Self::from_base32(label);
            }
            if let Some(segment) = first_path_segment(url.path())
                && is_base64_token(segment)
            {
                return Self::from_base64(segment);
            }
        } else if let Some(segment) = first_path_segment(unprefixed)
            && is_base64_token(segment)
        {
            return Self::from_base64(segment);
        }

        Err(SkylinkError::Unrecognized(input.to_owned()))
    }

    fn from_base64(token: &str) -> Result<Self, SkylinkError> {
        let bytes = codec::decode_base64(token)?.unwrap_or_default();
        Self::from_bytes(&bytes)
    }

    fn from_base32(token: &str) -> Result<Self, SkylinkError> {
        let bytes = codec::decode_base32_hex(token)?.unwrap_or_default();
        Self::from_bytes(&bytes)
    }

    /// Canonical unpadded URL-safe base64 form.
    pub fn to_base64(&self) -> String {
        URL_SAFE_NO_PAD.encode(self.0)
    }

    /// Unpadded lowercase base32hex form, usable as a DNS label.
    pub fn to_base32(&self) -> String {
        // a skylink is never empty
        codec::encode_base32_hex(&self.0).unwrap_or_default()
    }

    /// URL serving this skylink from its own subdomain of `portal_host`.
    pub fn subdomain_url(&self, portal_host: &str) -> String {
        format!("https://{}.{}", self.to_base32(), portal_host)
    }
}

impl fmt::Display for Skylink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_base64())
    }
}

impl FromStr for Skylink {
    type Err = SkylinkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn first_path_segment(path: &str) -> Option<&str> {
    path.trim_start_matches('/')
        .split('/')
        .next()
        .filter(|segment| !segment.is_empty())
}

fn is_base64_token(s: &str) -> bool {
    s.len() == BASE64_SKYLINK_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_')
}

fn is_base32_token(s: &str) -> bool {
    s.len() == BASE32_SKYLINK_LEN
        && s
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b.to_ascii_lowercase(), b'a'..=b'v'))
}
