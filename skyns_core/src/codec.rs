//! Text encodings used for skylinks.
//!
//! Skylinks are published as unpadded base64 (URL-safe alphabet) and, for
//! subdomain access on a portal, as unpadded lowercase base32hex
//! (RFC 4648 "extended hex" alphabet). Empty input is not an error for
//! either direction; it simply has no value.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use data_encoding::BASE32HEX_NOPAD;

#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum CodecError {
    #[error("invalid base64 input: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("invalid base32 input: {0}")]
    Base32(#[from] data_encoding::DecodeError),
}

/// Decodes a base64 string, padding it with `=` up to the next multiple of 4.
///
/// Both the standard (`+`, `/`) and the URL-safe (`-`, `_`) alphabets are
/// accepted. Returns `Ok(None)` for empty input.
pub fn decode_base64(input: &str) -> Result<Option<Vec<u8>>, CodecError> {
    if input.is_empty() {
        return Ok(None);
    }

    let padding = (4 - input.len() % 4) % 4;
    let mut normalized = String::with_capacity(input.len() + padding);
    normalized.extend(input.chars().map(|c| match c {
        '-' => '+',
        '_' => '/',
        c => c,
    }));
    normalized.extend(std::iter::repeat_n('=', padding));

    Ok(Some(STANDARD.decode(normalized)?))
}

/// Encodes bytes as padded standard base64.
pub fn encode_base64_padded(input: &[u8]) -> String {
    STANDARD.encode(input)
}

/// Encodes bytes as unpadded, lowercase base32hex. Returns `None` for empty input.
pub fn encode_base32_hex(input: &[u8]) -> Option<String> {
    if input.is_empty() {
        return None;
    }
    Some(BASE32HEX_NOPAD.encode(input).to_lowercase())
}

/// Decodes unpadded base32hex in either case. Returns `Ok(None)` for empty input.
pub fn decode_base32_hex(input: &str) -> Result<Option<Vec<u8>>, CodecError> {
    if input.is_empty() {
        return Ok(None);
    }
    let upper = input.to_ascii_uppercase();
    Ok(Some(BASE32HEX_NOPAD.decode(upper.as_bytes())?))
}
