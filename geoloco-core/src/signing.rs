//! URL signing for providers that authenticate requests with a shared secret
//!
//! The secret is handed out as URL-safe base64. The signature is an
//! HMAC-SHA1 over `path?query`, encoded back to URL-safe base64 and
//! appended as the last query parameter. It has to match the provider's
//! own computation byte for byte.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig, URL_SAFE};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::error::{Error, Result};

type HmacSha1 = Hmac<Sha1>;

// Keys are not always padded or canonically encoded
const KEY_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_decode_padding_mode(DecodePaddingMode::RequireNone)
        .with_decode_allow_trailing_bits(true),
);

/// Decode a URL-safe base64 secret into raw key bytes
///
/// Decoding is forgiving: characters outside the alphabet are skipped,
/// everything from the first `=` on is ignored and a lone trailing
/// character that cannot form a byte is dropped.
fn decode_key(key: &str) -> Result<Vec<u8>> {
    let mut standard: String = key
        .chars()
        .take_while(|&c| c != '=')
        .filter_map(|c| match c {
            '-' => Some('+'),
            '_' => Some('/'),
            c if c.is_ascii_alphanumeric() || c == '+' || c == '/' => Some(c),
            _ => None,
        })
        .collect();

    if standard.len() % 4 == 1 {
        standard.pop();
    }

    Ok(KEY_ENGINE.decode(standard)?)
}

/// Signature of `path_query` under `key`, URL-safe base64 with padding
pub fn signature(path_query: &str, key: &str) -> Result<String> {
    let decoded = decode_key(key)?;

    let mut mac = HmacSha1::new_from_slice(&decoded).map_err(|_| Error::KeyLength)?;
    mac.update(path_query.as_bytes());

    Ok(URL_SAFE.encode(mac.finalize().into_bytes()))
}

/// Full signed URL: `host + path + "?" + query + "&signature=" + sig`
pub fn signed_url(host: &str, path: &str, query: &str, key: &str) -> Result<String> {
    let path_query = format!("{}?{}", path, query);
    let signature = signature(&path_query, key)?;
    Ok(format!("{}{}&signature={}", host, path_query, signature))
}
