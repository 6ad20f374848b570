use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{Error, Result};

/// Key stored for an empty value.
pub const EMPTY_TOKEN: &str = ":";

// Form encoding: alphanumerics and these four marks pass through.
const KEY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'.')
    .remove(b'-')
    .remove(b'*')
    .remove(b'_');

/// Encode a value to its canonical key.
///
/// Values longer than `max_len` chars are cut at `max_len`. The result never
/// contains `/`, so a key is always a single node name.
pub fn encode_string(value: &str, max_len: usize) -> String {
    let value = truncate(value, max_len);
    if value.is_empty() {
        return EMPTY_TOKEN.to_string();
    }
    // '%' itself is escaped, so every "%20" in the output came from a space.
    utf8_percent_encode(value, KEY_ENCODE_SET)
        .to_string()
        .replace("%20", "+")
}

/// Decode a key back to the (possibly truncated) value.
pub fn decode_string(key: &str) -> Result<String> {
    if key == EMPTY_TOKEN {
        return Ok(String::new());
    }
    let plus_decoded = key.replace('+', " ");
    percent_decode_str(&plus_decoded)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| Error::InvalidKey(format!("'{}' is not valid UTF-8", key)))
}

fn truncate(value: &str, max_len: usize) -> &str {
    match value.char_indices().nth(max_len) {
        Some((idx, _)) => &value[..idx],
        None => value,
    }
}
