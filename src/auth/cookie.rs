//! Access token extraction from a browser session cookie
//!
//! A logged-in browser keeps a signed request in an `fbsr_<app id>` cookie:
//! `<signature>.<base64 payload>`. The payload is a JSON object whose
//! `oauth_token` field is a user access token usable against the Graph API.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::Value;

/// Name prefix of the signed request cookie
pub const SIGNED_REQUEST_COOKIE_PREFIX: &str = "fbsr";

/// Extract the access token from a `Cookie` header value
///
/// Accepts the raw `document.cookie` string (`name=value; name=value`).
pub fn token_from_cookie(cookie_header: &str) -> Result<String> {
    let value = cookie_header
        .split(';')
        .map(str::trim)
        .find(|entry| entry.starts_with(SIGNED_REQUEST_COOKIE_PREFIX))
        .and_then(|entry| entry.split_once('=').map(|(_, v)| v))
        .ok_or_else(|| Error::auth("no signed request cookie found, are you logged in?"))?;

    let payload = value
        .split('.')
        .nth(1)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| Error::auth("signed request cookie has no payload segment"))?;

    let decoded = decode_segment(payload)?;
    let json: Value = serde_json::from_slice(&decoded)?;

    json.get("oauth_token")
        .and_then(Value::as_str)
        .filter(|t| !t.is_empty())
        .map(String::from)
        .ok_or_else(|| Error::auth("signed request payload has no oauth_token"))
}

/// Decode a base64 segment in either alphabet, padding optional
fn decode_segment(segment: &str) -> Result<Vec<u8>> {
    let normalized: String = segment
        .trim_end_matches('=')
        .chars()
        .map(|c| match c {
            '+' => '-',
            '/' => '_',
            other => other,
        })
        .collect();

    URL_SAFE_NO_PAD
        .decode(normalized)
        .map_err(|e| Error::auth(format!("invalid base64 in cookie payload: {e}")))
}
