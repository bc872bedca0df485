//! Share tokens.
//!
//! A token is the base64 (URL-safe alphabet, no padding) encoding of the
//! JSON object `{ html, css, js }`. Decoding also accepts the standard
//! alphabet and padding, and is lenient about missing fields, which default
//! to empty strings. Anything else that does not match the shape is an error.

use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde_json::{Map, Value};
use thiserror::Error;
use url::Url;

use crate::buffer::{Buffers, Language};

/// Default query parameter carrying the token.
pub const DEFAULT_PARAM: &str = "code";

/// Share decoding errors.
#[derive(Debug, Error)]
pub enum ShareError {
    #[error("share token is empty")]
    Empty,

    #[error("share token is not valid base64")]
    Encoding(#[from] base64::DecodeError),

    #[error("share token is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("share payload is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("share payload must be a JSON object")]
    NotAnObject,

    #[error("share field `{0}` must be a string")]
    Field(&'static str),

    #[error("invalid share link")]
    Url(#[from] url::ParseError),

    #[error("share link has no `{0}` parameter")]
    MissingParam(String),
}

/// Encode buffers into a URL-safe token.
pub fn encode_share(buffers: &Buffers) -> String {
    let payload = serde_json::json!({
        "html": buffers.html,
        "css": buffers.css,
        "js": buffers.js,
    });
    URL_SAFE_NO_PAD.encode(payload.to_string())
}

/// Decode a token produced by [`encode_share`].
pub fn decode_share(token: &str) -> Result<Buffers, ShareError> {
    let token = token.trim().trim_end_matches('=');
    if token.is_empty() {
        return Err(ShareError::Empty);
    }

    let bytes = if token.contains(['+', '/']) {
        STANDARD_NO_PAD.decode(token)?
    } else {
        URL_SAFE_NO_PAD.decode(token)?
    };
    let text = String::from_utf8(bytes)?;

    let Value::Object(fields) = serde_json::from_str::<Value>(&text)? else {
        return Err(ShareError::NotAnObject);
    };

    Ok(Buffers {
        html: field(&fields, Language::Html)?,
        css: field(&fields, Language::Css)?,
        js: field(&fields, Language::Js)?,
    })
}

fn field(fields: &Map<String, Value>, language: Language) -> Result<String, ShareError> {
    match fields.get(language.name()) {
        None | Some(Value::Null) => Ok(String::new()),
        Some(Value::String(text)) => Ok(text.clone()),
        Some(_) => Err(ShareError::Field(language.name())),
    }
}

/// Link to `base` carrying the share token in `param`.
///
/// An existing `param` on `base` is replaced; other query pairs are kept.
pub fn share_url(base: &Url, param: &str, buffers: &Buffers) -> Url {
    let kept: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != param)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &kept {
            pairs.append_pair(key, value);
        }
        pairs.append_pair(param, &encode_share(buffers));
    }
    url
}

/// Extract the share token from a link.
pub fn token_from_url(link: &str, param: &str) -> Result<String, ShareError> {
    let url = Url::parse(link)?;
    url.query_pairs()
        .find(|(key, _)| key == param)
        .map(|(_, value)| value.into_owned())
        .ok_or_else(|| ShareError::MissingParam(param.to_string()))
}

// =============================================================================
// Tests
// =============================================================================
