//! Derives the WebSocket endpoint from the address of the hosting page.
//!
//! The socket always targets the page's own host, with `wss://` when the page
//! itself was served over `https` and `ws://` otherwise.

use serde::Deserialize;
use url::Url;

use crate::error::AppError;
use crate::Result;

/// How the page address is turned into a WebSocket URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum UrlMode {
    /// Fixed-offset prefix stripping, quirks included.
    #[default]
    Parity,
    /// Proper URL parsing; non-http(s) pages are rejected.
    Parsed,
}

/// Builds `scheme + host[:port] + "/" + suffix` from a page address.
///
/// Any path on the page address is discarded. Addresses that start with
/// neither `http` nor `https` are used as-is up to the first `/`, which for
/// relative or `file:` addresses yields a nonsense host.
pub fn appropriate_ws_url(page: &str, suffix: &str) -> String {
    let (scheme, rest) = if page.starts_with("https") {
        ("wss://", skip_chars(page, 8))
    } else if page.starts_with("http") {
        ("ws://", skip_chars(page, 7))
    } else {
        ("ws://", page)
    };

    let host = rest.split('/').next().unwrap_or_default();
    format!("{}{}/{}", scheme, host, suffix)
}

/// Like [`appropriate_ws_url`], but with a real URL parser.
pub fn parsed_ws_url(page: &str, suffix: &str) -> Result<Url> {
    let page_url = Url::parse(page)?;

    let scheme = match page_url.scheme() {
        "https" => "wss",
        "http" => "ws",
        other => {
            return Err(AppError::UrlError(format!(
                "page scheme '{}' cannot host a WebSocket",
                other
            )))
        }
    };

    let host = page_url
        .host_str()
        .ok_or_else(|| AppError::UrlError(format!("page address '{}' has no host", page)))?;

    let authority = match page_url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };

    let suffix = suffix.trim_start_matches('/');
    Ok(Url::parse(&format!("{}://{}/{}", scheme, authority, suffix))?)
}

/// Derives the endpoint in the given mode and validates it as a URL.
pub fn derive(mode: UrlMode, page: &str, suffix: &str) -> Result<Url> {
    match mode {
        UrlMode::Parity => {
            let raw = appropriate_ws_url(page, suffix);
            Url::parse(&raw)
                .map_err(|e| AppError::UrlError(format!("derived address '{}': {}", raw, e)))
        }
        UrlMode::Parsed => parsed_ws_url(page, suffix),
    }
}

fn skip_chars(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[idx..],
        None => "",
    }
}
