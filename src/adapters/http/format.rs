//! Request format negotiation.
//!
//! The format is decided once per request by the responder middleware and
//! stored in request extensions; the `Format` extractor reads it back.

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts, HeaderMap, Uri};

use crate::domain::foundation::RequestFormat;

/// Negotiates the format from the path extension, then the `Accept` header.
///
/// - `.json` path extension, or `application/json` as the first accepted
///   type: JSON
/// - no `Accept` header, or one listing `text/html` or `*/*`: navigational
/// - anything else: other
pub fn negotiate(uri: &Uri, headers: &HeaderMap) -> RequestFormat {
    let path = uri.path();
    if path.ends_with(".json") {
        return RequestFormat::Json;
    }
    if path.ends_with(".html") {
        return RequestFormat::Navigational;
    }

    let accept = headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty());

    let Some(accept) = accept else {
        return RequestFormat::Navigational;
    };

    let media_types: Vec<String> = accept
        .split(',')
        .filter_map(|range| range.split(';').next())
        .map(|media| media.trim().to_ascii_lowercase())
        .filter(|media| !media.is_empty())
        .collect();

    match media_types.first().map(String::as_str) {
        None => RequestFormat::Navigational,
        Some("application/json") => RequestFormat::Json,
        Some(_) if media_types.iter().any(|m| m == "text/html" || m == "*/*") => {
            RequestFormat::Navigational
        }
        Some(_) => RequestFormat::Other,
    }
}

/// Returns true for requests issued by scripts (`X-Requested-With: XMLHttpRequest`).
pub fn is_xhr(headers: &HeaderMap) -> bool {
    headers
        .get("X-Requested-With")
        .and_then(|v| v.to_str().ok())
        .map(|v| v.eq_ignore_ascii_case("XMLHttpRequest"))
        .unwrap_or(false)
}

/// Extractor for the negotiated request format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Format(pub RequestFormat);

impl Format {
    /// Format of a request, preferring the value stored by the responder.
    pub fn of(parts: &Parts) -> RequestFormat {
        parts
            .extensions
            .get::<RequestFormat>()
            .copied()
            .unwrap_or_else(|| negotiate(&parts.uri, &parts.headers))
    }
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for Format
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Format(Format::of(parts)))
    }
}
