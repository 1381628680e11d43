//! Authorization header parsing
//!
//! The storefront client sends the raw token (`Authorization: <token>`);
//! API clients tend to send `Authorization: Bearer <token>`. Both are accepted.

use http::{HeaderMap, header};

const BEARER_SCHEME: &str = "bearer";

/// Raw `Authorization` header value
///
/// Non-UTF-8 values are treated as absent.
pub fn authorization_header(headers: &HeaderMap) -> Option<&str> {
    headers.get(header::AUTHORIZATION)?.to_str().ok()
}

/// Extract the token from an `Authorization` header value
///
/// Returns `None` for empty values or a bare scheme without a token.
pub fn parse_authorization(value: &str) -> Option<&str> {
    let value = value.trim();

    let token = match value.split_once(' ') {
        Some((scheme, rest)) if scheme.eq_ignore_ascii_case(BEARER_SCHEME) => rest.trim(),
        _ if value.eq_ignore_ascii_case(BEARER_SCHEME) => return None,
        _ => value,
    };

    (!token.is_empty()).then_some(token)
}
