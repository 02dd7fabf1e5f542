//! Destination URL canonicalization.
//!
//! Stored destinations always carry an explicit scheme; a scheme-less input
//! gets `https://` prepended before validation. The same canonicalization is
//! re-applied on the redirect path for legacy rows written before this rule.

use url::Url;

/// Errors that can occur during URL normalization.
#[derive(Debug, thiserror::Error)]
pub enum UrlNormalizationError {
    #[error("Invalid URL format: {0}")]
    InvalidFormat(String),

    #[error("Only HTTP and HTTPS protocols are allowed")]
    UnsupportedProtocol,
}

/// Prepends `https://` when the input lacks an explicit http(s) scheme.
///
/// This is a mandatory canonicalization step on the redirect path, applied
/// before the destination is returned in a `Location` header.
pub fn ensure_scheme(input: &str) -> String {
    if has_http_scheme(input) {
        input.to_string()
    } else {
        format!("https://{input}")
    }
}

fn has_http_scheme(input: &str) -> bool {
    let lower = input.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Non-hierarchical schemes that must never be https-promoted or stored.
const FORBIDDEN_SCHEMES: &[&str] = &["javascript", "data", "mailto", "file", "vbscript"];

/// Canonicalizes and validates a destination URL for storage.
///
/// Scheme-less inputs are promoted to HTTPS; anything that then fails to
/// parse as an HTTP(S) URL with a host is rejected. The path, query, and
/// original casing are preserved as given.
///
/// # Errors
///
/// Returns [`UrlNormalizationError::InvalidFormat`] for unparseable inputs.
/// Returns [`UrlNormalizationError::UnsupportedProtocol`] for explicit
/// non-HTTP(S) schemes like `javascript:` or `file:`.
pub fn normalize_destination(input: &str) -> Result<String, UrlNormalizationError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(UrlNormalizationError::InvalidFormat("empty URL".into()));
    }

    // An explicit non-http scheme is a rejection, not a candidate for
    // https-promotion ("javascript:alert(1)" must not become a link).
    // "host:port/path" inputs parse with the host in scheme position, so a
    // lone colon without "//" only rejects the known dangerous schemes.
    if let Some((scheme, _)) = trimmed.split_once(':') {
        let scheme = scheme.to_ascii_lowercase();
        if FORBIDDEN_SCHEMES.contains(&scheme.as_str())
            || (!has_http_scheme(trimmed) && trimmed.contains("://"))
        {
            return Err(UrlNormalizationError::UnsupportedProtocol);
        }
    }

    let candidate = ensure_scheme(trimmed);
    let parsed =
        Url::parse(&candidate).map_err(|e| UrlNormalizationError::InvalidFormat(e.to_string()))?;

    if parsed.host_str().is_none() {
        return Err(UrlNormalizationError::InvalidFormat(
            "URL has no host".into(),
        ));
    }

    Ok(candidate)
}
