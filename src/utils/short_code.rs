//! Short-code extraction from inbound redirect requests.
//!
//! Deployments put this service behind different front doors (direct, nested
//! router, reverse proxy rewriting paths), so the code can arrive in several
//! shapes. The fallback order below is a documented, tested contract:
//!
//! 1. explicit path-parameter binding
//! 2. raw request path with the leading slash stripped
//! 3. outer (pre-nesting) request path
//!
//! The first non-empty candidate wins. Changing this order changes which
//! deployments break; do not reorder.

/// Extracts the short code from transport-shaped candidates, in order.
pub fn extract(path_param: Option<&str>, raw_path: &str, outer_path: Option<&str>) -> Option<String> {
    let candidates = [
        path_param.unwrap_or(""),
        raw_path.trim_start_matches('/'),
        outer_path.unwrap_or("").trim_start_matches('/'),
    ];

    candidates
        .into_iter()
        .find(|c| !c.is_empty())
        .map(|c| c.to_string())
}
