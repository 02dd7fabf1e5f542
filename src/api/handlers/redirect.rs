//! Handler for short URL redirect - the hot path.

use axum::{
    extract::{ConnectInfo, OriginalUri, Path, State},
    http::{HeaderMap, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::net::SocketAddr;

use crate::domain::click_event::RequestContext;
use crate::error::AppError;
use crate::state::AppState;
use crate::utils::short_code;

/// Redirects a short code to its canonical destination.
///
/// # Endpoint
///
/// `GET /{code}`
///
/// # Request Flow
///
/// 1. Extract the short code (path param, then raw path, then outer path)
/// 2. Resolve: lookup, status check, atomic counter increment
/// 3. Enqueue a click event (fire-and-forget)
/// 4. Return `301 Moved Permanently` with the `Location` header
///
/// # Errors
///
/// - 400 when no candidate yields a code
/// - 403 for deactivated links
/// - 404 for unknown codes
pub async fn redirect_handler(
    path: Option<Path<String>>,
    OriginalUri(original_uri): OriginalUri,
    State(state): State<AppState>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    uri: Uri,
) -> Result<Response, AppError> {
    let code = short_code::extract(
        path.as_ref().map(|p| p.0.as_str()),
        uri.path(),
        Some(original_uri.path()),
    )
    .ok_or_else(|| AppError::bad_request("Short code is required", json!({})))?;

    let ctx = request_context(&headers, addr, state.behind_proxy);

    let destination = state.resolver.resolve(&code, &ctx).await?;

    Ok((StatusCode::MOVED_PERMANENTLY, [(header::LOCATION, destination)]).into_response())
}

/// Normalizes transport metadata into the uniform request context.
fn request_context(headers: &HeaderMap, addr: SocketAddr, behind_proxy: bool) -> RequestContext {
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string())
    };

    let ip = if behind_proxy {
        forwarded_for(headers).unwrap_or_else(|| addr.ip().to_string())
    } else {
        addr.ip().to_string()
    };

    RequestContext {
        referrer: header_str(header::REFERER),
        user_agent: header_str(header::USER_AGENT),
        ip: Some(ip),
        country: viewer_country(headers),
    }
}

fn forwarded_for(headers: &HeaderMap) -> Option<String> {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Coarse geographic origin, best-effort from edge-provided headers.
fn viewer_country(headers: &HeaderMap) -> Option<String> {
    ["cloudfront-viewer-country", "cf-ipcountry"]
        .iter()
        .find_map(|name| headers.get(*name))
        .and_then(|v| v.to_str().ok())
        .map(|v| v.to_string())
        .filter(|v| !v.is_empty())
}
