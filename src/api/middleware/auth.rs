//! Credential-resolution middleware for write endpoints.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use serde_json::json;

use crate::{error::AppError, state::AppState};

/// Header carrying a raw API credential (the non-bearer transport).
pub const API_KEY_HEADER: &str = "x-api-key";

/// The verified principal attached to an authenticated request.
///
/// Handlers compare it for equality and thread it into created rows; its
/// internal structure is never interpreted.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub owner: String,
    /// HMAC of the credential the request authenticated with. Stored on
    /// created links as the creating credential; the raw key is never kept.
    pub credential_hash: String,
}

/// Resolves the request credential to an owner identity.
///
/// # Credential Transports
///
/// Checked in order:
/// 1. `Authorization: Bearer <credential>`
/// 2. `x-api-key: <credential>`
///
/// # Errors
///
/// - 401 when neither header is present
/// - 403 when a credential is present but unknown or revoked
pub async fn layer(
    State(st): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let credential = bearer_token(req.headers())
        .or_else(|| api_key(req.headers()))
        .ok_or_else(|| {
            AppError::unauthorized(
                "Authentication required",
                json!({ "reason": "no bearer token or x-api-key header" }),
            )
        })?;

    let owner = st
        .auth_service
        .resolve_owner(&credential)
        .await?
        .ok_or_else(|| {
            AppError::forbidden(
                "API key is not valid",
                json!({ "reason": "unknown or revoked credential" }),
            )
        })?;

    let credential_hash = st.auth_service.hash_credential(&credential);
    req.extensions_mut().insert(AuthContext {
        owner,
        credential_hash,
    });

    Ok(next.run(req).await)
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn api_key(headers: &HeaderMap) -> Option<String> {
    headers
        .get(API_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
