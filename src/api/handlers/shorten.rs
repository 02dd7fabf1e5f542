//! Handler for the link creation endpoint.

use axum::{Extension, Json, extract::State};
use validator::Validate;

use crate::api::dto::shorten::{ShortenRequest, ShortenResponse};
use crate::api::middleware::auth::AuthContext;
use crate::error::AppError;
use crate::state::AppState;

/// Creates a short link for a long URL.
///
/// # Endpoint
///
/// `POST /urls`
///
/// # Request Body
///
/// ```json
/// {
///   "long_url": "https://example.com/some/long/path",
///   "custom_code": "promo2026"
/// }
/// ```
///
/// # Errors
///
/// - 400 for a missing or unusable URL
/// - 409 when the custom code is taken
/// - 500 when the random code space is exhausted after bounded retries
pub async fn shorten_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Json(payload): Json<ShortenRequest>,
) -> Result<Json<ShortenResponse>, AppError> {
    payload.validate()?;

    let link = state
        .link_service
        .create_link(
            &payload.long_url,
            auth.owner,
            auth.credential_hash,
            payload.custom_code,
        )
        .await?;

    Ok(Json(ShortenResponse {
        short_url: state.link_service.short_url(&link.code),
        short_code: link.code,
        long_url: link.long_url,
        creation_date: link.created_at,
    }))
}
