//! Handler for the per-link analytics endpoint.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde_json::json;

use crate::api::dto::analytics::{AnalyticsBreakdown, AnalyticsQuery, AnalyticsResponse};
use crate::api::middleware::auth::AuthContext;
use crate::error::AppError;
use crate::state::AppState;

/// Returns grouped click analytics for one of the owner's links.
///
/// # Endpoint
///
/// `GET /urls/analytics?short_code=abc123&window_days=30`
///
/// # Errors
///
/// - 400 when `short_code` is missing
/// - 403 when the link belongs to someone else
/// - 404 for unknown codes
pub async fn analytics_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<AnalyticsQuery>,
) -> Result<Json<AnalyticsResponse>, AppError> {
    let code = params
        .short_code
        .filter(|c| !c.is_empty())
        .ok_or_else(|| {
            AppError::bad_request("Short code is required", json!({ "field": "short_code" }))
        })?;

    let window_days = params.window_days.map(|d| d as i64);

    let (link, summary) = state
        .analytics_service
        .aggregate(&code, &auth.owner, window_days)
        .await?;

    Ok(Json(AnalyticsResponse {
        url: link.long_url,
        analytics: AnalyticsBreakdown::from(summary),
    }))
}
