//! Handler for the owner link listing endpoint.

use axum::{
    Extension, Json,
    extract::{Query, State},
};
use serde_json::json;

use crate::api::dto::links::{LinkSummary, ListQuery, ListResponse, PaginationMeta};
use crate::api::middleware::auth::AuthContext;
use crate::error::AppError;
use crate::state::AppState;

/// Lists the authenticated owner's links, newest first.
///
/// # Endpoint
///
/// `GET /urls?limit=25&next_token=...`
///
/// The continuation token is opaque; pass it back verbatim to fetch the next
/// page. Its absence in a response means the listing is exhausted.
pub async fn list_links_handler(
    State(state): State<AppState>,
    Extension(auth): Extension<AuthContext>,
    Query(params): Query<ListQuery>,
) -> Result<Json<ListResponse>, AppError> {
    let limit = params
        .validated_limit()
        .map_err(|e| AppError::bad_request(e, json!({ "field": "limit" })))?;

    let (links, next_token) = state
        .link_service
        .list_links(&auth.owner, limit, params.next_token.as_deref())
        .await?;

    let urls: Vec<LinkSummary> = links
        .iter()
        .map(|link| LinkSummary::from_link(link, state.link_service.short_url(&link.code)))
        .collect();

    Ok(Json(ListResponse {
        count: urls.len(),
        urls,
        pagination: PaginationMeta { next_token },
    }))
}
