//! API route configuration.

use crate::api::handlers::{analytics_handler, list_links_handler, shorten_handler};
use crate::state::AppState;
use axum::{
    Router,
    routing::{get, post},
};

/// Routes requiring a resolved owner identity.
///
/// # Endpoints
///
/// - `POST /urls`           - Create a short link
/// - `GET  /urls`           - List the owner's links (paginated)
/// - `GET  /urls/analytics` - Grouped click analytics for one link
pub fn protected_routes() -> Router<AppState> {
    Router::new()
        .route("/urls", post(shorten_handler).get(list_links_handler))
        .route("/urls/analytics", get(analytics_handler))
}
