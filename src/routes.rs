//! Top-level router configuration.
//!
//! # Route Structure
//!
//! - `GET  /`               - HTML landing page (public)
//! - `GET  /health`         - Health check: DB, click queue (public)
//! - `GET  /{code}`         - Short link redirect (public)
//! - `POST /urls`           - Create a short link (credential required)
//! - `GET  /urls`           - List owner links (credential required)
//! - `GET  /urls/analytics` - Click analytics (credential required, owner-only)
//!
//! # Middleware
//!
//! - **CORS** - permissive cross-origin headers on every response
//! - **Tracing** - structured request/response logging
//! - **Rate limiting** - per-IP token bucket, stricter on write endpoints
//! - **Authentication** - bearer token or x-api-key resolved to an owner
//! - **Path normalization** - trailing slash handling

use crate::api;
use crate::api::handlers::{health_handler, home_handler, redirect_handler};
use crate::api::middleware::{auth, cors, rate_limit, tracing};
use crate::state::AppState;
use axum::routing::get;
use axum::{Router, middleware};
use tower::Layer;
use tower_http::normalize_path::{NormalizePath, NormalizePathLayer};

/// Constructs the route tree with all middleware except path normalization.
///
/// Static routes (`/urls`, `/health`) win over the `/{code}` capture, so a
/// short code can never shadow an API path.
pub fn router(state: AppState) -> Router {
    let api_router = api::routes::protected_routes()
        .route_layer(middleware::from_fn_with_state(state.clone(), auth::layer))
        .layer(rate_limit::secure_layer());

    let redirect_router = Router::new()
        .route("/{code}", get(redirect_handler))
        .layer(rate_limit::layer());

    Router::new()
        .route("/", get(home_handler))
        .route("/health", get(health_handler))
        .merge(api_router)
        .merge(redirect_router)
        .with_state(state)
        .layer(tracing::layer())
        .layer(cors::layer())
}

/// The full application service: routes plus trailing-slash normalization.
pub fn app_router(state: AppState) -> NormalizePath<Router> {
    NormalizePathLayer::trim_trailing_slash().layer(router(state))
}
