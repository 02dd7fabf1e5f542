//! Permissive cross-origin headers.

use axum::http::{HeaderName, Method, header};
use tower_http::cors::{Any, CorsLayer};

/// CORS layer applied to every response.
///
/// The interface contract is deliberately permissive: any origin, the three
/// methods the API uses, and the headers a browser client sends.
pub fn layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-api-key"),
        ])
}
