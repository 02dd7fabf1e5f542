//! Landing page handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::State;

use crate::state::AppState;

/// Minimal HTML landing page.
#[derive(Template, WebTemplate)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    version: &'static str,
    base_url: String,
}

/// # Endpoint
///
/// `GET /`
pub async fn home_handler(State(state): State<AppState>) -> IndexTemplate {
    IndexTemplate {
        version: env!("CARGO_PKG_VERSION"),
        base_url: state.base_url.clone(),
    }
}
