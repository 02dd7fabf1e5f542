//! Shared application state injected into all handlers.

use std::sync::Arc;

use sqlx::PgPool;
use tokio::sync::mpsc;

use crate::application::services::{AnalyticsService, AuthService, LinkService, ResolverService};
use crate::domain::click_event::ClickEvent;

/// Explicitly constructed at startup (or by tests) and cloned per request.
/// No module-level singletons; everything a handler touches hangs off here.
#[derive(Clone)]
pub struct AppState {
    pub link_service: Arc<LinkService>,
    pub resolver: Arc<ResolverService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub auth_service: Arc<AuthService>,
    /// Held for the health check; handlers enqueue through the resolver.
    pub click_tx: mpsc::Sender<ClickEvent>,
    /// `None` when running against in-memory repositories (tests).
    pub db: Option<Arc<PgPool>>,
    pub base_url: String,
    /// Trust X-Forwarded-For for client addresses. Enable only behind a
    /// trusted reverse proxy.
    pub behind_proxy: bool,
}
