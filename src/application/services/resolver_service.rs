//! Resolution engine - the redirect hot path.

use std::sync::Arc;

use serde_json::json;
use tokio::sync::mpsc;

use crate::domain::click_event::{ClickEvent, RequestContext};
use crate::domain::repositories::LinkRepository;
use crate::error::AppError;
use crate::utils::url_normalizer::ensure_scheme;

/// Resolves short codes to canonical destinations.
///
/// Holds explicitly injected handles; no module-level state. The click-event
/// hand-off is a `try_send` on a bounded channel: a full queue or a dead
/// worker loses the event, never the redirect.
pub struct ResolverService {
    links: Arc<dyn LinkRepository>,
    click_tx: mpsc::Sender<ClickEvent>,
}

impl ResolverService {
    pub fn new(links: Arc<dyn LinkRepository>, click_tx: mpsc::Sender<ClickEvent>) -> Self {
        Self { links, click_tx }
    }

    /// Resolves a code to its redirect destination.
    ///
    /// Lookup, status check, atomic counter increment, scheme
    /// canonicalization, then a fire-and-forget click event. The destination
    /// is fully determined before the event is enqueued.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown code
    /// - [`AppError::Forbidden`] - link is deactivated (counter untouched)
    /// - [`AppError::Internal`] - store failure on lookup or increment
    pub async fn resolve(&self, code: &str, ctx: &RequestContext) -> Result<String, AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short code not found", json!({ "code": code })))?;

        if !link.is_active() {
            return Err(AppError::forbidden(
                "This link is inactive",
                json!({ "code": code }),
            ));
        }

        if self.links.increment_usage(code).await?.is_none() {
            // Links are never physically deleted, so a vanished row between
            // lookup and increment means operator surgery. Still serve it.
            tracing::warn!(code, "link disappeared between lookup and increment");
        }

        let destination = ensure_scheme(&link.long_url);

        let event = ClickEvent::from_context(code.to_string(), link.owner.clone(), ctx);
        if let Err(e) = self.click_tx.try_send(event) {
            tracing::warn!(code, error = %e, "failed to enqueue click event");
            metrics::counter!("clicks_dropped").increment(1);
        }

        Ok(destination)
    }
}
