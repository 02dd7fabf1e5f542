//! Link creation and listing service.

use std::sync::Arc;

use serde_json::json;

use crate::domain::entities::{Link, NewLink};
use crate::domain::repositories::{CreateOutcome, LinkRepository};
use crate::error::AppError;
use crate::utils::code_generator::{generate_code, validate_custom_code};
use crate::utils::cursor;
use crate::utils::url_normalizer::normalize_destination;

/// Service for creating and listing shortened links.
///
/// Owns the bounded collision-retry loop for random codes. The repository's
/// conditional insert is the uniqueness enforcement point; this service only
/// decides what to do when it reports `AlreadyExists`.
pub struct LinkService {
    links: Arc<dyn LinkRepository>,
    base_url: String,
    code_length: usize,
    max_attempts: usize,
}

impl LinkService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        base_url: String,
        code_length: usize,
        max_attempts: usize,
    ) -> Self {
        Self {
            links,
            base_url,
            code_length,
            max_attempts,
        }
    }

    /// Creates a short link for a destination URL.
    ///
    /// # Code Selection
    ///
    /// - With `custom_code`: validated, checked for existence (fast path),
    ///   then conditionally inserted. A collision is a [`AppError::Conflict`]
    ///   and is never retried - the caller picked the code.
    /// - Without: a fresh random code is generated and conditionally inserted,
    ///   retrying on collision up to the configured attempt bound, after
    ///   which creation fails with [`AppError::Capacity`].
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for unusable destination URLs.
    pub async fn create_link(
        &self,
        long_url: &str,
        owner: String,
        credential: String,
        custom_code: Option<String>,
    ) -> Result<Link, AppError> {
        let destination = normalize_destination(long_url).map_err(|e| {
            AppError::bad_request("Invalid URL format", json!({ "reason": e.to_string() }))
        })?;

        if let Some(custom) = custom_code {
            return self
                .create_with_custom_code(destination, owner, credential, custom)
                .await;
        }

        self.create_with_random_code(destination, owner, credential)
            .await
    }

    async fn create_with_custom_code(
        &self,
        destination: String,
        owner: String,
        credential: String,
        custom: String,
    ) -> Result<Link, AppError> {
        validate_custom_code(&custom)?;

        // Fast-path rejection for latency; the conditional insert below is
        // still the enforcement point for the check-then-insert race.
        if self.links.find_by_code(&custom).await?.is_some() {
            return Err(AppError::conflict(
                "Custom code already exists",
                json!({ "code": custom }),
            ));
        }

        let new_link = NewLink {
            code: custom.clone(),
            long_url: destination,
            owner: Some(owner),
            credential,
        };

        match self.links.create(new_link).await? {
            CreateOutcome::Created(link) => {
                metrics::counter!("links_created").increment(1);
                Ok(link)
            }
            CreateOutcome::AlreadyExists => Err(AppError::conflict(
                "Custom code already exists",
                json!({ "code": custom }),
            )),
        }
    }

    async fn create_with_random_code(
        &self,
        destination: String,
        owner: String,
        credential: String,
    ) -> Result<Link, AppError> {
        for attempt in 0..self.max_attempts {
            let code = generate_code(self.code_length);

            let new_link = NewLink {
                code,
                long_url: destination.clone(),
                owner: Some(owner.clone()),
                credential: credential.clone(),
            };

            match self.links.create(new_link).await? {
                CreateOutcome::Created(link) => {
                    metrics::counter!("links_created").increment(1);
                    return Ok(link);
                }
                CreateOutcome::AlreadyExists => {
                    tracing::warn!(attempt, "short code collision, retrying");
                    metrics::counter!("code_collisions").increment(1);
                }
            }
        }

        Err(AppError::capacity(
            "Failed to allocate a unique short code",
            json!({ "attempts": self.max_attempts, "code_length": self.code_length }),
        ))
    }

    /// Lists an owner's links, newest first, with an opaque continuation
    /// token when more pages remain.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::Validation`] for an undecodable `next_token`.
    pub async fn list_links(
        &self,
        owner: &str,
        limit: i64,
        next_token: Option<&str>,
    ) -> Result<(Vec<Link>, Option<String>), AppError> {
        let after = next_token.map(cursor::decode).transpose()?;

        // Fetch one extra row to know whether a next page exists without a
        // second count query.
        let mut links = self.links.list_by_owner(owner, limit + 1, after).await?;

        let token = if links.len() as i64 > limit {
            links.truncate(limit as usize);
            links.last().map(|l| cursor::encode(l.id))
        } else {
            None
        };

        Ok((links, token))
    }

    /// Constructs the public short URL for a code.
    pub fn short_url(&self, code: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), code)
    }
}
