//! DTOs for the owner link listing endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::domain::entities::Link;

/// Listing query parameters.
///
/// `limit` arrives as a query-string integer; `next_token` is the opaque
/// continuation token from the previous page, passed back verbatim.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub limit: Option<u32>,

    pub next_token: Option<String>,
}

impl ListQuery {
    /// Validates and resolves the page size.
    ///
    /// Default 25, bounds 1-100.
    pub fn validated_limit(&self) -> Result<i64, String> {
        let limit = self.limit.unwrap_or(25);
        if !(1..=100).contains(&limit) {
            return Err("limit must be between 1 and 100".to_string());
        }
        Ok(limit as i64)
    }
}

/// One link in a listing.
#[derive(Debug, Serialize)]
pub struct LinkSummary {
    pub short_code: String,
    pub short_url: String,
    pub long_url: String,
    pub status: String,
    pub usage_count: i64,
    pub creation_date: DateTime<Utc>,
}

impl LinkSummary {
    pub fn from_link(link: &Link, short_url: String) -> Self {
        Self {
            short_code: link.code.clone(),
            short_url,
            long_url: link.long_url.clone(),
            status: link.status.as_str().to_string(),
            usage_count: link.usage_count,
            creation_date: link.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PaginationMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ListResponse {
    pub urls: Vec<LinkSummary>,
    pub count: usize,
    pub pagination: PaginationMeta,
}
