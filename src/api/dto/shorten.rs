//! DTOs for the link creation endpoint.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request to shorten a URL.
///
/// `long_url` may omit the scheme; it is canonicalized to HTTPS before
/// storage. `custom_code` bypasses random generation and conflicts with 409.
#[derive(Debug, Deserialize, Validate)]
pub struct ShortenRequest {
    #[serde(default)]
    #[validate(length(min = 1, max = 2048, message = "Long URL is required"))]
    pub long_url: String,

    pub custom_code: Option<String>,
}

/// Response for a created link.
#[derive(Debug, Serialize)]
pub struct ShortenResponse {
    pub short_url: String,
    pub short_code: String,
    pub long_url: String,
    pub creation_date: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_request() {
        let req: ShortenRequest =
            serde_json::from_str(r#"{"long_url": "https://example.com"}"#).unwrap();
        assert_eq!(req.long_url, "https://example.com");
        assert!(req.custom_code.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_empty_long_url_fails_validation() {
        let req: ShortenRequest = serde_json::from_str(r#"{"long_url": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_missing_long_url_fails_validation() {
        // Defaults to empty so the 400 comes from validation, not a
        // deserialization rejection.
        let req: ShortenRequest = serde_json::from_str("{}").unwrap();
        assert!(req.validate().is_err());
    }
}
