//! Click entity representing a single redirect event.

use chrono::{DateTime, Utc};

/// Referrer sentinel stored when the client sent none.
pub const DIRECT_REFERRER: &str = "Direct";

/// Coarse device classification derived from the User-Agent string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    Desktop,
    Mobile,
    Unknown,
}

impl DeviceClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeviceClass::Desktop => "desktop",
            DeviceClass::Mobile => "mobile",
            DeviceClass::Unknown => "unknown",
        }
    }

    pub fn from_str_lossy(s: &str) -> Self {
        match s {
            "desktop" => DeviceClass::Desktop,
            "mobile" => DeviceClass::Mobile,
            _ => DeviceClass::Unknown,
        }
    }

    /// Classifies a User-Agent by case-insensitive substring scan.
    ///
    /// Tie-break order is a contract: the mobile tokens are checked first,
    /// then the `desktop` token, else `unknown`. A UA containing both kinds
    /// of token classifies as mobile.
    pub fn from_user_agent(user_agent: Option<&str>) -> Self {
        const MOBILE_TOKENS: &[&str] = &["mobile", "android", "iphone", "ipad"];

        let Some(ua) = user_agent else {
            return DeviceClass::Unknown;
        };
        let ua = ua.to_ascii_lowercase();

        if MOBILE_TOKENS.iter().any(|t| ua.contains(t)) {
            DeviceClass::Mobile
        } else if ua.contains("desktop") {
            DeviceClass::Desktop
        } else {
            DeviceClass::Unknown
        }
    }
}

/// One immutable record of a redirect, keyed by `(code, clicked_at)`.
///
/// Owner identity is denormalized from the link at write time so analytics
/// queries never join back to the link table.
#[derive(Debug, Clone)]
pub struct Click {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
    pub referrer: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub country: Option<String>,
    pub device: DeviceClass,
    pub owner: Option<String>,
}

/// Input data for appending a click to the ledger.
#[derive(Debug, Clone)]
pub struct NewClick {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
    pub referrer: String,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub country: Option<String>,
    pub device: DeviceClass,
    pub owner: Option<String>,
}
