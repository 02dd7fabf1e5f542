//! Click event model for asynchronous click tracking.

use chrono::{DateTime, Utc};

use crate::domain::entities::{DIRECT_REFERRER, DeviceClass, NewClick};

/// Client metadata extracted from an inbound redirect request.
///
/// One adapter per transport normalizes into this type at the boundary; the
/// resolution engine never touches raw headers.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    /// Coarse geographic origin, best-effort (edge-provided header).
    pub country: Option<String>,
}

/// An in-memory click event passed from the redirect handler to the
/// background ledger writer via a bounded channel.
///
/// The redirect response is already determined before this is enqueued;
/// a full queue or a dead worker can only ever lose the event, never the
/// redirect.
#[derive(Debug, Clone)]
pub struct ClickEvent {
    pub code: String,
    pub clicked_at: DateTime<Utc>,
    pub referrer: Option<String>,
    pub user_agent: Option<String>,
    pub ip: Option<String>,
    pub country: Option<String>,
    pub device: DeviceClass,
    /// Owner identity denormalized from the link at resolve time.
    pub owner: Option<String>,
}

impl ClickEvent {
    /// Builds an event from the request context, deriving the device class
    /// from the User-Agent and stamping the current time.
    pub fn from_context(code: String, owner: Option<String>, ctx: &RequestContext) -> Self {
        Self {
            code,
            clicked_at: Utc::now(),
            referrer: ctx.referrer.clone(),
            user_agent: ctx.user_agent.clone(),
            ip: ctx.ip.clone(),
            country: ctx.country.clone(),
            device: DeviceClass::from_user_agent(ctx.user_agent.as_deref()),
            owner,
        }
    }

    /// Converts to the persistence shape, applying the referrer sentinel.
    pub fn into_new_click(self) -> NewClick {
        let referrer = match self.referrer {
            Some(r) if !r.is_empty() => r,
            _ => DIRECT_REFERRER.to_string(),
        };

        NewClick {
            code: self.code,
            clicked_at: self.clicked_at,
            referrer,
            user_agent: self.user_agent,
            ip: self.ip,
            country: self.country,
            device: self.device,
            owner: self.owner,
        }
    }
}
