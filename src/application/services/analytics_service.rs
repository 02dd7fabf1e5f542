//! Click analytics aggregation service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Duration, Utc};
use serde_json::json;

use crate::domain::entities::{Click, DIRECT_REFERRER, Link};
use crate::domain::repositories::{ClickRepository, LinkRepository};
use crate::error::AppError;

/// Country bucket for events with no geographic origin.
pub const UNKNOWN_COUNTRY: &str = "Unknown";

/// Grouped click summaries for one link over a time window.
///
/// Maps are category value to count; no ordering is promised.
#[derive(Debug, Clone, Default)]
pub struct AnalyticsSummary {
    pub total: u64,
    pub referrers: HashMap<String, u64>,
    pub countries: HashMap<String, u64>,
    pub devices: HashMap<String, u64>,
    pub daily: HashMap<String, u64>,
}

impl AnalyticsSummary {
    fn add(&mut self, click: &Click) {
        self.total += 1;

        let referrer = if click.referrer.is_empty() {
            DIRECT_REFERRER
        } else {
            click.referrer.as_str()
        };
        *self.referrers.entry(referrer.to_string()).or_default() += 1;

        let country = match click.country.as_deref() {
            Some(c) if !c.is_empty() => c,
            _ => UNKNOWN_COUNTRY,
        };
        *self.countries.entry(country.to_string()).or_default() += 1;

        *self
            .devices
            .entry(click.device.as_str().to_string())
            .or_default() += 1;

        let day = click.clicked_at.date_naive().to_string();
        *self.daily.entry(day).or_default() += 1;
    }
}

/// Service producing per-link analytics from the click ledger.
///
/// Reads a time-windowed ledger slice and groups it in memory; only the
/// link's owner may query it.
pub struct AnalyticsService {
    links: Arc<dyn LinkRepository>,
    clicks: Arc<dyn ClickRepository>,
    default_window_days: i64,
}

impl AnalyticsService {
    pub fn new(
        links: Arc<dyn LinkRepository>,
        clicks: Arc<dyn ClickRepository>,
        default_window_days: i64,
    ) -> Self {
        Self {
            links,
            clicks,
            default_window_days,
        }
    }

    /// Aggregates clicks for `code` over the trailing window.
    ///
    /// Zero events is a valid result (empty summaries), not an error.
    ///
    /// # Errors
    ///
    /// - [`AppError::NotFound`] - unknown code
    /// - [`AppError::Forbidden`] - requester does not own the link
    pub async fn aggregate(
        &self,
        code: &str,
        requester: &str,
        window_days: Option<i64>,
    ) -> Result<(Link, AnalyticsSummary), AppError> {
        let link = self
            .links
            .find_by_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Short code not found", json!({ "code": code })))?;

        if !link.is_owned_by(requester) {
            return Err(AppError::forbidden(
                "You do not have access to this link's analytics",
                json!({ "code": code }),
            ));
        }

        let window = window_days.unwrap_or(self.default_window_days).max(1);
        let since = Utc::now() - Duration::days(window);

        let events = self.clicks.list_for_code_since(code, since).await?;

        let mut summary = AnalyticsSummary::default();
        for click in &events {
            summary.add(click);
        }

        Ok((link, summary))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{DeviceClass, LinkStatus};
    use crate::domain::repositories::{MockClickRepository, MockLinkRepository};
    use chrono::{TimeZone, Utc};

    fn owned_link() -> Link {
        Link::new(
            1,
            "abc123".to_string(),
            "https://example.com".to_string(),
            LinkStatus::Active,
            3,
            Some("user-1".to_string()),
            "key-1".to_string(),
            Utc::now(),
        )
    }

    fn click(country: Option<&str>, referrer: &str, device: DeviceClass) -> Click {
        Click {
            code: "abc123".to_string(),
            clicked_at: Utc.with_ymd_and_hms(2026, 8, 1, 12, 30, 0).unwrap(),
            referrer: referrer.to_string(),
            user_agent: None,
            ip: None,
            country: country.map(|c| c.to_string()),
            device,
            owner: Some("user-1".to_string()),
        }
    }

    fn service(
        links: MockLinkRepository,
        clicks: MockClickRepository,
    ) -> AnalyticsService {
        AnalyticsService::new(Arc::new(links), Arc::new(clicks), 30)
    }

    #[tokio::test]
    async fn test_aggregate_groups_countries() {
        let mut links = MockLinkRepository::new();
        let link = owned_link();
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let mut clicks = MockClickRepository::new();
        clicks.expect_list_for_code_since().times(1).returning(|_, _| {
            Ok(vec![
                click(Some("US"), "Direct", DeviceClass::Desktop),
                click(Some("US"), "Direct", DeviceClass::Mobile),
                click(None, "Direct", DeviceClass::Unknown),
            ])
        });

        let (_, summary) = service(links, clicks)
            .aggregate("abc123", "user-1", None)
            .await
            .unwrap();

        assert_eq!(summary.total, 3);
        assert_eq!(summary.countries.get("US"), Some(&2));
        assert_eq!(summary.countries.get(UNKNOWN_COUNTRY), Some(&1));
    }

    #[tokio::test]
    async fn test_aggregate_groups_devices_and_referrers() {
        let mut links = MockLinkRepository::new();
        let link = owned_link();
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let mut clicks = MockClickRepository::new();
        clicks.expect_list_for_code_since().times(1).returning(|_, _| {
            Ok(vec![
                click(Some("US"), "https://google.com", DeviceClass::Mobile),
                click(Some("US"), "https://google.com", DeviceClass::Mobile),
                click(Some("US"), "", DeviceClass::Desktop),
            ])
        });

        let (_, summary) = service(links, clicks)
            .aggregate("abc123", "user-1", None)
            .await
            .unwrap();

        assert_eq!(summary.referrers.get("https://google.com"), Some(&2));
        // Empty referrer buckets as the sentinel.
        assert_eq!(summary.referrers.get(DIRECT_REFERRER), Some(&1));
        assert_eq!(summary.devices.get("mobile"), Some(&2));
        assert_eq!(summary.devices.get("desktop"), Some(&1));
    }

    #[tokio::test]
    async fn test_aggregate_groups_by_day() {
        let mut links = MockLinkRepository::new();
        let link = owned_link();
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let mut clicks = MockClickRepository::new();
        clicks.expect_list_for_code_since().times(1).returning(|_, _| {
            let mut a = click(Some("US"), "Direct", DeviceClass::Desktop);
            a.clicked_at = Utc.with_ymd_and_hms(2026, 8, 1, 9, 0, 0).unwrap();
            let mut b = a.clone();
            b.clicked_at = Utc.with_ymd_and_hms(2026, 8, 1, 23, 59, 59).unwrap();
            let mut c = a.clone();
            c.clicked_at = Utc.with_ymd_and_hms(2026, 8, 2, 0, 0, 1).unwrap();
            Ok(vec![a, b, c])
        });

        let (_, summary) = service(links, clicks)
            .aggregate("abc123", "user-1", None)
            .await
            .unwrap();

        assert_eq!(summary.daily.get("2026-08-01"), Some(&2));
        assert_eq!(summary.daily.get("2026-08-02"), Some(&1));
    }

    #[tokio::test]
    async fn test_aggregate_zero_events_is_empty_not_error() {
        let mut links = MockLinkRepository::new();
        let link = owned_link();
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let mut clicks = MockClickRepository::new();
        clicks
            .expect_list_for_code_since()
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let (_, summary) = service(links, clicks)
            .aggregate("abc123", "user-1", None)
            .await
            .unwrap();

        assert_eq!(summary.total, 0);
        assert!(summary.referrers.is_empty());
        assert!(summary.countries.is_empty());
        assert!(summary.devices.is_empty());
        assert!(summary.daily.is_empty());
    }

    #[tokio::test]
    async fn test_aggregate_unknown_code() {
        let mut links = MockLinkRepository::new();
        links.expect_find_by_code().times(1).returning(|_| Ok(None));

        let result = service(links, MockClickRepository::new())
            .aggregate("nosuch", "user-1", None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_aggregate_forbidden_for_non_owner() {
        let mut links = MockLinkRepository::new();
        let link = owned_link();
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let mut clicks = MockClickRepository::new();
        clicks.expect_list_for_code_since().times(0);

        let result = service(links, clicks)
            .aggregate("abc123", "someone-else", None)
            .await;

        assert!(matches!(result.unwrap_err(), AppError::Forbidden { .. }));
    }

    #[tokio::test]
    async fn test_aggregate_window_is_passed_to_ledger() {
        let mut links = MockLinkRepository::new();
        let link = owned_link();
        links
            .expect_find_by_code()
            .times(1)
            .returning(move |_| Ok(Some(link.clone())));

        let mut clicks = MockClickRepository::new();
        clicks
            .expect_list_for_code_since()
            .withf(|_, since| {
                let days = (Utc::now() - *since).num_days();
                (6..=7).contains(&days)
            })
            .times(1)
            .returning(|_, _| Ok(vec![]));

        let result = service(links, clicks)
            .aggregate("abc123", "user-1", Some(7))
            .await;

        assert!(result.is_ok());
    }
}
