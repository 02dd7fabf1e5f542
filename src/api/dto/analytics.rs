//! DTOs for the analytics endpoint.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_with::{DisplayFromStr, serde_as};

use crate::application::services::AnalyticsSummary;

/// Analytics query parameters.
///
/// `short_code` is required but modeled as optional so its absence maps to a
/// 400 instead of a generic deserialization rejection.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct AnalyticsQuery {
    pub short_code: Option<String>,

    #[serde_as(as = "Option<DisplayFromStr>")]
    #[serde(default)]
    pub window_days: Option<u32>,
}

/// One grouped bucket: category value and how many events fell into it.
#[derive(Debug, Serialize)]
pub struct CategoryCount {
    pub value: String,
    pub count: u64,
}

/// The four groupings plus the total, for one link and window.
#[derive(Debug, Serialize)]
pub struct AnalyticsBreakdown {
    pub total_clicks_analyzed: u64,
    pub referrers: Vec<CategoryCount>,
    pub countries: Vec<CategoryCount>,
    pub devices: Vec<CategoryCount>,
    pub daily_clicks: Vec<CategoryCount>,
}

#[derive(Debug, Serialize)]
pub struct AnalyticsResponse {
    pub url: String,
    pub analytics: AnalyticsBreakdown,
}

fn buckets(map: HashMap<String, u64>) -> Vec<CategoryCount> {
    map.into_iter()
        .map(|(value, count)| CategoryCount { value, count })
        .collect()
}

impl From<AnalyticsSummary> for AnalyticsBreakdown {
    fn from(summary: AnalyticsSummary) -> Self {
        Self {
            total_clicks_analyzed: summary.total,
            referrers: buckets(summary.referrers),
            countries: buckets(summary.countries),
            devices: buckets(summary.devices),
            daily_clicks: buckets(summary.daily),
        }
    }
}
