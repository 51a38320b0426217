use super::campaign::Campaign;
use serde::{Deserialize, Serialize};

/// Aggregates across all of the signed-in user's campaigns.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardOverview {
    pub total_campaigns: u64,
    pub active_campaigns: u64,
    pub paused_campaigns: u64,
    pub total_budget: f64,
    pub total_spent: f64,
    pub budget_remaining: f64,
    pub total_impressions: u64,
    pub total_clicks: u64,
    pub total_conversions: u64,
    /// Click-through rate in percent.
    pub avg_ctr: f64,
    pub avg_performance_score: f64,
    /// Up to five campaigns ordered by performance score.
    pub top_campaigns: Vec<Campaign>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DashboardEnvelope {
    pub dashboard: DashboardOverview,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlatformInfo {
    pub id: String,
    pub name: String,
    /// `active` or `beta`.
    pub status: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PlatformsEnvelope {
    pub platforms: Vec<PlatformInfo>,
}
