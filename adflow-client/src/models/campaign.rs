use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CampaignStatus {
    Draft,
    Active,
    Paused,
    Stopped,
    Completed,
}

impl CampaignStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CampaignStatus::Draft => "draft",
            CampaignStatus::Active => "active",
            CampaignStatus::Paused => "paused",
            CampaignStatus::Stopped => "stopped",
            CampaignStatus::Completed => "completed",
        }
    }
}

impl FromStr for CampaignStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "draft" => Ok(CampaignStatus::Draft),
            "active" => Ok(CampaignStatus::Active),
            "paused" => Ok(CampaignStatus::Paused),
            "stopped" => Ok(CampaignStatus::Stopped),
            "completed" => Ok(CampaignStatus::Completed),
            other => Err(format!("unknown campaign status '{}'", other)),
        }
    }
}

impl fmt::Display for CampaignStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advertising platforms a campaign can run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Platform {
    GoogleAds,
    Facebook,
    Instagram,
    Linkedin,
    Twitter,
    Tiktok,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::GoogleAds => "google_ads",
            Platform::Facebook => "facebook",
            Platform::Instagram => "instagram",
            Platform::Linkedin => "linkedin",
            Platform::Twitter => "twitter",
            Platform::Tiktok => "tiktok",
        }
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "google_ads" | "google" => Ok(Platform::GoogleAds),
            "facebook" => Ok(Platform::Facebook),
            "instagram" => Ok(Platform::Instagram),
            "linkedin" => Ok(Platform::Linkedin),
            "twitter" => Ok(Platform::Twitter),
            "tiktok" => Ok(Platform::Tiktok),
            other => Err(format!("unknown platform '{}'", other)),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CampaignMetrics {
    pub impressions: u64,
    pub clicks: u64,
    pub conversions: u64,
    pub ctr: f64,
    pub cpc: f64,
    pub cpa: f64,
    pub roas: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub total_budget: f64,
    #[serde(default)]
    pub spent_budget: f64,
    #[serde(default)]
    pub remaining_budget: f64,
    #[serde(default)]
    pub objective: Option<String>,
    pub status: CampaignStatus,
    #[serde(default)]
    pub start_date: Option<String>,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub metrics: CampaignMetrics,
    #[serde(default)]
    pub performance_score: f64,
    #[serde(default)]
    pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignList {
    pub count: usize,
    pub campaigns: Vec<Campaign>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CampaignEnvelope {
    pub campaign: Campaign,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TargetAudience {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub locations: Vec<String>,
}

fn positive_budget(budget: f64) -> Result<(), ValidationError> {
    if budget.is_finite() && budget > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("budget_must_be_positive"))
    }
}

/// Payload for `POST /campaigns`.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct NewCampaign {
    #[validate(length(min = 1, max = 255))]
    pub name: String,
    #[validate(custom(function = "positive_budget"))]
    pub total_budget: f64,
    #[validate(length(min = 1))]
    pub platforms: Vec<Platform>,
    pub start_date: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_audience: Option<TargetAudience>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Payload for `POST /campaigns/{id}/metrics`. Only set fields are sent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetricsUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub impressions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clicks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub conversions: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_budget: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ctr: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpc: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpa: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roas: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Actions the server's optimizer took; their shape is server-defined.
    #[serde(default)]
    pub actions_taken: Vec<serde_json::Value>,
    #[serde(default)]
    pub optimization_timestamp: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AnalyticsEnvelope {
    pub analytics: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_parses_server_shape() {
        let campaign: Campaign = serde_json::from_value(serde_json::json!({
            "id": 12,
            "name": "Summer Sale",
            "description": null,
            "total_budget": 10000.0,
            "spent_budget": 2500.0,
            "remaining_budget": 7500.0,
            "objective": "conversions",
            "status": "active",
            "start_date": "2026-03-01T00:00:00",
            "end_date": null,
            "metrics": {
                "impressions": 50000, "clicks": 1500, "conversions": 75,
                "ctr": 0.03, "cpc": 1.67, "cpa": 33.33, "roas": 3.5
            },
            "performance_score": 71.5,
            "created_at": "2026-02-20T08:15:00"
        }))
        .unwrap();

        assert_eq!(campaign.status, CampaignStatus::Active);
        assert_eq!(campaign.metrics.clicks, 1500);
        assert_eq!(campaign.remaining_budget, 7500.0);
    }

    #[test]
    fn test_new_campaign_serializes_iso_dates_and_platform_ids() {
        let campaign = NewCampaign {
            name: "Launch".to_string(),
            total_budget: 500.0,
            platforms: vec![Platform::GoogleAds, Platform::Tiktok],
            start_date: "2026-03-01T00:00:00".parse().unwrap(),
            end_date: None,
            objective: Some("awareness".to_string()),
            target_audience: None,
            description: None,
        };

        let body = serde_json::to_value(&campaign).unwrap();
        assert_eq!(body["start_date"], "2026-03-01T00:00:00");
        assert_eq!(body["platforms"], serde_json::json!(["google_ads", "tiktok"]));
        assert!(body.get("end_date").is_none());
        assert!(campaign.validate().is_ok());
    }

    #[test]
    fn test_new_campaign_validation() {
        let campaign = NewCampaign {
            name: String::new(),
            total_budget: 0.0,
            platforms: vec![],
            start_date: "2026-03-01T00:00:00".parse().unwrap(),
            end_date: None,
            objective: None,
            target_audience: None,
            description: None,
        };

        let errors = campaign.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("name"));
        assert!(fields.contains_key("total_budget"));
        assert!(fields.contains_key("platforms"));
    }

    #[test]
    fn test_budget_must_be_positive_and_finite() {
        let campaign = |total_budget: f64| NewCampaign {
            name: "Launch".to_string(),
            total_budget,
            platforms: vec![Platform::Facebook],
            start_date: "2026-03-01T00:00:00".parse().unwrap(),
            end_date: None,
            objective: None,
            target_audience: None,
            description: None,
        };
        assert!(campaign(0.01).validate().is_ok());
        assert!(campaign(-5.0).validate().is_err());
        assert!(campaign(f64::NAN).validate().is_err());
        assert!(campaign(f64::INFINITY).validate().is_err());
    }

    #[test]
    fn test_metrics_update_skips_unset_fields() {
        let update = MetricsUpdate {
            clicks: Some(10),
            roas: Some(2.5),
            ..Default::default()
        };
        let body = serde_json::to_value(&update).unwrap();
        assert_eq!(body, serde_json::json!({"clicks": 10, "roas": 2.5}));
    }

    #[test]
    fn test_parse_user_input() {
        assert_eq!("google-ads".parse::<Platform>().unwrap(), Platform::GoogleAds);
        assert_eq!("PAUSED".parse::<CampaignStatus>().unwrap(), CampaignStatus::Paused);
        assert!("myspace".parse::<Platform>().is_err());
    }
}
