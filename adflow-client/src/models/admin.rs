use super::user::{Role, UserSummary};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct CountStats {
    pub total: u64,
    pub active: u64,
    pub new_this_week: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FinancialStats {
    pub total_budget_managed: f64,
    pub total_spent: f64,
    pub avg_budget: f64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AiStats {
    pub total_optimizations: u64,
}

/// Platform-wide counters shown on the admin panel.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemStats {
    pub users: CountStats,
    pub campaigns: CountStats,
    pub financials: FinancialStats,
    pub ai: AiStats,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StatsEnvelope {
    pub stats: SystemStats,
}

/// A user as seen by an administrator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    pub role: Role,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_verified: bool,
    #[serde(default)]
    pub campaign_count: u64,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub last_login: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AdminUserEnvelope {
    pub user: AdminUser,
}

/// One page of `GET /admin/users`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPage {
    pub users: Vec<AdminUser>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
    pub pages: u32,
}

/// Paging and search for the admin user listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserQuery {
    pub page: u32,
    pub per_page: u32,
    /// Matches username, email or company.
    pub search: Option<String>,
}

impl Default for UserQuery {
    fn default() -> Self {
        Self {
            page: 1,
            per_page: 20,
            search: None,
        }
    }
}

impl UserQuery {
    pub(crate) fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![
            ("page".to_string(), self.page.to_string()),
            ("per_page".to_string(), self.per_page.to_string()),
        ];
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            pairs.push(("search".to_string(), search.to_string()));
        }
        pairs
    }
}

/// An optimization log entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub id: i64,
    pub campaign_id: i64,
    pub action: String,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub confidence_score: Option<f64>,
    #[serde(default)]
    pub performed_at: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ActivityEnvelope {
    pub activity: Vec<ActivityEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActiveToggle {
    pub is_active: bool,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoleChange {
    pub role: Role,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoleRequest<'a> {
    pub role: &'a Role,
}

/// Payload for `PUT /admin/users/{id}`. Only set fields are changed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_verified: Option<bool>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        self.full_name.is_none()
            && self.company.is_none()
            && self.role.is_none()
            && self.is_active.is_none()
            && self.is_verified.is_none()
    }
}

/// What the server echoes back after an update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdatedUser {
    pub id: i64,
    pub role: Role,
    pub is_active: bool,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UpdatedUserEnvelope {
    pub user: UpdatedUser,
}

/// Result of promoting the first administrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BootstrapResult {
    #[serde(default)]
    pub message: Option<String>,
    pub user: UserSummary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_pairs() {
        let query = UserQuery::default();
        assert_eq!(
            query.to_pairs(),
            vec![
                ("page".to_string(), "1".to_string()),
                ("per_page".to_string(), "20".to_string()),
            ]
        );

        let query = UserQuery {
            page: 2,
            per_page: 10,
            search: Some("acme".to_string()),
        };
        assert_eq!(query.to_pairs().len(), 3);
        assert_eq!(query.to_pairs()[2].1, "acme");

        let query = UserQuery {
            search: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(query.to_pairs().len(), 2);
    }

    #[test]
    fn test_user_update_sends_only_set_fields() {
        let update = UserUpdate {
            role: Some(Role::Agency),
            is_active: Some(false),
            ..Default::default()
        };
        assert!(!update.is_empty());
        assert_eq!(
            serde_json::to_value(&update).unwrap(),
            serde_json::json!({"role": "agency", "is_active": false})
        );
        assert!(UserUpdate::default().is_empty());
    }

    #[test]
    fn test_bootstrap_result_with_partial_user() {
        let result: BootstrapResult = serde_json::from_value(serde_json::json!({
            "success": true,
            "message": "maria is now admin! Log out and log back in to see Admin Panel.",
            "user": {"id": 3, "username": "maria", "role": "admin"}
        }))
        .unwrap();

        assert!(result.user.role.is_admin());
        assert!(result.user.email.is_none());
    }
}
