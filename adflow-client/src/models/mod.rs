pub mod admin;
pub mod campaign;
pub mod dashboard;
pub mod report;
pub mod user;

pub use admin::{
    ActiveToggle, ActivityEntry, AdminUser, BootstrapResult, RoleChange, SystemStats,
    UpdatedUser, UserPage, UserQuery, UserUpdate,
};
pub use campaign::{
    Campaign, CampaignList, CampaignMetrics, CampaignStatus, MetricsUpdate, NewCampaign,
    OptimizationResult, Platform, TargetAudience,
};
pub use dashboard::{DashboardOverview, PlatformInfo};
pub use report::{Report, ReportFormat};
pub use user::{
    AuthSession, AuthTokens, ChangePasswordRequest, LoginRequest, RegisterRequest, Role,
    UserSummary,
};
