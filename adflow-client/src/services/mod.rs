pub mod admin;
pub mod api_client;
pub mod auth;
pub mod campaigns;
pub mod dashboard;
pub mod reports;
pub mod request;
pub mod transport;

pub use admin::AdminApi;
pub use api_client::{ApiClient, ApiClientBuilder};
pub use auth::AuthApi;
pub use campaigns::CampaignsApi;
pub use dashboard::DashboardApi;
pub use reports::ReportsApi;
pub use request::{ApiRequest, ApiResponse};
pub use transport::{ReqwestTransport, Transport};
