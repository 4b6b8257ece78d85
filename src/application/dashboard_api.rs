// Dashboard API trait - Contract for talking to the monitoring platform
use crate::domain::dashboard::{Dashboard, DashboardSummary};
use crate::domain::series::QueryResponse;
use async_trait::async_trait;
use thiserror::Error;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-2xx response, including 404 for unknown dashboards.
    #[error("Datadog API error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("request failed: {0}")]
    Transport(#[source] BoxError),

    #[error("failed to decode response: {0}")]
    Decode(#[source] BoxError),
}

impl ApiError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[async_trait]
pub trait DashboardApi: Send + Sync {
    /// List dashboards (first page only)
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ApiError>;

    /// Fetch one dashboard definition
    async fn get_dashboard(&self, dashboard_id: &str) -> Result<Dashboard, ApiError>;

    /// Run one metric query over `[from_ts, to_ts]` (Unix seconds)
    async fn execute_query(
        &self,
        query: &str,
        from_ts: i64,
        to_ts: i64,
    ) -> Result<QueryResponse, ApiError>;
}
