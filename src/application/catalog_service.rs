// Catalog service - Use case for listing and searching dashboards
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::dashboard::DashboardSummary;
use std::sync::Arc;

#[derive(Clone)]
pub struct DashboardCatalog {
    api: Arc<dyn DashboardApi>,
}

impl DashboardCatalog {
    pub fn new(api: Arc<dyn DashboardApi>) -> Self {
        Self { api }
    }

    pub async fn list(&self) -> Result<Vec<DashboardSummary>, ApiError> {
        let dashboards = self.api.list_dashboards().await?;
        tracing::debug!("Listed {} dashboards", dashboards.len());
        Ok(dashboards)
    }

    /// Dashboards whose title contains `text`, ignoring case.
    pub async fn search(&self, text: &str) -> Result<Vec<DashboardSummary>, ApiError> {
        let needle = text.to_lowercase();
        let matches: Vec<_> = self
            .list()
            .await?
            .into_iter()
            .filter(|d| {
                d.title
                    .as_deref()
                    .is_some_and(|title| title.to_lowercase().contains(&needle))
            })
            .collect();

        tracing::debug!("{} dashboards match {:?}", matches.len(), text);
        Ok(matches)
    }
}
