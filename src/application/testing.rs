// In-memory DashboardApi for service tests
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::dashboard::{Dashboard, DashboardSummary};
use crate::domain::series::QueryResponse;
use async_trait::async_trait;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

/// Canned response for one query expression.
pub enum Canned {
    Series(Value),
    Fail(u16, &'static str),
}

#[derive(Default)]
pub struct FakeApi {
    pub summaries: Vec<DashboardSummary>,
    pub dashboards: HashMap<String, Value>,
    pub queries: HashMap<String, Canned>,
    pub calls: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn with_dashboard(mut self, id: &str, body: Value) -> Self {
        self.dashboards.insert(id.to_string(), body);
        self
    }

    pub fn with_query(mut self, query: &str, canned: Canned) -> Self {
        self.queries.insert(query.to_string(), canned);
        self
    }

    pub fn with_summary(mut self, id: &str, title: Option<&str>) -> Self {
        self.summaries.push(DashboardSummary {
            id: id.to_string(),
            title: title.map(str::to_string),
            description: None,
        });
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl DashboardApi for FakeApi {
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ApiError> {
        self.record("list".to_string());
        Ok(self.summaries.clone())
    }

    async fn get_dashboard(&self, dashboard_id: &str) -> Result<Dashboard, ApiError> {
        self.record(format!("dashboard:{}", dashboard_id));
        let body = self.dashboards.get(dashboard_id).ok_or_else(|| ApiError::Status {
            status: 404,
            body: r#"{"errors":["Dashboard not found"]}"#.to_string(),
        })?;
        serde_json::from_value(body.clone()).map_err(|e| ApiError::Decode(Box::new(e)))
    }

    async fn execute_query(
        &self,
        query: &str,
        from_ts: i64,
        to_ts: i64,
    ) -> Result<QueryResponse, ApiError> {
        self.record(format!("query:{}:{}:{}", query, from_ts, to_ts));
        match self.queries.get(query) {
            Some(Canned::Series(series)) => {
                serde_json::from_value(serde_json::json!({ "series": series }))
                    .map_err(|e| ApiError::Decode(Box::new(e)))
            }
            Some(Canned::Fail(status, body)) => Err(ApiError::Status {
                status: *status,
                body: body.to_string(),
            }),
            None => Ok(QueryResponse::default()),
        }
    }
}
