// Datadog HTTP client - reqwest implementation of DashboardApi
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::dashboard::{Dashboard, DashboardSummary};
use crate::domain::null_as_empty;
use crate::domain::series::QueryResponse;
use crate::infrastructure::config::DatadogSettings;
use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use std::time::Duration;

const API_KEY_HEADER: &str = "DD-API-KEY";
const APP_KEY_HEADER: &str = "DD-APPLICATION-KEY";

#[derive(Debug, Clone)]
pub struct DatadogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    app_key: String,
}

#[derive(Debug, Deserialize)]
struct DashboardListResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    dashboards: Vec<DashboardSummary>,
}

impl DatadogClient {
    pub fn new(settings: &DatadogSettings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = settings.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http = builder.build().context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            base_url: settings.api_base_url(),
            api_key: settings.api_key.clone(),
            app_key: settings.app_key.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn dashboard_list_url(&self) -> String {
        format!("{}/api/v1/dashboard", self.base_url)
    }

    fn dashboard_url(&self, dashboard_id: &str) -> String {
        format!(
            "{}/api/v1/dashboard/{}",
            self.base_url,
            urlencoding::encode(dashboard_id)
        )
    }

    fn query_url(&self, query: &str, from_ts: i64, to_ts: i64) -> String {
        format!(
            "{}/api/v1/query?query={}&from={}&to={}",
            self.base_url,
            urlencoding::encode(query),
            from_ts,
            to_ts
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        tracing::debug!("GET {}", url);

        let response = self
            .http
            .get(url)
            .header(API_KEY_HEADER, &self.api_key)
            .header(APP_KEY_HEADER, &self.app_key)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| ApiError::Transport(Box::new(e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Status { status, body });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| ApiError::Decode(Box::new(e)))
    }
}

#[async_trait]
impl DashboardApi for DatadogClient {
    async fn list_dashboards(&self) -> Result<Vec<DashboardSummary>, ApiError> {
        let list: DashboardListResponse = self.get_json(&self.dashboard_list_url()).await?;
        Ok(list.dashboards)
    }

    async fn get_dashboard(&self, dashboard_id: &str) -> Result<Dashboard, ApiError> {
        self.get_json(&self.dashboard_url(dashboard_id)).await
    }

    async fn execute_query(
        &self,
        query: &str,
        from_ts: i64,
        to_ts: i64,
    ) -> Result<QueryResponse, ApiError> {
        self.get_json(&self.query_url(query, from_ts, to_ts)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::extract::{Path, Query};
    use axum::http::{HeaderMap, StatusCode};
    use axum::response::{IntoResponse, Response};
    use axum::routing::get;
    use axum::{Json, Router};
    use serde_json::json;
    use std::collections::HashMap;

    fn authorized(headers: &HeaderMap) -> bool {
        headers.get(API_KEY_HEADER).is_some_and(|v| v == "test-api-key")
            && headers.get(APP_KEY_HEADER).is_some_and(|v| v == "test-app-key")
    }

    async fn list(headers: HeaderMap) -> Response {
        if !authorized(&headers) {
            return (StatusCode::FORBIDDEN, r#"{"errors":["Forbidden"]}"#).into_response();
        }
        Json(json!({
            "dashboards": [
                { "id": "abc-def-ghi", "title": "Checkout", "description": "Checkout health" },
                { "id": "jkl-mno-pqr", "title": "Payments", "description": null }
            ]
        }))
        .into_response()
    }

    async fn dashboard(Path(id): Path<String>, headers: HeaderMap) -> Response {
        if !authorized(&headers) {
            return (StatusCode::FORBIDDEN, r#"{"errors":["Forbidden"]}"#).into_response();
        }
        if id != "abc-def-ghi" {
            return (StatusCode::NOT_FOUND, r#"{"errors":["Dashboard not found"]}"#).into_response();
        }
        Json(json!({
            "id": id,
            "title": "Checkout",
            "widgets": [
                { "id": 1, "definition": { "type": "timeseries",
                    "requests": [{ "q": "sum:checkout.requests{env:prod}" }] } }
            ]
        }))
        .into_response()
    }

    async fn query(Query(params): Query<HashMap<String, String>>, headers: HeaderMap) -> Response {
        if !authorized(&headers) {
            return (StatusCode::FORBIDDEN, r#"{"errors":["Forbidden"]}"#).into_response();
        }
        let expr = params.get("query").cloned().unwrap_or_default();
        if expr.ends_with('{') {
            return (StatusCode::BAD_REQUEST, r#"{"errors":["Error parsing query"]}"#).into_response();
        }
        if expr.starts_with("empty") {
            return Json(json!({ "status": "ok", "series": [] })).into_response();
        }
        Json(json!({
            "status": "ok",
            "series": [{
                "metric": expr,
                "scope": format!("from:{},to:{}", params["from"], params["to"]),
                "tag_set": [],
                "pointlist": [[1714557600000_i64, 1], [1714557620000_i64, null]]
            }]
        }))
        .into_response()
    }

    async fn spawn_stub() -> String {
        let app = Router::new()
            .route("/api/v1/dashboard", get(list))
            .route("/api/v1/dashboard/:id", get(dashboard))
            .route("/api/v1/query", get(query));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn client(base_url: &str, api_key: &str) -> DatadogClient {
        DatadogClient::new(&DatadogSettings {
            api_key: api_key.to_string(),
            app_key: "test-app-key".to_string(),
            site: "datadoghq.eu".to_string(),
            base_url: Some(base_url.to_string()),
            timeout_secs: Some(5),
        })
        .unwrap()
    }

    #[test]
    fn test_urls_are_encoded() {
        let client = client("https://api.datadoghq.eu/", "test-api-key");
        assert_eq!(client.base_url(), "https://api.datadoghq.eu");
        assert_eq!(
            client.query_url("avg:system.load.1{host:a b}", 10, 20),
            "https://api.datadoghq.eu/api/v1/query?query=avg%3Asystem.load.1%7Bhost%3Aa%20b%7D&from=10&to=20"
        );
        assert_eq!(
            client.dashboard_url("abc/def"),
            "https://api.datadoghq.eu/api/v1/dashboard/abc%2Fdef"
        );
    }

    #[tokio::test]
    async fn test_list_dashboards() {
        let base_url = spawn_stub().await;
        let dashboards = client(&base_url, "test-api-key").list_dashboards().await.unwrap();

        assert_eq!(dashboards.len(), 2);
        assert_eq!(dashboards[0].id, "abc-def-ghi");
        assert_eq!(dashboards[0].description.as_deref(), Some("Checkout health"));
        assert_eq!(dashboards[1].description, None);
    }

    #[tokio::test]
    async fn test_get_dashboard_and_not_found() {
        let base_url = spawn_stub().await;
        let client = client(&base_url, "test-api-key");

        let dashboard = client.get_dashboard("abc-def-ghi").await.unwrap();
        assert_eq!(dashboard.title(), "Checkout");
        assert_eq!(dashboard.widget_count(), 1);

        let err = client.get_dashboard("missing").await.unwrap_err();
        assert_eq!(err.status(), Some(404));
        assert_eq!(
            err.to_string(),
            r#"Datadog API error: 404 - {"errors":["Dashboard not found"]}"#
        );
    }

    #[tokio::test]
    async fn test_execute_query_sends_window() {
        let base_url = spawn_stub().await;
        let client = client(&base_url, "test-api-key");

        let response = client
            .execute_query("sum:checkout.requests{env:prod}", 1_714_557_600, 1_714_561_200)
            .await
            .unwrap();

        assert_eq!(response.series.len(), 1);
        let series = &response.series[0];
        assert_eq!(series["metric"], "sum:checkout.requests{env:prod}");
        assert_eq!(series["scope"], "from:1714557600,to:1714561200");
        assert_eq!(series["pointlist"], json!([[1714557600000_i64, 1], [1714557620000_i64, null]]));

        let empty = client.execute_query("empty:metric{*}", 0, 1).await.unwrap();
        assert!(empty.series.is_empty());
    }

    #[tokio::test]
    async fn test_status_errors_carry_body() {
        let base_url = spawn_stub().await;

        let err = client(&base_url, "test-api-key")
            .execute_query("sum:broken{", 0, 1)
            .await
            .unwrap_err();
        assert_eq!(err.status(), Some(400));

        let err = client(&base_url, "wrong-key").list_dashboards().await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 403, .. }));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_transport_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = client(&format!("http://{}", addr), "test-api-key")
            .execute_query("sum:checkout.requests{*}", 0, 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)));
    }
}
