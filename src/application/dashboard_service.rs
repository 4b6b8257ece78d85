// Dashboard service - Use case for re-running a dashboard's widget queries
use crate::application::dashboard_api::{ApiError, DashboardApi};
use crate::domain::analysis::analyze_series;
use crate::domain::extraction::{ExtractorTable, WidgetQueries, extract_widget_queries};
use crate::domain::report::{
    Metadata, QueryEntry, QueryOutcome, QuerySummary, ResultDocument, SeriesPayload, TimeRange,
    WidgetResult,
};
use std::sync::Arc;

/// Whether successful queries are summarized or passed through as raw series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputMode {
    #[default]
    Analyze,
    Raw,
}

pub struct DashboardQueryService {
    api: Arc<dyn DashboardApi>,
    extractors: ExtractorTable,
}

impl DashboardQueryService {
    pub fn new(api: Arc<dyn DashboardApi>, extractors: ExtractorTable) -> Self {
        Self { api, extractors }
    }

    /// Fetch a dashboard and run every widget query over `window`, one at a time.
    ///
    /// Only the dashboard fetch can fail the whole run. A failing query is
    /// recorded as an `error` outcome and the remaining queries still run.
    pub async fn run_dashboard_query(
        &self,
        dashboard_id: &str,
        window: &TimeRange,
        mode: OutputMode,
    ) -> Result<ResultDocument, ApiError> {
        tracing::info!("Fetching dashboard: {}", dashboard_id);
        let dashboard = self.api.get_dashboard(dashboard_id).await?;

        tracing::info!("Dashboard: {} ({})", dashboard.title(), dashboard.id);
        if !dashboard.description().is_empty() {
            tracing::info!("Description: {}", dashboard.description());
        }

        let widgets = extract_widget_queries(&dashboard, &self.extractors);
        tracing::info!(
            "Found {} widgets with queries ({} widgets total)",
            widgets.len(),
            dashboard.widget_count()
        );

        let mut results = Vec::with_capacity(widgets.len());
        for widget in widgets {
            results.push(self.run_widget(widget, window, mode).await);
        }

        let query_summary = QuerySummary::tally(&results);
        tracing::info!(
            total_widgets = results.len(),
            total_queries = query_summary.total_queries,
            successful = query_summary.successful,
            failed = query_summary.failed,
            no_data = query_summary.no_data,
            "Query summary"
        );

        Ok(ResultDocument {
            metadata: Metadata {
                dashboard_id: dashboard_id.to_string(),
                dashboard_title: dashboard.title().to_string(),
                dashboard_description: dashboard.description().to_string(),
                time_range: window.clone(),
                total_widgets: results.len(),
                query_summary,
            },
            widgets: results,
        })
    }

    async fn run_widget(
        &self,
        widget: WidgetQueries,
        window: &TimeRange,
        mode: OutputMode,
    ) -> WidgetResult {
        tracing::info!(
            "Widget {}: {} ({})",
            widget.index,
            widget.title,
            widget.widget_type
        );

        let mut entries = Vec::with_capacity(widget.queries.len());
        for query in widget.queries {
            let outcome = self.run_query(&query, window, mode).await;
            entries.push(QueryEntry { query, outcome });
        }

        WidgetResult {
            index: widget.index,
            id: widget.id,
            widget_type: widget.widget_type,
            title: widget.title,
            queries: entries,
        }
    }

    async fn run_query(&self, query: &str, window: &TimeRange, mode: OutputMode) -> QueryOutcome {
        tracing::info!("  Query: {}", query);

        let response = match self
            .api
            .execute_query(query, window.from_ts, window.to_ts)
            .await
        {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!("    Error: {}", e);
                return QueryOutcome::Error {
                    error: e.to_string(),
                };
            }
        };

        if response.series.is_empty() {
            tracing::info!("    No data");
            return QueryOutcome::NoData;
        }

        let payload = match mode {
            OutputMode::Analyze => {
                let analysis = analyze_series(&response.series);
                tracing::info!("    Success ({} series analyzed)", analysis.series_count);
                SeriesPayload::Analysis { analysis }
            }
            OutputMode::Raw => {
                tracing::info!("    Success ({} series)", response.series.len());
                SeriesPayload::Raw {
                    series: response.series,
                }
            }
        };
        QueryOutcome::Success(payload)
    }
}
