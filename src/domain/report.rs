// Result document domain model
use chrono::{DateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt::Display;

use super::analysis::SeriesSummary;
use super::dashboard::WidgetType;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultDocument {
    pub metadata: Metadata,
    pub widgets: Vec<WidgetResult>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub dashboard_id: String,
    pub dashboard_title: String,
    pub dashboard_description: String,
    pub time_range: TimeRange,
    pub total_widgets: usize,
    pub query_summary: QuerySummary,
}

/// Query window, kept both human-readable and as Unix seconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeRange {
    pub from: String,
    pub to: String,
    pub from_ts: i64,
    pub to_ts: i64,
}

impl TimeRange {
    pub fn new<Tz>(from: &DateTime<Tz>, to: &DateTime<Tz>) -> Self
    where
        Tz: TimeZone,
        Tz::Offset: Display,
    {
        Self {
            from: from.to_rfc3339(),
            to: to.to_rfc3339(),
            from_ts: from.timestamp(),
            to_ts: to.timestamp(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WidgetResult {
    pub index: usize,
    pub id: Option<Value>,
    #[serde(rename = "type")]
    pub widget_type: WidgetType,
    pub title: String,
    pub queries: Vec<QueryEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEntry {
    pub query: String,
    #[serde(flatten)]
    pub outcome: QueryOutcome,
}

/// What happened to one query. Serialized with a `status` tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum QueryOutcome {
    Success(SeriesPayload),
    NoData,
    Error { error: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SeriesPayload {
    Analysis { analysis: SeriesSummary },
    /// Series as the platform returned them, untouched.
    Raw { series: Vec<Value> },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySummary {
    pub total_queries: usize,
    pub successful: usize,
    pub failed: usize,
    #[serde(default)]
    pub no_data: usize,
}

impl QuerySummary {
    pub fn tally(widgets: &[WidgetResult]) -> Self {
        widgets
            .iter()
            .flat_map(|widget| &widget.queries)
            .fold(Self::default(), |mut summary, entry| {
                summary.total_queries += 1;
                match entry.outcome {
                    QueryOutcome::Success(_) => summary.successful += 1,
                    QueryOutcome::NoData => summary.no_data += 1,
                    QueryOutcome::Error { .. } => summary.failed += 1,
                }
                summary
            })
    }
}
