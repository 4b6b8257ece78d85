// Series analysis - Summary statistics and a latest-vs-mean anomaly flag
//
// The anomaly check is a heuristic, not a statistical test: it compares the
// most recent sample with the mean of the window. There is no seasonality,
// windowing or baseline history involved.
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::series::Series;

/// Deviation above which the latest value is flagged.
const ANOMALY_THRESHOLD_PERCENT: f64 = 20.0;
/// Deviation above which a flagged value is `HIGH` rather than `MEDIUM`.
const HIGH_SEVERITY_PERCENT: f64 = 50.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSummary {
    /// Number of series the query returned, including skipped ones.
    pub series_count: usize,
    pub series_data: Vec<SeriesAnalysis>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesAnalysis {
    pub metric: String,
    pub scope: String,
    pub tag_set: Vec<String>,
    pub display_name: String,
    pub statistics: Statistics,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anomaly: Option<Anomaly>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Statistics {
    pub min: f64,
    pub max: f64,
    pub avg: f64,
    pub latest: f64,
    pub first: f64,
    pub data_points: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Anomaly {
    pub detected: bool,
    pub change_percent: f64,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Medium,
    High,
}

/// Summarize every series that has at least one non-null sample.
pub fn analyze_series(series: &[Value]) -> SeriesSummary {
    SeriesSummary {
        series_count: series.len(),
        series_data: series
            .iter()
            .map(Series::from_json)
            .filter_map(|series| analyze_one(&series))
            .collect(),
    }
}

fn analyze_one(series: &Series) -> Option<SeriesAnalysis> {
    let statistics = Statistics::from_values(&series.values().collect::<Vec<_>>())?;

    Some(SeriesAnalysis {
        metric: series.metric.clone().unwrap_or_else(|| "unknown".to_string()),
        scope: series.scope.clone().unwrap_or_default(),
        tag_set: series.tag_set.clone(),
        display_name: series.display_name.clone().unwrap_or_default(),
        anomaly: Anomaly::detect(&statistics),
        statistics,
    })
}

impl Statistics {
    /// `None` when there are no values to summarize.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        let (&first, &latest) = (values.first()?, values.last()?);

        let min = values.iter().copied().fold(f64::INFINITY, f64::min);
        let max = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
        let avg = values.iter().sum::<f64>() / values.len() as f64;

        Some(Self {
            min: round2(min),
            max: round2(max),
            avg: round2(avg),
            latest: round2(latest),
            first: round2(first),
            data_points: values.len(),
        })
    }
}

impl Anomaly {
    /// Works on the rounded statistics, so the reported percentage matches
    /// what a reader can recompute from the output.
    pub fn detect(statistics: &Statistics) -> Option<Self> {
        if statistics.avg <= 0.0 {
            return None;
        }

        let change = (statistics.latest - statistics.avg) / statistics.avg * 100.0;
        if change.abs() <= ANOMALY_THRESHOLD_PERCENT {
            return None;
        }

        let severity = if change.abs() > HIGH_SEVERITY_PERCENT {
            Severity::High
        } else {
            Severity::Medium
        };

        Some(Self {
            detected: true,
            change_percent: round2(change),
            severity,
        })
    }
}

/// Two decimals, exact ties to even.
fn round2(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}
