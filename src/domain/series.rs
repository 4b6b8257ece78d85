// Time-series domain models
use serde::Deserialize;
use serde_json::Value;

use super::null_as_empty;

/// The parts of one series the analyzer reads.
///
/// Decoded leniently from the platform payload: a missing or mistyped field
/// falls back to empty, and a sample that is not a number counts as `null`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    pub metric: Option<String>,
    pub scope: Option<String>,
    pub tag_set: Vec<String>,
    pub display_name: Option<String>,
    /// Sample values in pointlist order.
    pub samples: Vec<Option<f64>>,
}

impl Series {
    pub fn from_json(raw: &Value) -> Self {
        let text = |key: &str| raw.get(key).and_then(Value::as_str).map(str::to_string);
        let items = |key: &str| raw.get(key).and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default();

        Self {
            metric: text("metric"),
            scope: text("scope"),
            display_name: text("display_name"),
            tag_set: items("tag_set")
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            // Each point is `[timestamp, value]`
            samples: items("pointlist")
                .iter()
                .map(|point| point.get(1).and_then(Value::as_f64))
                .collect(),
        }
    }

    /// Non-null values in their original order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().flatten().copied()
    }
}

/// Body of `GET /api/v1/query`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    /// Series exactly as the platform returned them.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub series: Vec<Value>,
}
