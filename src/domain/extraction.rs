// Query extraction - Pulls metric query expressions out of widget definitions
use serde_json::Value;
use std::collections::HashMap;

use super::dashboard::{Dashboard, WidgetType};

/// Strategy for pulling query strings out of one widget definition.
pub trait QueryExtractor: Send + Sync {
    fn extract(&self, definition: &Value) -> Vec<String>;
}

/// Reads `definition.requests[].q` and, when `nested` is set, every
/// `definition.requests[].queries[].query` that follows it.
#[derive(Debug, Clone, Copy)]
pub struct RequestQueries {
    nested: bool,
}

impl RequestQueries {
    pub const fn with_nested() -> Self {
        Self { nested: true }
    }

    pub const fn legacy_only() -> Self {
        Self { nested: false }
    }
}

impl QueryExtractor for RequestQueries {
    fn extract(&self, definition: &Value) -> Vec<String> {
        let Some(requests) = definition.get("requests").and_then(Value::as_array) else {
            return Vec::new();
        };

        let mut queries = Vec::new();
        for request in requests {
            if let Some(q) = request.get("q").and_then(Value::as_str) {
                queries.push(q.to_string());
            }

            if !self.nested {
                continue;
            }

            if let Some(nested) = request.get("queries").and_then(Value::as_array) {
                queries.extend(
                    nested
                        .iter()
                        .filter_map(|item| item.get("query").and_then(Value::as_str))
                        .map(str::to_string),
                );
            }
        }
        queries
    }
}

/// Dispatch table from widget type tag to extraction strategy.
///
/// Types without an entry yield no queries.
pub struct ExtractorTable {
    extractors: HashMap<String, Box<dyn QueryExtractor>>,
}

impl ExtractorTable {
    pub fn empty() -> Self {
        Self {
            extractors: HashMap::new(),
        }
    }

    pub fn register(&mut self, widget_type: WidgetType, extractor: impl QueryExtractor + 'static) {
        self.extractors
            .insert(widget_type.as_str().to_string(), Box::new(extractor));
    }

    pub fn get(&self, widget_type: &WidgetType) -> Option<&dyn QueryExtractor> {
        self.extractors
            .get(widget_type.as_str())
            .map(|extractor| extractor.as_ref())
    }
}

impl Default for ExtractorTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register(WidgetType::Timeseries, RequestQueries::with_nested());
        table.register(WidgetType::QueryValue, RequestQueries::with_nested());
        table.register(WidgetType::Toplist, RequestQueries::with_nested());
        table.register(WidgetType::Heatmap, RequestQueries::legacy_only());
        table
    }
}

/// Queries found in one widget, tagged with the widget's original position.
#[derive(Debug, Clone, PartialEq)]
pub struct WidgetQueries {
    pub index: usize,
    pub id: Option<Value>,
    pub widget_type: WidgetType,
    pub title: String,
    pub queries: Vec<String>,
}

/// Walk the dashboard's widgets in order and collect their queries.
///
/// Widgets that yield no queries (notes, groups, unsupported kinds) are
/// dropped; the remaining entries keep their original `index`.
pub fn extract_widget_queries(dashboard: &Dashboard, table: &ExtractorTable) -> Vec<WidgetQueries> {
    dashboard
        .widgets()
        .filter_map(|widget| {
            let queries = table
                .get(&widget.widget_type)
                .map(|extractor| extractor.extract(widget.definition))
                .unwrap_or_default();

            if queries.is_empty() {
                return None;
            }

            Some(WidgetQueries {
                index: widget.index,
                id: widget.id.cloned(),
                widget_type: widget.widget_type,
                title: widget.title,
                queries,
            })
        })
        .collect()
}
