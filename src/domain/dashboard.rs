// Dashboard domain model
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::null_as_empty;

static NO_DEFINITION: Value = Value::Null;

/// Dashboard definition as returned by `GET /api/v1/dashboard/{id}`.
///
/// Only the fields the query pipeline needs are typed; widget definitions stay
/// opaque JSON so unknown widget kinds never fail deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct Dashboard {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    widgets: Vec<Value>,
}

impl Dashboard {
    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("Unknown")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    pub fn widget_count(&self) -> usize {
        self.widgets.len()
    }

    /// Iterate widgets in dashboard order, each tagged with its original position.
    pub fn widgets(&self) -> impl Iterator<Item = Widget<'_>> {
        self.widgets
            .iter()
            .enumerate()
            .map(|(index, raw)| Widget::from_json(index, raw))
    }
}

/// Entry of the dashboard list endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardSummary {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

impl DashboardSummary {
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("Untitled")
    }
}

/// Read-only view over one widget of a fetched dashboard.
#[derive(Debug, Clone)]
pub struct Widget<'a> {
    pub index: usize,
    pub id: Option<&'a Value>,
    pub widget_type: WidgetType,
    pub title: String,
    pub definition: &'a Value,
}

impl<'a> Widget<'a> {
    fn from_json(index: usize, raw: &'a Value) -> Self {
        let definition = raw.get("definition").unwrap_or(&NO_DEFINITION);
        let widget_type = definition
            .get("type")
            .and_then(Value::as_str)
            .map(WidgetType::from)
            .unwrap_or_default();
        let title = definition
            .get("title")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| format!("Widget {}", index));

        Self {
            index,
            id: raw.get("id").filter(|id| !id.is_null()),
            widget_type,
            title,
            definition,
        }
    }
}

/// Widget kind, read from `definition.type`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum WidgetType {
    Timeseries,
    QueryValue,
    Toplist,
    Heatmap,
    Other(String),
}

impl WidgetType {
    pub fn as_str(&self) -> &str {
        match self {
            WidgetType::Timeseries => "timeseries",
            WidgetType::QueryValue => "query_value",
            WidgetType::Toplist => "toplist",
            WidgetType::Heatmap => "heatmap",
            WidgetType::Other(tag) => tag,
        }
    }
}

impl Default for WidgetType {
    fn default() -> Self {
        WidgetType::Other("unknown".to_string())
    }
}

impl From<&str> for WidgetType {
    fn from(tag: &str) -> Self {
        match tag {
            "timeseries" => WidgetType::Timeseries,
            "query_value" => WidgetType::QueryValue,
            "toplist" => WidgetType::Toplist,
            "heatmap" => WidgetType::Heatmap,
            other => WidgetType::Other(other.to_string()),
        }
    }
}

impl From<String> for WidgetType {
    fn from(tag: String) -> Self {
        WidgetType::from(tag.as_str())
    }
}

impl From<WidgetType> for String {
    fn from(widget_type: WidgetType) -> Self {
        widget_type.as_str().to_string()
    }
}

impl fmt::Display for WidgetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_fall_back() {
        let dashboard: Dashboard = serde_json::from_value(json!({
            "id": "abc-123",
            "description": null,
            "widgets": null
        }))
        .unwrap();

        assert_eq!(dashboard.title(), "Unknown");
        assert_eq!(dashboard.description(), "");
        assert_eq!(dashboard.widget_count(), 0);
    }

    #[test]
    fn test_widget_view() {
        let dashboard: Dashboard = serde_json::from_value(json!({
            "id": "abc-123",
            "title": "API",
            "widgets": [
                { "id": 11, "definition": { "type": "timeseries", "title": "Latency" } },
                { "id": 12, "definition": { "type": "note" } },
                { "definition": {} }
            ]
        }))
        .unwrap();

        let widgets: Vec<_> = dashboard.widgets().collect();
        assert_eq!(widgets.len(), 3);

        assert_eq!(widgets[0].index, 0);
        assert_eq!(widgets[0].id, Some(&json!(11)));
        assert_eq!(widgets[0].widget_type, WidgetType::Timeseries);
        assert_eq!(widgets[0].title, "Latency");

        assert_eq!(widgets[1].widget_type, WidgetType::Other("note".to_string()));
        assert_eq!(widgets[1].title, "Widget 1");

        assert_eq!(widgets[2].id, None);
        assert_eq!(widgets[2].widget_type.as_str(), "unknown");
    }

    #[test]
    fn test_widget_type_round_trips_as_tag() {
        let encoded = serde_json::to_value(WidgetType::QueryValue).unwrap();
        assert_eq!(encoded, json!("query_value"));

        let decoded: WidgetType = serde_json::from_value(json!("sunburst")).unwrap();
        assert_eq!(decoded, WidgetType::Other("sunburst".to_string()));
    }
}
