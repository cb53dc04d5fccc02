use indexmap::{IndexMap, IndexSet};
use serde::Serialize;
use serde_json::Value;

/// Literal the upstream chart extractor uses for "no page reference".
pub const PAGE_NOT_AVAILABLE: &str = "N/A";

/// Validated top-level chart data document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartDataDocument {
    pub charts: Vec<ChartRecord>,
}

impl ChartDataDocument {
    #[must_use]
    pub fn new(charts: Vec<ChartRecord>) -> Self {
        Self { charts }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.charts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    /// Charts paired with their 1-based display index.
    pub fn numbered(&self) -> impl Iterator<Item = (usize, &ChartRecord)> {
        self.charts.iter().enumerate().map(|(i, chart)| (i + 1, chart))
    }
}

/// Plot shape used by the document renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlotKind {
    Bar,
    Line,
}

impl PlotKind {
    /// `"bar"` draws bars; every other type tag falls back to a line plot.
    #[must_use]
    pub fn from_type_tag(tag: &str) -> Self {
        if tag == "bar" { Self::Bar } else { Self::Line }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartRecord {
    pub title: String,
    /// Type tag exactly as it appeared in the input.
    pub chart_type: String,
    pub data: Vec<DataPoint>,
    /// Normalized page reference; `None` when absent, empty or `"N/A"`.
    pub page_number: Option<String>,
    pub category: Option<String>,
    pub explanation: Option<String>,
}

impl ChartRecord {
    #[must_use]
    pub fn new(title: impl Into<String>, chart_type: impl Into<String>, data: Vec<DataPoint>) -> Self {
        Self {
            title: title.into(),
            chart_type: chart_type.into(),
            data,
            page_number: None,
            category: None,
            explanation: None,
        }
    }

    #[must_use]
    pub fn with_page_number(mut self, page: impl Into<String>) -> Self {
        self.page_number = normalize_page_text(page.into());
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = non_empty(category.into());
        self
    }

    #[must_use]
    pub fn with_explanation(mut self, explanation: impl Into<String>) -> Self {
        self.explanation = non_empty(explanation.into());
        self
    }

    #[must_use]
    pub fn plot_kind(&self) -> PlotKind {
        PlotKind::from_type_tag(&self.chart_type)
    }

    #[must_use]
    pub fn point_count(&self) -> usize {
        self.data.len()
    }

    /// Where the chart came from: a page reference, else its category.
    #[must_use]
    pub fn source(&self) -> SourceRef<'_> {
        match (&self.page_number, &self.category) {
            (Some(page), _) => SourceRef::Page(page),
            (None, Some(category)) => SourceRef::Category(category),
            (None, None) => SourceRef::Unknown,
        }
    }

    #[must_use]
    pub fn explanation_text(&self) -> &str {
        self.explanation.as_deref().unwrap_or_default()
    }

    /// Keys beyond `label`/`value` across all points, in first-seen order.
    #[must_use]
    pub fn extra_columns(&self) -> Vec<&str> {
        let columns: IndexSet<&str> = self
            .data
            .iter()
            .flat_map(|point| point.extra.keys().map(String::as_str))
            .collect();
        columns.into_iter().collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataPoint {
    pub label: String,
    pub value: f64,
    /// Any additional keys present on the input object.
    #[serde(flatten)]
    pub extra: IndexMap<String, Value>,
}

impl DataPoint {
    #[must_use]
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
            extra: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_extra(mut self, key: impl Into<String>, value: Value) -> Self {
        self.extra.insert(key.into(), value);
        self
    }
}

/// Provenance shown next to a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceRef<'a> {
    Page(&'a str),
    Category(&'a str),
    Unknown,
}

impl<'a> SourceRef<'a> {
    #[must_use]
    pub fn page(self) -> Option<&'a str> {
        match self {
            Self::Page(page) => Some(page),
            _ => None,
        }
    }

    #[must_use]
    pub fn category(self) -> Option<&'a str> {
        match self {
            Self::Category(category) => Some(category),
            _ => None,
        }
    }
}

/// Renders a JSON scalar the way it reads in a spreadsheet cell.
#[must_use]
pub fn display_json_scalar(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Normalizes a raw `page_number` value; falsy values and `"N/A"` mean no page.
#[must_use]
pub fn normalize_page_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Number(number) if number.as_f64() == Some(0.0) => None,
        Value::String(text) => normalize_page_text(text.clone()),
        other => normalize_page_text(display_json_scalar(other)),
    }
}

fn normalize_page_text(text: String) -> Option<String> {
    let text = non_empty(text)?;
    (text != PAGE_NOT_AVAILABLE).then_some(text)
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}
