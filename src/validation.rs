//! Shape validation for chart data documents.
//!
//! Checks run in a fixed order and stop at the first failure. Per chart that is
//! field presence, then text-typed title and type, then the data points. A
//! document that
//! passes is returned as a typed [`ChartDataDocument`], so renderers never
//! re-inspect raw JSON.

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::debug;

use crate::core::record::{display_json_scalar, normalize_page_value};
use crate::core::{ChartDataDocument, ChartRecord, DataPoint};

pub const FIELD_HAS_DATA: &str = "has_data";
pub const FIELD_CHARTS: &str = "charts";
pub const FIELD_TITLE: &str = "chart_title";
pub const FIELD_TYPE: &str = "chart_type";
pub const FIELD_DATA: &str = "data";
pub const FIELD_PAGE: &str = "page_number";
pub const FIELD_CATEGORY: &str = "category";
pub const FIELD_EXPLANATION: &str = "explanation";
pub const FIELD_LABEL: &str = "label";
pub const FIELD_VALUE: &str = "value";

/// Fields every chart record must carry, in check order.
pub const REQUIRED_CHART_FIELDS: [&str; 3] = [FIELD_TITLE, FIELD_TYPE, FIELD_DATA];

/// First failure found in a chart data document.
///
/// Chart and point positions are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("document must be a JSON object")]
    NotAnObject,

    #[error("document contains no chart data to export")]
    NoChartData,

    #[error("document is missing the `charts` array")]
    MissingCharts,

    #[error("Chart {chart} missing required field `{field}`")]
    MissingField { chart: usize, field: &'static str },

    #[error("Chart {chart} field `{field}` must be text")]
    FieldNotText { chart: usize, field: &'static str },

    #[error("Chart {chart} has no data points")]
    EmptyData { chart: usize },

    #[error("Chart {chart} data point {point} is missing `label` or `value`")]
    PointMissingField { chart: usize, point: usize },

    #[error("Chart {chart} data point {point} has a non-numeric `value`")]
    PointValueNotNumeric { chart: usize, point: usize },
}

impl ValidationError {
    /// `true` for the "nothing to export" outcome, which is not a format error.
    #[must_use]
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoChartData)
    }

    /// 1-based position of the failing chart, when the failure is chart-scoped.
    #[must_use]
    pub fn chart_index(&self) -> Option<usize> {
        match self {
            Self::MissingField { chart, .. }
            | Self::FieldNotText { chart, .. }
            | Self::EmptyData { chart }
            | Self::PointMissingField { chart, .. }
            | Self::PointValueNotNumeric { chart, .. } => Some(*chart),
            Self::NotAnObject | Self::NoChartData | Self::MissingCharts => None,
        }
    }
}

/// Validates a parsed document and converts it into typed records.
pub fn validate_document(document: &Value) -> Result<ChartDataDocument, ValidationError> {
    let root = document.as_object().ok_or(ValidationError::NotAnObject)?;

    if root.get(FIELD_HAS_DATA).and_then(Value::as_bool) != Some(true) {
        return Err(ValidationError::NoChartData);
    }

    let charts = root
        .get(FIELD_CHARTS)
        .and_then(Value::as_array)
        .ok_or(ValidationError::MissingCharts)?;

    let records = charts
        .iter()
        .enumerate()
        .map(|(i, chart)| validate_chart(i + 1, chart))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(chart_count = records.len(), "chart data document validated");
    Ok(ChartDataDocument::new(records))
}

/// Boolean verdict for callers that only need pass/fail.
#[must_use]
pub fn is_valid(document: &Value) -> bool {
    validate_document(document).is_ok()
}

fn validate_chart(index: usize, chart: &Value) -> Result<ChartRecord, ValidationError> {
    let empty = Map::new();
    let fields = chart.as_object().unwrap_or(&empty);

    if let Some(field) = REQUIRED_CHART_FIELDS
        .into_iter()
        .find(|field| !fields.contains_key(*field))
    {
        return Err(ValidationError::MissingField {
            chart: index,
            field,
        });
    }
    let title = text_field(fields, index, FIELD_TITLE)?;
    let chart_type = text_field(fields, index, FIELD_TYPE)?;

    let points = fields[FIELD_DATA]
        .as_array()
        .filter(|points| !points.is_empty())
        .ok_or(ValidationError::EmptyData { chart: index })?;

    let data = points
        .iter()
        .enumerate()
        .map(|(j, point)| validate_point(index, j + 1, point))
        .collect::<Result<Vec<_>, _>>()?;

    let mut record = ChartRecord::new(title, chart_type, data);
    record.page_number = fields.get(FIELD_PAGE).and_then(normalize_page_value);
    if let Some(category) = optional_text(fields, FIELD_CATEGORY) {
        record = record.with_category(category);
    }
    if let Some(explanation) = optional_text(fields, FIELD_EXPLANATION) {
        record = record.with_explanation(explanation);
    }
    Ok(record)
}

fn validate_point(chart: usize, point: usize, raw: &Value) -> Result<DataPoint, ValidationError> {
    let fields = raw
        .as_object()
        .filter(|fields| fields.contains_key(FIELD_LABEL) && fields.contains_key(FIELD_VALUE))
        .ok_or(ValidationError::PointMissingField { chart, point })?;

    let value = fields[FIELD_VALUE]
        .as_f64()
        .filter(|value| value.is_finite())
        .ok_or(ValidationError::PointValueNotNumeric { chart, point })?;

    let mut data_point = DataPoint::new(display_json_scalar(&fields[FIELD_LABEL]), value);
    for (key, extra) in fields {
        if key != FIELD_LABEL && key != FIELD_VALUE {
            data_point.extra.insert(key.clone(), extra.clone());
        }
    }
    Ok(data_point)
}

fn text_field(
    fields: &Map<String, Value>,
    chart: usize,
    field: &'static str,
) -> Result<String, ValidationError> {
    fields[field]
        .as_str()
        .map(str::to_owned)
        .ok_or(ValidationError::FieldNotText { chart, field })
}

fn optional_text(fields: &Map<String, Value>, field: &str) -> Option<String> {
    match fields.get(field)? {
        Value::Null => None,
        other => Some(display_json_scalar(other)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ValidationError, is_valid, validate_document};

    fn chart(title: &str) -> serde_json::Value {
        json!({
            "chart_title": title,
            "chart_type": "bar",
            "data": [{"label": "A", "value": 10}, {"label": "B", "value": 20}]
        })
    }

    #[test]
    fn rejects_non_object_document() {
        assert_eq!(
            validate_document(&json!([1, 2, 3])),
            Err(ValidationError::NotAnObject)
        );
    }

    #[test]
    fn missing_or_false_flag_means_no_data() {
        let err = validate_document(&json!({"has_data": false})).unwrap_err();
        assert!(err.is_no_data());
        let err = validate_document(&json!({"charts": [chart("A")]})).unwrap_err();
        assert!(err.is_no_data());
        let err = validate_document(&json!({"has_data": "yes", "charts": []})).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn charts_must_be_an_array() {
        assert_eq!(
            validate_document(&json!({"has_data": true})),
            Err(ValidationError::MissingCharts)
        );
        assert_eq!(
            validate_document(&json!({"has_data": true, "charts": {"a": 1}})),
            Err(ValidationError::MissingCharts)
        );
    }

    #[test]
    fn reports_first_missing_field_with_position() {
        let doc = json!({
            "has_data": true,
            "charts": [chart("ok"), {"chart_title": "x", "data": [{"label": "A", "value": 1}]}]
        });
        let err = validate_document(&doc).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                chart: 2,
                field: "chart_type"
            }
        );
        assert_eq!(err.to_string(), "Chart 2 missing required field `chart_type`");
        assert_eq!(err.chart_index(), Some(2));
    }

    #[test]
    fn non_object_chart_is_missing_every_field() {
        let doc = json!({"has_data": true, "charts": ["not a chart"]});
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::MissingField {
                chart: 1,
                field: "chart_title"
            })
        );
    }

    #[test]
    fn empty_or_non_array_data_is_rejected() {
        let doc = json!({"has_data": true, "charts": [
            {"chart_title": "x", "chart_type": "bar", "data": []}
        ]});
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::EmptyData { chart: 1 })
        );
        let doc = json!({"has_data": true, "charts": [
            {"chart_title": "x", "chart_type": "bar", "data": "A=1"}
        ]});
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::EmptyData { chart: 1 })
        );
    }

    #[test]
    fn single_point_is_the_minimum_accepted() {
        let doc = json!({"has_data": true, "charts": [
            {"chart_title": "x", "chart_type": "line", "data": [{"label": "A", "value": 1}]}
        ]});
        assert!(is_valid(&doc));
    }

    #[test]
    fn data_points_need_label_and_numeric_value() {
        let doc = json!({"has_data": true, "charts": [
            {"chart_title": "x", "chart_type": "bar", "data": [{"label": "A", "value": 1}, {"label": "B"}]}
        ]});
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::PointMissingField { chart: 1, point: 2 })
        );
        let doc = json!({"has_data": true, "charts": [
            {"chart_title": "x", "chart_type": "bar", "data": [{"label": "A", "value": "ten"}]}
        ]});
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::PointValueNotNumeric { chart: 1, point: 1 })
        );
    }

    #[test]
    fn title_must_be_text() {
        let doc = json!({"has_data": true, "charts": [
            {"chart_title": 7, "chart_type": "bar", "data": [{"label": "A", "value": 1}]}
        ]});
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::FieldNotText {
                chart: 1,
                field: "chart_title"
            })
        );
    }

    #[test]
    fn text_fields_are_checked_before_data() {
        let doc = json!({"has_data": true, "charts": [
            {"chart_title": 7, "chart_type": "bar", "data": [{"label": "A"}]}
        ]});
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::FieldNotText {
                chart: 1,
                field: "chart_title"
            })
        );
        let doc = json!({"has_data": true, "charts": [
            {"chart_title": "x", "chart_type": null, "data": []}
        ]});
        assert_eq!(
            validate_document(&doc),
            Err(ValidationError::FieldNotText {
                chart: 1,
                field: "chart_type"
            })
        );
    }

    #[test]
    fn valid_document_keeps_order_and_metadata() {
        let doc = json!({"has_data": true, "charts": [
            {
                "chart_title": "Revenue",
                "chart_type": "bar",
                "page_number": 3,
                "category": "Finance",
                "explanation": "Quarterly revenue",
                "data": [{"label": "Q1", "value": 10, "unit": "k"}, {"label": 2024, "value": 20.5}]
            },
            chart("Second")
        ]});
        let validated = validate_document(&doc).expect("valid");
        assert_eq!(validated.len(), 2);
        let first = &validated.charts[0];
        assert_eq!(first.title, "Revenue");
        assert_eq!(first.page_number.as_deref(), Some("3"));
        assert_eq!(first.category.as_deref(), Some("Finance"));
        assert_eq!(first.explanation_text(), "Quarterly revenue");
        assert_eq!(first.data[0].extra.get("unit"), Some(&json!("k")));
        assert_eq!(first.data[1].label, "2024");
        assert_eq!(validated.charts[1].title, "Second");
    }
}
