//! Workbook renderer.
//!
//! The workbook is first materialized as a [`WorkbookLayout`] (sheet names,
//! cell grid, styling hints) with no spreadsheet backend involved; `writer`
//! then maps that layout onto `rust_xlsxwriter`.

mod sheet_name;
mod writer;

pub use sheet_name::{
    MAX_SHEET_NAME_CHARS, PREFIXED_TITLE_MAX_CHARS, SheetNamer, VERBATIM_TITLE_MAX_CHARS,
    derive_sheet_name,
};
pub use writer::write_workbook;

use serde_json::Value;
use tracing::debug;

use crate::config::{ExportConfig, ReportLabels, fill_template};
use crate::core::{ChartDataDocument, ChartRecord, SourceRef};
use crate::error::ExportResult;

/// Blank rows between a chart's data table and its metadata block.
pub const METADATA_GAP_ROWS: usize = 2;
/// Padding added to the longest cell when sizing summary columns.
pub const COLUMN_WIDTH_PADDING: f64 = 2.0;

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Character length of the displayed value, as used for column sizing.
    #[must_use]
    pub fn display_len(&self) -> usize {
        match self {
            Self::Text(text) => text.chars().count(),
            Self::Number(number) => format_number(*number).chars().count(),
            Self::Empty => 0,
        }
    }

    fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    fn from_json(value: Option<&Value>) -> Self {
        match value {
            None | Some(Value::Null) => Self::Empty,
            Some(Value::Number(number)) => number.as_f64().map_or(Self::Empty, Self::Number),
            Some(Value::String(text)) => Self::Text(text.clone()),
            Some(other) => Self::Text(other.to_string()),
        }
    }
}

/// Cosmetic formatting requested for a sheet.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetStyling {
    pub header_row: u32,
    pub column_widths: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub name: String,
    /// Row-major cell grid; row index equals the spreadsheet row.
    pub rows: Vec<Vec<CellValue>>,
    pub styling: Option<SheetStyling>,
}

impl SheetLayout {
    #[must_use]
    pub fn cell(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WorkbookLayout {
    pub sheets: Vec<SheetLayout>,
}

impl WorkbookLayout {
    #[must_use]
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|sheet| sheet.name.as_str()).collect()
    }
}

/// Builds the summary sheet followed by one sheet per chart, in input order.
#[must_use]
pub fn build_workbook_layout(document: &ChartDataDocument, config: &ExportConfig) -> WorkbookLayout {
    let labels = &config.labels;
    let mut sheets = Vec::with_capacity(document.len() + 1);
    sheets.push(build_summary_sheet(document, config));

    let mut namer = SheetNamer::new(labels, &[labels.summary_sheet.as_str()]);
    for (index, chart) in document.numbered() {
        let name = namer.assign(index, &chart.title);
        debug!(index, sheet = %name, points = chart.point_count(), "laid out chart sheet");
        sheets.push(build_chart_sheet(name, chart, labels));
    }

    WorkbookLayout { sheets }
}

/// Renders the workbook into `.xlsx` bytes.
pub fn export_workbook(document: &ChartDataDocument, config: &ExportConfig) -> ExportResult<Vec<u8>> {
    let layout = build_workbook_layout(document, config);
    write_workbook(&layout, &config.style)
}

/// Display text for a chart's source column.
#[must_use]
pub fn source_cell_text(chart: &ChartRecord, labels: &ReportLabels) -> String {
    match chart.source() {
        SourceRef::Page(page) => fill_template(&labels.source_page, &[("page", page)]),
        SourceRef::Category(category) => category.to_owned(),
        SourceRef::Unknown => labels.not_available.clone(),
    }
}

fn build_summary_sheet(document: &ChartDataDocument, config: &ExportConfig) -> SheetLayout {
    let labels = &config.labels;
    let mut rows: Vec<Vec<CellValue>> = Vec::with_capacity(document.len() + 1);
    rows.push(labels.summary_headers.iter().map(CellValue::text).collect());
    for (index, chart) in document.numbered() {
        rows.push(vec![
            CellValue::Number(index as f64),
            CellValue::text(&chart.title),
            CellValue::text(&chart.chart_type),
            CellValue::Number(chart.point_count() as f64),
            CellValue::Text(source_cell_text(chart, labels)),
            CellValue::text(chart.explanation_text()),
        ]);
    }

    let column_widths = fitted_column_widths(&rows, config.style.max_column_width);
    SheetLayout {
        name: labels.summary_sheet.clone(),
        rows,
        styling: Some(SheetStyling {
            header_row: 0,
            column_widths,
        }),
    }
}

fn build_chart_sheet(name: String, chart: &ChartRecord, labels: &ReportLabels) -> SheetLayout {
    let extra_columns = chart.extra_columns();
    let mut rows = Vec::with_capacity(chart.point_count() + METADATA_GAP_ROWS + 6);

    let mut header = vec![
        CellValue::text(&labels.label_header),
        CellValue::text(&labels.value_header),
    ];
    header.extend(extra_columns.iter().map(|column| CellValue::text(*column)));
    rows.push(header);

    for point in &chart.data {
        let mut row = vec![CellValue::text(&point.label), CellValue::Number(point.value)];
        row.extend(
            extra_columns
                .iter()
                .map(|column| CellValue::from_json(point.extra.get(*column))),
        );
        rows.push(row);
    }

    rows.extend(std::iter::repeat_n(Vec::new(), METADATA_GAP_ROWS));

    rows.push(labels.metadata_headers.iter().map(CellValue::text).collect());
    let metadata_values = [
        chart.title.clone(),
        chart.chart_type.clone(),
        source_cell_text(chart, labels),
        chart.explanation_text().to_owned(),
    ];
    for (key, value) in labels.metadata_keys.iter().zip(metadata_values) {
        rows.push(vec![CellValue::text(key), CellValue::Text(value)]);
    }

    SheetLayout {
        name,
        rows,
        styling: None,
    }
}

fn fitted_column_widths(rows: &[Vec<CellValue>], max_width: f64) -> Vec<f64> {
    let column_count = rows.iter().map(Vec::len).max().unwrap_or_default();
    (0..column_count)
        .map(|col| {
            let longest = rows
                .iter()
                .filter_map(|row| row.get(col))
                .map(CellValue::display_len)
                .max()
                .unwrap_or_default();
            (longest as f64 + COLUMN_WIDTH_PADDING).min(max_width)
        })
        .collect()
}

fn format_number(number: f64) -> String {
    if number.fract() == 0.0 && number.abs() < 1e15 {
        format!("{number:.0}")
    } else {
        number.to_string()
    }
}
