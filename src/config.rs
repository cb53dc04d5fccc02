use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::Viewport;
use crate::error::{ExportError, ExportResult};
use crate::render::Color;

/// Display language of every user-facing label in both artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Language {
    #[default]
    #[value(name = "en")]
    English,
    #[value(name = "zh")]
    Chinese,
}

/// Public exporter configuration.
///
/// This type is serializable so a run's setup can be kept next to the input
/// files and passed with `--config`. Missing fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Directory receiving `<stem>.xlsx` and `<stem>.pdf`.
    pub output_dir: PathBuf,
    pub labels: ReportLabels,
    pub style: ReportStyle,
    pub pages: PageLayout,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("."),
            labels: ReportLabels::default(),
            style: ReportStyle::default(),
            pages: PageLayout::default(),
        }
    }
}

impl ExportConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON config file; absent keys keep their defaults.
    pub fn from_json_file(path: &Path) -> ExportResult<Self> {
        let raw = fs::read_to_string(path).map_err(|source| ExportError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|err| {
            ExportError::InvalidConfig(format!("failed to parse `{}`: {err}", path.display()))
        })?;
        config.validate()?;
        Ok(config)
    }

    #[must_use]
    pub fn with_output_dir(mut self, output_dir: impl Into<PathBuf>) -> Self {
        self.output_dir = output_dir.into();
        self
    }

    #[must_use]
    pub fn with_language(mut self, language: Language) -> Self {
        self.labels = ReportLabels::for_language(language);
        self
    }

    #[must_use]
    pub fn with_labels(mut self, labels: ReportLabels) -> Self {
        self.labels = labels;
        self
    }

    #[must_use]
    pub fn with_pages(mut self, pages: PageLayout) -> Self {
        self.pages = pages;
        self
    }

    pub fn validate(&self) -> ExportResult<()> {
        for (name, page) in [
            ("summary", self.pages.summary),
            ("chart", self.pages.chart),
        ] {
            if !page.is_valid() {
                return Err(ExportError::InvalidConfig(format!(
                    "{name} page size must be > 0 (got {}x{})",
                    page.width, page.height
                )));
            }
        }
        self.style.validate()
    }
}

/// Page sizes in PDF points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLayout {
    pub summary: Viewport,
    pub chart: Viewport,
}

impl Default for PageLayout {
    fn default() -> Self {
        Self {
            summary: Viewport::from_inches(8.5, 11.0),
            chart: Viewport::from_inches(10.0, 7.0),
        }
    }
}

/// Colors and fonts shared by both renderers. Colors are `0xRRGGBB`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportStyle {
    /// Pango family list; CJK-capable fonts keep Chinese titles legible.
    pub font_family: String,
    pub series_color: u32,
    pub series_alpha: f64,
    pub bar_edge_color: u32,
    pub grid_alpha: f64,
    pub footer_color: u32,
    pub header_fill_color: u32,
    pub max_column_width: f64,
}

impl Default for ReportStyle {
    fn default() -> Self {
        Self {
            font_family: "DejaVu Sans, Noto Sans CJK SC, Arial Unicode MS, Sans".to_owned(),
            series_color: 0x4682B4,
            series_alpha: 0.8,
            bar_edge_color: 0x000080,
            grid_alpha: 0.3,
            footer_color: 0x808080,
            header_fill_color: 0xDDEBF7,
            max_column_width: 50.0,
        }
    }
}

impl ReportStyle {
    pub fn validate(&self) -> ExportResult<()> {
        for (name, alpha) in [
            ("series_alpha", self.series_alpha),
            ("grid_alpha", self.grid_alpha),
        ] {
            if !alpha.is_finite() || !(0.0..=1.0).contains(&alpha) {
                return Err(ExportError::InvalidConfig(format!(
                    "{name} must be in [0, 1]"
                )));
            }
        }
        for (name, rgb) in [
            ("series_color", self.series_color),
            ("bar_edge_color", self.bar_edge_color),
            ("footer_color", self.footer_color),
            ("header_fill_color", self.header_fill_color),
        ] {
            if rgb > 0xFF_FFFF {
                return Err(ExportError::InvalidConfig(format!(
                    "{name} must be a 0xRRGGBB value"
                )));
            }
        }
        if !self.max_column_width.is_finite() || self.max_column_width <= 0.0 {
            return Err(ExportError::InvalidConfig(
                "max_column_width must be > 0".to_owned(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn series(&self) -> Color {
        Color::from_hex(self.series_color)
    }

    #[must_use]
    pub fn bar_edge(&self) -> Color {
        Color::from_hex(self.bar_edge_color)
    }

    #[must_use]
    pub fn footer(&self) -> Color {
        Color::from_hex(self.footer_color)
    }
}

/// Every piece of display text, with `{placeholder}` templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportLabels {
    pub summary_sheet: String,
    pub summary_headers: [String; 6],
    pub label_header: String,
    pub value_header: String,
    pub metadata_headers: [String; 2],
    pub metadata_keys: [String; 4],
    /// `{page}`
    pub source_page: String,
    pub not_available: String,
    /// Prefix before `{index}-` for mid-length sheet titles.
    pub sheet_index_prefix: String,
    /// `{index}`
    pub sheet_fallback: String,
    pub report_title: String,
    /// `{count}`
    pub chart_count: String,
    pub chart_list_heading: String,
    /// `{index}`, `{page}`, `{title}`
    pub summary_entry_page: String,
    /// `{index}`, `{title}`, `{category}`
    pub summary_entry_category: String,
    pub general_category: String,
    /// `{count}`
    pub more_entries: String,
    /// `{page}`
    pub chart_source: String,
    pub x_axis: String,
    pub y_axis: String,
}

impl Default for ReportLabels {
    fn default() -> Self {
        Self::english()
    }
}

impl ReportLabels {
    #[must_use]
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::English => Self::english(),
            Language::Chinese => Self::chinese(),
        }
    }

    #[must_use]
    pub fn english() -> Self {
        Self {
            summary_sheet: "Summary".to_owned(),
            summary_headers: [
                "No.".to_owned(),
                "Title".to_owned(),
                "Type".to_owned(),
                "Data Points".to_owned(),
                "Source".to_owned(),
                "Explanation".to_owned(),
            ],
            label_header: "Label".to_owned(),
            value_header: "Value".to_owned(),
            metadata_headers: ["Property".to_owned(), "Value".to_owned()],
            metadata_keys: [
                "Chart Title".to_owned(),
                "Chart Type".to_owned(),
                "Source".to_owned(),
                "Explanation".to_owned(),
            ],
            source_page: "Page {page}".to_owned(),
            not_available: "N/A".to_owned(),
            sheet_index_prefix: "C".to_owned(),
            sheet_fallback: "Chart {index}".to_owned(),
            report_title: "Chart Data Report".to_owned(),
            chart_count: "Charts generated: {count}".to_owned(),
            chart_list_heading: "Chart list:".to_owned(),
            summary_entry_page: "{index}. Page {page}: {title}".to_owned(),
            summary_entry_category: "{index}. {title} ({category})".to_owned(),
            general_category: "General".to_owned(),
            more_entries: "… and {count} more".to_owned(),
            chart_source: "(Source: page {page})".to_owned(),
            x_axis: "Category".to_owned(),
            y_axis: "Value".to_owned(),
        }
    }

    #[must_use]
    pub fn chinese() -> Self {
        Self {
            summary_sheet: "摘要".to_owned(),
            summary_headers: [
                "图表编号".to_owned(),
                "标题".to_owned(),
                "类型".to_owned(),
                "数据点数".to_owned(),
                "来源页".to_owned(),
                "说明".to_owned(),
            ],
            label_header: "标签".to_owned(),
            value_header: "数值".to_owned(),
            metadata_headers: ["属性".to_owned(), "值".to_owned()],
            metadata_keys: [
                "图表标题".to_owned(),
                "图表类型".to_owned(),
                "来源页".to_owned(),
                "说明".to_owned(),
            ],
            source_page: "第 {page} 页".to_owned(),
            not_available: "N/A".to_owned(),
            sheet_index_prefix: "图".to_owned(),
            sheet_fallback: "图表{index}".to_owned(),
            report_title: "合同数据分析报告".to_owned(),
            chart_count: "共生成图表: {count}".to_owned(),
            chart_list_heading: "图表列表:".to_owned(),
            summary_entry_page: "{index}. 第 {page} 页: {title}".to_owned(),
            summary_entry_category: "{index}. {title} ({category})".to_owned(),
            general_category: "通用".to_owned(),
            more_entries: "… 另有 {count} 个图表".to_owned(),
            chart_source: "(来源: 第 {page} 页)".to_owned(),
            x_axis: "类别".to_owned(),
            y_axis: "数值".to_owned(),
        }
    }
}

/// Substitutes `{name}` placeholders in a label template.
#[must_use]
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    values
        .iter()
        .fold(template.to_owned(), |text, (name, value)| {
            text.replace(&format!("{{{name}}}"), value)
        })
}
