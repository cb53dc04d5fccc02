//! chart-export: turns a chart-data JSON document into an Excel workbook and
//! a paginated PDF report.
//!
//! The crate keeps a strict split between layout and output backends:
//! workbooks are built as a [`workbook::WorkbookLayout`] before
//! `rust_xlsxwriter` sees them, and report pages are built as
//! [`render::RenderFrame`]s before any drawing backend does.

pub mod config;
pub mod core;
pub mod error;
pub mod pipeline;
pub mod render;
pub mod report;
pub mod telemetry;
pub mod validation;
pub mod workbook;

pub use config::{ExportConfig, Language, PageLayout, ReportLabels, ReportStyle};
pub use crate::core::{ChartDataDocument, ChartRecord, DataPoint, PlotKind};
pub use error::{ExportError, ExportResult};
pub use pipeline::{ArtifactStatus, ExportReport, run_export};
pub use validation::{ValidationError, validate_document};
