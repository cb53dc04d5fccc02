//! Export pipeline: load → validate → workbook → document.
//!
//! Loading and validation are fatal. The two renderers run independently and
//! their failures are recorded per artifact so one never blocks the other.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::config::ExportConfig;
use crate::core::ChartDataDocument;
use crate::error::{ExportError, ExportResult};
use crate::report::export_report;
use crate::validation::validate_document;
use crate::workbook::export_workbook;

pub const WORKBOOK_EXTENSION: &str = "xlsx";
pub const DOCUMENT_EXTENSION: &str = "pdf";

/// Outcome of one renderer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactStatus {
    pub path: PathBuf,
    /// Renderer or write failure, rendered as text.
    pub error: Option<String>,
}

impl ArtifactStatus {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }

    /// Whether the artifact rendered and is actually present on disk.
    #[must_use]
    pub fn produced(&self) -> bool {
        self.is_ok() && self.path.exists()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub chart_count: usize,
    pub workbook: ArtifactStatus,
    pub document: ArtifactStatus,
}

impl ExportReport {
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.workbook.is_ok() && self.document.is_ok()
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &ArtifactStatus> {
        [&self.workbook, &self.document].into_iter()
    }
}

/// Reads and parses the input file without interpreting its shape.
pub fn load_document(path: &Path) -> ExportResult<Value> {
    let text = fs::read_to_string(path).map_err(|source| {
        if source.kind() == ErrorKind::NotFound {
            ExportError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ExportError::Read {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;
    serde_json::from_str(&text).map_err(|source| ExportError::MalformedJson {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads and validates `path` into a chart document.
pub fn load_chart_document(path: &Path) -> ExportResult<ChartDataDocument> {
    let raw = load_document(path)?;
    let document = validate_document(&raw)?;
    debug!(path = %path.display(), charts = document.len(), "validated chart document");
    Ok(document)
}

/// `<stem>.xlsx` and `<stem>.pdf` inside `output_dir`.
#[must_use]
pub fn output_paths(input: &Path, output_dir: &Path) -> (PathBuf, PathBuf) {
    let stem = input
        .file_stem()
        .map_or_else(|| "charts".into(), |stem| stem.to_string_lossy());
    (
        output_dir.join(format!("{stem}.{WORKBOOK_EXTENSION}")),
        output_dir.join(format!("{stem}.{DOCUMENT_EXTENSION}")),
    )
}

/// Runs the whole export for one input file.
///
/// Returns `Err` only for load and validation failures; renderer failures are
/// reported through [`ExportReport`].
pub fn run_export(input: &Path, config: &ExportConfig) -> ExportResult<ExportReport> {
    config.validate()?;
    let document = load_chart_document(input)?;
    Ok(export_document(&document, input, config))
}

/// Renders both artifacts for an already validated document.
#[must_use]
pub fn export_document(
    document: &ChartDataDocument,
    input: &Path,
    config: &ExportConfig,
) -> ExportReport {
    let (workbook_path, document_path) = output_paths(input, &config.output_dir);

    let workbook = write_artifact(workbook_path, || export_workbook(document, config));
    let document_status = write_artifact(document_path, || export_report(document, config));

    ExportReport {
        chart_count: document.len(),
        workbook,
        document: document_status,
    }
}

fn write_artifact(
    path: PathBuf,
    render: impl FnOnce() -> ExportResult<Vec<u8>>,
) -> ArtifactStatus {
    let result = render().and_then(|bytes| {
        fs::write(&path, &bytes).map_err(|source| ExportError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(bytes.len())
    });

    match result {
        Ok(bytes) => {
            info!(path = %path.display(), bytes, "wrote artifact");
            ArtifactStatus { path, error: None }
        }
        Err(err) => {
            warn!(path = %path.display(), error = %err, "artifact failed");
            ArtifactStatus {
                path,
                error: Some(err.to_string()),
            }
        }
    }
}
