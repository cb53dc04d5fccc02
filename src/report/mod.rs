//! Paginated document renderer.
//!
//! Page one is the summary page, followed by one chart page per chart in
//! input order. Pages are laid out as backend-agnostic [`RenderFrame`]s and
//! then handed to a [`Renderer`]; the PDF backend lives behind the
//! `cairo-backend` feature.

mod chart_page;
mod summary_page;
pub mod text_layout;

pub use chart_page::{
    PlotArea, build_chart_page, format_tick_label, format_value_label, title_lines,
};
pub use summary_page::{build_summary_page, summary_entry};

use tracing::debug;

use crate::config::ExportConfig;
use crate::core::ChartDataDocument;
use crate::error::ExportResult;
use crate::render::{RenderFrame, Renderer};

/// Lays out every page of the report.
pub fn build_report_pages(
    document: &ChartDataDocument,
    config: &ExportConfig,
) -> ExportResult<Vec<RenderFrame>> {
    let mut pages = Vec::with_capacity(document.len() + 1);
    pages.push(build_summary_page(document, config));
    for (index, chart) in document.numbered() {
        let page = build_chart_page(chart, config)?;
        debug!(
            index,
            kind = ?chart.plot_kind(),
            texts = page.texts.len(),
            "laid out chart page"
        );
        pages.push(page);
    }
    Ok(pages)
}

/// Lays out and draws the report through `renderer`, returning the page count.
pub fn render_report<R: Renderer>(
    document: &ChartDataDocument,
    config: &ExportConfig,
    renderer: &mut R,
) -> ExportResult<usize> {
    let pages = build_report_pages(document, config)?;
    for page in &pages {
        renderer.render(page)?;
    }
    Ok(pages.len())
}

/// Renders the report into PDF bytes.
#[cfg(feature = "cairo-backend")]
pub fn export_report(document: &ChartDataDocument, config: &ExportConfig) -> ExportResult<Vec<u8>> {
    use crate::render::PdfRenderer;

    let mut renderer = PdfRenderer::new(config.pages.summary, config.style.font_family.clone())?;
    let pages = render_report(document, config, &mut renderer)?;
    let stats = renderer.stats();
    debug!(
        backend = renderer.backend_name(),
        pages,
        lines = stats.lines_drawn,
        rects = stats.rects_drawn,
        texts = stats.texts_drawn,
        "rendered pdf report"
    );
    renderer.finish()
}

/// Without a drawing backend the report cannot be produced.
#[cfg(not(feature = "cairo-backend"))]
pub fn export_report(document: &ChartDataDocument, config: &ExportConfig) -> ExportResult<Vec<u8>> {
    use crate::error::ExportError;

    // Layout still runs so geometry errors surface the same way with or
    // without the backend.
    build_report_pages(document, config)?;
    Err(ExportError::BackendUnavailable("cairo-backend"))
}

#[cfg(test)]
mod tests {
    use super::{build_report_pages, render_report};
    use crate::config::ExportConfig;
    use crate::core::{ChartDataDocument, ChartRecord, DataPoint};
    use crate::render::NullRenderer;

    fn document() -> ChartDataDocument {
        ChartDataDocument::new(vec![
            ChartRecord::new("Revenue", "bar", vec![DataPoint::new("Q1", 10.0)]),
            ChartRecord::new("Trend", "line", vec![DataPoint::new("Jan", 2.0)]),
        ])
    }

    #[test]
    fn summary_page_comes_first() {
        let config = ExportConfig::new();
        let pages = build_report_pages(&document(), &config).expect("pages");
        assert_eq!(pages.len(), 3);
        assert_eq!(pages[0].viewport, config.pages.summary);
        assert!(pages[1..].iter().all(|page| page.viewport == config.pages.chart));
        assert_eq!(pages[1].texts[0].text, "Revenue");
        assert_eq!(pages[2].texts[0].text, "Trend");
    }

    #[test]
    fn renderer_sees_every_page() {
        let mut renderer = NullRenderer::default();
        let count = render_report(&document(), &ExportConfig::new(), &mut renderer).expect("render");
        assert_eq!(count, 3);
        assert_eq!(renderer.pages_rendered, 3);
    }
}
