#![cfg(feature = "cairo-backend")]

use chart_export::render::{PdfRenderer, Renderer};
use chart_export::report::{build_report_pages, export_report};
use chart_export::{ChartDataDocument, ChartRecord, DataPoint, ExportConfig};

fn document() -> ChartDataDocument {
    ChartDataDocument::new(vec![
        ChartRecord::new("Revenue", "bar", vec![DataPoint::new("Q1", 10.0)]),
        ChartRecord::new("合同金额", "line", vec![DataPoint::new("一月", 3.0)])
            .with_explanation("说明文字"),
    ])
}

#[test]
fn report_is_a_pdf_document() {
    let bytes = export_report(&document(), &ExportConfig::new()).expect("pdf");
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn renderer_draws_each_page_once() {
    let config = ExportConfig::new();
    let pages = build_report_pages(&document(), &config).expect("pages");
    let mut renderer = PdfRenderer::new(config.pages.summary, config.style.font_family.clone())
        .expect("renderer");
    for page in &pages {
        renderer.render(page).expect("page");
    }
    let stats = renderer.stats();
    assert_eq!(stats.pages_drawn, 3);
    assert_eq!(
        stats.texts_drawn,
        pages.iter().map(|page| page.texts.len()).sum::<usize>()
    );
    assert!(renderer.finish().expect("bytes").starts_with(b"%PDF"));
}

#[test]
fn three_charts_give_four_pages() {
    let document = ChartDataDocument::new(vec![
        ChartRecord::new("Revenue", "bar", vec![DataPoint::new("Q1", 120.0)]),
        ChartRecord::new("Margin", "line", vec![DataPoint::new("Q1", 0.2), DataPoint::new("Q2", 0.25)]),
        ChartRecord::new("Headcount", "bar", vec![DataPoint::new("Sales", 14.0)]),
    ]);
    let config = ExportConfig::new();
    let pages = build_report_pages(&document, &config).expect("pages");
    let mut renderer = PdfRenderer::new(config.pages.summary, config.style.font_family.clone())
        .expect("renderer");
    for page in &pages {
        renderer.render(page).expect("page");
    }
    assert_eq!(renderer.stats().pages_drawn, 4);
    assert!(renderer.finish().expect("bytes").starts_with(b"%PDF"));
}
