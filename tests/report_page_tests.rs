use chart_export::report::{build_report_pages, render_report};
use chart_export::render::NullRenderer;
use chart_export::{ChartDataDocument, ChartRecord, DataPoint, ExportConfig, Language};

fn three_charts() -> ChartDataDocument {
    ChartDataDocument::new(vec![
        ChartRecord::new(
            "Contract value by quarter",
            "bar",
            vec![DataPoint::new("Q1", 1200.0), DataPoint::new("Q2", 950.0)],
        )
        .with_page_number("4")
        .with_explanation("Signed contracts only"),
        ChartRecord::new(
            "Headcount",
            "line",
            vec![
                DataPoint::new("2021", 40.0),
                DataPoint::new("2022", 52.0),
                DataPoint::new("2023", 47.0),
            ],
        )
        .with_category("HR"),
        ChartRecord::new("Losses", "bar", vec![DataPoint::new("A", -20.0), DataPoint::new("B", 5.0)]),
    ])
}

#[test]
fn report_has_summary_plus_one_page_per_chart() {
    let mut renderer = NullRenderer::default();
    let pages = render_report(&three_charts(), &ExportConfig::new(), &mut renderer).expect("render");
    assert_eq!(pages, 4);
    assert_eq!(renderer.pages_rendered, 4);
}

#[test]
fn chart_pages_follow_input_order() {
    let pages = build_report_pages(&three_charts(), &ExportConfig::new()).expect("pages");
    let titles: Vec<&str> = pages[1..].iter().map(|page| page.texts[0].text.as_str()).collect();
    assert_eq!(titles, ["Contract value by quarter", "Headcount", "Losses"]);

    let summary: Vec<&str> = pages[0].text_contents().collect();
    assert!(summary.contains(&"1. Page 4: Contract value by quarter"));
    assert!(summary.contains(&"2. Headcount (HR)"));
    assert!(summary.contains(&"3. Losses (General)"));
}

#[test]
fn layout_is_deterministic() {
    let config = ExportConfig::new();
    let first = build_report_pages(&three_charts(), &config).expect("pages");
    let second = build_report_pages(&three_charts(), &config).expect("pages");
    assert_eq!(first, second);
}

#[test]
fn chinese_labels_reach_the_pages() {
    let config = ExportConfig::new().with_language(Language::Chinese);
    let pages = build_report_pages(&three_charts(), &config).expect("pages");
    let chart_texts: Vec<&str> = pages[1].text_contents().collect();
    assert!(chart_texts.contains(&"(来源: 第 4 页)"));
    assert!(chart_texts.contains(&"类别"));
    assert!(chart_texts.contains(&"数值"));
}

#[test]
fn negative_bars_hang_below_the_baseline() {
    let pages = build_report_pages(&three_charts(), &ExportConfig::new()).expect("pages");
    let losses = &pages[3];
    let (negative, positive) = (&losses.rects[0], &losses.rects[1]);
    assert!(negative.y >= positive.y + positive.height - 1e-9);
}

#[test]
fn two_point_bar_chart_round_trip() {
    let raw = serde_json::json!({
        "has_data": true,
        "charts": [{
            "chart_title": "AB",
            "chart_type": "bar",
            "data": [{"label": "A", "value": 10}, {"label": "B", "value": 20}]
        }]
    });
    let document = chart_export::validate_document(&raw).expect("valid");
    let config = ExportConfig::new();

    let layout = chart_export::workbook::build_workbook_layout(&document, &config);
    assert_eq!(
        layout.sheets[0].cell(1, 3),
        Some(&chart_export::workbook::CellValue::Number(2.0))
    );

    let pages = build_report_pages(&document, &config).expect("pages");
    let page = &pages[1];
    assert_eq!(page.rects.len(), 2);
    assert!(page.rects[1].height > page.rects[0].height);
    let texts: Vec<&str> = page.text_contents().collect();
    for expected in ["A", "B", "10", "20"] {
        assert!(texts.contains(&expected), "missing {expected}");
    }
}

#[test]
fn values_near_float_limits_still_render() {
    let document = ChartDataDocument::new(vec![
        ChartRecord::new(
            "Extremes",
            "line",
            vec![DataPoint::new("high", 1.7e308), DataPoint::new("low", -1.7e308)],
        ),
        ChartRecord::new("Huge bar", "bar", vec![DataPoint::new("only", 1.7e308)]),
    ]);
    let pages = build_report_pages(&document, &ExportConfig::new()).expect("pages");
    assert_eq!(pages.len(), 3);
    for page in &pages {
        page.validate().expect("finite page geometry");
    }
    let mut renderer = NullRenderer::default();
    render_report(&document, &ExportConfig::new(), &mut renderer).expect("render");
}
