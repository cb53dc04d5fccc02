use std::io::{Cursor, Read};

use chart_export::workbook::{CellValue, build_workbook_layout, export_workbook};
use chart_export::{ChartDataDocument, ChartRecord, DataPoint, ExportConfig, Language};
use serde_json::json;

fn document() -> ChartDataDocument {
    ChartDataDocument::new(vec![
        ChartRecord::new(
            "Revenue",
            "bar",
            vec![
                DataPoint::new("Q1", 10.0).with_extra("unit", json!("USD")),
                DataPoint::new("Q2", 12.5),
            ],
        )
        .with_page_number("3"),
        ChartRecord::new("quarterly revenue mix", "line", vec![DataPoint::new("x", 1.0)]),
        ChartRecord::new(
            "an extremely long chart title that cannot fit",
            "bar",
            vec![DataPoint::new("y", 2.0)],
        ),
    ])
}

fn zip_entry(bytes: &[u8], name: &str) -> String {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("xlsx is a zip archive");
    let mut entry = archive.by_name(name).expect("entry present");
    let mut text = String::new();
    entry.read_to_string(&mut text).expect("utf-8 entry");
    text
}

#[test]
fn workbook_lists_summary_then_chart_sheets() {
    let bytes = export_workbook(&document(), &ExportConfig::new()).expect("workbook");
    let workbook_xml = zip_entry(&bytes, "xl/workbook.xml");

    let positions: Vec<usize> = [
        "name=\"Summary\"",
        "name=\"Revenue\"",
        "name=\"C2-quarterly revenue mix\"",
        "name=\"Chart 3\"",
    ]
    .iter()
    .map(|needle| workbook_xml.find(needle).expect(needle))
    .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));
    assert_eq!(workbook_xml.matches("<sheet ").count(), 4);
}

#[test]
fn chart_sheet_contains_data_extra_columns_and_metadata() {
    let layout = build_workbook_layout(&document(), &ExportConfig::new());
    let sheet = &layout.sheets[1];
    assert_eq!(sheet.cell(0, 2), Some(&CellValue::Text("unit".into())));
    assert_eq!(sheet.cell(1, 2), Some(&CellValue::Text("USD".into())));
    assert_eq!(sheet.cell(2, 2), Some(&CellValue::Empty));
    assert_eq!(sheet.cell(2, 1), Some(&CellValue::Number(12.5)));

    let bytes = export_workbook(&document(), &ExportConfig::new()).expect("workbook");
    let shared = zip_entry(&bytes, "xl/sharedStrings.xml");
    for expected in ["Label", "Value", "Property", "Chart Title", "Page 3"] {
        assert!(shared.contains(expected), "missing {expected}");
    }
}

#[test]
fn chinese_workbook_uses_chinese_sheet_and_headers() {
    let config = ExportConfig::new().with_language(Language::Chinese);
    let bytes = export_workbook(&document(), &config).expect("workbook");
    let workbook_xml = zip_entry(&bytes, "xl/workbook.xml");
    assert!(workbook_xml.contains("name=\"摘要\""));
    assert!(workbook_xml.contains("name=\"图表3\""));
    let shared = zip_entry(&bytes, "xl/sharedStrings.xml");
    assert!(shared.contains("第 3 页"));
}

#[test]
fn empty_document_still_has_summary_sheet() {
    let bytes = export_workbook(&ChartDataDocument::new(Vec::new()), &ExportConfig::new())
        .expect("workbook");
    let workbook_xml = zip_entry(&bytes, "xl/workbook.xml");
    assert_eq!(workbook_xml.matches("<sheet ").count(), 1);
}
