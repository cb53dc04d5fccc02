use crate::config::{ExportConfig, fill_template};
use crate::core::{ChartDataDocument, ChartRecord, SourceRef};
use crate::render::{Color, RenderFrame, TextEmphasis, TextHAlign, TextPrimitive};

use super::text_layout::truncate_to_width;

pub const SUMMARY_TITLE_FONT: f64 = 18.0;
pub const SUMMARY_BODY_FONT: f64 = 11.0;
pub const SUMMARY_LINE_HEIGHT: f64 = 16.0;

const TITLE_TOP_RATIO: f64 = 0.05;
const BODY_TOP_RATIO: f64 = 0.15;
const BODY_LEFT_RATIO: f64 = 0.1;
const BODY_BOTTOM_RATIO: f64 = 0.95;

/// Chart-list line for one chart on the summary page.
#[must_use]
pub fn summary_entry(index: usize, chart: &ChartRecord, config: &ExportConfig) -> String {
    let labels = &config.labels;
    let index = index.to_string();
    let (template, source) = match chart.source() {
        SourceRef::Page(page) => (&labels.summary_entry_page, ("page", page)),
        SourceRef::Category(category) => (&labels.summary_entry_category, ("category", category)),
        SourceRef::Unknown => (
            &labels.summary_entry_category,
            ("category", labels.general_category.as_str()),
        ),
    };
    fill_template(template, &[
        ("index", index.as_str()),
        ("title", chart.title.as_str()),
        source,
    ])
}

/// Lays out the single summary page: title, chart count and chart list.
///
/// A list too long for the page ends with a "… and K more" line instead of
/// spilling onto another page.
#[must_use]
pub fn build_summary_page(document: &ChartDataDocument, config: &ExportConfig) -> RenderFrame {
    let labels = &config.labels;
    let viewport = config.pages.summary;
    let width = viewport.width_f64();
    let height = viewport.height_f64();
    let mut frame = RenderFrame::new(viewport);

    frame.push_text(
        TextPrimitive::new(
            labels.report_title.clone(),
            width / 2.0,
            height * TITLE_TOP_RATIO,
            SUMMARY_TITLE_FONT,
            Color::BLACK,
            TextHAlign::Center,
        )
        .with_emphasis(TextEmphasis::Bold),
    );

    let left = width * BODY_LEFT_RATIO;
    let max_line_width = width - 2.0 * left;
    let top = height * BODY_TOP_RATIO;
    let capacity = ((height * BODY_BOTTOM_RATIO - top) / SUMMARY_LINE_HEIGHT).floor() as usize;

    let mut lines: Vec<Option<String>> = vec![
        Some(fill_template(&labels.chart_count, &[(
            "count",
            document.len().to_string().as_str(),
        )])),
        None,
        Some(labels.chart_list_heading.clone()),
    ];
    let entry_room = capacity.saturating_sub(lines.len());
    let overflow = document.len() > entry_room;
    let shown = if overflow {
        entry_room.saturating_sub(1)
    } else {
        document.len()
    };

    lines.extend(
        document
            .numbered()
            .take(shown)
            .map(|(index, chart)| Some(summary_entry(index, chart, config))),
    );
    if overflow {
        let hidden = document.len() - shown;
        lines.push(Some(fill_template(&labels.more_entries, &[(
            "count",
            hidden.to_string().as_str(),
        )])));
    }

    for (row, line) in lines.into_iter().enumerate() {
        let Some(text) = line else { continue };
        frame.push_text(TextPrimitive::new(
            truncate_to_width(&text, max_line_width, SUMMARY_BODY_FONT),
            left,
            top + row as f64 * SUMMARY_LINE_HEIGHT,
            SUMMARY_BODY_FONT,
            Color::BLACK,
            TextHAlign::Left,
        ));
    }

    frame
}
