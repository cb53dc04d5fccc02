use std::f64::consts::FRAC_1_SQRT_2;

use crate::config::{ExportConfig, fill_template};
use crate::core::{ChartRecord, LinearScale, PlotKind, scale::tick_target_count};
use crate::error::{ExportError, ExportResult};
use crate::render::{
    Color, LinePrimitive, LineStrokeStyle, RectPrimitive, RenderFrame, TextEmphasis, TextHAlign,
    TextPrimitive,
};

use super::text_layout::{estimate_text_width, truncate_to_width, wrap_text};

pub const CHART_TITLE_FONT: f64 = 14.0;
pub const AXIS_TITLE_FONT: f64 = 11.0;
pub const TICK_LABEL_FONT: f64 = 9.0;
pub const VALUE_LABEL_FONT: f64 = 9.0;
pub const FOOTER_FONT: f64 = 9.0;

pub const MARGIN_LEFT: f64 = 72.0;
pub const MARGIN_RIGHT: f64 = 36.0;
const MARGIN_TOP: f64 = 24.0;
const MARGIN_BOTTOM: f64 = 12.0;
const TITLE_LINE_HEIGHT: f64 = 18.0;
const TITLE_GAP: f64 = 20.0;
const AXIS_TITLE_BAND: f64 = 18.0;
const FOOTER_LINE_HEIGHT: f64 = 12.0;
const MAX_FOOTER_LINES: usize = 3;
const MIN_PLOT_HEIGHT: f64 = 40.0;

const TICK_LENGTH: f64 = 4.0;
const TICK_LABEL_GAP: f64 = 6.0;
const Y_TICK_SPACING: f64 = 50.0;
const MAX_CATEGORY_LABEL_WIDTH: f64 = 120.0;
const MAX_LABEL_BAND_RATIO: f64 = 0.3;

const BAR_WIDTH_RATIO: f64 = 0.8;
const BAR_EDGE_WIDTH: f64 = 1.0;
const LINE_WIDTH: f64 = 2.5;
const MARKER_RADIUS: f64 = 4.0;
const AXIS_LINE_WIDTH: f64 = 0.8;
const GRID_LINE_WIDTH: f64 = 0.5;
const VALUE_LABEL_GAP: f64 = 2.0;
const Y_AXIS_TITLE_X: f64 = 14.0;

/// Pixel box of the plotting area on a chart page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotArea {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
}

impl PlotArea {
    #[must_use]
    pub fn width(self) -> f64 {
        self.right - self.left
    }

    #[must_use]
    pub fn height(self) -> f64 {
        self.bottom - self.top
    }

    /// Horizontal center of category `index` out of `count` equal bands.
    #[must_use]
    pub fn category_center(self, index: usize, count: usize) -> f64 {
        let band = self.width() / count.max(1) as f64;
        self.left + band * (index as f64 + 0.5)
    }
}

/// Page title lines: the chart title, plus a source line when the chart
/// carries a page reference.
#[must_use]
pub fn title_lines(chart: &ChartRecord, config: &ExportConfig) -> Vec<String> {
    let mut lines = vec![chart.title.clone()];
    if let Some(page) = chart.source().page() {
        lines.push(fill_template(&config.labels.chart_source, &[("page", page)]));
    }
    lines
}

/// Value label text drawn next to each bar or point.
#[must_use]
pub fn format_value_label(value: f64) -> String {
    let rounded = format!("{value:.0}");
    if rounded == "-0" { "0".to_owned() } else { rounded }
}

/// Tick label text; integral ticks drop the fraction.
#[must_use]
pub fn format_tick_label(value: f64) -> String {
    if value.abs() >= 1e15 {
        return format!("{value:e}");
    }
    if value.fract() == 0.0 {
        return format!("{value:.0}");
    }
    let text = format!("{value:.4}");
    text.trim_end_matches('0').trim_end_matches('.').to_owned()
}

/// Lays out one chart page: title, axes, grid, series and explanation footer.
pub fn build_chart_page(chart: &ChartRecord, config: &ExportConfig) -> ExportResult<RenderFrame> {
    let viewport = config.pages.chart;
    let width = viewport.width_f64();
    let height = viewport.height_f64();
    let style = &config.style;
    let mut frame = RenderFrame::new(viewport);

    let text_width = width - 2.0 * MARGIN_RIGHT;
    let titles = title_lines(chart, config);
    for (row, line) in titles.iter().enumerate() {
        if line.is_empty() {
            continue;
        }
        frame.push_text(
            TextPrimitive::new(
                truncate_to_width(line, text_width, CHART_TITLE_FONT),
                width / 2.0,
                MARGIN_TOP + row as f64 * TITLE_LINE_HEIGHT,
                CHART_TITLE_FONT,
                Color::BLACK,
                TextHAlign::Center,
            )
            .with_emphasis(TextEmphasis::Bold),
        );
    }

    let mut footer = if chart.explanation_text().trim().is_empty() {
        Vec::new()
    } else {
        wrap_text(chart.explanation_text(), text_width, FOOTER_FONT)
    };
    if footer.len() > MAX_FOOTER_LINES {
        footer.truncate(MAX_FOOTER_LINES);
        if let Some(last) = footer.last_mut() {
            let marked = format!("{last}…");
            *last = truncate_to_width(&marked, text_width, FOOTER_FONT);
        }
    }
    let footer_height = footer.len() as f64 * FOOTER_LINE_HEIGHT;

    let labels: Vec<String> = chart
        .data
        .iter()
        .map(|point| truncate_to_width(&point.label, MAX_CATEGORY_LABEL_WIDTH, TICK_LABEL_FONT))
        .collect();
    let label_band = category_label_band(&labels).min(height * MAX_LABEL_BAND_RATIO);

    let area = PlotArea {
        left: MARGIN_LEFT,
        top: MARGIN_TOP + titles.len() as f64 * TITLE_LINE_HEIGHT + TITLE_GAP,
        right: width - MARGIN_RIGHT,
        bottom: height - MARGIN_BOTTOM - footer_height - AXIS_TITLE_BAND - label_band,
    };
    if area.width() <= 0.0 || area.height() < MIN_PLOT_HEIGHT {
        return Err(ExportError::InvalidData(format!(
            "chart page {}x{} leaves no room for the plot",
            viewport.width, viewport.height
        )));
    }

    let values: Vec<f64> = chart.data.iter().map(|point| point.value).collect();
    let kind = chart.plot_kind();
    let scale = LinearScale::fit(&values, kind == PlotKind::Bar)?;

    push_grid_and_axes(&mut frame, area, scale, &labels, config)?;
    match kind {
        PlotKind::Bar => push_bars(&mut frame, area, scale, &values, config)?,
        PlotKind::Line => push_line(&mut frame, area, scale, &values, config)?,
    }

    let axis_titles = [
        (
            &config.labels.x_axis,
            (area.left + area.right) / 2.0,
            area.bottom + label_band + 2.0,
            0.0,
        ),
        (
            &config.labels.y_axis,
            Y_AXIS_TITLE_X,
            (area.top + area.bottom) / 2.0,
            90.0,
        ),
    ];
    for (text, x, y, rotation) in axis_titles {
        if text.is_empty() {
            continue;
        }
        frame.push_text(
            TextPrimitive::new(
                text.clone(),
                x,
                y,
                AXIS_TITLE_FONT,
                Color::BLACK,
                TextHAlign::Center,
            )
            .with_emphasis(TextEmphasis::Bold)
            .with_rotation(rotation),
        );
    }

    let footer_top = height - MARGIN_BOTTOM - footer_height;
    for (row, line) in footer.into_iter().enumerate() {
        frame.push_text(
            TextPrimitive::new(
                line,
                width / 2.0,
                footer_top + row as f64 * FOOTER_LINE_HEIGHT,
                FOOTER_FONT,
                style.footer(),
                TextHAlign::Center,
            )
            .with_emphasis(TextEmphasis::Italic),
        );
    }

    Ok(frame)
}

/// Vertical room taken by category labels drawn at 45 degrees.
fn category_label_band(labels: &[String]) -> f64 {
    let longest = labels
        .iter()
        .map(|label| estimate_text_width(label, TICK_LABEL_FONT))
        .fold(0.0_f64, f64::max);
    TICK_LENGTH + TICK_LABEL_GAP + (longest + TICK_LABEL_FONT) * FRAC_1_SQRT_2
}

fn push_grid_and_axes(
    frame: &mut RenderFrame,
    area: PlotArea,
    scale: LinearScale,
    labels: &[String],
    config: &ExportConfig,
) -> ExportResult<()> {
    let grid = Color::rgb(0.5, 0.5, 0.5).with_alpha(config.style.grid_alpha);

    let tick_count = tick_target_count(area.height(), Y_TICK_SPACING, 3, 8);
    for tick in scale.ticks(tick_count) {
        let y = scale.domain_to_pixel(tick, area.bottom, area.top)?;
        frame.push_line(
            LinePrimitive::new(area.left, y, area.right, y, GRID_LINE_WIDTH, grid)
                .with_stroke_style(LineStrokeStyle::Dashed),
        );
        frame.push_line(LinePrimitive::new(
            area.left - TICK_LENGTH,
            y,
            area.left,
            y,
            AXIS_LINE_WIDTH,
            Color::BLACK,
        ));
        frame.push_text(TextPrimitive::new(
            format_tick_label(tick),
            area.left - TICK_LABEL_GAP,
            y - TICK_LABEL_FONT / 2.0,
            TICK_LABEL_FONT,
            Color::BLACK,
            TextHAlign::Right,
        ));
    }

    for (index, label) in labels.iter().enumerate() {
        let x = area.category_center(index, labels.len());
        frame.push_line(
            LinePrimitive::new(x, area.top, x, area.bottom, GRID_LINE_WIDTH, grid)
                .with_stroke_style(LineStrokeStyle::Dashed),
        );
        frame.push_line(LinePrimitive::new(
            x,
            area.bottom,
            x,
            area.bottom + TICK_LENGTH,
            AXIS_LINE_WIDTH,
            Color::BLACK,
        ));
        if !label.is_empty() {
            frame.push_text(
                TextPrimitive::new(
                    label.clone(),
                    x,
                    area.bottom + TICK_LENGTH + TICK_LABEL_GAP,
                    TICK_LABEL_FONT,
                    Color::BLACK,
                    TextHAlign::Right,
                )
                .with_rotation(45.0),
            );
        }
    }

    let corners = [
        (area.left, area.top, area.right, area.top),
        (area.right, area.top, area.right, area.bottom),
        (area.left, area.bottom, area.right, area.bottom),
        (area.left, area.top, area.left, area.bottom),
    ];
    for (x1, y1, x2, y2) in corners {
        frame.push_line(LinePrimitive::new(
            x1,
            y1,
            x2,
            y2,
            AXIS_LINE_WIDTH,
            Color::BLACK,
        ));
    }
    Ok(())
}

fn push_bars(
    frame: &mut RenderFrame,
    area: PlotArea,
    scale: LinearScale,
    values: &[f64],
    config: &ExportConfig,
) -> ExportResult<()> {
    let fill = config.style.series().with_alpha(config.style.series_alpha);
    let edge = config.style.bar_edge();
    let bar_width = area.width() / values.len().max(1) as f64 * BAR_WIDTH_RATIO;
    let baseline = scale.domain_to_pixel(0.0, area.bottom, area.top)?;

    for (index, value) in values.iter().copied().enumerate() {
        let x = area.category_center(index, values.len());
        let y = scale.domain_to_pixel(value, area.bottom, area.top)?;
        frame.push_rect(
            RectPrimitive::new(
                x - bar_width / 2.0,
                y.min(baseline),
                bar_width,
                (y - baseline).abs(),
                fill,
            )
            .with_border(BAR_EDGE_WIDTH, edge),
        );
        push_value_label(frame, x, y, value);
    }
    Ok(())
}

fn push_line(
    frame: &mut RenderFrame,
    area: PlotArea,
    scale: LinearScale,
    values: &[f64],
    config: &ExportConfig,
) -> ExportResult<()> {
    let color = config.style.series();
    let points = values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let x = area.category_center(index, values.len());
            scale
                .domain_to_pixel(*value, area.bottom, area.top)
                .map(|y| (x, y))
        })
        .collect::<ExportResult<Vec<_>>>()?;

    for pair in points.windows(2) {
        let ((x1, y1), (x2, y2)) = (pair[0], pair[1]);
        frame.push_line(LinePrimitive::new(x1, y1, x2, y2, LINE_WIDTH, color));
    }
    for ((x, y), value) in points.into_iter().zip(values.iter().copied()) {
        frame.push_rect(RectPrimitive::circle(x, y, MARKER_RADIUS, color));
        push_value_label(frame, x, y - MARKER_RADIUS, value);
    }
    Ok(())
}

fn push_value_label(frame: &mut RenderFrame, x: f64, y: f64, value: f64) {
    let top = if value < 0.0 {
        y + VALUE_LABEL_GAP
    } else {
        y - VALUE_LABEL_GAP - VALUE_LABEL_FONT
    };
    frame.push_text(TextPrimitive::new(
        format_value_label(value),
        x,
        top,
        VALUE_LABEL_FONT,
        Color::BLACK,
        TextHAlign::Center,
    ));
}
