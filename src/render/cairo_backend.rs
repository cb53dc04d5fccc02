use cairo::{Context, PdfSurface};
use pango::FontDescription;
use std::f64::consts::{FRAC_PI_2, PI};

use crate::core::Viewport;
use crate::error::{ExportError, ExportResult};
use crate::render::{
    Color, LineStrokeStyle, RectPrimitive, RenderFrame, Renderer, TextEmphasis, TextHAlign,
};

const DASH_PATTERN: [f64; 2] = [4.0, 3.0];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PdfRenderStats {
    pub pages_drawn: usize,
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub texts_drawn: usize,
}

/// Cairo PDF surface renderer; every `render` call emits one page.
///
/// The document is streamed into memory and handed back by [`finish`], so a
/// failed render never leaves a truncated file on disk.
///
/// [`finish`]: PdfRenderer::finish
#[derive(Debug)]
pub struct PdfRenderer {
    surface: PdfSurface,
    font_family: String,
    background: Color,
    stats: PdfRenderStats,
}

impl PdfRenderer {
    /// `first_page` sizes the surface; later pages resize it as needed.
    pub fn new(first_page: Viewport, font_family: impl Into<String>) -> ExportResult<Self> {
        if !first_page.is_valid() {
            return Err(ExportError::InvalidViewport {
                width: first_page.width,
                height: first_page.height,
            });
        }

        let surface = PdfSurface::for_stream(
            first_page.width_f64(),
            first_page.height_f64(),
            Vec::<u8>::new(),
        )
        .map_err(|err| map_backend_error("failed to create pdf surface", err))?;
        Ok(Self {
            surface,
            font_family: font_family.into(),
            background: Color::WHITE,
            stats: PdfRenderStats::default(),
        })
    }

    #[must_use]
    pub fn backend_name(&self) -> &'static str {
        "cairo-pdf+pango+pangocairo"
    }

    #[must_use]
    pub fn stats(&self) -> PdfRenderStats {
        self.stats
    }

    /// Finalizes the document and returns the PDF bytes.
    pub fn finish(self) -> ExportResult<Vec<u8>> {
        let stream = self
            .surface
            .finish_output_stream()
            .map_err(|err| ExportError::Render(format!("failed to finish pdf stream: {err}")))?;
        stream
            .downcast::<Vec<u8>>()
            .map(|bytes| *bytes)
            .map_err(|_| ExportError::Render("pdf stream has an unexpected type".to_owned()))
    }

    fn draw_page(&mut self, context: &Context, frame: &RenderFrame) -> ExportResult<()> {
        apply_color(context, self.background);
        context
            .paint()
            .map_err(|err| map_backend_error("failed to clear page", err))?;

        for rect in &frame.rects {
            append_rect_path(context, *rect);
            apply_color(context, rect.fill_color);
            if rect.border_width > 0.0 {
                context
                    .fill_preserve()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
                apply_color(context, rect.border_color);
                context.set_line_width(rect.border_width);
                context.set_dash(&[], 0.0);
                context
                    .stroke()
                    .map_err(|err| map_backend_error("failed to stroke rectangle border", err))?;
            } else {
                context
                    .fill()
                    .map_err(|err| map_backend_error("failed to fill rectangle", err))?;
            }
            self.stats.rects_drawn += 1;
        }

        for line in &frame.lines {
            apply_color(context, line.color);
            context.set_line_width(line.stroke_width);
            match line.stroke_style {
                LineStrokeStyle::Solid => context.set_dash(&[], 0.0),
                LineStrokeStyle::Dashed => context.set_dash(&DASH_PATTERN, 0.0),
            }
            context.move_to(line.x1, line.y1);
            context.line_to(line.x2, line.y2);
            context
                .stroke()
                .map_err(|err| map_backend_error("failed to stroke line", err))?;
            self.stats.lines_drawn += 1;
        }

        for text in &frame.texts {
            let layout = pangocairo::functions::create_layout(context);
            let mut font_description =
                FontDescription::from_string(&font_spec(&self.font_family, text.emphasis));
            font_description.set_absolute_size(text.font_size_px * f64::from(pango::SCALE));
            layout.set_font_description(Some(&font_description));
            layout.set_text(&text.text);

            let (text_width, _text_height) = layout.pixel_size();
            let x_offset = match text.h_align {
                TextHAlign::Left => 0.0,
                TextHAlign::Center => -f64::from(text_width) / 2.0,
                TextHAlign::Right => -f64::from(text_width),
            };

            context
                .save()
                .map_err(|err| map_backend_error("failed to save text state", err))?;
            context.translate(text.x, text.y);
            if text.rotation_deg != 0.0 {
                context.rotate(-text.rotation_deg.to_radians());
            }
            apply_color(context, text.color);
            context.move_to(x_offset, 0.0);
            pangocairo::functions::show_layout(context, &layout);
            context
                .restore()
                .map_err(|err| map_backend_error("failed to restore text state", err))?;
            self.stats.texts_drawn += 1;
        }

        context
            .show_page()
            .map_err(|err| map_backend_error("failed to emit pdf page", err))?;
        self.stats.pages_drawn += 1;
        Ok(())
    }
}

impl Renderer for PdfRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ExportResult<()> {
        frame.validate()?;
        self.surface
            .set_size(frame.viewport.width_f64(), frame.viewport.height_f64())
            .map_err(|err| map_backend_error("failed to size pdf page", err))?;
        let context = Context::new(&self.surface)
            .map_err(|err| map_backend_error("failed to create cairo context", err))?;
        self.draw_page(&context, frame)
    }
}

fn font_spec(family: &str, emphasis: TextEmphasis) -> String {
    match emphasis {
        TextEmphasis::Regular => family.to_owned(),
        TextEmphasis::Bold => format!("{family} Bold"),
        TextEmphasis::Italic => format!("{family} Italic"),
    }
}

fn apply_color(context: &Context, color: Color) {
    context.set_source_rgba(color.red, color.green, color.blue, color.alpha);
}

fn append_rect_path(context: &Context, rect: RectPrimitive) {
    if rect.corner_radius <= 0.0 {
        context.rectangle(rect.x, rect.y, rect.width, rect.height);
        return;
    }

    let radius = rect
        .corner_radius
        .min(rect.width * 0.5)
        .min(rect.height * 0.5);
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width;
    let bottom = rect.y + rect.height;

    context.new_sub_path();
    context.arc(right - radius, top + radius, radius, -FRAC_PI_2, 0.0);
    context.arc(right - radius, bottom - radius, radius, 0.0, FRAC_PI_2);
    context.arc(left + radius, bottom - radius, radius, FRAC_PI_2, PI);
    context.arc(left + radius, top + radius, radius, PI, PI + FRAC_PI_2);
    context.close_path();
}

fn map_backend_error(prefix: &str, err: cairo::Error) -> ExportError {
    ExportError::Render(format!("{prefix}: {err}"))
}

#[cfg(test)]
mod tests {
    use super::font_spec;
    use crate::render::TextEmphasis;

    #[test]
    fn font_spec_appends_emphasis() {
        assert_eq!(font_spec("DejaVu Sans", TextEmphasis::Regular), "DejaVu Sans");
        assert_eq!(font_spec("DejaVu Sans", TextEmphasis::Bold), "DejaVu Sans Bold");
        assert_eq!(font_spec("Sans", TextEmphasis::Italic), "Sans Italic");
    }
}
