use crate::error::ExportResult;
use crate::render::{RenderFrame, Renderer};

/// No-op renderer used by tests and dry runs.
///
/// It still validates every page so tests can catch invalid geometry without a
/// drawing backend.
#[derive(Debug, Default)]
pub struct NullRenderer {
    pub pages_rendered: usize,
    pub last_line_count: usize,
    pub last_rect_count: usize,
    pub last_text_count: usize,
}

impl Renderer for NullRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ExportResult<()> {
        frame.validate()?;
        self.pages_rendered += 1;
        self.last_line_count = frame.lines.len();
        self.last_rect_count = frame.rects.len();
        self.last_text_count = frame.texts.len();
        Ok(())
    }
}
