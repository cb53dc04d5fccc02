mod frame;
mod null_renderer;
mod primitives;

pub use frame::RenderFrame;
pub use null_renderer::NullRenderer;
pub use primitives::{
    Color, LinePrimitive, LineStrokeStyle, RectPrimitive, TextEmphasis, TextHAlign, TextPrimitive,
};

use crate::error::ExportResult;

/// Contract implemented by any page rendering backend.
///
/// Each call receives one fully materialized page, so drawing code stays
/// isolated from chart layout.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ExportResult<()>;
}

#[cfg(feature = "cairo-backend")]
mod cairo_backend;
#[cfg(feature = "cairo-backend")]
pub use cairo_backend::{PdfRenderStats, PdfRenderer};
