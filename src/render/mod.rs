mod frame;
mod html_table;
mod null_renderer;
mod primitives;
mod svg_backend;

pub use frame::RenderFrame;
pub use html_table::DataTable;
pub use null_renderer::NullRenderer;
pub use primitives::{
    CirclePrimitive, Color, LinePrimitive, LineStrokeStyle, RectPrimitive, TextHAlign,
    TextPrimitive,
};
pub use svg_backend::{SvgRenderStats, SvgRenderer, escape_xml};

use crate::error::ChartResult;

/// Contract implemented by any rendering backend.
///
/// Backends receive a fully materialized, deterministic `RenderFrame` so
/// drawing code stays isolated from chart layout and dashboard state.
pub trait Renderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()>;
}
