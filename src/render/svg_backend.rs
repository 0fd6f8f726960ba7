use std::fmt::Write;

use crate::error::{ChartError, ChartResult};
use crate::render::{LineStrokeStyle, RenderFrame, Renderer, TextHAlign};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SvgRenderStats {
    pub lines_drawn: usize,
    pub rects_drawn: usize,
    pub circles_drawn: usize,
    pub texts_drawn: usize,
}

/// Serializes render frames into standalone SVG markup.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    document: String,
    last_stats: SvgRenderStats,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Markup produced by the most recent `render` call.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }

    #[must_use]
    pub fn into_document(self) -> String {
        self.document
    }

    #[must_use]
    pub fn last_stats(&self) -> SvgRenderStats {
        self.last_stats
    }

    fn write_frame(
        out: &mut String,
        frame: &RenderFrame,
    ) -> Result<SvgRenderStats, std::fmt::Error> {
        let mut stats = SvgRenderStats::default();
        let width = frame.viewport.width;
        let height = frame.viewport.height;

        writeln!(
            out,
            "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\" font-family=\"sans-serif\">"
        )?;

        for rect in &frame.rects {
            write!(
                out,
                "  <rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"{}\"",
                num(rect.x),
                num(rect.y),
                num(rect.width),
                num(rect.height),
                rect.fill_color.to_hex()
            )?;
            write_opacity(out, "fill-opacity", rect.fill_color.alpha)?;
            if rect.border_width > 0.0 {
                write!(
                    out,
                    " stroke=\"{}\" stroke-width=\"{}\"",
                    rect.border_color.to_hex(),
                    num(rect.border_width)
                )?;
            }
            writeln!(out, "/>")?;
            stats.rects_drawn += 1;
        }

        for line in &frame.lines {
            write!(
                out,
                "  <line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\" stroke=\"{}\" stroke-width=\"{}\"",
                num(line.x1),
                num(line.y1),
                num(line.x2),
                num(line.y2),
                line.color.to_hex(),
                num(line.stroke_width)
            )?;
            write_opacity(out, "stroke-opacity", line.color.alpha)?;
            if line.stroke_style == LineStrokeStyle::Dashed {
                write!(out, " stroke-dasharray=\"6 4\"")?;
            }
            writeln!(out, "/>")?;
            stats.lines_drawn += 1;
        }

        for circle in &frame.circles {
            write!(
                out,
                "  <circle cx=\"{}\" cy=\"{}\" r=\"{}\" fill=\"{}\"",
                num(circle.cx),
                num(circle.cy),
                num(circle.radius),
                circle.fill_color.to_hex()
            )?;
            write_opacity(out, "fill-opacity", circle.fill_color.alpha)?;
            writeln!(out, "/>")?;
            stats.circles_drawn += 1;
        }

        for text in &frame.texts {
            let anchor = match text.h_align {
                TextHAlign::Left => "start",
                TextHAlign::Center => "middle",
                TextHAlign::Right => "end",
            };
            write!(
                out,
                "  <text x=\"{}\" y=\"{}\" font-size=\"{}\" text-anchor=\"{anchor}\" fill=\"{}\"",
                num(text.x),
                num(text.y),
                num(text.font_size_px),
                text.color.to_hex()
            )?;
            write_opacity(out, "fill-opacity", text.color.alpha)?;
            if let Some(halo) = text.halo {
                write!(
                    out,
                    " stroke=\"{}\" stroke-width=\"3\" paint-order=\"stroke\"",
                    halo.to_hex()
                )?;
            }
            if text.rotation_deg != 0.0 {
                write!(
                    out,
                    " transform=\"rotate({} {} {})\"",
                    num(text.rotation_deg),
                    num(text.x),
                    num(text.y)
                )?;
            }
            writeln!(out, ">{}</text>", escape_xml(&text.text))?;
            stats.texts_drawn += 1;
        }

        writeln!(out, "</svg>")?;
        Ok(stats)
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;

        let mut document = String::new();
        let stats = Self::write_frame(&mut document, frame)
            .map_err(|err| ChartError::InvalidData(format!("failed to write svg: {err}")))?;
        self.document = document;
        self.last_stats = stats;
        Ok(())
    }
}

fn write_opacity(out: &mut String, attribute: &str, alpha: f64) -> std::fmt::Result {
    if alpha < 1.0 {
        write!(out, " {attribute}=\"{}\"", num(alpha))?;
    }
    Ok(())
}

/// Compact coordinate formatting: two decimals, trailing zeros dropped.
fn num(value: f64) -> String {
    let rendered = format!("{value:.2}");
    let trimmed = rendered.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_owned(),
        other => other.to_owned(),
    }
}

/// Escapes text content and attribute values for XML/HTML output.
#[must_use]
pub fn escape_xml(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
