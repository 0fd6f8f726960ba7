use crate::charts::scene::{NodeKey, SceneTarget};
use crate::charts::theme::Theme;
use crate::core::primitives::display_number;
use crate::core::{Category, LinearScale, NumberFormat};
use crate::error::ChartResult;
use crate::render::{LinePrimitive, TextHAlign, TextPrimitive};

const TICK_SIZE_PX: f64 = 6.0;
const TICK_PADDING_PX: f64 = 3.0;

/// Rounds an axis end value before it is labelled: thousands above 2000,
/// integers from 10, untouched below.
#[must_use]
pub fn round_tick_value(value: f64) -> f64 {
    if value >= 2000.0 {
        (value / 1000.0).round() * 1000.0
    } else if value >= 10.0 {
        value.round()
    } else {
        value
    }
}

/// Label for a min/max axis tick. Only the label is rounded; marks keep
/// using the exact value.
#[must_use]
pub fn format_tick_label(value: f64, format: &NumberFormat) -> String {
    format.format(round_tick_value(value))
}

/// Short value printed inside scatter points.
#[must_use]
pub fn score_label(value: f64, category: &Category) -> String {
    if category.is_percent {
        format!("{:.1}", value * 100.0)
    } else if value >= 2000.0 {
        format!("${}k", (value / 1000.0).round())
    } else {
        display_number(value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AxisOrient {
    Top,
    Bottom,
    Left,
    Right,
}

/// Scene roles used by one axis so several axes can share a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRoles {
    pub domain: &'static str,
    pub tick: &'static str,
    pub label: &'static str,
}

impl AxisRoles {
    #[must_use]
    pub const fn new(domain: &'static str, tick: &'static str, label: &'static str) -> Self {
        Self {
            domain,
            tick,
            label,
        }
    }
}

/// One axis: a domain line along the scale range plus a labelled tick per
/// value, anchored at `origin` in canvas pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisSpec {
    pub roles: AxisRoles,
    pub orient: AxisOrient,
    pub origin: (f64, f64),
    pub scale: LinearScale,
    pub ticks: Vec<(f64, String)>,
}

impl AxisSpec {
    pub fn push_into(&self, target: &mut SceneTarget, theme: &Theme) -> ChartResult<()> {
        let (ox, oy) = self.origin;
        let (range_start, range_end) = self.scale.range();
        let color = theme.axis;
        let horizontal = matches!(self.orient, AxisOrient::Top | AxisOrient::Bottom);

        let domain = if horizontal {
            LinePrimitive::new(ox + range_start, oy, ox + range_end, oy, 1.0, color)
        } else {
            LinePrimitive::new(ox, oy + range_start, ox, oy + range_end, 1.0, color)
        };
        target.line(NodeKey::new(self.roles.domain, 0), domain, true);

        let outward = match self.orient {
            AxisOrient::Top | AxisOrient::Left => -1.0,
            AxisOrient::Bottom | AxisOrient::Right => 1.0,
        };
        let tick_end = outward * TICK_SIZE_PX;
        let label_offset = outward * (TICK_SIZE_PX + TICK_PADDING_PX);

        for (index, (value, label)) in self.ticks.iter().enumerate() {
            let position = self.scale.map(*value)?;
            let (tick, text) = if horizontal {
                let x = ox + position;
                let label_y = match self.orient {
                    // Bottom labels hang below the tick; baseline sits one
                    // font size down.
                    AxisOrient::Bottom => oy + label_offset + theme.font_size_px,
                    _ => oy + label_offset,
                };
                (
                    LinePrimitive::new(x, oy, x, oy + tick_end, 1.0, color),
                    TextPrimitive::new(
                        label.clone(),
                        x,
                        label_y,
                        theme.font_size_px,
                        theme.text,
                        TextHAlign::Center,
                    ),
                )
            } else {
                let y = oy + position;
                let align = if outward < 0.0 {
                    TextHAlign::Right
                } else {
                    TextHAlign::Left
                };
                (
                    LinePrimitive::new(ox, y, ox + tick_end, y, 1.0, color),
                    TextPrimitive::new(
                        label.clone(),
                        ox + label_offset,
                        y + theme.font_size_px * 0.32,
                        theme.font_size_px,
                        theme.text,
                        align,
                    ),
                )
            };
            target.line(NodeKey::new(self.roles.tick, index), tick, true);
            target.text(NodeKey::new(self.roles.label, index), text, true);
        }

        Ok(())
    }
}
