use serde::{Deserialize, Serialize};

use crate::core::Entity;
use crate::render::Color;

/// Visual precedence of one district's marks.
///
/// Featured wins over reference, which wins over default styling. A
/// suppressed reference keeps its slot but is hidden.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Emphasis {
    Featured,
    Reference,
    Default,
    Hidden,
}

impl Emphasis {
    #[must_use]
    pub fn resolve(entity: &Entity, show_reference: bool) -> Self {
        if entity.is_featured {
            Emphasis::Featured
        } else if entity.is_reference && show_reference {
            Emphasis::Reference
        } else if entity.is_reference {
            Emphasis::Hidden
        } else {
            Emphasis::Default
        }
    }

    #[must_use]
    pub fn is_visible(self) -> bool {
        self != Emphasis::Hidden
    }

    /// Featured and reference marks are the ones worth labelling on dense
    /// charts.
    #[must_use]
    pub fn is_highlighted(self) -> bool {
        matches!(self, Emphasis::Featured | Emphasis::Reference)
    }
}

/// Chart palette and typography.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    pub default_mark: Color,
    pub featured_mark: Color,
    pub reference_mark: Color,
    pub text: Color,
    pub axis: Color,
    pub halo: Color,
    pub score_text: Color,
    pub trend_line: Color,
    pub bullet_ranges: [Color; 3],
    pub bullet_measure: Color,
    pub bullet_marker: Color,
    pub font_size_px: f64,
    pub legend_font_size_px: f64,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            default_mark: Color::from_rgb8(0x8c, 0x9a, 0xa8),
            featured_mark: Color::from_rgb8(0xd9, 0x5f, 0x02),
            reference_mark: Color::from_rgb8(0x1b, 0x9e, 0x77),
            text: Color::from_rgb8(0x33, 0x33, 0x33),
            axis: Color::from_rgb8(0x66, 0x66, 0x66),
            halo: Color::rgb(1.0, 1.0, 1.0),
            score_text: Color::rgb(1.0, 1.0, 1.0),
            trend_line: Color::from_rgb8(0x99, 0x99, 0x99),
            bullet_ranges: [
                Color::from_rgb8(0xee, 0xee, 0xee),
                Color::from_rgb8(0xdd, 0xdd, 0xdd),
                Color::from_rgb8(0xcc, 0xcc, 0xcc),
            ],
            bullet_measure: Color::from_rgb8(0x46, 0x82, 0xb4),
            bullet_marker: Color::rgb(0.0, 0.0, 0.0),
            font_size_px: 11.0,
            legend_font_size_px: 14.0,
        }
    }
}

impl Theme {
    #[must_use]
    pub fn mark_color(&self, emphasis: Emphasis) -> Color {
        match emphasis {
            Emphasis::Featured => self.featured_mark,
            Emphasis::Reference => self.reference_mark,
            Emphasis::Default | Emphasis::Hidden => self.default_mark,
        }
    }

    #[must_use]
    pub fn label_color(&self, emphasis: Emphasis) -> Color {
        match emphasis {
            Emphasis::Featured => self.featured_mark,
            Emphasis::Reference => self.reference_mark,
            Emphasis::Default | Emphasis::Hidden => self.text,
        }
    }

    /// Highlighted connector lines are drawn thicker than default ones.
    #[must_use]
    pub fn stroke_width(&self, emphasis: Emphasis) -> f64 {
        if emphasis.is_highlighted() { 2.0 } else { 1.0 }
    }
}
