use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    #[must_use]
    pub fn is_valid(self) -> bool {
        self.width > 0 && self.height > 0
    }
}

/// Space reserved around the plot area for axes and legends.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Margin {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margin {
    #[must_use]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Outer canvas plus margins. Chart layout happens in plot coordinates whose
/// origin sits at `(margin.left, margin.top)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChartCanvas {
    pub viewport: Viewport,
    pub margin: Margin,
}

impl ChartCanvas {
    #[must_use]
    pub const fn new(viewport: Viewport, margin: Margin) -> Self {
        Self { viewport, margin }
    }

    #[must_use]
    pub fn plot_width(self) -> f64 {
        f64::from(self.viewport.width) - self.margin.left - self.margin.right
    }

    #[must_use]
    pub fn plot_height(self) -> f64 {
        f64::from(self.viewport.height) - self.margin.top - self.margin.bottom
    }

    /// Translates a plot-space point into canvas pixels.
    #[must_use]
    pub fn to_canvas(self, x: f64, y: f64) -> (f64, f64) {
        (x + self.margin.left, y + self.margin.top)
    }
}
