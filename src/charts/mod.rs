//! Chart variants and the contract the dashboard drives them through.

pub mod axis;
pub mod bullet;
pub mod line_plot;
pub mod scatter;
pub mod scene;
pub mod slope;
pub mod theme;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::{CategoryCatalog, EntityDataset, MetricKey, Viewport};
use crate::error::{ChartError, ChartResult};
use crate::render::RenderFrame;

pub use axis::{AxisOrient, AxisRoles, AxisSpec, format_tick_label, round_tick_value, score_label};
pub use bullet::{BulletChart, BulletConfig, BulletDatum, bullet_data};
pub use line_plot::{LinePlot, LinePlotConfig};
pub use scatter::{ScatterConfig, Scatterplot};
pub use scene::{
    Mark, NodeKey, RenderPhase, RetainedScene, SceneNode, SceneTarget, ease_cubic_in_out,
};
pub use slope::{SlopeConfig, Slopegraph};
pub use theme::{Emphasis, Theme};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Scatter,
    Slope,
    Line,
    Bullet,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::Scatter,
        ChartKind::Slope,
        ChartKind::Line,
        ChartKind::Bullet,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ChartKind::Scatter => "scatter",
            ChartKind::Slope => "slope",
            ChartKind::Line => "line",
            ChartKind::Bullet => "bullet",
        }
    }

    /// Line and bullet charts plot a single metric, so the secondary
    /// selector is hidden for them.
    #[must_use]
    pub const fn uses_secondary_key(self) -> bool {
        matches!(self, ChartKind::Scatter | ChartKind::Slope)
    }

    /// Constructs a fresh, uninitialized renderer for this variant.
    #[must_use]
    pub fn build_renderer(self, options: &ChartOptions) -> Box<dyn ChartRenderer> {
        let theme = options.theme;
        let transition = options.transition();
        match self {
            ChartKind::Scatter => {
                Box::new(Scatterplot::new(options.scatter.clone(), theme, transition))
            }
            ChartKind::Slope => Box::new(Slopegraph::new(options.slope, theme, transition)),
            ChartKind::Line => Box::new(LinePlot::new(options.line, theme, transition)),
            ChartKind::Bullet => Box::new(BulletChart::new(options.bullet, theme)),
        }
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChartKind {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        ChartKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == raw.trim())
            .ok_or_else(|| ChartError::UnknownChartKind(raw.to_owned()))
    }
}

/// Metric selection and axis policy read by every draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSelection {
    pub primary: MetricKey,
    pub secondary: MetricKey,
    pub zero_baseline: bool,
}

impl Default for ChartSelection {
    fn default() -> Self {
        Self {
            primary: MetricKey::Cost,
            secondary: MetricKey::Cost,
            zero_baseline: false,
        }
    }
}

/// Everything a renderer reads during one draw. Borrowed immutably: charts
/// never touch the data they plot.
#[derive(Debug, Clone, Copy)]
pub struct DrawRequest<'a> {
    pub dataset: &'a EntityDataset,
    pub catalog: &'a CategoryCatalog,
    pub selection: &'a ChartSelection,
}

/// Contract shared by the four chart variants.
///
/// A renderer owns one retained scene. Its first `draw` creates the marks;
/// later draws patch them with an animated transition.
pub trait ChartRenderer {
    fn kind(&self) -> ChartKind;

    fn draw(&mut self, request: &DrawRequest<'_>) -> ChartResult<()>;

    fn scene(&self) -> &RetainedScene;

    fn scene_mut(&mut self) -> &mut RetainedScene;

    fn viewport(&self) -> Viewport;

    fn phase(&self) -> RenderPhase {
        self.scene().phase()
    }

    fn advance(&mut self, delta: Duration) {
        self.scene_mut().advance(delta);
    }

    fn frame(&self) -> RenderFrame {
        self.scene().frame(self.viewport())
    }
}

fn default_transition_ms() -> u64 {
    1_000
}

/// Per-variant options plus shared theme and transition timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartOptions {
    #[serde(default = "default_transition_ms")]
    pub transition_ms: u64,
    #[serde(default)]
    pub theme: Theme,
    #[serde(default)]
    pub scatter: ScatterConfig,
    #[serde(default)]
    pub slope: SlopeConfig,
    #[serde(default)]
    pub line: LinePlotConfig,
    #[serde(default)]
    pub bullet: BulletConfig,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            transition_ms: default_transition_ms(),
            theme: Theme::default(),
            scatter: ScatterConfig::default(),
            slope: SlopeConfig::default(),
            line: LinePlotConfig::default(),
            bullet: BulletConfig::default(),
        }
    }
}

impl ChartOptions {
    #[must_use]
    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }
}
