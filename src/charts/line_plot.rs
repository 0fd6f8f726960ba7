use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::axis::{AxisOrient, AxisRoles, AxisSpec, format_tick_label};
use crate::charts::scene::{NodeKey, RetainedScene, SceneTarget};
use crate::charts::theme::{Emphasis, Theme};
use crate::charts::{ChartKind, ChartRenderer, DrawRequest};
use crate::core::{ChartCanvas, DomainPadding, LinearScale, Margin, Viewport};
use crate::error::ChartResult;
use crate::render::{CirclePrimitive, LinePrimitive, TextHAlign, TextPrimitive};

const CANVAS: ChartCanvas = ChartCanvas::new(
    Viewport {
        width: 800,
        height: 300,
    },
    Margin::new(100.0, 50.0, 20.0, 50.0),
);
const PADDING: DomainPadding = DomainPadding::new(0.98, 1.02);
const POINT_RADIUS_PX: f64 = 6.0;
const DROP_LINE_TOP: f64 = 6.0;
const ROW_SPACING_PX: f64 = 15.0;
const LEGEND_POSITION: (f64, f64) = (-30.0, -65.0);

const AXIS: AxisRoles = AxisRoles::new("axis", "axis.tick", "axis.label");

pub const ROLE_DROP_LINE: &str = "drop-line";
pub const ROLE_POINT: &str = "point";
pub const ROLE_NAME: &str = "name";
pub const ROLE_LEGEND: &str = "legend";

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinePlotConfig {
    #[serde(default = "default_true")]
    pub show_reference: bool,
}

impl Default for LinePlotConfig {
    fn default() -> Self {
        Self {
            show_reference: true,
        }
    }
}

/// Vertical drop-line end and label baseline for one district, in plot
/// coordinates. Featured rises above the axis, the reference sits just
/// below it, and everyone else fans out one row at a time.
fn drop_positions(emphasis: Emphasis, is_reference: bool, rank: usize) -> (f64, f64) {
    match emphasis {
        Emphasis::Featured => (-27.0, -32.0),
        _ if is_reference => (34.0, 45.0),
        _ => {
            let row = (rank + 2) as f64 * ROW_SPACING_PX;
            (19.0 + row, 30.0 + row)
        }
    }
}

/// Single-metric strip plot: one point per district on a horizontal axis
/// with staggered name labels hanging below.
#[derive(Debug)]
pub struct LinePlot {
    config: LinePlotConfig,
    theme: Theme,
    scene: RetainedScene,
    domain: Option<(f64, f64)>,
}

impl LinePlot {
    #[must_use]
    pub fn new(config: LinePlotConfig, theme: Theme, transition: Duration) -> Self {
        Self {
            config,
            theme,
            scene: RetainedScene::new(transition),
            domain: None,
        }
    }

    #[must_use]
    pub fn domain(&self) -> Option<(f64, f64)> {
        self.domain
    }

    fn build_target(&mut self, request: &DrawRequest<'_>) -> ChartResult<SceneTarget> {
        let DrawRequest {
            dataset,
            catalog,
            selection,
        } = *request;
        let key = selection.primary;
        let theme = self.theme;

        let domain = PADDING.resolve(dataset.extent(key), selection.zero_baseline);
        let scale = LinearScale::new(domain.0, domain.1)?.with_range(0.0, CANVAS.plot_width())?;
        self.domain = Some(domain);
        debug!(?domain, key = %key, "line plot layout");

        let category = catalog.get_by_key(key.as_str());
        let format = category.number_format();

        let to_canvas = |px: f64, py: f64| CANVAS.to_canvas(px, py);
        let mut target = SceneTarget::new();
        let mut rank = 0usize;

        for (slot, entity) in dataset.entities().iter().enumerate() {
            let emphasis = Emphasis::resolve(entity, self.config.show_reference);
            let visible = emphasis.is_visible();
            let value = entity.metric(key);
            let x = scale.map(value)?;

            let (line_end, label_y) = drop_positions(emphasis, entity.is_reference, rank);
            if !entity.is_featured && !entity.is_reference {
                rank += 1;
            }

            let (x0, y0) = to_canvas(x, DROP_LINE_TOP);
            let (x1, y1) = to_canvas(x, line_end);
            target.line(
                NodeKey::new(ROLE_DROP_LINE, slot),
                LinePrimitive::new(x0, y0, x1, y1, 1.0, theme.mark_color(emphasis)),
                visible,
            );
            let (cx, cy) = to_canvas(x, 0.0);
            target.circle(
                NodeKey::new(ROLE_POINT, slot),
                CirclePrimitive::new(cx, cy, POINT_RADIUS_PX, theme.mark_color(emphasis)),
                visible,
            );

            let label = if entity.is_featured {
                format!("{} [{}]", entity.name, format.format(value).trim())
            } else {
                entity.name.clone()
            };
            let (tx, ty) = to_canvas(x, label_y);
            target.text(
                NodeKey::new(ROLE_NAME, slot),
                TextPrimitive::new(
                    label,
                    tx,
                    ty,
                    theme.font_size_px,
                    theme.label_color(emphasis),
                    TextHAlign::Right,
                ),
                visible,
            );
        }

        AxisSpec {
            roles: AXIS,
            orient: AxisOrient::Top,
            origin: to_canvas(0.0, 0.0),
            scale,
            ticks: [domain.0, domain.1]
                .into_iter()
                .map(|value| (value, format_tick_label(value, &format)))
                .collect(),
        }
        .push_into(&mut target, &theme)?;

        let (lx, ly) = to_canvas(LEGEND_POSITION.0, LEGEND_POSITION.1);
        target.text(
            NodeKey::new(ROLE_LEGEND, 0),
            TextPrimitive::new(
                category.label.clone(),
                lx,
                ly,
                theme.legend_font_size_px,
                theme.text,
                TextHAlign::Left,
            ),
            true,
        );

        Ok(target)
    }
}

impl ChartRenderer for LinePlot {
    fn kind(&self) -> ChartKind {
        ChartKind::Line
    }

    fn draw(&mut self, request: &DrawRequest<'_>) -> ChartResult<()> {
        let target = self.build_target(request)?;
        self.scene.patch(target);
        Ok(())
    }

    fn scene(&self) -> &RetainedScene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut RetainedScene {
        &mut self.scene
    }

    fn viewport(&self) -> Viewport {
        CANVAS.viewport
    }
}
