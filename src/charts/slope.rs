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
        width: 500,
        height: 480,
    },
    Margin::new(50.0, 0.0, 20.0, 0.0),
);
const PADDING: DomainPadding = DomainPadding::new(0.9, 1.1);
const LEFT_AXIS_X: f64 = 160.0;
const RIGHT_AXIS_X: f64 = 320.0;
const LABEL_GAP_PX: f64 = 10.0;
const LABEL_BASELINE_SHIFT_PX: f64 = 3.0;
const POINT_RADIUS_PX: f64 = 5.0;
const LEGEND_Y: f64 = -20.0;

const LEFT_AXIS: AxisRoles = AxisRoles::new("left-axis", "left-axis.tick", "left-axis.label");
const RIGHT_AXIS: AxisRoles = AxisRoles::new("right-axis", "right-axis.tick", "right-axis.label");

pub const ROLE_CONNECTOR: &str = "connector";
pub const ROLE_LEFT_POINT: &str = "point.left";
pub const ROLE_RIGHT_POINT: &str = "point.right";
pub const ROLE_LEFT_NAME: &str = "name.left";
pub const ROLE_RIGHT_NAME: &str = "name.right";
pub const ROLE_LEFT_LEGEND: &str = "legend.left";
pub const ROLE_RIGHT_LEGEND: &str = "legend.right";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SlopeConfig {
    /// The reference district is suppressed on slopegraphs unless enabled.
    #[serde(default)]
    pub show_reference: bool,
    /// Label every district instead of only highlighted ones.
    #[serde(default)]
    pub label_all: bool,
}

/// Primary metric on the left axis, secondary on the right, one connecting
/// line per district.
#[derive(Debug)]
pub struct Slopegraph {
    config: SlopeConfig,
    theme: Theme,
    scene: RetainedScene,
    left_domain: Option<(f64, f64)>,
    right_domain: Option<(f64, f64)>,
}

impl Slopegraph {
    #[must_use]
    pub fn new(config: SlopeConfig, theme: Theme, transition: Duration) -> Self {
        Self {
            config,
            theme,
            scene: RetainedScene::new(transition),
            left_domain: None,
            right_domain: None,
        }
    }

    #[must_use]
    pub fn left_domain(&self) -> Option<(f64, f64)> {
        self.left_domain
    }

    #[must_use]
    pub fn right_domain(&self) -> Option<(f64, f64)> {
        self.right_domain
    }

    fn build_target(&mut self, request: &DrawRequest<'_>) -> ChartResult<SceneTarget> {
        let DrawRequest {
            dataset,
            catalog,
            selection,
        } = *request;
        let (primary, secondary) = (selection.primary, selection.secondary);
        let theme = self.theme;
        let height = CANVAS.plot_height();

        let left_domain = PADDING.resolve(dataset.extent(primary), selection.zero_baseline);
        let right_domain = PADDING.resolve(dataset.extent(secondary), selection.zero_baseline);
        let left = LinearScale::new(left_domain.0, left_domain.1)?.with_range(height, 0.0)?;
        let right = LinearScale::new(right_domain.0, right_domain.1)?.with_range(height, 0.0)?;
        self.left_domain = Some(left_domain);
        self.right_domain = Some(right_domain);
        debug!(?left_domain, ?right_domain, "slopegraph layout");

        let left_category = catalog.get_by_key(primary.as_str());
        let right_category = catalog.get_by_key(secondary.as_str());
        let left_format = left_category.number_format();
        let right_format = right_category.number_format();

        let to_canvas = |px: f64, py: f64| CANVAS.to_canvas(px, py);
        let mut target = SceneTarget::new();

        for (slot, entity) in dataset.entities().iter().enumerate() {
            let emphasis = Emphasis::resolve(entity, self.config.show_reference);
            let visible = emphasis.is_visible();
            let labelled = visible && (self.config.label_all || emphasis.is_highlighted());
            let left_value = entity.metric(primary);
            let right_value = entity.metric(secondary);
            let (lx, ly) = to_canvas(LEFT_AXIS_X, left.map(left_value)?);
            let (rx, ry) = to_canvas(RIGHT_AXIS_X, right.map(right_value)?);

            target.line(
                NodeKey::new(ROLE_CONNECTOR, slot),
                LinePrimitive::new(
                    lx,
                    ly,
                    rx,
                    ry,
                    theme.stroke_width(emphasis),
                    theme.mark_color(emphasis),
                ),
                visible,
            );
            target.circle(
                NodeKey::new(ROLE_LEFT_POINT, slot),
                CirclePrimitive::new(lx, ly, POINT_RADIUS_PX, theme.mark_color(emphasis)),
                visible,
            );
            target.circle(
                NodeKey::new(ROLE_RIGHT_POINT, slot),
                CirclePrimitive::new(rx, ry, POINT_RADIUS_PX, theme.mark_color(emphasis)),
                visible,
            );
            target.text(
                NodeKey::new(ROLE_LEFT_NAME, slot),
                TextPrimitive::new(
                    format!("{} [{}]", entity.name, left_format.format(left_value)),
                    lx - LABEL_GAP_PX,
                    ly + LABEL_BASELINE_SHIFT_PX,
                    theme.font_size_px,
                    theme.label_color(emphasis),
                    TextHAlign::Right,
                ),
                labelled,
            );
            target.text(
                NodeKey::new(ROLE_RIGHT_NAME, slot),
                TextPrimitive::new(
                    format!("{} [{}]", entity.name, right_format.format(right_value)),
                    rx + LABEL_GAP_PX,
                    ry + LABEL_BASELINE_SHIFT_PX,
                    theme.font_size_px,
                    theme.label_color(emphasis),
                    TextHAlign::Left,
                ),
                labelled,
            );
        }

        AxisSpec {
            roles: LEFT_AXIS,
            orient: AxisOrient::Left,
            origin: to_canvas(LEFT_AXIS_X, 0.0),
            scale: left,
            ticks: [left_domain.0, left_domain.1]
                .into_iter()
                .map(|value| (value, format_tick_label(value, &left_format)))
                .collect(),
        }
        .push_into(&mut target, &theme)?;
        AxisSpec {
            roles: RIGHT_AXIS,
            orient: AxisOrient::Right,
            origin: to_canvas(RIGHT_AXIS_X, 0.0),
            scale: right,
            ticks: [right_domain.0, right_domain.1]
                .into_iter()
                .map(|value| (value, format_tick_label(value, &right_format)))
                .collect(),
        }
        .push_into(&mut target, &theme)?;

        let (tx, ty) = to_canvas(LEFT_AXIS_X - 40.0, LEGEND_Y);
        target.text(
            NodeKey::new(ROLE_LEFT_LEGEND, 0),
            TextPrimitive::new(
                left_category.label.clone(),
                tx,
                ty,
                theme.legend_font_size_px,
                theme.text,
                TextHAlign::Center,
            ),
            true,
        );
        let (tx, ty) = to_canvas(RIGHT_AXIS_X + 40.0, LEGEND_Y);
        target.text(
            NodeKey::new(ROLE_RIGHT_LEGEND, 0),
            TextPrimitive::new(
                right_category.label.clone(),
                tx,
                ty,
                theme.legend_font_size_px,
                theme.text,
                TextHAlign::Center,
            ),
            true,
        );

        Ok(target)
    }
}

impl ChartRenderer for Slopegraph {
    fn kind(&self) -> ChartKind {
        ChartKind::Slope
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
