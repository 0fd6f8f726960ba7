use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::charts::axis::{AxisOrient, AxisRoles, AxisSpec, score_label};
use crate::charts::scene::{NodeKey, RetainedScene, SceneTarget};
use crate::charts::theme::{Emphasis, Theme};
use crate::charts::{ChartKind, ChartRenderer, DrawRequest};
use crate::core::{
    ChartCanvas, DomainPadding, LinearRegression, LinearScale, Margin, MetricKey, Viewport,
};
use crate::error::ChartResult;
use crate::render::{
    CirclePrimitive, LinePrimitive, LineStrokeStyle, TextHAlign, TextPrimitive,
};

const CANVAS: ChartCanvas = ChartCanvas::new(
    Viewport {
        width: 800,
        height: 540,
    },
    Margin::new(20.0, 20.0, 60.0, 100.0),
);
const POINT_RADIUS_PX: f64 = 13.0;
const NAME_OFFSET_X_PX: f64 = 14.0;
const NAME_OFFSET_Y_PX: f64 = -4.0;
const SCORE_BASELINE_SHIFT_PX: f64 = 4.0;

const X_AXIS: AxisRoles = AxisRoles::new("x-axis", "x-axis.tick", "x-axis.label");
const Y_AXIS: AxisRoles = AxisRoles::new("y-axis", "y-axis.tick", "y-axis.label");

pub const ROLE_POINT: &str = "point";
pub const ROLE_SCORE: &str = "score";
pub const ROLE_NAME: &str = "name";
pub const ROLE_REFERENCE_KEY: &str = "reference.key";
pub const ROLE_REFERENCE_BASE: &str = "reference.base";
pub const ROLE_TREND: &str = "trend";
pub const ROLE_TREND_LEGEND: &str = "trend.legend";
pub const ROLE_X_TITLE: &str = "x-title";
pub const ROLE_Y_TITLE: &str = "y-title";

fn default_true() -> bool {
    true
}

fn default_wide_floor_x() -> Vec<MetricKey> {
    vec![MetricKey::LowIncome]
}

fn default_x_ticks() -> usize {
    6
}

fn default_y_ticks() -> usize {
    5
}

fn default_trend_legend() -> String {
    "- - - linear trend across individual districts".to_owned()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScatterConfig {
    /// Draw the reference district and its cross-hair lines when both of its
    /// selected values are non-zero.
    #[serde(default = "default_true")]
    pub show_reference: bool,
    /// Overlay the least-squares trend of individual districts.
    #[serde(default)]
    pub show_trend_line: bool,
    /// Keys whose x-axis floor uses `min * 0.6` instead of `min * 0.9`.
    #[serde(default = "default_wide_floor_x")]
    pub wide_floor_x: Vec<MetricKey>,
    /// Keys whose y-axis floor uses `min * 0.6` instead of `min * 0.9`.
    #[serde(default)]
    pub wide_floor_y: Vec<MetricKey>,
    #[serde(default = "default_x_ticks")]
    pub x_ticks: usize,
    #[serde(default = "default_y_ticks")]
    pub y_ticks: usize,
    #[serde(default = "default_trend_legend")]
    pub trend_legend: String,
}

impl Default for ScatterConfig {
    fn default() -> Self {
        Self {
            show_reference: true,
            show_trend_line: false,
            wide_floor_x: default_wide_floor_x(),
            wide_floor_y: Vec::new(),
            x_ticks: default_x_ticks(),
            y_ticks: default_y_ticks(),
            trend_legend: default_trend_legend(),
        }
    }
}

impl ScatterConfig {
    fn padding(keys: &[MetricKey], key: MetricKey) -> DomainPadding {
        let lower = if keys.contains(&key) { 0.6 } else { 0.9 };
        DomainPadding::new(lower, 1.1)
    }
}

/// Two-metric scatterplot with optional reference cross-hairs and trend line.
#[derive(Debug)]
pub struct Scatterplot {
    config: ScatterConfig,
    theme: Theme,
    scene: RetainedScene,
    x_domain: Option<(f64, f64)>,
    y_domain: Option<(f64, f64)>,
    trend: Option<LinearRegression>,
}

impl Scatterplot {
    #[must_use]
    pub fn new(config: ScatterConfig, theme: Theme, transition: Duration) -> Self {
        Self {
            config,
            theme,
            scene: RetainedScene::new(transition),
            x_domain: None,
            y_domain: None,
            trend: None,
        }
    }

    /// Padded x domain from the last draw.
    #[must_use]
    pub fn x_domain(&self) -> Option<(f64, f64)> {
        self.x_domain
    }

    /// Padded y domain from the last draw.
    #[must_use]
    pub fn y_domain(&self) -> Option<(f64, f64)> {
        self.y_domain
    }

    /// Regression over individual districts from the last draw.
    #[must_use]
    pub fn trend(&self) -> Option<LinearRegression> {
        self.trend
    }

    fn build_target(&mut self, request: &DrawRequest<'_>) -> ChartResult<SceneTarget> {
        let DrawRequest {
            dataset,
            catalog,
            selection,
        } = *request;
        let (primary, secondary) = (selection.primary, selection.secondary);
        let theme = self.theme;
        let width = CANVAS.plot_width();
        let height = CANVAS.plot_height();

        let x_domain = ScatterConfig::padding(&self.config.wide_floor_x, primary)
            .resolve(dataset.extent(primary), selection.zero_baseline);
        let y_domain = ScatterConfig::padding(&self.config.wide_floor_y, secondary)
            .resolve(dataset.extent(secondary), selection.zero_baseline);
        let x = LinearScale::new(x_domain.0, x_domain.1)?.with_range(0.0, width)?;
        let y = LinearScale::new(y_domain.0, y_domain.1)?.with_range(height, 0.0)?;
        self.x_domain = Some(x_domain);
        self.y_domain = Some(y_domain);

        let x_category = catalog.get_by_key(primary.as_str());
        let y_category = catalog.get_by_key(secondary.as_str());
        let x_format = x_category.number_format();
        let y_format = y_category.number_format();

        let reference = dataset.find_reference();
        let show_reference = self.config.show_reference
            && reference.is_some_and(|r| r.metric(primary) != 0.0 && r.metric(secondary) != 0.0);

        let pairs: Vec<(f64, f64)> = dataset
            .individuals()
            .iter()
            .map(|entity| (entity.metric(primary), entity.metric(secondary)))
            .collect();
        self.trend = LinearRegression::fit(&pairs);
        debug!(
            primary = %primary,
            secondary = %secondary,
            ?x_domain,
            ?y_domain,
            show_reference,
            "scatterplot layout"
        );

        let to_canvas = |px: f64, py: f64| CANVAS.to_canvas(px, py);
        let mut target = SceneTarget::new();

        if let (true, Some(reference)) = (show_reference, reference) {
            let ref_x = x.map(reference.metric(primary))?;
            let ref_y = y.map(reference.metric(secondary))?;
            let (x0, y0) = to_canvas(0.0, ref_y);
            let (x1, y1) = to_canvas(width, ref_y);
            target.line(
                NodeKey::new(ROLE_REFERENCE_KEY, 0),
                LinePrimitive::new(x0, y0, x1, y1, 1.0, theme.reference_mark),
                true,
            );
            let (x0, y0) = to_canvas(ref_x, height);
            let (x1, y1) = to_canvas(ref_x, 0.0);
            target.line(
                NodeKey::new(ROLE_REFERENCE_BASE, 0),
                LinePrimitive::new(x0, y0, x1, y1, 1.0, theme.reference_mark),
                true,
            );
        }

        if let (true, Some(trend)) = (self.config.show_trend_line, self.trend) {
            let start = trend.predict(x_domain.0);
            let end = trend.predict(x_domain.1);
            if start.is_finite() && end.is_finite() {
                let (x0, y0) = to_canvas(0.0, y.map(start)?);
                let (x1, y1) = to_canvas(width, y.map(end)?);
                target.line(
                    NodeKey::new(ROLE_TREND, 0),
                    LinePrimitive::new(x0, y0, x1, y1, 1.5, theme.trend_line)
                        .with_stroke_style(LineStrokeStyle::Dashed),
                    true,
                );
                let (lx, ly) = to_canvas(10.0, 20.0);
                target.text(
                    NodeKey::new(ROLE_TREND_LEGEND, 0),
                    TextPrimitive::new(
                        self.config.trend_legend.clone(),
                        lx,
                        ly,
                        theme.font_size_px,
                        theme.text,
                        TextHAlign::Left,
                    ),
                    true,
                );
            }
        }

        for (slot, entity) in dataset.entities().iter().enumerate() {
            let emphasis = Emphasis::resolve(entity, show_reference);
            let visible = emphasis.is_visible();
            let value_x = entity.metric(primary);
            let value_y = entity.metric(secondary);
            let (cx, cy) = to_canvas(x.map(value_x)?, y.map(value_y)?);

            target.circle(
                NodeKey::new(ROLE_POINT, slot),
                CirclePrimitive::new(cx, cy, POINT_RADIUS_PX, theme.mark_color(emphasis)),
                visible,
            );
            target.text(
                NodeKey::new(ROLE_SCORE, slot),
                TextPrimitive::new(
                    score_label(value_y, y_category),
                    cx,
                    cy + SCORE_BASELINE_SHIFT_PX,
                    theme.font_size_px * 0.8,
                    theme.score_text,
                    TextHAlign::Center,
                ),
                visible,
            );
            target.text(
                NodeKey::new(ROLE_NAME, slot),
                TextPrimitive::new(
                    entity.name.clone(),
                    cx + NAME_OFFSET_X_PX,
                    cy + NAME_OFFSET_Y_PX,
                    theme.font_size_px,
                    theme.label_color(emphasis),
                    TextHAlign::Left,
                )
                .with_halo(theme.halo),
                visible,
            );
        }

        AxisSpec {
            roles: X_AXIS,
            orient: AxisOrient::Bottom,
            origin: to_canvas(0.0, height),
            scale: x,
            ticks: x
                .ticks(self.config.x_ticks)
                .into_iter()
                .map(|value| (value, x_format.format(value)))
                .collect(),
        }
        .push_into(&mut target, &theme)?;
        AxisSpec {
            roles: Y_AXIS,
            orient: AxisOrient::Left,
            origin: to_canvas(0.0, 0.0),
            scale: y,
            ticks: y
                .ticks(self.config.y_ticks)
                .into_iter()
                .map(|value| (value, y_format.format(value)))
                .collect(),
        }
        .push_into(&mut target, &theme)?;

        let (tx, ty) = to_canvas(-75.0, height / 2.0);
        target.text(
            NodeKey::new(ROLE_Y_TITLE, 0),
            TextPrimitive::new(
                axis_title(&y_category.label),
                tx,
                ty,
                theme.legend_font_size_px,
                theme.text,
                TextHAlign::Center,
            )
            .with_rotation(-90.0),
            !y_category.label.is_empty(),
        );
        let (tx, ty) = to_canvas(width / 2.0, height + 45.0);
        target.text(
            NodeKey::new(ROLE_X_TITLE, 0),
            TextPrimitive::new(
                axis_title(&x_category.label),
                tx,
                ty,
                theme.legend_font_size_px,
                theme.text,
                TextHAlign::Center,
            ),
            !x_category.label.is_empty(),
        );

        Ok(target)
    }
}

fn axis_title(label: &str) -> String {
    format!("~ {label} ~")
}

impl ChartRenderer for Scatterplot {
    fn kind(&self) -> ChartKind {
        ChartKind::Scatter
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
