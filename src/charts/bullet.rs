use std::time::Duration;

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::charts::scene::{NodeKey, RetainedScene, SceneTarget};
use crate::charts::theme::Theme;
use crate::charts::{ChartKind, ChartRenderer, DrawRequest};
use crate::core::{Entity, EntityDataset, LinearScale, Margin, MetricKey, Viewport};
use crate::error::ChartResult;
use crate::render::{LinePrimitive, RectPrimitive, TextHAlign, TextPrimitive};

const ROW_WIDTH: u32 = 300;
const ROW_HEIGHT: u32 = 35;
const ROW_MARGIN: Margin = Margin::new(5.0, 10.0, 17.0, 90.0);
const RANGE_HEADROOM: f64 = 1.1;
const TITLE_OFFSET_X_PX: f64 = -5.0;
const TITLE_BASELINE_SHIFT_PX: f64 = -3.0;

pub const ROLE_RANGE: &str = "range";
pub const ROLE_MEASURE: &str = "measure";
pub const ROLE_MARKER: &str = "marker";
pub const ROLE_TITLE: &str = "title";
pub const ROLE_TICK: &str = "tick";
pub const ROLE_TICK_LABEL: &str = "tick.label";

fn default_tick_count() -> usize {
    8
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletConfig {
    #[serde(default = "default_tick_count")]
    pub tick_count: usize,
}

impl Default for BulletConfig {
    fn default() -> Self {
        Self {
            tick_count: default_tick_count(),
        }
    }
}

/// One bullet row.
#[derive(Debug, Clone, PartialEq)]
pub struct BulletDatum {
    pub title: String,
    /// `[0, reference, max * 1.1]`.
    pub ranges: SmallVec<[f64; 3]>,
    pub measures: SmallVec<[f64; 1]>,
    /// The featured district's value, empty when nothing is featured.
    pub markers: SmallVec<[f64; 1]>,
}

impl BulletDatum {
    fn domain_max(&self) -> f64 {
        self.ranges
            .iter()
            .chain(self.measures.iter())
            .chain(self.markers.iter())
            .copied()
            .fold(0.0, f64::max)
    }
}

/// Builds one row per non-reference district, featured first.
///
/// The reference value becomes the middle range band of every row; a
/// dataset without a reference uses zero for it.
#[must_use]
pub fn bullet_data(dataset: &EntityDataset, primary: MetricKey) -> Vec<BulletDatum> {
    let baseline = match dataset.find_reference() {
        Some(reference) => reference.metric(primary),
        None => {
            warn!(metric = %primary, "no reference district, bullet baseline falls back to 0");
            0.0
        }
    };
    let max = dataset
        .entities()
        .iter()
        .map(|entity| entity.metric(primary))
        .fold(f64::NEG_INFINITY, f64::max);
    let max = if max.is_finite() { max } else { 0.0 };
    let featured = dataset.featured().map(|entity| entity.metric(primary));

    let mut rows: Vec<&Entity> = dataset
        .entities()
        .iter()
        .filter(|entity| !entity.is_reference)
        .collect();
    // Stable, so the remaining districts keep their source order.
    rows.sort_by_key(|entity| !entity.is_featured);

    rows.into_iter()
        .map(|entity| BulletDatum {
            title: entity.name.clone(),
            ranges: SmallVec::from_buf([0.0, baseline, max * RANGE_HEADROOM]),
            measures: SmallVec::from_buf([entity.metric(primary)]),
            markers: featured.into_iter().collect(),
        })
        .collect()
}

/// Stack of horizontal bullet rows sharing one frame. Redraws replace the
/// scene without a transition.
#[derive(Debug)]
pub struct BulletChart {
    config: BulletConfig,
    theme: Theme,
    scene: RetainedScene,
    rows: usize,
    data: Vec<BulletDatum>,
}

impl BulletChart {
    #[must_use]
    pub fn new(config: BulletConfig, theme: Theme) -> Self {
        Self {
            config,
            theme,
            scene: RetainedScene::new(Duration::ZERO),
            rows: 0,
            data: Vec::new(),
        }
    }

    /// Rows from the last draw.
    #[must_use]
    pub fn data(&self) -> &[BulletDatum] {
        &self.data
    }

    fn inner_width() -> f64 {
        f64::from(ROW_WIDTH) - ROW_MARGIN.left - ROW_MARGIN.right
    }

    fn inner_height() -> f64 {
        f64::from(ROW_HEIGHT) - ROW_MARGIN.top - ROW_MARGIN.bottom
    }

    fn build_target(
        &self,
        request: &DrawRequest<'_>,
        data: &[BulletDatum],
    ) -> ChartResult<SceneTarget> {
        let key = request.selection.primary;
        let format = request.catalog.get_by_key(key.as_str()).number_format();
        let theme = self.theme;
        let width = Self::inner_width();
        let height = Self::inner_height();

        let mut target = SceneTarget::new();
        let mut tick_slot = 0usize;
        let mut measure_slot = 0usize;
        let mut marker_slot = 0usize;

        for (row, datum) in data.iter().enumerate() {
            let origin_x = ROW_MARGIN.left;
            let origin_y = row as f64 * f64::from(ROW_HEIGHT) + ROW_MARGIN.top;

            let max = datum.domain_max();
            let max = if max > 0.0 { max } else { 1.0 };
            let scale = LinearScale::new(0.0, max)?.with_range(0.0, width)?;

            let mut ranges: SmallVec<[f64; 3]> = datum.ranges.clone();
            ranges.sort_by(|a, b| b.total_cmp(a));
            for (index, value) in ranges.iter().enumerate() {
                let shade = theme.bullet_ranges[index.min(theme.bullet_ranges.len() - 1)];
                target.rect(
                    NodeKey::new(ROLE_RANGE, row * 3 + index),
                    RectPrimitive::new(
                        origin_x,
                        origin_y,
                        scale.map(*value)?.max(0.0),
                        height,
                        shade,
                    ),
                    true,
                );
            }

            for value in &datum.measures {
                target.rect(
                    NodeKey::new(ROLE_MEASURE, measure_slot),
                    RectPrimitive::new(
                        origin_x,
                        origin_y + height / 3.0,
                        scale.map(*value)?.max(0.0),
                        height / 3.0,
                        theme.bullet_measure,
                    ),
                    true,
                );
                measure_slot += 1;
            }

            for value in &datum.markers {
                let x = origin_x + scale.map(*value)?;
                target.line(
                    NodeKey::new(ROLE_MARKER, marker_slot),
                    LinePrimitive::new(
                        x,
                        origin_y + height / 6.0,
                        x,
                        origin_y + height * 5.0 / 6.0,
                        2.0,
                        theme.bullet_marker,
                    ),
                    true,
                );
                marker_slot += 1;
            }

            for value in scale.ticks(self.config.tick_count) {
                let x = origin_x + scale.map(value)?;
                target.line(
                    NodeKey::new(ROLE_TICK, tick_slot),
                    LinePrimitive::new(
                        x,
                        origin_y + height,
                        x,
                        origin_y + height * 7.0 / 6.0,
                        1.0,
                        theme.axis,
                    ),
                    true,
                );
                target.text(
                    NodeKey::new(ROLE_TICK_LABEL, tick_slot),
                    TextPrimitive::new(
                        format.format(value),
                        x,
                        origin_y + height * 7.0 / 6.0 + theme.font_size_px * 0.8,
                        theme.font_size_px * 0.8,
                        theme.text,
                        TextHAlign::Center,
                    ),
                    true,
                );
                tick_slot += 1;
            }

            target.text(
                NodeKey::new(ROLE_TITLE, row),
                TextPrimitive::new(
                    datum.title.clone(),
                    origin_x + TITLE_OFFSET_X_PX,
                    origin_y + height + TITLE_BASELINE_SHIFT_PX,
                    theme.font_size_px,
                    theme.text,
                    TextHAlign::Right,
                ),
                true,
            );
        }

        Ok(target)
    }
}

impl ChartRenderer for BulletChart {
    fn kind(&self) -> ChartKind {
        ChartKind::Bullet
    }

    fn draw(&mut self, request: &DrawRequest<'_>) -> ChartResult<()> {
        let data = bullet_data(request.dataset, request.selection.primary);
        debug!(rows = data.len(), metric = %request.selection.primary, "bullet layout");
        let target = self.build_target(request, &data)?;
        self.rows = data.len();
        self.data = data;
        self.scene.replace(target);
        Ok(())
    }

    fn scene(&self) -> &RetainedScene {
        &self.scene
    }

    fn scene_mut(&mut self) -> &mut RetainedScene {
        &mut self.scene
    }

    fn viewport(&self) -> Viewport {
        let rows = u32::try_from(self.rows.max(1)).unwrap_or(u32::MAX / ROW_HEIGHT);
        Viewport::new(ROW_WIDTH, rows.saturating_mul(ROW_HEIGHT))
    }
}
