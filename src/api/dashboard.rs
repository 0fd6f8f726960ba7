use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::charts::{ChartKind, ChartRenderer, DrawRequest, RenderPhase};
use crate::core::{CategoryCatalog, EntityDataset, MetricKey};
use crate::error::ChartResult;
use crate::render::{DataTable, RenderFrame, Renderer, SvgRenderer};

use super::{DashboardConfig, DashboardEvent, DashboardSources, SelectionState, load_sources};

/// Owns the loaded data, the current selection and exactly one live chart.
pub struct Dashboard {
    catalog: CategoryCatalog,
    dataset: EntityDataset,
    config: DashboardConfig,
    selection: SelectionState,
    renderer: Box<dyn ChartRenderer>,
    table: DataTable,
}

impl std::fmt::Debug for Dashboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dashboard")
            .field("selection", &self.selection)
            .field("chart", &self.renderer.kind())
            .field("phase", &self.renderer.phase())
            .field("entities", &self.dataset.len())
            .field("categories", &self.catalog.len())
            .finish()
    }
}

impl Dashboard {
    /// Loads both sources, then builds and draws the configured chart.
    ///
    /// Nothing is constructed unless both loads succeed.
    pub fn bootstrap(sources: &DashboardSources, config: DashboardConfig) -> ChartResult<Self> {
        config.validate()?;
        let (catalog, dataset) = load_sources(sources).inspect_err(|err| {
            error!(
                error = %err,
                categories = %sources.categories.display(),
                entities = %sources.entities.display(),
                "dashboard initialization failed"
            );
        })?;
        Ok(Self::from_parts(catalog, dataset, config))
    }

    /// Builds a dashboard from data already in memory.
    #[must_use]
    pub fn from_parts(
        catalog: CategoryCatalog,
        dataset: EntityDataset,
        config: DashboardConfig,
    ) -> Self {
        let selection = SelectionState::from_config(&config);
        let renderer = selection.chart.build_renderer(&config.charts);
        let table = DataTable::from_projection(&dataset.tabular_projection(), &catalog);
        let mut dashboard = Self {
            catalog,
            dataset,
            config,
            selection,
            renderer,
            table,
        };
        dashboard.redraw();
        dashboard
    }

    #[must_use]
    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn dataset(&self) -> &EntityDataset {
        &self.dataset
    }

    #[must_use]
    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    #[must_use]
    pub fn selection(&self) -> SelectionState {
        self.selection
    }

    /// Whether the secondary metric selector applies to the current chart.
    #[must_use]
    pub fn uses_secondary_key(&self) -> bool {
        self.selection.chart.uses_secondary_key()
    }

    #[must_use]
    pub fn renderer(&self) -> &dyn ChartRenderer {
        self.renderer.as_ref()
    }

    #[must_use]
    pub fn phase(&self) -> RenderPhase {
        self.renderer.phase()
    }

    #[must_use]
    pub fn table(&self) -> &DataTable {
        &self.table
    }

    /// Applies one control change and redraws.
    ///
    /// Returns `false` when the event named an unknown chart or metric; the
    /// event is then ignored and the current chart stays as it was.
    pub fn handle(&mut self, event: DashboardEvent) -> bool {
        debug!(?event, "dashboard event");
        match event {
            DashboardEvent::ChartSelected(raw) => match raw.parse::<ChartKind>() {
                Ok(kind) => self.switch_chart(kind),
                Err(err) => {
                    warn!(error = %err, "ignoring chart selection");
                    return false;
                }
            },
            DashboardEvent::PrimarySelected(raw) => match raw.parse::<MetricKey>() {
                Ok(key) => {
                    self.selection.chart_selection.primary = key;
                    self.redraw();
                }
                Err(err) => {
                    warn!(error = %err, "ignoring primary selection");
                    return false;
                }
            },
            DashboardEvent::SecondarySelected(raw) => match raw.parse::<MetricKey>() {
                Ok(key) => {
                    self.selection.chart_selection.secondary = key;
                    self.redraw();
                }
                Err(err) => {
                    warn!(error = %err, "ignoring secondary selection");
                    return false;
                }
            },
            DashboardEvent::ZeroBaselineToggled(enabled) => {
                self.selection.chart_selection.zero_baseline = enabled;
                self.redraw();
            }
            DashboardEvent::TableVisibilityToggled(visible) => {
                self.selection.table_visible = visible;
            }
        }
        true
    }

    /// Drops the current chart and draws a fresh instance of `kind`.
    fn switch_chart(&mut self, kind: ChartKind) {
        info!(from = %self.selection.chart, to = %kind, "switching chart");
        self.selection.chart = kind;
        self.renderer = kind.build_renderer(&self.config.charts);
        self.redraw();
    }

    /// Redraws the live chart. A failed draw is logged and the previous
    /// scene stays on screen.
    fn redraw(&mut self) {
        let request = DrawRequest {
            dataset: &self.dataset,
            catalog: &self.catalog,
            selection: &self.selection.chart_selection,
        };
        if let Err(err) = self.renderer.draw(&request) {
            error!(
                error = %err,
                chart = %self.selection.chart,
                "chart redraw failed"
            );
        }
    }

    /// Moves the chart transition clock forward.
    pub fn advance(&mut self, delta: Duration) {
        self.renderer.advance(delta);
    }

    /// Jumps to the end of any running transition.
    pub fn settle(&mut self) {
        self.renderer.scene_mut().settle();
    }

    #[must_use]
    pub fn chart_frame(&self) -> RenderFrame {
        self.renderer.frame()
    }

    /// Draws the current chart frame with any backend.
    pub fn render_with<R: Renderer>(&self, backend: &mut R) -> ChartResult<()> {
        backend.render(&self.chart_frame())
    }

    pub fn render_svg(&self) -> ChartResult<String> {
        let mut svg = SvgRenderer::new();
        self.render_with(&mut svg)?;
        Ok(svg.into_document())
    }

    pub fn render_table_html(&self) -> ChartResult<String> {
        self.table.to_html()
    }

    /// Full standalone page: chart region plus table region.
    pub fn render_page(&self) -> ChartResult<String> {
        let svg = self.render_svg()?;
        let table = self.render_table_html()?;
        super::page::render_page(&svg, &table, self.selection.table_visible)
    }
}
