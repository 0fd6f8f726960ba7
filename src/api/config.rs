use serde::{Deserialize, Serialize};

use crate::charts::{ChartKind, ChartOptions, ChartSelection};
use crate::core::MetricKey;
use crate::error::{ChartError, ChartResult};

/// Upper bound for a transition; anything longer is treated as a typo.
const MAX_TRANSITION_MS: u64 = 60_000;

/// Dashboard bootstrap configuration.
///
/// Serializable so a host can persist the initial view and per-chart options
/// next to its data files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_chart")]
    pub chart: ChartKind,
    #[serde(default = "default_metric")]
    pub primary: MetricKey,
    #[serde(default = "default_metric")]
    pub secondary: MetricKey,
    #[serde(default)]
    pub zero_baseline: bool,
    #[serde(default = "default_table_visible")]
    pub table_visible: bool,
    #[serde(default)]
    pub charts: ChartOptions,
}

fn default_chart() -> ChartKind {
    ChartKind::Scatter
}

fn default_metric() -> MetricKey {
    MetricKey::Cost
}

fn default_table_visible() -> bool {
    true
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            chart: default_chart(),
            primary: default_metric(),
            secondary: default_metric(),
            zero_baseline: false,
            table_visible: default_table_visible(),
            charts: ChartOptions::default(),
        }
    }
}

impl DashboardConfig {
    pub fn from_json_str(input: &str) -> ChartResult<Self> {
        let config: Self = serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse dashboard config json: {e}"))
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json_string(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to serialize dashboard config: {e}"))
        })
    }

    #[must_use]
    pub fn with_chart(mut self, chart: ChartKind) -> Self {
        self.chart = chart;
        self
    }

    #[must_use]
    pub fn with_primary(mut self, key: MetricKey) -> Self {
        self.primary = key;
        self
    }

    #[must_use]
    pub fn with_secondary(mut self, key: MetricKey) -> Self {
        self.secondary = key;
        self
    }

    #[must_use]
    pub fn with_zero_baseline(mut self, enabled: bool) -> Self {
        self.zero_baseline = enabled;
        self
    }

    #[must_use]
    pub fn with_table_visible(mut self, visible: bool) -> Self {
        self.table_visible = visible;
        self
    }

    /// Enables the scatterplot's least-squares overlay.
    #[must_use]
    pub fn with_trend_line(mut self, enabled: bool) -> Self {
        self.charts.scatter.show_trend_line = enabled;
        self
    }

    #[must_use]
    pub fn with_transition_ms(mut self, transition_ms: u64) -> Self {
        self.charts.transition_ms = transition_ms;
        self
    }

    #[must_use]
    pub fn selection(&self) -> ChartSelection {
        ChartSelection {
            primary: self.primary,
            secondary: self.secondary,
            zero_baseline: self.zero_baseline,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.charts.transition_ms > MAX_TRANSITION_MS {
            return Err(ChartError::InvalidConfig(format!(
                "transition_ms must be <= {MAX_TRANSITION_MS}, got {}",
                self.charts.transition_ms
            )));
        }
        let scatter = &self.charts.scatter;
        if scatter.x_ticks == 0 || scatter.y_ticks == 0 {
            return Err(ChartError::InvalidConfig(
                "scatter tick counts must be > 0".to_owned(),
            ));
        }
        if self.charts.bullet.tick_count == 0 {
            return Err(ChartError::InvalidConfig(
                "bullet tick count must be > 0".to_owned(),
            ));
        }
        let theme = &self.charts.theme;
        for size in [theme.font_size_px, theme.legend_font_size_px] {
            if !size.is_finite() || size <= 0.0 {
                return Err(ChartError::InvalidConfig(format!(
                    "font sizes must be finite and > 0, got {size}"
                )));
            }
        }
        Ok(())
    }
}
