use serde::{Deserialize, Serialize};

use crate::charts::{ChartKind, ChartSelection};
use crate::error::{ChartError, ChartResult};

use super::DashboardConfig;

/// Control values currently chosen on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionState {
    pub chart: ChartKind,
    pub chart_selection: ChartSelection,
    pub table_visible: bool,
}

impl Default for SelectionState {
    fn default() -> Self {
        Self::from_config(&DashboardConfig::default())
    }
}

impl SelectionState {
    #[must_use]
    pub fn from_config(config: &DashboardConfig) -> Self {
        Self {
            chart: config.chart,
            chart_selection: config.selection(),
            table_visible: config.table_visible,
        }
    }
}

/// One control change.
///
/// Chart and metric names arrive as raw strings, the way a form or a replay
/// file supplies them; the dashboard resolves and validates them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum DashboardEvent {
    ChartSelected(String),
    PrimarySelected(String),
    SecondarySelected(String),
    ZeroBaselineToggled(bool),
    TableVisibilityToggled(bool),
}

impl DashboardEvent {
    /// Parses a JSON array of events, as written by a replay file.
    pub fn list_from_json_str(input: &str) -> ChartResult<Vec<Self>> {
        serde_json::from_str(input).map_err(|e| {
            ChartError::InvalidConfig(format!("failed to parse event list json: {e}"))
        })
    }
}
