//! district-charts: comparison charts for school-district metrics.
//!
//! Two CSV inputs (category metadata and per-district metrics) feed four
//! chart variants that render through a retained, animated scene into
//! backend-agnostic frames. The SVG backend and HTML table writer turn those
//! frames into a standalone page.

pub mod api;
pub mod charts;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{Dashboard, DashboardConfig, DashboardEvent, DashboardSources};
pub use charts::{ChartKind, ChartRenderer};
pub use error::{ChartError, ChartResult};
