//! Dashboard orchestration: loading, selection state, events and output.

mod config;
mod dashboard;
mod loader;
mod page;
mod selection;

pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use loader::{
    DashboardSources, load_categories, load_entities, load_sources, read_csv_rows,
};
pub use page::render_page;
pub use selection::{DashboardEvent, SelectionState};
