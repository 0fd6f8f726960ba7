pub mod category;
pub mod dataset;
pub mod metric;
pub mod number_format;
pub mod primitives;
pub mod regression;
pub mod scale;
pub mod types;

pub use category::{Category, CategoryCatalog, CategoryRow};
pub use dataset::{
    Entity, EntityDataset, EntityRow, LEGACY_NAME_COLUMN, NAME_COLUMN, TabularCell, TabularRow,
};
pub use metric::{MetricKey, MetricKind, MetricValues};
pub use number_format::NumberFormat;
pub use regression::LinearRegression;
pub use scale::{DomainPadding, LinearScale, nice_tick_step};
pub use types::{ChartCanvas, Margin, Viewport};
