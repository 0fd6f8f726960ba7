use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use crate::core::{CategoryCatalog, CategoryRow, EntityDataset, EntityRow};
use crate::error::{ChartError, ChartResult};

/// Locations of the two CSV inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardSources {
    pub categories: PathBuf,
    pub entities: PathBuf,
}

impl DashboardSources {
    #[must_use]
    pub fn new(categories: impl Into<PathBuf>, entities: impl Into<PathBuf>) -> Self {
        Self {
            categories: categories.into(),
            entities: entities.into(),
        }
    }
}

/// Deserializes every record of a headered CSV stream. `path` only labels
/// errors.
pub fn read_csv_rows<T, R>(reader: R, path: &Path) -> ChartResult<Vec<T>>
where
    T: DeserializeOwned,
    R: Read,
{
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    reader
        .deserialize()
        .collect::<Result<Vec<T>, csv::Error>>()
        .map_err(|source| ChartError::Csv {
            path: path.to_path_buf(),
            source,
        })
}

fn read_csv_file<T: DeserializeOwned>(path: &Path) -> ChartResult<Vec<T>> {
    let file = File::open(path).map_err(|source| ChartError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = read_csv_rows(file, path)?;
    debug!(path = %path.display(), rows = rows.len(), "read csv");
    Ok(rows)
}

pub fn load_categories(path: &Path) -> ChartResult<CategoryCatalog> {
    let rows: Vec<CategoryRow> = read_csv_file(path)?;
    Ok(CategoryCatalog::from_rows(rows))
}

pub fn load_entities(path: &Path) -> ChartResult<EntityDataset> {
    let rows: Vec<EntityRow> = read_csv_file(path)?;
    EntityDataset::from_rows(&rows)
}

/// Reads both inputs in parallel and returns only when both are complete.
/// The first error wins; a partial pair is never returned.
pub fn load_sources(sources: &DashboardSources) -> ChartResult<(CategoryCatalog, EntityDataset)> {
    let (categories, entities) = rayon::join(
        || load_categories(&sources.categories),
        || load_entities(&sources.entities),
    );
    let catalog = categories?;
    let dataset = entities?;
    info!(
        categories = catalog.len(),
        entities = dataset.len(),
        "dashboard sources loaded"
    );
    Ok((catalog, dataset))
}
