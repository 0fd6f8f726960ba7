use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::NumberFormat;

/// One row of the category metadata CSV.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CategoryRow {
    pub key: String,
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub label: String,
    #[serde(default, rename = "numericFormat", alias = "d3format")]
    pub numeric_format: Option<String>,
}

/// Display metadata for one data column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct Category {
    pub key: String,
    pub header: String,
    pub label: String,
    pub numeric_format: String,
    pub is_percent: bool,
}

impl Category {
    #[must_use]
    pub fn from_row(row: CategoryRow) -> Self {
        let numeric_format = row.numeric_format.unwrap_or_default();
        let is_percent = numeric_format.contains('%');
        Self {
            key: row.key,
            header: row.header,
            label: row.label,
            numeric_format,
            is_percent,
        }
    }

    /// Empty stand-in returned for unknown keys: blank labels, default format.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_placeholder(&self) -> bool {
        self.key.is_empty()
    }

    #[must_use]
    pub fn number_format(&self) -> NumberFormat {
        NumberFormat::parse(&self.numeric_format)
    }
}

/// Ordered collection of categories with key lookup.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CategoryCatalog {
    categories: Vec<Category>,
    placeholder: Category,
}

impl CategoryCatalog {
    #[must_use]
    pub fn from_rows(rows: Vec<CategoryRow>) -> Self {
        Self {
            categories: rows.into_iter().map(Category::from_row).collect(),
            placeholder: Category::placeholder(),
        }
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.categories.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.categories.iter().any(|category| category.key == key)
    }

    /// Looks up a category by key.
    ///
    /// Unknown keys log a diagnostic and yield the empty placeholder so
    /// callers degrade to blank labels instead of failing.
    #[must_use]
    pub fn get_by_key(&self, key: &str) -> &Category {
        match self.categories.iter().find(|category| category.key == key) {
            Some(category) => category,
            None => {
                warn!(key, "no category found for key");
                &self.placeholder
            }
        }
    }
}
