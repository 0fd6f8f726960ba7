use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use ordered_float::OrderedFloat;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::core::primitives::{display_number, percent_to_proportion, proportion_to_percent};
use crate::core::{MetricKey, MetricValues};
use crate::error::{ChartError, ChartResult};

/// One row of the district metrics CSV, kept as raw text until validated.
///
/// Column names follow the current file layout; the older `district` and
/// `isStateAverage` headers are accepted as aliases.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EntityRow {
    #[serde(default, alias = "district")]
    pub name: String,
    #[serde(default, rename = "isReference", alias = "isStateAverage")]
    pub is_reference: Option<String>,
    #[serde(default, rename = "isFeatured")]
    pub is_featured: Option<String>,
    #[serde(default)]
    pub cost: Option<String>,
    #[serde(default, rename = "lowIncome")]
    pub low_income: Option<String>,
    #[serde(default, rename = "classSize")]
    pub class_size: Option<String>,
    #[serde(default, rename = "postSecondary")]
    pub post_secondary: Option<String>,
    #[serde(default, rename = "teacherSalary")]
    pub teacher_salary: Option<String>,
    #[serde(default, rename = "limitedEnglish")]
    pub limited_english: Option<String>,
    #[serde(default, rename = "graduationRate")]
    pub graduation_rate: Option<String>,
    #[serde(default, rename = "pupilAdmin")]
    pub pupil_admin: Option<String>,
    #[serde(default)]
    pub iep: Option<String>,
}

impl EntityRow {
    fn raw_metric(&self, key: MetricKey) -> Option<&str> {
        let raw = match key {
            MetricKey::Cost => &self.cost,
            MetricKey::LowIncome => &self.low_income,
            MetricKey::ClassSize => &self.class_size,
            MetricKey::PostSecondary => &self.post_secondary,
            MetricKey::TeacherSalary => &self.teacher_salary,
            MetricKey::LimitedEnglish => &self.limited_english,
            MetricKey::GraduationRate => &self.graduation_rate,
            MetricKey::PupilAdmin => &self.pupil_admin,
            MetricKey::Iep => &self.iep,
        };
        raw.as_deref()
    }
}

/// A validated district record.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Entity {
    pub name: String,
    pub is_reference: bool,
    pub is_featured: bool,
    metrics: MetricValues,
}

impl Entity {
    /// Builds an entity from a raw row; `row_number` is 1-based and only used
    /// for error reporting.
    pub fn from_row(row: &EntityRow, row_number: usize) -> ChartResult<Self> {
        let mut metrics = MetricValues::default();
        for key in MetricKey::ALL {
            let raw = row.raw_metric(key).unwrap_or_default();
            metrics.set(key, parse_metric(raw, key, row_number)?);
        }

        Ok(Self {
            name: row.name.clone(),
            is_reference: parse_flag(row.is_reference.as_deref()),
            is_featured: parse_flag(row.is_featured.as_deref()),
            metrics,
        })
    }

    /// Test and fixture constructor taking already-normalized metric values.
    #[must_use]
    pub fn new(name: impl Into<String>, is_reference: bool, is_featured: bool) -> Self {
        Self {
            name: name.into(),
            is_reference,
            is_featured,
            metrics: MetricValues::default(),
        }
    }

    #[must_use]
    pub fn with_metric(mut self, key: MetricKey, value: f64) -> Self {
        self.metrics.set(key, value);
        self
    }

    /// Empty stand-in returned when no reference row exists.
    #[must_use]
    pub fn placeholder() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn metric(&self, key: MetricKey) -> f64 {
        self.metrics.get(key)
    }

    #[must_use]
    pub fn metrics(&self) -> &MetricValues {
        &self.metrics
    }
}

fn parse_flag(raw: Option<&str>) -> bool {
    matches!(raw.map(str::trim), Some("true" | "TRUE"))
}

fn parse_metric(raw: &str, key: MetricKey, row_number: usize) -> ChartResult<f64> {
    let trimmed = raw.trim();
    let parse_error = || ChartError::Parse {
        row: row_number,
        field: key.as_str(),
        value: raw.to_owned(),
    };

    let value: f64 = trimmed.parse().map_err(|_| parse_error())?;
    if !value.is_finite() {
        return Err(parse_error());
    }
    if !key.is_proportion() {
        return Ok(value);
    }

    let percent = Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|_| parse_error())?;
    percent_to_proportion(percent, key.as_str())
}

/// One cell of the tabular projection.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TabularCell {
    Text(String),
    Number(f64),
    /// Proportion shown as a percentage with one fixed decimal.
    Percent(f64),
}

impl fmt::Display for TabularCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TabularCell::Text(text) => f.write_str(text),
            TabularCell::Number(value) => f.write_str(&display_number(*value)),
            TabularCell::Percent(value) => write!(f, "{value:.1}"),
        }
    }
}

/// Table-ready copy of an entity: `name` then every metric in key order,
/// proportions shown as percentages, flags dropped.
pub type TabularRow = IndexMap<String, TabularCell>;

/// Column key of the entity name in [`TabularRow`].
pub const NAME_COLUMN: &str = "name";

/// Category key the older file layout uses for the name column.
pub const LEGACY_NAME_COLUMN: &str = "district";

/// Immutable, ordered set of districts.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct EntityDataset {
    entities: Vec<Entity>,
    placeholder: Entity,
}

impl EntityDataset {
    pub fn from_rows(rows: &[EntityRow]) -> ChartResult<Self> {
        let entities = rows
            .iter()
            .enumerate()
            .map(|(index, row)| Entity::from_row(row, index + 1))
            .collect::<ChartResult<Vec<_>>>()?;
        debug!(count = entities.len(), "built entity dataset");
        Ok(Self::from_entities(entities))
    }

    #[must_use]
    pub fn from_entities(entities: Vec<Entity>) -> Self {
        let reference_count = entities.iter().filter(|e| e.is_reference).count();
        let featured_count = entities.iter().filter(|e| e.is_featured).count();
        if reference_count > 1 || featured_count > 1 {
            warn!(
                reference_count,
                featured_count, "dataset flags more than one reference or featured row"
            );
        }
        Self {
            entities,
            placeholder: Entity::placeholder(),
        }
    }

    #[must_use]
    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// First reference entity, if any, without logging.
    #[must_use]
    pub fn find_reference(&self) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.is_reference)
    }

    /// First reference entity, or the empty placeholder plus a diagnostic.
    #[must_use]
    pub fn reference(&self) -> &Entity {
        match self.find_reference() {
            Some(entity) => entity,
            None => {
                warn!("no reference entity in dataset");
                &self.placeholder
            }
        }
    }

    #[must_use]
    pub fn featured(&self) -> Option<&Entity> {
        self.entities.iter().find(|entity| entity.is_featured)
    }

    /// All entities except the reference one, in dataset order.
    #[must_use]
    pub fn individuals(&self) -> Vec<&Entity> {
        self.entities
            .iter()
            .filter(|entity| !entity.is_reference)
            .collect()
    }

    /// Observed `(min, max)` of a metric across every entity.
    #[must_use]
    pub fn extent(&self, key: MetricKey) -> Option<(f64, f64)> {
        let values = self
            .entities
            .iter()
            .map(|entity| OrderedFloat(entity.metric(key)));
        let min = values.clone().min()?;
        let max = values.max()?;
        Some((min.0, max.0))
    }

    #[must_use]
    pub fn tabular_projection(&self) -> Vec<TabularRow> {
        self.entities
            .iter()
            .map(|entity| {
                let mut row = TabularRow::with_capacity(MetricKey::COUNT + 1);
                row.insert(
                    NAME_COLUMN.to_owned(),
                    TabularCell::Text(entity.name.clone()),
                );
                for (key, value) in entity.metrics().iter() {
                    let cell = if key.is_proportion() {
                        TabularCell::Percent(proportion_to_percent(value))
                    } else {
                        TabularCell::Number(value)
                    };
                    row.insert(key.as_str().to_owned(), cell);
                }
                row
            })
            .collect()
    }
}
