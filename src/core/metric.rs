use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ChartError;

/// How a metric column is encoded in the source CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    /// Currency amount, stored as-is.
    Amount,
    /// Integer-ish count, stored as-is.
    Count,
    /// Ratio such as pupils per administrator, stored as-is.
    Rate,
    /// 0..=100 percentage in the CSV, stored as a 0..=1 proportion.
    Proportion,
}

/// Fixed set of numeric columns carried by every district row.
///
/// The string form matches both the CSV column name and the category key in
/// the category metadata file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MetricKey {
    #[serde(rename = "cost")]
    Cost,
    #[serde(rename = "lowIncome")]
    LowIncome,
    #[serde(rename = "classSize")]
    ClassSize,
    #[serde(rename = "postSecondary")]
    PostSecondary,
    #[serde(rename = "teacherSalary")]
    TeacherSalary,
    #[serde(rename = "limitedEnglish")]
    LimitedEnglish,
    #[serde(rename = "graduationRate")]
    GraduationRate,
    #[serde(rename = "pupilAdmin")]
    PupilAdmin,
    #[serde(rename = "iep")]
    Iep,
}

impl MetricKey {
    pub const COUNT: usize = 9;

    pub const ALL: [MetricKey; Self::COUNT] = [
        MetricKey::Cost,
        MetricKey::LowIncome,
        MetricKey::ClassSize,
        MetricKey::PostSecondary,
        MetricKey::TeacherSalary,
        MetricKey::LimitedEnglish,
        MetricKey::GraduationRate,
        MetricKey::PupilAdmin,
        MetricKey::Iep,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            MetricKey::Cost => "cost",
            MetricKey::LowIncome => "lowIncome",
            MetricKey::ClassSize => "classSize",
            MetricKey::PostSecondary => "postSecondary",
            MetricKey::TeacherSalary => "teacherSalary",
            MetricKey::LimitedEnglish => "limitedEnglish",
            MetricKey::GraduationRate => "graduationRate",
            MetricKey::PupilAdmin => "pupilAdmin",
            MetricKey::Iep => "iep",
        }
    }

    #[must_use]
    pub const fn kind(self) -> MetricKind {
        match self {
            MetricKey::Cost | MetricKey::TeacherSalary => MetricKind::Amount,
            MetricKey::ClassSize => MetricKind::Count,
            MetricKey::PupilAdmin => MetricKind::Rate,
            MetricKey::LowIncome
            | MetricKey::PostSecondary
            | MetricKey::LimitedEnglish
            | MetricKey::GraduationRate
            | MetricKey::Iep => MetricKind::Proportion,
        }
    }

    #[must_use]
    pub const fn is_proportion(self) -> bool {
        matches!(self.kind(), MetricKind::Proportion)
    }

    const fn index(self) -> usize {
        match self {
            MetricKey::Cost => 0,
            MetricKey::LowIncome => 1,
            MetricKey::ClassSize => 2,
            MetricKey::PostSecondary => 3,
            MetricKey::TeacherSalary => 4,
            MetricKey::LimitedEnglish => 5,
            MetricKey::GraduationRate => 6,
            MetricKey::PupilAdmin => 7,
            MetricKey::Iep => 8,
        }
    }
}

impl fmt::Display for MetricKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MetricKey {
    type Err = ChartError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        MetricKey::ALL
            .into_iter()
            .find(|key| key.as_str() == raw)
            .ok_or_else(|| ChartError::UnknownMetric(raw.to_owned()))
    }
}

/// One value per [`MetricKey`], indexed by key.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MetricValues([f64; MetricKey::COUNT]);

impl MetricValues {
    #[must_use]
    pub fn get(&self, key: MetricKey) -> f64 {
        self.0[key.index()]
    }

    pub fn set(&mut self, key: MetricKey, value: f64) {
        self.0[key.index()] = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricKey, f64)> + '_ {
        MetricKey::ALL.into_iter().map(|key| (key, self.get(key)))
    }
}
