use std::path::PathBuf;

use thiserror::Error;

pub type ChartResult<T> = Result<T, ChartError>;

#[derive(Debug, Error)]
pub enum ChartError {
    #[error("invalid viewport size: width={width}, height={height}")]
    InvalidViewport { width: u32, height: u32 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("row {row}: field `{field}` has invalid numeric value `{value}`")]
    Parse {
        row: usize,
        field: &'static str,
        value: String,
    },

    #[error("unknown chart type `{0}`")]
    UnknownChartKind(String),

    #[error("unknown metric key `{0}`")]
    UnknownMetric(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("failed to read `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse csv `{}`: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}
