use std::fmt::Write;

use crate::core::{CategoryCatalog, LEGACY_NAME_COLUMN, NAME_COLUMN, TabularRow};
use crate::error::{ChartError, ChartResult};
use crate::render::escape_xml;

/// Header titles plus body cells, ready for any table backend.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataTable {
    pub columns: Vec<String>,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Builds the table from the tabular projection. Columns come from the
    /// first row; header titles are looked up in the catalog, so unknown
    /// columns get a blank header.
    #[must_use]
    pub fn from_projection(rows: &[TabularRow], catalog: &CategoryCatalog) -> Self {
        let Some(first) = rows.first() else {
            return Self::default();
        };
        let columns: Vec<String> = first.keys().cloned().collect();
        let headers = columns
            .iter()
            .map(|column| catalog.get_by_key(header_key(column, catalog)).header.clone())
            .collect();
        let body = rows
            .iter()
            .map(|row| {
                columns
                    .iter()
                    .map(|column| row.get(column).map(ToString::to_string).unwrap_or_default())
                    .collect()
            })
            .collect();

        Self {
            columns,
            headers,
            rows: body,
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn to_html(&self) -> ChartResult<String> {
        write_table(self)
            .map_err(|err| ChartError::InvalidData(format!("failed to write table: {err}")))
    }
}

/// Category key holding a column's header. Older category files title the
/// name column under `district`.
fn header_key<'a>(column: &'a str, catalog: &CategoryCatalog) -> &'a str {
    if column == NAME_COLUMN
        && !catalog.contains(NAME_COLUMN)
        && catalog.contains(LEGACY_NAME_COLUMN)
    {
        LEGACY_NAME_COLUMN
    } else {
        column
    }
}

fn write_table(table: &DataTable) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    writeln!(out, "<table>")?;
    writeln!(out, "  <thead>")?;
    write!(out, "    <tr>")?;
    for header in &table.headers {
        write!(out, "<th>{}</th>", escape_xml(header))?;
    }
    writeln!(out, "</tr>")?;
    writeln!(out, "  </thead>")?;
    writeln!(out, "  <tbody>")?;
    for row in &table.rows {
        write!(out, "    <tr>")?;
        for cell in row {
            write!(out, "<td>{}</td>", escape_xml(cell))?;
        }
        writeln!(out, "</tr>")?;
    }
    writeln!(out, "  </tbody>")?;
    writeln!(out, "</table>")?;
    Ok(out)
}
