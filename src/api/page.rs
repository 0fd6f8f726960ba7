use std::fmt::Write;

use crate::error::{ChartError, ChartResult};

const PAGE_TITLE: &str = "District comparison";
const STYLE: &str = "body{font-family:sans-serif;margin:24px}\
.chart-region{margin-bottom:24px}\
.hide{display:none}\
table{border-collapse:collapse;font-size:12px}\
th,td{border:1px solid #ddd;padding:4px 8px;text-align:right}\
th:first-child,td:first-child{text-align:left}";

/// Wraps chart and table markup in one HTML document. A hidden table keeps
/// its markup and is only styled out of view.
pub fn render_page(svg: &str, table_html: &str, table_visible: bool) -> ChartResult<String> {
    write_page(svg, table_html, table_visible)
        .map_err(|err| ChartError::InvalidData(format!("failed to write page: {err}")))
}

fn write_page(svg: &str, table_html: &str, table_visible: bool) -> Result<String, std::fmt::Error> {
    let table_class = if table_visible {
        "table-region"
    } else {
        "table-region hide"
    };
    let mut out = String::with_capacity(svg.len() + table_html.len() + 512);
    writeln!(out, "<!DOCTYPE html>")?;
    writeln!(out, "<html lang=\"en\">")?;
    writeln!(out, "<head>")?;
    writeln!(out, "<meta charset=\"utf-8\">")?;
    writeln!(out, "<title>{PAGE_TITLE}</title>")?;
    writeln!(out, "<style>{STYLE}</style>")?;
    writeln!(out, "</head>")?;
    writeln!(out, "<body>")?;
    writeln!(out, "<div class=\"chart-region\">")?;
    out.push_str(svg);
    writeln!(out, "</div>")?;
    writeln!(out, "<div class=\"{table_class}\">")?;
    out.push_str(table_html);
    writeln!(out, "</div>")?;
    writeln!(out, "</body>")?;
    writeln!(out, "</html>")?;
    Ok(out)
}
