//! Report export of the last search result.
//!
//! The default report is a standalone HTML page (bootstrap styled) with the
//! ranked table and the search term. A target ending in `.csv` receives the
//! same columns as plain CSV instead.

use std::{
    fmt::Write as _,
    fs,
    path::{Path, PathBuf},
};

use log::info;

use crate::{
    error::{PriceError, Result},
    query::ResultSet,
    table::{RESULT_HEADERS, result_rows},
};

pub const DEFAULT_REPORT_NAME: &str = "output.html";

const STYLESHEET: &str = "https://maxcdn.bootstrapcdn.com/bootstrap/3.3.7/css/bootstrap.min.css";

/// Turns user input into a report path: blank input yields
/// [`DEFAULT_REPORT_NAME`], a name without extension gets `.html`.
pub fn resolve_target(name: Option<&str>) -> PathBuf {
    let trimmed = name.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return PathBuf::from(DEFAULT_REPORT_NAME);
    }
    let path = PathBuf::from(trimmed);
    if path.extension().is_some() {
        path
    } else {
        path.with_extension("html")
    }
}

pub fn export(result: &ResultSet, target: &Path) -> Result<PathBuf> {
    let is_csv = target
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if is_csv {
        write_csv(result, target)?;
    } else {
        fs::write(target, render_html(result)).map_err(|err| PriceError::io(target, err))?;
    }
    info!("Exported {} item(s) to {:?}", result.len(), target);
    Ok(target.to_path_buf())
}

fn write_csv(result: &ResultSet, target: &Path) -> Result<()> {
    let to_io = |err: csv::Error| PriceError::io(target, err.into());
    let mut writer = csv::Writer::from_path(target).map_err(to_io)?;
    writer.write_record(RESULT_HEADERS).map_err(to_io)?;
    for row in result_rows(result) {
        writer.write_record(&row).map_err(to_io)?;
    }
    writer.flush().map_err(|err| PriceError::io(target, err))
}

pub fn render_html(result: &ResultSet) -> String {
    let mut table = String::new();
    let _ = writeln!(
        table,
        "<table class=\"table table-bordered table-striped table-hover\">"
    );
    let _ = writeln!(table, "  <thead>\n    <tr>");
    for header in RESULT_HEADERS {
        let _ = writeln!(table, "      <th>{}</th>", escape_html(header));
    }
    let _ = writeln!(table, "    </tr>\n  </thead>\n  <tbody>");
    for row in result_rows(result) {
        let _ = writeln!(table, "    <tr>");
        for cell in &row {
            let _ = writeln!(table, "      <td>{}</td>", escape_html(cell));
        }
        let _ = writeln!(table, "    </tr>");
    }
    let _ = write!(table, "  </tbody>\n</table>");

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8">
  <meta name="viewport" content="width=device-width, initial-scale=1.0">
  <link rel="stylesheet" href="{STYLESHEET}">
  <style>
    td, th {{
      padding: 7px;
    }}
  </style>
  <title>Price list</title>
</head>
<body>
  <div class="container">
    <h2>Prices in ascending order</h2>
    <h4>Search term: {query}</h4>
{table}
  </div>
</body>
</html>
"#,
        query = escape_html(&result.query),
    )
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}
