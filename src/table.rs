//! Plain-text rendering of search results for the console.

use std::borrow::Cow;
use std::fmt::Write as _;

use crate::query::ResultSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

pub const RESULT_HEADERS: [&str; 6] = ["#", "name", "price", "weight", "file", "price per kg"];
const RESULT_ALIGN: [Align; 6] = [
    Align::Right,
    Align::Left,
    Align::Right,
    Align::Right,
    Align::Left,
    Align::Right,
];

/// Shortest decimal form of an amount; integral values print without a
/// fractional part.
pub fn format_amount(value: f64) -> String {
    value.to_string()
}

pub fn format_optional(value: Option<f64>) -> String {
    value.map(format_amount).unwrap_or_else(|| "-".to_string())
}

/// One display row per entry, in result order, matching [`RESULT_HEADERS`].
pub fn result_rows(result: &ResultSet) -> Vec<Vec<String>> {
    result
        .entries
        .iter()
        .map(|entry| {
            let row = &entry.row.row;
            vec![
                entry.rank.to_string(),
                row.name.clone(),
                format_optional(row.price),
                format_optional(row.weight),
                row.source_file.clone(),
                format_optional(entry.row.unit_price.value()),
            ]
        })
        .collect()
}

pub fn render_result_set(result: &ResultSet) -> String {
    let headers = RESULT_HEADERS.map(String::from);
    render_table(&headers, &RESULT_ALIGN, &result_rows(result))
}

pub fn render_table(headers: &[String], align: &[Align], rows: &[Vec<String>]) -> String {
    let mut widths = headers.iter().map(|h| display_width(h)).collect::<Vec<_>>();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    let mut output = String::new();
    let _ = writeln!(output, "{}", format_row(headers, &widths, align));
    let rule = widths.iter().map(|w| "-".repeat(*w)).collect::<Vec<_>>();
    let _ = writeln!(output, "{}", format_row(&rule, &widths, align));
    for row in rows {
        let _ = writeln!(output, "{}", format_row(row, &widths, align));
    }
    output
}

fn format_row(values: &[String], widths: &[usize], align: &[Align]) -> String {
    let cells = values
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(idx, (value, width))| {
            let text = sanitize_cell(value);
            let padding = " ".repeat(width.saturating_sub(display_width(&text)));
            match align.get(idx).copied().unwrap_or(Align::Left) {
                Align::Left => format!("{text}{padding}"),
                Align::Right => format!("{padding}{text}"),
            }
        })
        .collect::<Vec<_>>();
    cells.join("  ").trim_end().to_string()
}

fn display_width(value: &str) -> usize {
    value.chars().count()
}

fn sanitize_cell(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r', '\t']) {
        Cow::Owned(value.replace(['\n', '\r', '\t'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog::Catalog, normalize::CanonicalRow, query::search};

    #[test]
    fn render_table_pads_by_alignment() {
        let headers = vec!["#".to_string(), "name".to_string()];
        let rows = vec![
            vec!["9".to_string(), "Лук".to_string()],
            vec!["10".to_string(), "Чеснок".to_string()],
        ];
        let rendered = render_table(&headers, &[Align::Right, Align::Left], &rows);
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines, vec![" #  name", "--  ------", " 9  Лук", "10  Чеснок"]);
    }

    #[test]
    fn render_result_set_marks_undefined_unit_price() {
        let catalog: Catalog = vec![
            CanonicalRow {
                name: "Яблоко".into(),
                price: Some(100.0),
                weight: Some(2.0),
                source_file: "price1.csv".into(),
            },
            CanonicalRow {
                name: "Яблоко\nсушеное".into(),
                price: Some(10.0),
                weight: Some(0.0),
                source_file: "price2.csv".into(),
            },
        ]
        .into_iter()
        .collect();
        let rendered = render_result_set(&search(&catalog, ""));
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("1  Яблоко"));
        assert!(lines[2].ends_with("50"));
        assert!(lines[3].contains("Яблоко сушеное"));
        assert!(lines[3].ends_with("-"));
    }

    #[test]
    fn format_amount_drops_integral_fraction() {
        assert_eq!(format_amount(50.0), "50");
        assert_eq!(format_amount(3.33), "3.33");
        assert_eq!(format_optional(None), "-");
    }
}
