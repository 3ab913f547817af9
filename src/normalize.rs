//! Schema normalization of a single price list.
//!
//! A [`SourceTable`] is the decoded content of one file: its original headers
//! and the raw rows aligned with them. [`HeaderMapping`] resolves each header
//! through the [`ColumnAliasTable`] and [`normalize_table`] projects the rows
//! onto [`CanonicalRow`]s, dropping every column the table does not know.

use std::path::Path;

use encoding_rs::Encoding;
use log::{debug, warn};
use serde::Serialize;

use crate::{
    aliases::{CanonicalField, ColumnAliasTable},
    error::{PriceError, Result},
    io_utils,
};

#[derive(Debug, Clone, Copy)]
pub struct SourceFormat {
    pub delimiter: u8,
    pub encoding: &'static Encoding,
}

impl Default for SourceFormat {
    fn default() -> Self {
        Self {
            delimiter: io_utils::DEFAULT_DELIMITER,
            encoding: encoding_rs::UTF_8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SourceTable {
    pub file_name: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalRow {
    pub name: String,
    pub price: Option<f64>,
    pub weight: Option<f64>,
    pub source_file: String,
}

/// Column positions of the canonical fields within one file's headers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderMapping {
    pub name: Option<usize>,
    pub price: Option<usize>,
    pub weight: Option<usize>,
    pub dropped: Vec<String>,
}

impl HeaderMapping {
    pub fn from_headers(headers: &[String], aliases: &ColumnAliasTable) -> Self {
        let mut mapping = HeaderMapping::default();
        for (idx, header) in headers.iter().enumerate() {
            let Some(field) = aliases.resolve(header) else {
                mapping.dropped.push(header.clone());
                continue;
            };
            match mapping.get(field) {
                Some(first) => {
                    warn!(
                        "Column '{header}' duplicates '{}' for field '{field}'; keeping the first",
                        headers[first]
                    );
                    mapping.dropped.push(header.clone());
                }
                None => *mapping.slot_mut(field) = Some(idx),
            }
        }
        mapping
    }

    pub fn get(&self, field: CanonicalField) -> Option<usize> {
        match field {
            CanonicalField::Name => self.name,
            CanonicalField::Price => self.price,
            CanonicalField::Weight => self.weight,
        }
    }

    fn slot_mut(&mut self, field: CanonicalField) -> &mut Option<usize> {
        match field {
            CanonicalField::Name => &mut self.name,
            CanonicalField::Price => &mut self.price,
            CanonicalField::Weight => &mut self.weight,
        }
    }

    pub fn recognized(&self) -> usize {
        CanonicalField::ALL
            .iter()
            .filter(|field| self.get(**field).is_some())
            .count()
    }
}

/// Reads and decodes one price list. Any CSV syntax error or undecodable
/// field makes the whole file malformed.
pub fn read_source(path: &Path, format: &SourceFormat) -> Result<SourceTable> {
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());
    let mut reader = io_utils::open_csv_reader_from_path(path, format.delimiter)
        .map_err(|err| PriceError::malformed(&file_name, err))?;
    let raw_headers = reader
        .byte_headers()
        .map_err(|err| PriceError::malformed(&file_name, err))?
        .clone();
    let headers = io_utils::decode_record(&raw_headers, format.encoding)
        .map_err(|reason| PriceError::malformed(&file_name, format!("header: {reason}")))?;

    let mut rows = Vec::new();
    for (row_idx, record) in reader.byte_records().enumerate() {
        let record = record.map_err(|err| PriceError::malformed(&file_name, err))?;
        let decoded = io_utils::decode_record(&record, format.encoding).map_err(|reason| {
            PriceError::malformed(&file_name, format!("row {}: {reason}", row_idx + 2))
        })?;
        rows.push(decoded);
    }
    Ok(SourceTable {
        file_name,
        headers,
        rows,
    })
}

/// Projects a table onto canonical rows. Without a name column no row is
/// usable; rows with a blank name are skipped.
pub fn normalize_table(table: &SourceTable, aliases: &ColumnAliasTable) -> Vec<CanonicalRow> {
    let mapping = HeaderMapping::from_headers(&table.headers, aliases);
    debug!(
        "{}: name={:?} price={:?} weight={:?} dropped={:?}",
        table.file_name, mapping.name, mapping.price, mapping.weight, mapping.dropped
    );
    let Some(name_idx) = mapping.name else {
        if mapping.recognized() > 0 {
            warn!("{}: no name column; file contributes no rows", table.file_name);
        }
        return Vec::new();
    };

    table
        .rows
        .iter()
        .filter_map(|row| {
            let name = row.get(name_idx)?.trim();
            if name.is_empty() {
                return None;
            }
            Some(CanonicalRow {
                name: name.to_string(),
                price: cell(row, mapping.price).and_then(parse_amount),
                weight: cell(row, mapping.weight).and_then(parse_amount),
                source_file: table.file_name.clone(),
            })
        })
        .collect()
}

fn cell(row: &[String], idx: Option<usize>) -> Option<&str> {
    idx.and_then(|i| row.get(i)).map(String::as_str)
}

pub fn normalize_file(
    path: &Path,
    format: &SourceFormat,
    aliases: &ColumnAliasTable,
) -> Result<Vec<CanonicalRow>> {
    let table = read_source(path, format)?;
    Ok(normalize_table(&table, aliases))
}

/// Parses a price or weight cell. A lone decimal comma is accepted;
/// empty, non-numeric, non-finite and negative values are absent.
pub fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let parsed = if trimmed.contains('.') {
        trimmed.parse::<f64>()
    } else {
        trimmed.replacen(',', ".", 1).parse::<f64>()
    };
    match parsed {
        Ok(value) if value.is_finite() && value >= 0.0 => Some(value),
        _ => None,
    }
}
