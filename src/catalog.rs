//! Merged catalog of every ingested price list.
//!
//! [`CatalogBuilder`] walks the discovered files in order, normalizes each
//! one and appends its rows, deriving the price per kilogram on the way.
//! Malformed files are skipped and recorded in the [`BuildReport`]; a build
//! that ends with no usable rows is a configuration error.

use std::{
    cmp::Ordering,
    fmt,
    path::{Path, PathBuf},
};

use log::{debug, info, warn};
use serde::{Serialize, Serializer};

use crate::{
    aliases::ColumnAliasTable,
    discovery::{self, DiscoveryRules},
    error::{PriceError, Result},
    normalize::{self, CanonicalRow, SourceFormat},
};

/// Price per kilogram. Rows without a positive weight or without a price
/// carry [`UnitPrice::Undefined`], which orders after every defined value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UnitPrice {
    Defined(f64),
    Undefined,
}

impl UnitPrice {
    pub fn compute(price: Option<f64>, weight: Option<f64>) -> Self {
        match (price, weight) {
            (Some(price), Some(weight)) if weight > 0.0 => {
                UnitPrice::Defined(round_cents(price / weight))
            }
            _ => UnitPrice::Undefined,
        }
    }

    pub fn value(&self) -> Option<f64> {
        match self {
            UnitPrice::Defined(value) => Some(*value),
            UnitPrice::Undefined => None,
        }
    }

    /// Total order: defined values ascending, then undefined.
    pub fn ranking_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (UnitPrice::Defined(a), UnitPrice::Defined(b)) => a.total_cmp(b),
            (UnitPrice::Defined(_), UnitPrice::Undefined) => Ordering::Less,
            (UnitPrice::Undefined, UnitPrice::Defined(_)) => Ordering::Greater,
            (UnitPrice::Undefined, UnitPrice::Undefined) => Ordering::Equal,
        }
    }
}

impl Serialize for UnitPrice {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.value().serialize(serializer)
    }
}

/// Two decimal places, ties to even on the scaled value.
fn round_cents(value: f64) -> f64 {
    (value * 100.0).round_ties_even() / 100.0
}

/// Why a row ended up without a unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowIssue {
    MissingPrice,
    MissingWeight,
    ZeroWeight,
}

impl RowIssue {
    pub fn detect(row: &CanonicalRow) -> Option<Self> {
        match (row.price, row.weight) {
            (None, _) => Some(RowIssue::MissingPrice),
            (_, None) => Some(RowIssue::MissingWeight),
            (_, Some(weight)) if weight <= 0.0 => Some(RowIssue::ZeroWeight),
            _ => None,
        }
    }
}

impl fmt::Display for RowIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowIssue::MissingPrice => f.write_str("price is missing"),
            RowIssue::MissingWeight => f.write_str("weight is missing"),
            RowIssue::ZeroWeight => f.write_str("weight is zero"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRow {
    #[serde(flatten)]
    pub row: CanonicalRow,
    pub unit_price: UnitPrice,
}

impl DerivedRow {
    pub fn derive(row: CanonicalRow) -> Self {
        let unit_price = UnitPrice::compute(row.price, row.weight);
        Self { row, unit_price }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    rows: Vec<DerivedRow>,
}

impl Catalog {
    pub fn rows(&self) -> &[DerivedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl FromIterator<CanonicalRow> for Catalog {
    fn from_iter<I: IntoIterator<Item = CanonicalRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().map(DerivedRow::derive).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildReport {
    pub files_scanned: usize,
    pub skipped_files: Vec<(String, String)>,
    pub rows_loaded: usize,
    pub rows_without_unit_price: usize,
}

#[derive(Debug, Clone)]
pub struct CatalogBuilder {
    aliases: ColumnAliasTable,
    format: SourceFormat,
    rules: DiscoveryRules,
}

impl CatalogBuilder {
    pub fn new(aliases: ColumnAliasTable, format: SourceFormat, rules: DiscoveryRules) -> Self {
        Self {
            aliases,
            format,
            rules,
        }
    }

    /// Discovers price lists under `dir` and merges them.
    pub fn build_from_dir(&self, dir: &Path) -> Result<(Catalog, BuildReport)> {
        let files = discovery::discover(dir, &self.rules)?;
        info!("Found {} price list(s) in {:?}", files.len(), dir);
        if files.is_empty() {
            return Err(self.configuration_error(dir, "no price lists found"));
        }
        self.build_from_files(dir, &files)
    }

    /// Merges `files` in the given order. `dir` only labels the guidance in
    /// the error raised when nothing usable was loaded.
    pub fn build_from_files(
        &self,
        dir: &Path,
        files: &[PathBuf],
    ) -> Result<(Catalog, BuildReport)> {
        let mut report = BuildReport {
            files_scanned: files.len(),
            ..BuildReport::default()
        };
        let mut rows = Vec::new();
        for path in files {
            match normalize::normalize_file(path, &self.format, &self.aliases) {
                Ok(file_rows) => {
                    info!("Loaded {} row(s) from {:?}", file_rows.len(), path);
                    rows.extend(file_rows);
                }
                Err(PriceError::MalformedFile { file, reason }) => {
                    warn!("Skipping {file}: {reason}");
                    report.skipped_files.push((file, reason));
                }
                Err(other) => return Err(other),
            }
        }

        for row in &rows {
            if let Some(issue) = RowIssue::detect(row) {
                debug!("{} / '{}': no unit price, {issue}", row.source_file, row.name);
                report.rows_without_unit_price += 1;
            }
        }
        let catalog: Catalog = rows.into_iter().collect();
        report.rows_loaded = catalog.len();
        if catalog.is_empty() {
            return Err(self.configuration_error(dir, "price lists contain no usable rows"));
        }
        Ok((catalog, report))
    }

    fn configuration_error(&self, dir: &Path, problem: &str) -> PriceError {
        let synonyms = self
            .aliases
            .describe()
            .lines()
            .map(|line| format!("  {line}"))
            .collect::<Vec<_>>()
            .join("\n");
        PriceError::Configuration(format!(
            "{problem} in {dir:?}.\nPlace price lists in that directory: {}.\n\
             Recognized column headers (any letter case):\n{synonyms}",
            self.rules.describe()
        ))
    }
}
