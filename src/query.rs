//! Substring search over the catalog, ranked by price per kilogram.

use std::path::Path;

use log::info;
use serde::Serialize;

use crate::{
    catalog::{BuildReport, Catalog, CatalogBuilder, DerivedRow},
    error::{PriceError, Result},
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    /// 1-based position in the sorted result.
    pub rank: usize,
    #[serde(flatten)]
    pub row: DerivedRow,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultSet {
    pub query: String,
    pub entries: Vec<RankedRow>,
}

impl ResultSet {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the query matched nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Filters `catalog` by case-insensitive containment of `term` in the item
/// name and orders matches by ascending unit price. The sort is stable, so
/// equal unit prices keep catalog order. An empty term matches every row.
pub fn search(catalog: &Catalog, term: &str) -> ResultSet {
    let needle = term.to_lowercase();
    let mut matches: Vec<&DerivedRow> = catalog
        .rows()
        .iter()
        .filter(|row| needle.is_empty() || row.row.name.to_lowercase().contains(&needle))
        .collect();
    matches.sort_by(|a, b| a.unit_price.ranking_cmp(&b.unit_price));
    ResultSet {
        query: term.to_string(),
        entries: matches
            .into_iter()
            .enumerate()
            .map(|(idx, row)| RankedRow {
                rank: idx + 1,
                row: row.clone(),
            })
            .collect(),
    }
}

/// One interactive session: the loaded catalog and the last search result.
#[derive(Debug, Default)]
pub struct Session {
    catalog: Option<Catalog>,
    last_result: Option<ResultSet>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_catalog(catalog: Catalog) -> Self {
        let mut session = Self::new();
        session.install(catalog);
        session
    }

    /// Builds a catalog from `dir` and replaces the session state with it.
    /// On failure the session keeps no catalog.
    pub fn load(&mut self, builder: &CatalogBuilder, dir: &Path) -> Result<BuildReport> {
        self.catalog = None;
        self.last_result = None;
        let (catalog, report) = builder.build_from_dir(dir)?;
        info!("Catalog holds {} item(s)", catalog.len());
        self.install(catalog);
        Ok(report)
    }

    fn install(&mut self, catalog: Catalog) {
        self.catalog = (!catalog.is_empty()).then_some(catalog);
        self.last_result = None;
    }

    pub fn search(&mut self, term: &str) -> Result<&ResultSet> {
        let catalog = self.catalog.as_ref().ok_or(PriceError::UninitializedCatalog)?;
        let result = search(catalog, term);
        info!("Search '{}' matched {} item(s)", term, result.len());
        Ok(self.last_result.insert(result))
    }

    pub fn last_result(&self) -> Option<&ResultSet> {
        self.last_result.as_ref()
    }
}
