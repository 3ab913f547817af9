//! Header synonym table used to reconcile price-list schemas.
//!
//! Every supported price list names its columns differently. The
//! [`ColumnAliasTable`] maps each [`CanonicalField`] to the lowercase header
//! spellings accepted for it. The table is built once (the built-in Russian
//! defaults or a YAML override) and is read-only afterwards.

use std::{
    collections::{BTreeMap, BTreeSet},
    fmt,
    fs,
    path::Path,
};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::error::{PriceError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CanonicalField {
    Name,
    Price,
    Weight,
}

impl CanonicalField {
    pub const ALL: [CanonicalField; 3] = [
        CanonicalField::Name,
        CanonicalField::Price,
        CanonicalField::Weight,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CanonicalField::Name => "name",
            CanonicalField::Price => "price",
            CanonicalField::Weight => "weight",
        }
    }
}

impl fmt::Display for CanonicalField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

const DEFAULT_NAME_SYNONYMS: &[&str] = &["название", "продукт", "товар", "наименование"];
const DEFAULT_PRICE_SYNONYMS: &[&str] = &["цена", "розница"];
const DEFAULT_WEIGHT_SYNONYMS: &[&str] = &["фасовка", "масса", "вес"];

/// Serialized form of the alias table: `field: [synonym, ...]`.
#[derive(Debug, Serialize, Deserialize)]
struct AliasFile {
    name: Vec<String>,
    price: Vec<String>,
    weight: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnAliasTable {
    fields: BTreeMap<CanonicalField, BTreeSet<String>>,
    lookup: BTreeMap<String, CanonicalField>,
}

impl Default for ColumnAliasTable {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        // The built-in groups are disjoint and non-empty.
        Self::from_groups([
            (CanonicalField::Name, owned(DEFAULT_NAME_SYNONYMS)),
            (CanonicalField::Price, owned(DEFAULT_PRICE_SYNONYMS)),
            (CanonicalField::Weight, owned(DEFAULT_WEIGHT_SYNONYMS)),
        ])
        .unwrap_or_else(|_| unreachable!("default alias groups are valid"))
    }
}

impl ColumnAliasTable {
    /// Builds a table from `(field, synonyms)` groups. Synonyms are trimmed
    /// and lowercased; a synonym claimed by two fields or a field left
    /// without synonyms is rejected.
    pub fn from_groups<I, S>(groups: I) -> Result<Self>
    where
        I: IntoIterator<Item = (CanonicalField, Vec<S>)>,
        S: AsRef<str>,
    {
        let mut fields: BTreeMap<CanonicalField, BTreeSet<String>> = BTreeMap::new();
        let mut lookup = BTreeMap::new();
        for (field, synonyms) in groups {
            let entry = fields.entry(field).or_default();
            for synonym in synonyms {
                let key = normalize_header(synonym.as_ref());
                if key.is_empty() {
                    continue;
                }
                if let Some(existing) = lookup.get(&key)
                    && *existing != field
                {
                    return Err(PriceError::InvalidAliasTable(format!(
                        "synonym '{key}' is listed for both '{existing}' and '{field}'"
                    )));
                }
                lookup.insert(key.clone(), field);
                entry.insert(key);
            }
        }
        for field in CanonicalField::ALL {
            if fields.get(&field).is_none_or(|set| set.is_empty()) {
                return Err(PriceError::InvalidAliasTable(format!(
                    "no synonyms configured for '{field}'"
                )));
            }
        }
        Ok(Self { fields, lookup })
    }

    /// Reads a YAML alias file with `name`, `price` and `weight` lists.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|err| PriceError::io(path, err))?;
        let parsed: AliasFile = serde_yaml::from_str(&raw).map_err(|err| {
            PriceError::InvalidAliasTable(format!("parsing {path:?}: {err}"))
        })?;
        Self::from_groups([
            (CanonicalField::Name, parsed.name),
            (CanonicalField::Price, parsed.price),
            (CanonicalField::Weight, parsed.weight),
        ])
    }

    /// Resolves a raw header to its canonical field, ignoring letter case
    /// and surrounding whitespace. Matching is exact, not substring.
    pub fn resolve(&self, header: &str) -> Option<CanonicalField> {
        self.lookup.get(&normalize_header(header)).copied()
    }

    pub fn synonyms(&self, field: CanonicalField) -> impl Iterator<Item = &str> {
        self.fields
            .get(&field)
            .into_iter()
            .flat_map(|set| set.iter().map(String::as_str))
    }

    /// One line per canonical field, e.g. `price: розница, цена`.
    pub fn describe(&self) -> String {
        CanonicalField::ALL
            .iter()
            .map(|field| format!("{field}: {}", self.synonyms(*field).join(", ")))
            .join("\n")
    }
}

fn normalize_header(raw: &str) -> String {
    raw.trim().trim_start_matches('\u{feff}').trim().to_lowercase()
}
