//! Top-level directory listing of candidate price lists.

use std::{
    fs,
    path::{Path, PathBuf},
};

use log::debug;

use crate::error::{PriceError, Result};

pub const DEFAULT_NAME_MARKER: &str = "price";
pub const DEFAULT_EXTENSION: &str = "csv";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveryRules {
    pub name_marker: String,
    pub extension: String,
}

impl Default for DiscoveryRules {
    fn default() -> Self {
        Self {
            name_marker: DEFAULT_NAME_MARKER.to_string(),
            extension: DEFAULT_EXTENSION.to_string(),
        }
    }
}

impl DiscoveryRules {
    pub fn new(name_marker: &str, extension: &str) -> Self {
        Self {
            name_marker: name_marker.trim().to_lowercase(),
            extension: extension.trim().trim_start_matches('.').to_lowercase(),
        }
    }

    /// A file is eligible when its name contains the marker and its
    /// extension equals the configured one, both ignoring case.
    pub fn is_eligible(&self, file_name: &str) -> bool {
        let path = Path::new(file_name);
        let extension_matches = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.to_lowercase() == self.extension);
        extension_matches && file_name.to_lowercase().contains(&self.name_marker)
    }

    pub fn describe(&self) -> String {
        format!(
            "file name containing '{}' with extension '.{}'",
            self.name_marker, self.extension
        )
    }
}

/// Lists eligible regular files directly under `dir`, sorted by file name.
/// Subdirectories are not descended into.
pub fn discover(dir: &Path, rules: &DiscoveryRules) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).map_err(|err| PriceError::io(dir, err))?;
    let mut found = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|err| PriceError::io(dir, err))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            debug!("Skipping non UTF-8 file name {path:?}");
            continue;
        };
        if rules.is_eligible(name) {
            found.push(path);
        } else {
            debug!("Ignoring {name}: not a price list");
        }
    }
    found.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(found)
}
