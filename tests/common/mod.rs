#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use price_finder::{
    aliases::ColumnAliasTable,
    catalog::CatalogBuilder,
    discovery::DiscoveryRules,
    normalize::SourceFormat,
};
use tempfile::{TempDir, tempdir};

/// Scratch directory of price lists, removed on drop.
pub struct TestWorkspace {
    temp_dir: TempDir,
}

impl TestWorkspace {
    /// Creates a fresh scratch directory for the current test case.
    pub fn new() -> Self {
        Self {
            temp_dir: tempdir().expect("temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Writes `contents` into a file under the workspace and returns the path.
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents.as_bytes()).expect("write temp file contents");
        path
    }

    pub fn write_bytes(&self, name: &str, contents: &[u8]) -> PathBuf {
        let path = self.temp_dir.path().join(name);
        fs::write(&path, contents).expect("write temp file bytes");
        path
    }
}

/// Builder with the built-in aliases, comma delimiter, UTF-8 and the
/// `price` / `.csv` discovery rules.
pub fn default_builder() -> CatalogBuilder {
    CatalogBuilder::new(
        ColumnAliasTable::default(),
        SourceFormat::default(),
        DiscoveryRules::default(),
    )
}
