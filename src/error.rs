//! Typed failures of the ingestion and query pipeline.
//!
//! Per-file problems ([`PriceError::MalformedFile`]) are absorbed by the
//! catalog builder and only logged; [`PriceError::Configuration`] is the one
//! ingestion failure that stops a run.

use std::{io, path::PathBuf};

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PriceError>;

#[derive(Debug, Error)]
pub enum PriceError {
    #[error("{0}")]
    Configuration(String),

    #[error("Malformed price list {file:?}: {reason}")]
    MalformedFile { file: String, reason: String },

    #[error("Catalog not initialized: load price lists before searching")]
    UninitializedCatalog,

    #[error("Nothing to export: run a search first")]
    NothingToExport,

    #[error("Invalid column alias table: {0}")]
    InvalidAliasTable(String),

    #[error("I/O error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PriceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        PriceError::Io {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn malformed(file: &str, reason: impl ToString) -> Self {
        PriceError::MalformedFile {
            file: file.to_string(),
            reason: reason.to_string(),
        }
    }
}
