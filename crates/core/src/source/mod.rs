pub mod document;

use std::path::PathBuf;

use log::info;

use crate::error::DataFetchError;
use crate::model::Dataset;

pub use document::{parse_document, parse_timestamp};

/// Where timeline data comes from.
///
/// `fetch` is a one-shot operation: the engine calls it once and stays
/// pending until the result is handed over.
pub trait DataSource {
    /// Human-readable locator, used in log lines.
    fn locator(&self) -> String;

    fn fetch(&self) -> Result<Dataset, DataFetchError>;
}

/// Reads a JSON timeline document from disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl DataSource for FileSource {
    fn locator(&self) -> String {
        self.path.display().to_string()
    }

    fn fetch(&self) -> Result<Dataset, DataFetchError> {
        let data = std::fs::read(&self.path).map_err(|source| DataFetchError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!("read {} bytes from {}", data.len(), self.path.display());
        parse_document(&data)
    }
}
