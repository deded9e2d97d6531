use std::path::PathBuf;

use chrono::{DateTime, Utc};
use thiserror::Error;

/// Rejected configuration: construction parameters or a setter argument.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("start hour {0} is outside 0..=23")]
    InvalidHour(u32),
    #[error("invalid calendar date: {0:?}")]
    InvalidDate(String),
    #[error("level {0} is not one of the presets 4, 6, 12, 24")]
    InvalidLevel(u32),
    #[error("{name} must be positive and finite, got {value}")]
    InvalidDimension { name: &'static str, value: f64 },
}

/// The data source could not produce a timeline document.
#[derive(Debug, Error)]
pub enum DataFetchError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed timeline document: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// A single series or item in an otherwise valid document is unusable.
///
/// `series` and `item` are positions in the source document, so the caller
/// can point at the offending record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataShapeError {
    #[error("series #{series}: missing `{field}`")]
    SeriesMissingField { series: usize, field: &'static str },
    #[error("series #{series}: `{field}` has the wrong type ({found})")]
    SeriesInvalidField {
        series: usize,
        field: &'static str,
        found: &'static str,
    },
    #[error("series #{series} item #{item}: missing `{field}`")]
    MissingField {
        series: usize,
        item: usize,
        field: &'static str,
    },
    #[error("series #{series} item #{item}: `{field}` has the wrong type ({found})")]
    InvalidField {
        series: usize,
        item: usize,
        field: &'static str,
        found: &'static str,
    },
    #[error("series #{series} item #{item}: `{field}` is not an ISO 8601 timestamp: {value:?}")]
    InvalidTimestamp {
        series: usize,
        item: usize,
        field: &'static str,
        value: String,
    },
    #[error("series #{series} item #{item} ({name}): starts at {start} after it ends at {end}")]
    InvertedRange {
        series: usize,
        item: usize,
        name: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("timeline data has not finished loading")]
    Pending,
    #[error("timeline data failed to load: {0}")]
    LoadFailed(String),
}
