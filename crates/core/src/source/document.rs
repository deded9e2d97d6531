use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::error::{DataFetchError, DataShapeError};
use crate::model::{Dataset, Item, ItemId, Series};

/// Wire shape of the timeline document. Records and their fields are kept
/// as raw JSON values here so a missing or mistyped one becomes a
/// per-record [`DataShapeError`] instead of failing the whole document.
#[derive(Debug, Deserialize)]
struct RawDocument {
    #[serde(default)]
    series: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSeries {
    name: Value,
    data: Value,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawItem {
    name: Value,
    date_start: Value,
    date_end: Value,
    description: Value,
}

/// Parse and validate a timeline document.
///
/// Bytes that are not JSON of the expected shape fail as a whole;
/// individual bad records are collected in [`Dataset::rejected`].
pub fn parse_document(data: &[u8]) -> Result<Dataset, DataFetchError> {
    let raw: RawDocument = serde_json::from_slice(data)?;
    Ok(validate(raw))
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Decode one JSON object into its raw record. On failure, returns the
/// JSON type that was found instead.
fn record<T: DeserializeOwned>(value: Value) -> Result<T, &'static str> {
    let found = json_type(&value);
    if !value.is_object() {
        return Err(found);
    }
    serde_json::from_value(value).map_err(|_| found)
}

/// A string field: `Ok(None)` when absent or null, `Err` with the JSON
/// type found when it is anything but a string.
fn text(value: Value) -> Result<Option<String>, &'static str> {
    match value {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        other => Err(json_type(&other)),
    }
}

fn validate(raw: RawDocument) -> Dataset {
    let mut dataset = Dataset::default();
    let mut next_id = 0u64;

    for (series_idx, value) in raw.series.into_iter().enumerate() {
        let invalid = |field, found| DataShapeError::SeriesInvalidField {
            series: series_idx,
            field,
            found,
        };
        let raw_series: RawSeries = match record(value) {
            Ok(raw_series) => raw_series,
            Err(found) => {
                dataset.rejected.push(invalid("series", found));
                continue;
            }
        };
        let entries = match raw_series.data {
            Value::Null => Vec::new(),
            Value::Array(entries) => entries,
            other => {
                dataset.rejected.push(invalid("data", json_type(&other)));
                continue;
            }
        };

        let name = match text(raw_series.name) {
            Ok(Some(name)) => name,
            rejected => {
                dataset.rejected.push(match rejected {
                    Err(found) => invalid("name", found),
                    _ => DataShapeError::SeriesMissingField {
                        series: series_idx,
                        field: "name",
                    },
                });
                next_id += entries.len() as u64;
                continue;
            }
        };

        let mut items = Vec::with_capacity(entries.len());
        for (item_idx, entry) in entries.into_iter().enumerate() {
            let id = ItemId(next_id);
            next_id += 1;
            match validate_item(series_idx, item_idx, id, entry) {
                Ok(item) => items.push(item),
                Err(err) => dataset.rejected.push(err),
            }
        }
        dataset.series.push(Series { name, items });
    }

    dataset
}

fn validate_item(
    series: usize,
    item: usize,
    id: ItemId,
    entry: Value,
) -> Result<Item, DataShapeError> {
    let invalid = |field, found| DataShapeError::InvalidField {
        series,
        item,
        field,
        found,
    };
    let required = |field, value| match text(value) {
        Ok(Some(s)) => Ok(s),
        Ok(None) => Err(DataShapeError::MissingField {
            series,
            item,
            field,
        }),
        Err(found) => Err(invalid(field, found)),
    };

    let raw: RawItem = record(entry).map_err(|found| invalid("data", found))?;
    let name = required("name", raw.name)?;
    let start_raw = required("dateStart", raw.date_start)?;
    let end_raw = required("dateEnd", raw.date_end)?;
    let description = text(raw.description)
        .map_err(|found| invalid("description", found))?
        .unwrap_or_default();

    let timestamp = |field, value: String| {
        parse_timestamp(&value).ok_or(DataShapeError::InvalidTimestamp {
            series,
            item,
            field,
            value,
        })
    };
    let start = timestamp("dateStart", start_raw)?;
    let end = timestamp("dateEnd", end_raw)?;

    if start > end {
        return Err(DataShapeError::InvertedRange {
            series,
            item,
            name,
            start,
            end,
        });
    }

    Ok(Item {
        id,
        name,
        start,
        end,
        description,
    })
}

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Parse an ISO 8601 timestamp.
///
/// RFC 3339 strings keep their offset and are converted to UTC. Strings
/// without an offset, and bare dates, are read as UTC.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }
    for format in NAIVE_FORMATS {
        if let Ok(t) = NaiveDateTime::parse_from_str(value, format) {
            return Some(t.and_utc());
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|t| t.and_utc())
}
