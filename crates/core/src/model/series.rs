use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::DataShapeError;

/// Stable identifier of an item, assigned in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ItemId(pub u64);

/// One scheduled activity, drawn as a bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: String,
}

/// A named sequence of items; the name is the lane key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub items: Vec<Item>,
}

/// Validated timeline data plus whatever had to be left out of it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    pub series: Vec<Series>,
    pub rejected: Vec<DataShapeError>,
}

impl Dataset {
    /// Series names in document order, duplicates included.
    pub fn series_names(&self) -> impl Iterator<Item = &str> {
        self.series.iter().map(|s| s.name.as_str())
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.series.iter().flat_map(|s| s.items.iter())
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items().find(|item| item.id == id)
    }

    pub fn item_count(&self) -> usize {
        self.series.iter().map(|s| s.items.len()).sum()
    }
}
