use std::path::PathBuf;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::lod::{DEFAULT_LEVEL, LodPreset};
use crate::model::{DEFAULT_START_HOUR, TimeWindow};

/// Construction parameters for a [`TimelineEngine`](crate::TimelineEngine).
///
/// Deserializes from JSON with every field optional:
///
/// ```json
/// { "source": "agenda.json", "date": "2024-01-01", "hour": 7,
///   "width": 1200, "height": 400, "level": 6 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TimelineConfig {
    /// Where the timeline document is loaded from.
    pub source: Option<PathBuf>,
    /// `YYYY-MM-DD`. Today (UTC) when absent.
    pub date: Option<String>,
    pub hour: u32,
    /// Drawable width in pixels, excluding the margin.
    pub width: u32,
    /// Drawable height in pixels, excluding the margin.
    pub height: u32,
    pub level: u32,
    /// Width multiplied by the level to get the content width. Defaults to
    /// the surface width.
    pub base_width: Option<f64>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            source: None,
            date: None,
            hour: DEFAULT_START_HOUR,
            width: 200,
            height: 200,
            level: DEFAULT_LEVEL,
            base_width: None,
        }
    }
}

impl TimelineConfig {
    pub fn from_json(data: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(data)
    }

    pub fn time_window(&self) -> Result<TimeWindow, ConfigError> {
        match &self.date {
            Some(date) => TimeWindow::parse(date, self.hour),
            None => TimeWindow::new(Utc::now().date_naive(), self.hour),
        }
    }

    /// Check every field without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.time_window()?;
        LodPreset::select(self.level)?;
        check_dimension("width", self.width)?;
        check_dimension("height", self.height)?;
        if let Some(base) = self.base_width
            && !(base.is_finite() && base > 0.0)
        {
            return Err(ConfigError::InvalidDimension {
                name: "base width",
                value: base,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_dimension(name: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        return Err(ConfigError::InvalidDimension {
            name,
            value: f64::from(value),
        });
    }
    Ok(())
}
