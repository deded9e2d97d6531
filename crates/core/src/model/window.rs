use chrono::{DateTime, NaiveDate, TimeDelta, Utc};

use crate::error::ConfigError;

/// Hour of day the window opens at when none is given.
pub const DEFAULT_START_HOUR: u32 = 7;

/// The fixed 24-hour span a timeline displays.
///
/// Only the start is stored; the end is always derived, so the two can
/// never disagree. All timestamps are UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    start: DateTime<Utc>,
}

impl TimeWindow {
    /// Open the window at `hour:00:00.000` on `date`.
    pub fn new(date: NaiveDate, hour: u32) -> Result<Self, ConfigError> {
        if hour > 23 {
            return Err(ConfigError::InvalidHour(hour));
        }
        let start = date
            .and_hms_opt(hour, 0, 0)
            .ok_or(ConfigError::InvalidHour(hour))?
            .and_utc();
        // The padded domain must stay inside chrono's range.
        if start.checked_add_signed(TimeDelta::days(2)).is_none() {
            return Err(ConfigError::InvalidDate(date.to_string()));
        }
        Ok(Self { start })
    }

    pub fn from_ymd(year: i32, month: u32, day: u32, hour: u32) -> Result<Self, ConfigError> {
        let date = NaiveDate::from_ymd_opt(year, month, day)
            .ok_or_else(|| ConfigError::InvalidDate(format!("{year:04}-{month:02}-{day:02}")))?;
        Self::new(date, hour)
    }

    /// Parse a `YYYY-MM-DD` date.
    pub fn parse(date: &str, hour: u32) -> Result<Self, ConfigError> {
        let date = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| ConfigError::InvalidDate(date.to_string()))?;
        Self::new(date, hour)
    }

    pub fn span() -> TimeDelta {
        TimeDelta::hours(24)
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.start + Self::span()
    }

    /// End of the projection domain: one extra day past `end`, so bars that
    /// run past the window are not clipped at the edge.
    pub fn padded_end(&self) -> DateTime<Utc> {
        self.end() + TimeDelta::days(1)
    }
}
