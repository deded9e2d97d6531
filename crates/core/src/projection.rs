use chrono::{DateTime, Utc};

use crate::model::TimeWindow;

/// Linear time-to-pixel mapping for one content width.
///
/// The rate is `content_width` pixels per window (24h), so the window
/// itself lands on `[0, content_width]`. The domain runs on to
/// `padded_end`, which projects at twice the content width. Nothing is
/// clamped: earlier or later timestamps simply fall off either side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeProjection {
    origin: DateTime<Utc>,
    domain_end: DateTime<Utc>,
    content_width: f64,
}

impl TimeProjection {
    pub fn new(window: &TimeWindow, content_width: f64) -> Self {
        Self {
            origin: window.start(),
            domain_end: window.padded_end(),
            content_width,
        }
    }

    pub fn content_width(&self) -> f64 {
        self.content_width
    }

    pub fn domain(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        (self.origin, self.domain_end)
    }

    fn px_per_ms(&self) -> f64 {
        self.content_width / TimeWindow::span().num_milliseconds() as f64
    }

    /// Pixel column of `t`, rounded to the nearest integer.
    pub fn project(&self, t: DateTime<Utc>) -> i64 {
        let offset_ms = (t - self.origin).num_milliseconds() as f64;
        (offset_ms * self.px_per_ms()).round() as i64
    }

    /// Projected right edge of the padded domain.
    pub fn range_end(&self) -> i64 {
        self.project(self.domain_end)
    }
}
