pub mod config;
pub mod engine;
pub mod error;
pub mod lod;
pub mod model;
pub mod projection;
pub mod source;
pub mod svg;
pub mod viewport;
pub mod views;

pub use config::TimelineConfig;
pub use engine::{HoverState, ItemLayout, Layout, PointerEvent, PointerResponse, TimelineEngine};
pub use error::{ConfigError, DataFetchError, DataShapeError, EngineError};
pub use lod::LodPreset;
pub use model::{Dataset, Item, ItemId, Lane, Lanes, Series, TimeWindow};
pub use projection::TimeProjection;
pub use viewport::{DragState, ViewportController, ViewportState};

/// Horizontal margin around the content group, in pixels.
pub const X_MARGIN: f64 = 40.0;
/// Vertical margin above the content group, in pixels.
pub const Y_MARGIN: f64 = 40.0;
