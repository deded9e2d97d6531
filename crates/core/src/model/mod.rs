pub mod lane;
pub mod series;
pub mod window;

pub use lane::{Lane, Lanes};
pub use series::{Dataset, Item, ItemId, Series};
pub use window::{DEFAULT_START_HOUR, TimeWindow};
