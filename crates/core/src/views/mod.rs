pub mod axis;
pub mod controls;
pub mod items;
pub mod tooltip;

pub use tooltip::Tooltip;
