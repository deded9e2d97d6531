use serde::{Deserialize, Serialize};

/// Semantic color tokens resolved by the renderer's active theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ThemeToken {
    Background,

    // Items
    ItemFill,
    ItemBorder,
    ItemHovered,
    ItemText,

    // Lanes
    LaneBackground,
    LaneBorder,
    LaneLabel,

    // Axis
    AxisLine,
    AxisText,

    // Level-of-detail buttons
    ButtonBackground,
    ButtonBorder,
    ButtonActive,
    ButtonText,

    // Tooltip
    TooltipBackground,
    TooltipTitle,
    TooltipText,
}
