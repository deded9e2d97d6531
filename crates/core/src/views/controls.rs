use dayline_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::lod::LodPreset;

const ORIGIN_X: f64 = 10.0;
const BOTTOM_OFFSET: f64 = 40.0;
const BUTTON_SIZE: f64 = 30.0;
const BUTTON_SPACING: f64 = 50.0;
const FONT_SIZE: f64 = 10.0;

/// Screen rect of the `index`th level button. Buttons sit in a row along
/// the bottom of the surface and do not pan.
pub fn button_rect(index: usize, surface_height: f64) -> Rect {
    Rect::new(
        ORIGIN_X + index as f64 * BUTTON_SPACING,
        surface_height - BOTTOM_OFFSET,
        BUTTON_SIZE,
        BUTTON_SIZE,
    )
}

/// The preset whose button is under `point`, if any.
pub fn button_at(point: Point, surface_height: f64) -> Option<LodPreset> {
    LodPreset::all()
        .iter()
        .enumerate()
        .find(|(i, _)| button_rect(*i, surface_height).contains(point))
        .map(|(_, preset)| *preset)
}

/// Render one button per preset, highlighting the active level.
pub fn render_lod_controls(active_level: u32, surface_height: f64) -> Vec<RenderCommand> {
    let presets = LodPreset::all();
    let mut commands = Vec::with_capacity(presets.len() * 2 + 2);
    commands.push(RenderCommand::BeginGroup {
        id: "lod-buttons".into(),
        label: Some("Zoom".into()),
    });

    for (i, preset) in presets.iter().enumerate() {
        let rect = button_rect(i, surface_height);
        let color = if preset.level == active_level {
            ThemeToken::ButtonActive
        } else {
            ThemeToken::ButtonBackground
        };
        commands.push(RenderCommand::DrawRect {
            rect,
            color,
            border_color: Some(ThemeToken::ButtonBorder),
            item_id: None,
        });
        commands.push(RenderCommand::DrawText {
            position: Point::new(rect.x + rect.w / 2.0, rect.y + FONT_SIZE * 1.2),
            text: preset.label.to_string(),
            color: ThemeToken::ButtonText,
            font_size: FONT_SIZE,
            align: TextAlign::Center,
        });
    }

    commands.push(RenderCommand::EndGroup);
    commands
}
