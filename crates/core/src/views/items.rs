use dayline_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};

use crate::engine::Layout;
use crate::model::ItemId;

const LABEL_INSET_X: f64 = 5.0;
const LINE_HEIGHT_EM: f64 = 1.2;

/// Render lanes and item bars inside the panned content group.
///
/// Items are drawn lane by lane in layout order, so overlapping bars in one
/// lane stack with the later item on top.
pub fn render_items(
    layout: &Layout,
    translate: Point,
    font_size: f64,
    hovered: Option<ItemId>,
) -> Vec<RenderCommand> {
    let mut commands = Vec::with_capacity(layout.items.len() * 2 + layout.lanes.len() * 3 + 4);

    commands.push(RenderCommand::PushTransform {
        translate,
        scale: Point::new(1.0, 1.0),
    });
    commands.push(RenderCommand::BeginGroup {
        id: "items".into(),
        label: None,
    });

    let content_width = layout.content_width();
    for (lane_idx, lane) in layout.lanes.iter().enumerate() {
        commands.push(RenderCommand::BeginGroup {
            id: format!("lane-{lane_idx}"),
            label: Some(lane.name.clone()),
        });
        commands.push(RenderCommand::DrawRect {
            rect: Rect::new(
                0.0,
                f64::from(lane.y_offset),
                content_width,
                f64::from(lane.height),
            ),
            color: ThemeToken::LaneBackground,
            border_color: Some(ThemeToken::LaneBorder),
            item_id: None,
        });

        for item in layout.items.iter().filter(|item| item.lane == lane_idx) {
            let color = if hovered == Some(item.id) {
                ThemeToken::ItemHovered
            } else {
                ThemeToken::ItemFill
            };
            commands.push(RenderCommand::DrawRect {
                rect: item.rect,
                color,
                border_color: Some(ThemeToken::ItemBorder),
                item_id: Some(item.id.0),
            });
            commands.push(RenderCommand::DrawText {
                position: Point::new(
                    item.rect.x + LABEL_INSET_X,
                    item.rect.y + font_size * LINE_HEIGHT_EM,
                ),
                text: item.label.clone(),
                color: ThemeToken::ItemText,
                font_size,
                align: TextAlign::Left,
            });
        }

        commands.push(RenderCommand::EndGroup);
    }

    commands.push(RenderCommand::EndGroup);
    commands.push(RenderCommand::PopTransform);
    commands
}
