use chrono::{DateTime, Utc};
use dayline_protocol::{Point, Rect, RenderCommand, TextAlign, ThemeToken};
use serde::Serialize;

use crate::model::{Item, ItemId};

/// Offset of the tooltip's top-left corner from the pointer.
const OFFSET: Point = Point { x: 20.0, y: -20.0 };
const PADDING: f64 = 6.0;
const LINE_HEIGHT: f64 = 14.0;
const TITLE_FONT_SIZE: f64 = 12.0;
const FONT_SIZE: f64 = 10.0;
const CHAR_WIDTH: f64 = 6.5;

/// What the tooltip presenter needs to show for a hovered item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tooltip {
    pub item: ItemId,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub description: String,
    /// Pointer position in surface coordinates.
    pub anchor: Point,
}

impl Tooltip {
    pub fn for_item(item: &Item, anchor: Point) -> Self {
        Self {
            item: item.id,
            title: item.name.clone(),
            start: item.start,
            end: item.end,
            description: item.description.clone(),
            anchor,
        }
    }

    /// `HH:MM - HH:MM`, UTC.
    pub fn hours(&self) -> String {
        format!("{} - {}", self.start.format("%H:%M"), self.end.format("%H:%M"))
    }

    pub fn position(&self) -> Point {
        Point::new(self.anchor.x + OFFSET.x, self.anchor.y + OFFSET.y)
    }

    fn lines(&self) -> Vec<String> {
        let mut lines = vec![self.title.clone(), self.hours()];
        if !self.description.is_empty() {
            lines.push(self.description.clone());
        }
        lines
    }
}

/// Default presenter: a boxed three-line popup next to the pointer.
pub fn render_tooltip(tooltip: &Tooltip) -> Vec<RenderCommand> {
    let origin = tooltip.position();
    let lines = tooltip.lines();
    let longest = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);
    let rect = Rect::new(
        origin.x,
        origin.y,
        longest as f64 * CHAR_WIDTH + PADDING * 2.0,
        lines.len() as f64 * LINE_HEIGHT + PADDING * 2.0,
    );

    let mut commands = Vec::with_capacity(lines.len() + 3);
    commands.push(RenderCommand::BeginGroup {
        id: "tooltip".into(),
        label: None,
    });
    commands.push(RenderCommand::DrawRect {
        rect,
        color: ThemeToken::TooltipBackground,
        border_color: Some(ThemeToken::ItemBorder),
        item_id: None,
    });
    for (i, line) in lines.into_iter().enumerate() {
        let (color, font_size) = if i == 0 {
            (ThemeToken::TooltipTitle, TITLE_FONT_SIZE)
        } else {
            (ThemeToken::TooltipText, FONT_SIZE)
        };
        commands.push(RenderCommand::DrawText {
            position: Point::new(
                origin.x + PADDING,
                origin.y + PADDING + (i + 1) as f64 * LINE_HEIGHT - 3.0,
            ),
            text: line,
            color,
            font_size,
            align: TextAlign::Left,
        });
    }
    commands.push(RenderCommand::EndGroup);
    commands
}
