//! SVG renderer: converts a frame of `RenderCommand`s into a standalone SVG string.

use std::fmt::Write as _;

use dayline_protocol::{RenderCommand, TextAlign, ThemeToken};

/// Render a frame as an SVG document string.
///
/// `width` and `height` are the surface size. `dark` selects the palette.
/// `Clear` discards everything emitted before it; transforms and groups
/// become nested `<g>` elements.
pub fn render_svg(commands: &[RenderCommand], width: f64, height: f64, dark: bool) -> String {
    let mut body = String::with_capacity(commands.len() * 120);

    for cmd in commands {
        match cmd {
            RenderCommand::Clear => body.clear(),
            RenderCommand::DrawRect {
                rect,
                color,
                border_color,
                item_id,
            } => {
                let fill = resolve_color(*color, dark);
                let _ = write!(
                    body,
                    r#"<rect x="{}" y="{}" width="{}" height="{}" fill="{fill}""#,
                    rect.x, rect.y, rect.w, rect.h,
                );
                if let Some(border) = border_color {
                    let _ = write!(body, r#" stroke="{}""#, resolve_color(*border, dark));
                }
                if let Some(id) = item_id {
                    let _ = write!(body, r#" data-item="{id}""#);
                }
                body.push_str("/>");
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                font_size,
                align,
            } => {
                let anchor = match align {
                    TextAlign::Left => "start",
                    TextAlign::Center => "middle",
                    TextAlign::Right => "end",
                };
                let _ = write!(
                    body,
                    r#"<text x="{}" y="{}" fill="{}" font-size="{font_size}" text-anchor="{anchor}">{}</text>"#,
                    position.x,
                    position.y,
                    resolve_color(*color, dark),
                    escape_xml(text),
                );
            }
            RenderCommand::DrawLine {
                from,
                to,
                color,
                width: line_width,
            } => {
                let _ = write!(
                    body,
                    r#"<line x1="{}" y1="{}" x2="{}" y2="{}" stroke="{}" stroke-width="{line_width}"/>"#,
                    from.x,
                    from.y,
                    to.x,
                    to.y,
                    resolve_color(*color, dark),
                );
            }
            RenderCommand::PushTransform { translate, scale } => {
                let _ = write!(
                    body,
                    r#"<g transform="translate({},{}) scale({},{})">"#,
                    translate.x, translate.y, scale.x, scale.y,
                );
            }
            RenderCommand::BeginGroup { id, .. } => {
                let _ = write!(body, r#"<g class="{}">"#, escape_xml(id));
            }
            RenderCommand::PopTransform | RenderCommand::EndGroup => body.push_str("</g>"),
        }
    }

    let bg = resolve_color(ThemeToken::Background, dark);
    format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" style="font-family:system-ui,-apple-system,sans-serif"><rect width="{width}" height="{height}" fill="{bg}"/>{body}</svg>"#
    )
}

fn resolve_color(token: ThemeToken, dark: bool) -> &'static str {
    if dark {
        match token {
            ThemeToken::Background | ThemeToken::LaneBackground => "#181818",
            ThemeToken::ItemFill => "#42a5f5",
            ThemeToken::ItemHovered => "#ffa726",
            ThemeToken::ItemBorder | ThemeToken::LaneBorder | ThemeToken::ButtonBorder => "#303030",
            ThemeToken::ItemText | ThemeToken::TooltipTitle | ThemeToken::ButtonText => "#ececec",
            ThemeToken::LaneLabel
            | ThemeToken::AxisText
            | ThemeToken::AxisLine
            | ThemeToken::TooltipText => "#9e9e9e",
            ThemeToken::ButtonBackground | ThemeToken::TooltipBackground => "#262626",
            ThemeToken::ButtonActive => "#448aff",
        }
    } else {
        match token {
            ThemeToken::Background | ThemeToken::ButtonBackground => "#ffffff",
            ThemeToken::LaneBackground => "#f8f9fa",
            ThemeToken::ItemFill => "#457b9d",
            ThemeToken::ItemHovered => "#e63946",
            ThemeToken::ItemBorder | ThemeToken::LaneBorder => "#dee2e6",
            ThemeToken::ButtonBorder => "#000000",
            ThemeToken::ItemText | ThemeToken::TooltipTitle | ThemeToken::ButtonText => "#1a1a2e",
            ThemeToken::LaneLabel
            | ThemeToken::AxisText
            | ThemeToken::AxisLine
            | ThemeToken::TooltipText => "#666677",
            ThemeToken::TooltipBackground => "#fffbe6",
            ThemeToken::ButtonActive => "#ffd60a",
        }
    }
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
