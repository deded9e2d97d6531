use std::io::stdout;

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEventKind, MouseButton, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use dayline_core::engine::{Frame, apply_pan};
use dayline_core::{LodPreset, PointerEvent, PointerResponse, TimelineEngine, X_MARGIN, Y_MARGIN};
use dayline_protocol::{Point, RenderCommand, TextAlign, ThemeToken};
use log::debug;
use ratatui::{
    Terminal,
    backend::{Backend, CrosstermBackend},
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    widgets::Block,
};

/// Surface pixels covered by one terminal cell.
const CELL_W: f64 = 8.0;
const CELL_H: f64 = 16.0;
/// Arrow keys pan by this many pixels.
const PAN_STEP: f64 = CELL_W * 8.0;

fn theme_to_color(token: ThemeToken) -> Color {
    match token {
        ThemeToken::Background => Color::Black,
        ThemeToken::ItemFill => Color::Rgb(69, 123, 157),
        ThemeToken::ItemBorder => Color::DarkGray,
        ThemeToken::ItemHovered => Color::Rgb(230, 57, 70),
        ThemeToken::ItemText => Color::White,
        ThemeToken::LaneBackground => Color::Rgb(20, 20, 24),
        ThemeToken::LaneBorder => Color::DarkGray,
        ThemeToken::LaneLabel => Color::Gray,
        ThemeToken::AxisLine => Color::DarkGray,
        ThemeToken::AxisText => Color::Gray,
        ThemeToken::ButtonBackground => Color::Rgb(38, 38, 38),
        ThemeToken::ButtonBorder => Color::Gray,
        ThemeToken::ButtonActive => Color::Rgb(255, 214, 10),
        ThemeToken::ButtonText => Color::White,
        ThemeToken::TooltipBackground => Color::Rgb(60, 56, 40),
        ThemeToken::TooltipTitle => Color::White,
        ThemeToken::TooltipText => Color::Gray,
    }
}

/// Replays a frame into a cell buffer, tracking the transform stack.
struct CellCanvas<'a> {
    buf: &'a mut Buffer,
    area: Rect,
    offsets: Vec<Point>,
}

impl<'a> CellCanvas<'a> {
    fn new(buf: &'a mut Buffer, area: Rect) -> Self {
        Self {
            buf,
            area,
            offsets: vec![Point::default()],
        }
    }

    fn offset(&self) -> Point {
        self.offsets.last().copied().unwrap_or_default()
    }

    /// Surface pixel to a cell inside `area`, if visible.
    fn cell(&self, x: f64, y: f64) -> Option<(u16, u16)> {
        let col = (x / CELL_W).floor();
        let row = (y / CELL_H).floor();
        if col < 0.0 || row < 0.0 {
            return None;
        }
        let (col, row) = (col as u16, row as u16);
        (col < self.area.width && row < self.area.height)
            .then(|| (self.area.x + col, self.area.y + row))
    }

    fn draw(&mut self, commands: &[RenderCommand]) {
        for cmd in commands {
            match cmd {
                RenderCommand::Clear => {
                    self.buf
                        .set_style(self.area, Style::default().bg(Color::Black));
                    self.offsets.truncate(1);
                }
                RenderCommand::DrawRect { rect, color, .. } => {
                    let o = self.offset();
                    self.fill(rect.x + o.x, rect.y + o.y, rect.w, rect.h, theme_to_color(*color));
                }
                RenderCommand::DrawText {
                    position,
                    text,
                    color,
                    align,
                    ..
                } => {
                    let o = self.offset();
                    let len = text.chars().count() as f64 * CELL_W;
                    let x = match align {
                        TextAlign::Left => position.x,
                        TextAlign::Center => position.x - len / 2.0,
                        TextAlign::Right => position.x - len,
                    };
                    // Text positions are baselines; nudge into the row above.
                    self.text(x + o.x, position.y + o.y - 1.0, text, theme_to_color(*color));
                }
                RenderCommand::DrawLine {
                    from, to, color, ..
                } => {
                    let o = self.offset();
                    let from = Point::new(from.x + o.x, from.y + o.y);
                    let to = Point::new(to.x + o.x, to.y + o.y);
                    self.line(from, to, theme_to_color(*color));
                }
                RenderCommand::PushTransform { translate, .. } => {
                    let o = self.offset();
                    self.offsets
                        .push(Point::new(o.x + translate.x, o.y + translate.y));
                }
                RenderCommand::PopTransform => {
                    if self.offsets.len() > 1 {
                        self.offsets.pop();
                    }
                }
                RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
            }
        }
    }

    fn fill(&mut self, x: f64, y: f64, w: f64, h: f64, bg: Color) {
        let col0 = (x / CELL_W).floor().max(0.0);
        let col1 = ((x + w) / CELL_W).ceil().min(f64::from(self.area.width));
        let row0 = (y / CELL_H).floor().max(0.0);
        let row1 = ((y + h) / CELL_H).ceil().min(f64::from(self.area.height));
        if col0 >= col1 || row0 >= row1 {
            return;
        }
        let rect = Rect::new(
            self.area.x + col0 as u16,
            self.area.y + row0 as u16,
            (col1 - col0) as u16,
            (row1 - row0) as u16,
        );
        self.buf.set_style(rect, Style::default().bg(bg));
    }

    fn text(&mut self, x: f64, y: f64, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            if let Some(pos) = self.cell(x + i as f64 * CELL_W, y) {
                self.buf[pos].set_char(ch).set_fg(fg);
            }
        }
    }

    fn line(&mut self, from: Point, to: Point, fg: Color) {
        if from.y == to.y {
            let (x0, x1) = (from.x.min(to.x), from.x.max(to.x));
            let mut x = x0;
            while x <= x1 {
                if let Some(pos) = self.cell(x, from.y) {
                    self.buf[pos].set_char('─').set_fg(fg);
                }
                x += CELL_W;
            }
        } else if from.x == to.x {
            let (y0, y1) = (from.y.min(to.y), from.y.max(to.y));
            let mut y = y0;
            while y <= y1 {
                if let Some(pos) = self.cell(from.x, y) {
                    self.buf[pos].set_char('│').set_fg(fg);
                }
                y += CELL_H;
            }
        }
    }
}

/// Engine dimensions for a terminal of `cols` x `rows` cells, one row
/// reserved for the header.
fn engine_size(cols: u16, rows: u16) -> (u32, u32) {
    let width = f64::from(cols) * CELL_W - X_MARGIN;
    let height = f64::from(rows.saturating_sub(1)) * CELL_H - Y_MARGIN;
    (width.max(CELL_W) as u32, height.max(CELL_H) as u32)
}

/// Terminal cell to surface pixel, at the cell center. The header row
/// folds onto the first content row so a release over it still ends a drag.
fn surface_point(col: u16, row: u16) -> Point {
    let row = row.saturating_sub(1);
    Point::new(
        (f64::from(col) + 0.5) * CELL_W,
        (f64::from(row) + 0.5) * CELL_H,
    )
}

fn pointer_event(kind: MouseEventKind, at: Point) -> Option<PointerEvent> {
    match kind {
        MouseEventKind::Down(MouseButton::Left) => Some(PointerEvent::Down(at)),
        MouseEventKind::Up(MouseButton::Left) => Some(PointerEvent::Up(at)),
        MouseEventKind::Drag(MouseButton::Left) | MouseEventKind::Moved => {
            Some(PointerEvent::Move(at))
        }
        MouseEventKind::ScrollUp => Some(PointerEvent::Wheel { delta: -1.0, at }),
        MouseEventKind::ScrollDown => Some(PointerEvent::Wheel { delta: 1.0, at }),
        _ => None,
    }
}

fn apply_response(engine: &TimelineEngine, frame: &mut Frame, response: PointerResponse) -> Result<()> {
    match response {
        PointerResponse::Ignored => {}
        PointerResponse::Transform(translate) => apply_pan(frame, translate.x),
        PointerResponse::Hover(_) => *frame = engine.redraw()?,
        PointerResponse::Redraw(next) => *frame = next,
    }
    Ok(())
}

fn resize(engine: &mut TimelineEngine, frame: &mut Frame, cols: u16, rows: u16) -> Result<()> {
    let (width, height) = engine_size(cols, rows);
    if width != engine.width()
        && let Some(next) = engine.set_width(width)?
    {
        *frame = next;
    }
    if height != engine.height()
        && let Some(next) = engine.set_height(height)?
    {
        *frame = next;
    }
    Ok(())
}

fn run<B: Backend>(terminal: &mut Terminal<B>, engine: &mut TimelineEngine) -> Result<()> {
    let size = terminal.size()?;
    let mut frame = engine.redraw()?;
    resize(engine, &mut frame, size.width, size.height)?;

    loop {
        let header = format!(
            " dayline | {} | {} view | {} skipped | ←→ pan | 1-4 zoom | q quit ",
            engine.window().start().format("%Y-%m-%d %H:%M"),
            engine.lod().label,
            engine.rejected().len(),
        );
        terminal.draw(|f| {
            let area = f.area();
            let header_area = Rect::new(0, 0, area.width, 1);
            f.render_widget(
                Block::default()
                    .title(header.as_str())
                    .style(Style::default().fg(Color::White).bg(Color::DarkGray)),
                header_area,
            );

            let content_area = Rect::new(0, 1, area.width, area.height.saturating_sub(1));
            CellCanvas::new(f.buffer_mut(), content_area).draw(&frame);
        })?;

        if !event::poll(std::time::Duration::from_millis(100))? {
            continue;
        }
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Left => {
                    let translate = engine.pan_by(PAN_STEP);
                    apply_pan(&mut frame, translate.x);
                }
                KeyCode::Right => {
                    let translate = engine.pan_by(-PAN_STEP);
                    apply_pan(&mut frame, translate.x);
                }
                KeyCode::Char(c @ '1'..='4') => {
                    let index = usize::from(c as u8 - b'1');
                    if let Some(preset) = LodPreset::all().get(index)
                        && let Some(next) = engine.set_level(preset.level)?
                    {
                        frame = next;
                    }
                }
                _ => {}
            },
            Event::Mouse(mouse) => {
                let at = surface_point(mouse.column, mouse.row);
                let Some(event) = pointer_event(mouse.kind, at) else {
                    continue;
                };
                let response = engine.handle_pointer(event);
                apply_response(engine, &mut frame, response)?;
            }
            Event::FocusLost => {
                let response = engine.handle_pointer(PointerEvent::Leave);
                apply_response(engine, &mut frame, response)?;
            }
            Event::Resize(cols, rows) => {
                debug!("terminal resized to {cols}x{rows}");
                resize(engine, &mut frame, cols, rows)?;
            }
            _ => {}
        }
    }
    Ok(())
}

pub fn render_tui(engine: &mut TimelineEngine) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(
        stdout,
        EnterAlternateScreen,
        EnableMouseCapture,
        EnableFocusChange
    )?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, engine);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture,
        DisableFocusChange
    )?;
    terminal.show_cursor()?;

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use dayline_core::{Dataset, TimelineConfig};

    #[test]
    fn engine_size_leaves_room_for_margins_and_header() {
        assert_eq!(engine_size(150, 20), (1160, 264));
        // Tiny terminals still produce a drawable engine.
        assert_eq!(engine_size(2, 1), (8, 16));
    }

    #[test]
    fn header_row_folds_onto_the_first_content_row() {
        assert_eq!(surface_point(0, 1), Point::new(4.0, 8.0));
        assert_eq!(surface_point(3, 0), surface_point(3, 1));
    }

    #[test]
    fn release_over_the_header_ends_the_drag() {
        let at = surface_point(10, 0);
        assert_eq!(
            pointer_event(MouseEventKind::Up(MouseButton::Left), at),
            Some(PointerEvent::Up(Point::new(84.0, 8.0)))
        );
        assert_eq!(pointer_event(MouseEventKind::Up(MouseButton::Right), at), None);
    }

    #[test]
    fn drag_released_over_the_header_is_clamped() {
        let config = TimelineConfig {
            date: Some("2024-01-01".into()),
            width: 1160,
            ..TimelineConfig::default()
        };
        let mut engine = TimelineEngine::new(&config).unwrap();
        engine.complete_load(Ok(Dataset::default())).unwrap();

        let press = pointer_event(MouseEventKind::Down(MouseButton::Left), surface_point(10, 5));
        engine.handle_pointer(press.unwrap());
        // Drag 400px right and up into the header, then let go there.
        let drag = pointer_event(MouseEventKind::Drag(MouseButton::Left), surface_point(60, 0));
        assert_eq!(
            engine.handle_pointer(drag.unwrap()),
            PointerResponse::Transform(Point::new(400.0, Y_MARGIN))
        );
        let release = pointer_event(MouseEventKind::Up(MouseButton::Left), surface_point(60, 0));
        assert_eq!(
            engine.handle_pointer(release.unwrap()),
            PointerResponse::Transform(Point::new(X_MARGIN, Y_MARGIN))
        );

        // Button-less movement no longer pans.
        let moved = pointer_event(MouseEventKind::Moved, surface_point(90, 3));
        assert_eq!(engine.handle_pointer(moved.unwrap()), PointerResponse::Ignored);
        assert_eq!(engine.viewport().pan_x, X_MARGIN);
    }

    #[test]
    fn canvas_honours_transforms() {
        let area = Rect::new(0, 0, 10, 4);
        let mut buf = Buffer::empty(area);
        let commands = vec![
            RenderCommand::Clear,
            RenderCommand::PushTransform {
                translate: Point::new(16.0, 16.0),
                scale: Point::new(1.0, 1.0),
            },
            RenderCommand::DrawText {
                position: Point::new(0.0, 12.0),
                text: "ab".into(),
                color: ThemeToken::ItemText,
                font_size: 12.0,
                align: TextAlign::Left,
            },
            RenderCommand::PopTransform,
            RenderCommand::DrawText {
                position: Point::new(0.0, 12.0),
                text: "z".into(),
                color: ThemeToken::ItemText,
                font_size: 12.0,
                align: TextAlign::Left,
            },
        ];
        CellCanvas::new(&mut buf, area).draw(&commands);
        assert_eq!(buf[(2, 1)].symbol(), "a");
        assert_eq!(buf[(3, 1)].symbol(), "b");
        assert_eq!(buf[(0, 0)].symbol(), "z");
    }

    #[test]
    fn rects_outside_the_area_are_clipped() {
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        CellCanvas::new(&mut buf, area).draw(&[RenderCommand::DrawRect {
            rect: dayline_protocol::Rect::new(-100.0, 0.0, 116.0, 100.0),
            color: ThemeToken::ItemFill,
            border_color: None,
            item_id: Some(1),
        }]);
        assert_eq!(buf[(1, 1)].bg, theme_to_color(ThemeToken::ItemFill));
        assert_eq!(buf[(2, 1)].bg, Color::Reset);
    }
}
