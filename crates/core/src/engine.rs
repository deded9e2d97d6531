use dayline_protocol::{Point, Rect, RenderCommand};
use log::{debug, error, info, warn};

use crate::config::{TimelineConfig, check_dimension};
use crate::error::{ConfigError, DataFetchError, DataShapeError, EngineError};
use crate::lod::LodPreset;
use crate::model::{Dataset, ItemId, Lanes, TimeWindow};
use crate::projection::TimeProjection;
use crate::source::DataSource;
use crate::viewport::{ViewportController, ViewportState};
use crate::views::{Tooltip, axis, controls, items, tooltip};
use crate::{X_MARGIN, Y_MARGIN};

/// One redraw's worth of commands. Always starts with `Clear`.
pub type Frame = Vec<RenderCommand>;

#[derive(Debug)]
enum LoadState {
    Pending,
    Ready(Dataset),
    Failed(String),
}

/// Which item the pointer is over, and where the pointer is.
/// The tooltip is derived from this and nothing else.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HoverState {
    pub active_item: Option<ItemId>,
    pub pointer: Option<Point>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemLayout {
    pub id: ItemId,
    /// Index into [`Layout::lanes`].
    pub lane: usize,
    /// Bar rect in content coordinates (before pan and top margin).
    pub rect: Rect,
    pub label: String,
}

/// Everything a redraw derives from engine state. Never cached.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub projection: TimeProjection,
    pub lanes: Lanes,
    pub items: Vec<ItemLayout>,
}

impl Layout {
    pub fn content_width(&self) -> f64 {
        self.projection.content_width()
    }

    /// Right edge the pan may scroll to: the content width, stretched to
    /// take in bars that run past the window end, up to the padded domain.
    pub fn pan_extent(&self) -> f64 {
        let limit = self.projection.range_end() as f64;
        self.items
            .iter()
            .map(|item| item.rect.right())
            .fold(self.content_width(), f64::max)
            .min(limit)
    }

    pub fn item(&self, id: ItemId) -> Option<&ItemLayout> {
        self.items.iter().find(|item| item.id == id)
    }

    /// Topmost item under a point in content coordinates. Later items are
    /// drawn over earlier ones, so search from the back.
    pub fn item_at(&self, point: Point) -> Option<&ItemLayout> {
        self.items.iter().rev().find(|item| item.rect.contains(point))
    }
}

/// Pointer input in surface coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    Leave,
    Wheel { delta: f64, at: Point },
}

#[derive(Debug, Clone, PartialEq)]
pub enum PointerResponse {
    Ignored,
    /// Re-translate the panned groups; the projection is unchanged.
    Transform(Point),
    /// The hover target moved; show this tooltip, or hide it on `None`.
    Hover(Option<Tooltip>),
    Redraw(Frame),
}

/// Owns the window, data, zoom level, pan and hover state of one timeline,
/// and turns them into frames.
///
/// The engine starts out pending. It refuses to draw until a load completes,
/// and after a failed load it keeps refusing with
/// [`EngineError::LoadFailed`].
#[derive(Debug)]
pub struct TimelineEngine {
    width: u32,
    height: u32,
    base_width: Option<f64>,
    window: TimeWindow,
    lod: LodPreset,
    viewport: ViewportController,
    hover: HoverState,
    data: LoadState,
}

impl TimelineEngine {
    pub fn new(config: &TimelineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let window = config.time_window()?;
        let lod = LodPreset::select(config.level)?;
        debug!(
            "timeline window {} .. {}, level {}",
            window.start(),
            window.end(),
            lod.level
        );
        Ok(Self {
            width: config.width,
            height: config.height,
            base_width: config.base_width,
            window,
            lod,
            viewport: ViewportController::new(lod.level, X_MARGIN),
            hover: HoverState::default(),
            data: LoadState::Pending,
        })
    }

    pub fn window(&self) -> &TimeWindow {
        &self.window
    }

    pub fn lod(&self) -> LodPreset {
        self.lod
    }

    pub fn level(&self) -> u32 {
        self.lod.level
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn viewport(&self) -> ViewportState {
        self.viewport.state()
    }

    pub fn hover(&self) -> HoverState {
        self.hover
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.data, LoadState::Ready(_))
    }

    pub fn dataset(&self) -> Option<&Dataset> {
        match &self.data {
            LoadState::Ready(dataset) => Some(dataset),
            _ => None,
        }
    }

    /// Records skipped during the last successful load.
    pub fn rejected(&self) -> &[DataShapeError] {
        self.dataset()
            .map(|d| d.rejected.as_slice())
            .unwrap_or_default()
    }

    pub fn surface_width(&self) -> f64 {
        f64::from(self.width) + X_MARGIN
    }

    pub fn surface_height(&self) -> f64 {
        f64::from(self.height) + Y_MARGIN
    }

    pub fn base_width(&self) -> f64 {
        self.base_width.unwrap_or_else(|| self.surface_width())
    }

    pub fn content_width(&self) -> f64 {
        self.lod.content_width(self.base_width())
    }

    /// Fetch from `source` and complete the load with the result.
    pub fn load(&mut self, source: &dyn DataSource) -> Result<Frame, DataFetchError> {
        info!("loading timeline from {}", source.locator());
        let result = source.fetch();
        self.complete_load(result)
    }

    /// Hand over the outcome of the one-shot fetch. On success the engine
    /// becomes ready and the first frame is returned; on failure it stays
    /// undrawable and the error goes back to the caller.
    pub fn complete_load(
        &mut self,
        result: Result<Dataset, DataFetchError>,
    ) -> Result<Frame, DataFetchError> {
        match result {
            Ok(dataset) => {
                for rejected in &dataset.rejected {
                    warn!("skipping malformed record: {rejected}");
                }
                info!(
                    "loaded {} series, {} items, {} rejected",
                    dataset.series.len(),
                    dataset.item_count(),
                    dataset.rejected.len()
                );
                self.hover = HoverState::default();
                let frame = self.render(&dataset);
                self.data = LoadState::Ready(dataset);
                Ok(frame)
            }
            Err(err) => {
                error!("timeline data failed to load: {err}");
                self.data = LoadState::Failed(err.to_string());
                Err(err)
            }
        }
    }

    fn ready(&self) -> Result<&Dataset, EngineError> {
        match &self.data {
            LoadState::Ready(dataset) => Ok(dataset),
            LoadState::Pending => Err(EngineError::Pending),
            LoadState::Failed(reason) => Err(EngineError::LoadFailed(reason.clone())),
        }
    }

    pub fn layout(&self) -> Result<Layout, EngineError> {
        Ok(self.compute_layout(self.ready()?))
    }

    /// Tear down and rebuild the whole frame from current state.
    pub fn redraw(&self) -> Result<Frame, EngineError> {
        Ok(self.render(self.ready()?))
    }

    /// Switch zoom preset. The pan is re-clamped against the new content
    /// width rather than reset. Returns the new frame once data is loaded.
    pub fn set_level(&mut self, level: u32) -> Result<Option<Frame>, ConfigError> {
        let lod = LodPreset::select(level)?;
        self.lod = lod;
        self.viewport.set_scale_factor(lod.level);
        let pan_x = self.reclamp();
        debug!(
            "level {} ({}): content width {}, pan {pan_x}",
            lod.level,
            lod.label,
            self.content_width()
        );
        Ok(self.redraw_if_ready())
    }

    pub fn set_width(&mut self, width: u32) -> Result<Option<Frame>, ConfigError> {
        check_dimension("width", width)?;
        self.width = width;
        self.reclamp();
        Ok(self.redraw_if_ready())
    }

    pub fn set_height(&mut self, height: u32) -> Result<Option<Frame>, ConfigError> {
        check_dimension("height", height)?;
        self.height = height;
        Ok(self.redraw_if_ready())
    }

    /// Pan by `dx` as one complete gesture (e.g. a key press) and return
    /// the clamped translation.
    pub fn pan_by(&mut self, dx: f64) -> Point {
        let extent = self.pan_extent();
        self.viewport.pan_by(dx, extent, self.surface_width());
        self.viewport.translate()
    }

    pub fn handle_pointer(&mut self, event: PointerEvent) -> PointerResponse {
        if !self.is_ready() {
            return PointerResponse::Ignored;
        }
        match event {
            PointerEvent::Down(at) => {
                if let Some(preset) = controls::button_at(at, self.surface_height()) {
                    return match self.set_level(preset.level) {
                        Ok(Some(frame)) => PointerResponse::Redraw(frame),
                        _ => PointerResponse::Ignored,
                    };
                }
                self.viewport.begin_drag(at.x);
                PointerResponse::Ignored
            }
            PointerEvent::Move(at) => {
                if self.viewport.drag_to(at.x).is_some() {
                    return PointerResponse::Transform(self.viewport.translate());
                }
                self.update_hover(Some(at))
            }
            PointerEvent::Up(at) => {
                let extent = self.pan_extent();
                match self.viewport.end_drag(at.x, extent, self.surface_width()) {
                    Some(pan_x) => {
                        debug!("drag ended, pan {pan_x}");
                        PointerResponse::Transform(self.viewport.translate())
                    }
                    None => PointerResponse::Ignored,
                }
            }
            PointerEvent::Leave => self.update_hover(None),
            PointerEvent::Wheel { delta, .. } => {
                let scale = self.viewport.zoom(1.0 + delta);
                debug!("zoom gesture ignored, scale stays {scale}");
                PointerResponse::Ignored
            }
        }
    }

    /// Tooltip for the hovered item, if any.
    pub fn tooltip(&self) -> Option<Tooltip> {
        self.tooltip_in(self.dataset()?)
    }

    fn tooltip_in(&self, dataset: &Dataset) -> Option<Tooltip> {
        let id = self.hover.active_item?;
        let anchor = self.hover.pointer?;
        dataset.item(id).map(|item| Tooltip::for_item(item, anchor))
    }

    fn update_hover(&mut self, pointer: Option<Point>) -> PointerResponse {
        let hit = match (pointer, self.dataset()) {
            (Some(at), Some(dataset)) if controls::button_at(at, self.surface_height()).is_none() => {
                let content = Point::new(at.x - self.viewport.pan_x(), at.y - Y_MARGIN);
                self.compute_layout(dataset)
                    .item_at(content)
                    .map(|item| item.id)
            }
            _ => None,
        };
        let was_hovering = self.hover.active_item.is_some();
        self.hover = HoverState {
            active_item: hit,
            pointer,
        };
        if !was_hovering && hit.is_none() {
            return PointerResponse::Ignored;
        }
        PointerResponse::Hover(self.tooltip())
    }

    fn pan_extent(&self) -> f64 {
        match self.dataset() {
            Some(dataset) => self.compute_layout(dataset).pan_extent(),
            None => self.content_width(),
        }
    }

    fn reclamp(&mut self) -> f64 {
        let extent = self.pan_extent();
        let surface_width = self.surface_width();
        self.viewport.clamp(extent, surface_width)
    }

    fn redraw_if_ready(&self) -> Option<Frame> {
        self.dataset().map(|dataset| self.render(dataset))
    }

    fn compute_layout(&self, dataset: &Dataset) -> Layout {
        let projection = TimeProjection::new(&self.window, self.content_width());
        let lanes = Lanes::assign(dataset.series_names(), self.height);

        let mut items = Vec::with_capacity(dataset.item_count());
        for series in &dataset.series {
            let Some((lane_idx, lane)) = lanes.find(&series.name) else {
                continue;
            };
            for item in &series.items {
                let x = projection.project(item.start);
                let width = projection.project(item.end) - x;
                items.push(ItemLayout {
                    id: item.id,
                    lane: lane_idx,
                    rect: Rect::new(
                        x as f64,
                        f64::from(lane.y_offset),
                        width as f64,
                        f64::from(lane.height),
                    ),
                    label: item.name.clone(),
                });
            }
        }

        Layout {
            projection,
            lanes,
            items,
        }
    }

    fn render(&self, dataset: &Dataset) -> Frame {
        let layout = self.compute_layout(dataset);
        let mut frame = Vec::with_capacity(layout.items.len() * 2 + 128);
        frame.push(RenderCommand::Clear);
        frame.extend(items::render_items(
            &layout,
            self.viewport.translate(),
            self.lod.font_size,
            self.hover.active_item,
        ));
        frame.extend(axis::render_time_axis(
            &layout.projection,
            self.viewport.pan_x(),
        ));
        frame.extend(axis::render_lane_axis(&layout.lanes));
        frame.extend(controls::render_lod_controls(
            self.lod.level,
            self.surface_height(),
        ));
        if let Some(tip) = self.tooltip_in(dataset) {
            frame.extend(tooltip::render_tooltip(&tip));
        }
        debug!(
            "redraw: {} lanes, {} items, {} commands",
            layout.lanes.len(),
            layout.items.len(),
            frame.len()
        );
        frame
    }
}

/// Apply a transform-only update to a frame: every panned group takes the
/// new horizontal translation, nothing else changes.
pub fn apply_pan(frame: &mut [RenderCommand], pan_x: f64) {
    for command in frame {
        if let RenderCommand::PushTransform { translate, .. } = command {
            translate.x = pan_x;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::parse_document;
    use dayline_protocol::ThemeToken;

    const AGENDA: &[u8] = br#"{ "series": [
        { "name": "Room A", "data": [
            { "name": "Standup", "dateStart": "2024-01-01T08:00", "dateEnd": "2024-01-01T09:00", "description": "daily sync" },
            { "name": "Backwards", "dateStart": "2024-01-01T12:00", "dateEnd": "2024-01-01T11:00", "description": "" }
        ]},
        { "name": "Room B", "data": [
            { "name": "Review", "dateStart": "2024-01-01T10:00", "dateEnd": "2024-01-01T12:30", "description": "design review" }
        ]}
    ]}"#;

    fn config() -> TimelineConfig {
        TimelineConfig {
            date: Some("2024-01-01".into()),
            width: 1160,
            height: 200,
            level: 24,
            base_width: Some(100.0),
            ..TimelineConfig::default()
        }
    }

    fn loaded(config: &TimelineConfig) -> TimelineEngine {
        let mut engine = TimelineEngine::new(config).unwrap();
        engine.complete_load(parse_document(AGENDA)).unwrap();
        engine
    }

    fn bar(frame: &[RenderCommand], id: u64) -> Option<Rect> {
        frame.iter().find_map(|c| match c {
            RenderCommand::DrawRect {
                rect,
                item_id: Some(item_id),
                ..
            } if *item_id == id => Some(*rect),
            _ => None,
        })
    }

    #[test]
    fn one_hour_item_is_100px_at_level_24() {
        let engine = loaded(&config());
        assert_eq!(engine.content_width(), 2400.0);
        let layout = engine.layout().unwrap();
        let standup = layout.item(ItemId(0)).unwrap();
        assert_eq!(standup.rect, Rect::new(100.0, 0.0, 100.0, 100.0));
        let review = layout.item(ItemId(2)).unwrap();
        assert_eq!(review.rect, Rect::new(300.0, 100.0, 250.0, 100.0));
    }

    #[test]
    fn inverted_item_is_reported_and_skipped() {
        let engine = loaded(&config());
        assert_eq!(engine.rejected().len(), 1);
        assert!(matches!(
            engine.rejected()[0],
            DataShapeError::InvertedRange { series: 0, item: 1, .. }
        ));
        let frame = engine.redraw().unwrap();
        assert!(bar(&frame, 0).is_some());
        assert!(bar(&frame, 1).is_none());
        assert!(bar(&frame, 2).is_some());
    }

    #[test]
    fn pending_engine_refuses_to_draw() {
        let mut engine = TimelineEngine::new(&config()).unwrap();
        assert!(matches!(engine.redraw(), Err(EngineError::Pending)));
        assert_eq!(engine.set_level(12), Ok(None));
        assert_eq!(
            engine.handle_pointer(PointerEvent::Down(Point::new(500.0, 100.0))),
            PointerResponse::Ignored
        );
    }

    #[test]
    fn failed_load_is_surfaced_and_blocks_drawing() {
        let mut engine = TimelineEngine::new(&config()).unwrap();
        let result = engine.complete_load(parse_document(b"not json"));
        assert!(matches!(result, Err(DataFetchError::Malformed(_))));
        assert!(!engine.is_ready());
        assert!(matches!(engine.redraw(), Err(EngineError::LoadFailed(_))));
        assert_eq!(engine.set_width(800), Ok(None));
    }

    #[test]
    fn construction_rejects_bad_config() {
        let bad = TimelineConfig {
            level: 7,
            ..config()
        };
        assert_eq!(
            TimelineEngine::new(&bad).unwrap_err(),
            ConfigError::InvalidLevel(7)
        );
    }

    #[test]
    fn redraw_is_idempotent() {
        let mut engine = loaded(&config());
        engine.pan_by(-321.0);
        let first = engine.redraw().unwrap();
        let second = engine.redraw().unwrap();
        assert_eq!(first, second);
        assert_eq!(first.first(), Some(&RenderCommand::Clear));
        assert_eq!(engine.layout().unwrap(), engine.layout().unwrap());
    }

    #[test]
    fn level_round_trip_and_content_width() {
        let mut engine = loaded(&config());
        for level in [4, 6, 12, 24] {
            engine.set_level(level).unwrap();
            assert_eq!(engine.level(), level);
            assert_eq!(engine.viewport().scale_factor, level);
            assert_eq!(engine.content_width(), 100.0 * f64::from(level));
        }
        assert_eq!(engine.set_level(3), Err(ConfigError::InvalidLevel(3)));
        assert_eq!(engine.level(), 24);
    }

    #[test]
    fn level_change_reclamps_instead_of_resetting() {
        // Surface 1200 wide, content 2400: pan may go down to -1240.
        let mut engine = loaded(&config());
        assert_eq!(engine.pan_by(-1000.0).x, -1000.0);

        // Level 12: content 1200, lower bound -(1200 + 40 - 1200) = -40.
        engine.set_level(12).unwrap();
        assert_eq!(engine.viewport().pan_x, -40.0);

        // Back to 24: still in bounds, so it is kept.
        engine.set_level(24).unwrap();
        assert_eq!(engine.viewport().pan_x, -40.0);
    }

    #[test]
    fn drag_end_is_a_transform_only_update() {
        let mut engine = loaded(&config());
        let before = engine.layout().unwrap();

        assert_eq!(
            engine.handle_pointer(PointerEvent::Down(Point::new(600.0, 100.0))),
            PointerResponse::Ignored
        );
        assert_eq!(
            engine.handle_pointer(PointerEvent::Move(Point::new(800.0, 100.0))),
            PointerResponse::Transform(Point::new(200.0, Y_MARGIN))
        );
        assert_eq!(
            engine.handle_pointer(PointerEvent::Up(Point::new(800.0, 100.0))),
            PointerResponse::Transform(Point::new(X_MARGIN, Y_MARGIN))
        );
        assert_eq!(engine.layout().unwrap(), before);
        assert_eq!(engine.viewport().pan_x, 40.0);
    }

    #[test]
    fn drag_far_left_clamps_to_the_right_edge() {
        let mut engine = loaded(&config());
        engine.handle_pointer(PointerEvent::Down(Point::new(1000.0, 100.0)));
        engine.handle_pointer(PointerEvent::Move(Point::new(-2000.0, 100.0)));
        assert_eq!(
            engine.handle_pointer(PointerEvent::Up(Point::new(-1000.0, 100.0))),
            PointerResponse::Transform(Point::new(-1240.0, Y_MARGIN))
        );
    }

    #[test]
    fn bars_past_the_window_end_stay_reachable() {
        let mut engine = loaded(&config());
        let late = br#"{ "series": [ { "name": "Room A", "data": [
            { "name": "Overnight", "dateStart": "2024-01-02T06:00", "dateEnd": "2024-01-02T09:00" },
            { "name": "Runaway", "dateStart": "2024-01-02T06:00", "dateEnd": "2024-01-05T00:00" }
        ]}]}"#;
        engine.complete_load(parse_document(late)).unwrap();

        // Overnight ends at 2600px on a 2400px canvas; Runaway is capped at
        // the padded domain end, 4800px.
        let layout = engine.layout().unwrap();
        assert_eq!(layout.item(ItemId(0)).unwrap().rect.right(), 2600.0);
        assert_eq!(layout.pan_extent(), 4800.0);

        engine.handle_pointer(PointerEvent::Down(Point::new(1000.0, 100.0)));
        assert_eq!(
            engine.handle_pointer(PointerEvent::Up(Point::new(-9000.0, 100.0))),
            PointerResponse::Transform(Point::new(-3640.0, Y_MARGIN))
        );
    }

    #[test]
    fn hovering_an_item_yields_a_tooltip() {
        let mut engine = loaded(&config());
        // Standup spans content x 100..200, lane y 0..100 => surface y 40..140.
        let response = engine.handle_pointer(PointerEvent::Move(Point::new(150.0, 60.0)));
        let PointerResponse::Hover(Some(tip)) = response else {
            panic!("expected a tooltip, got {response:?}");
        };
        assert_eq!(tip.title, "Standup");
        assert_eq!(tip.hours(), "08:00 - 09:00");
        assert_eq!(tip.description, "daily sync");
        assert_eq!(engine.hover().active_item, Some(ItemId(0)));

        let frame = engine.redraw().unwrap();
        assert!(frame.iter().any(|c| matches!(
            c,
            RenderCommand::DrawRect {
                item_id: Some(0),
                color: ThemeToken::ItemHovered,
                ..
            }
        )));
        assert!(
            frame
                .iter()
                .any(|c| matches!(c, RenderCommand::BeginGroup { id, .. } if id == "tooltip"))
        );

        assert_eq!(
            engine.handle_pointer(PointerEvent::Leave),
            PointerResponse::Hover(None)
        );
        assert_eq!(engine.tooltip(), None);
        assert_eq!(engine.hover(), HoverState::default());
    }

    #[test]
    fn hover_follows_the_pan() {
        let mut engine = loaded(&config());
        engine.pan_by(-100.0);
        // Surface x 50 is content x 150 once panned.
        let response = engine.handle_pointer(PointerEvent::Move(Point::new(50.0, 60.0)));
        assert!(matches!(response, PointerResponse::Hover(Some(ref tip)) if tip.item == ItemId(0)));
    }

    #[test]
    fn moving_over_empty_space_is_ignored() {
        let mut engine = loaded(&config());
        assert_eq!(
            engine.handle_pointer(PointerEvent::Move(Point::new(1000.0, 60.0))),
            PointerResponse::Ignored
        );
    }

    #[test]
    fn clicking_a_level_button_redraws() {
        let mut engine = loaded(&config());
        // Third button (level 12) at x 110..140, y = height .. height + 30.
        let response = engine.handle_pointer(PointerEvent::Down(Point::new(120.0, 210.0)));
        assert!(matches!(response, PointerResponse::Redraw(_)));
        assert_eq!(engine.level(), 12);
        assert!(!engine.viewport.is_dragging());
    }

    #[test]
    fn wheel_does_not_zoom() {
        let mut engine = loaded(&config());
        let before = engine.viewport();
        assert_eq!(
            engine.handle_pointer(PointerEvent::Wheel {
                delta: 3.0,
                at: Point::new(100.0, 100.0)
            }),
            PointerResponse::Ignored
        );
        assert_eq!(engine.viewport(), before);
    }

    #[test]
    fn resizing_relayouts_lanes() {
        let mut engine = loaded(&config());
        let frame = engine.set_height(300).unwrap().unwrap();
        assert_eq!(bar(&frame, 2), Some(Rect::new(300.0, 150.0, 250.0, 150.0)));
        assert!(matches!(
            engine.set_height(0),
            Err(ConfigError::InvalidDimension { name: "height", .. })
        ));
    }

    #[test]
    fn apply_pan_only_touches_translations() {
        let mut engine = loaded(&config());
        let mut frame = engine.redraw().unwrap();
        engine.pan_by(-500.0);
        apply_pan(&mut frame, engine.viewport().pan_x);
        assert_eq!(frame, engine.redraw().unwrap());
    }
}
