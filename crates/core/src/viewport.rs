use dayline_protocol::Point;
use serde::Serialize;

use crate::Y_MARGIN;

/// Zoom gestures are pinned to this scale extent; only panning is live.
pub const SCALE_EXTENT: (f64, f64) = (1.0, 1.0);

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ViewportState {
    /// Horizontal translation of the content group, in pixels.
    pub pan_x: f64,
    /// Active LOD level.
    pub scale_factor: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragState {
    Idle,
    Dragging { anchor_x: f64, anchor_pan: f64 },
}

/// Constrain a proposed pan offset.
///
/// Content may not be dragged right past `margin`, nor left past the point
/// where its right edge (plus margin) meets the viewport's right edge. When
/// the content is narrower than the viewport the lower bound is capped at
/// `margin`, which keeps the function idempotent.
pub fn clamp_pan(proposed: f64, content_width: f64, viewport_width: f64, margin: f64) -> f64 {
    let lower = (-(content_width + margin - viewport_width)).min(margin);
    if proposed > margin {
        margin
    } else if proposed < lower {
        lower
    } else {
        proposed
    }
}

/// Pan state machine: `Idle -> Dragging -> (clamp) -> Idle`.
#[derive(Debug, Clone)]
pub struct ViewportController {
    state: ViewportState,
    drag: DragState,
    margin: f64,
}

impl ViewportController {
    pub fn new(scale_factor: u32, margin: f64) -> Self {
        Self {
            state: ViewportState {
                pan_x: 0.0,
                scale_factor,
            },
            drag: DragState::Idle,
            margin,
        }
    }

    pub fn state(&self) -> ViewportState {
        self.state
    }

    pub fn pan_x(&self) -> f64 {
        self.state.pan_x
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.drag, DragState::Dragging { .. })
    }

    pub fn set_scale_factor(&mut self, scale_factor: u32) {
        self.state.scale_factor = scale_factor;
    }

    /// Translation applied to the content group. The vertical part is
    /// always the top margin.
    pub fn translate(&self) -> Point {
        Point::new(self.state.pan_x, Y_MARGIN)
    }

    pub fn begin_drag(&mut self, pointer_x: f64) {
        self.drag = DragState::Dragging {
            anchor_x: pointer_x,
            anchor_pan: self.state.pan_x,
        };
    }

    /// Follow the pointer while dragging. Returns the new pan, or `None`
    /// when no drag is in progress.
    pub fn drag_to(&mut self, pointer_x: f64) -> Option<f64> {
        let DragState::Dragging {
            anchor_x,
            anchor_pan,
        } = self.drag
        else {
            return None;
        };
        self.state.pan_x = anchor_pan + (pointer_x - anchor_x);
        Some(self.state.pan_x)
    }

    /// Finish a drag at `pointer_x` and clamp. Returns `None` when no drag
    /// was in progress.
    pub fn end_drag(
        &mut self,
        pointer_x: f64,
        content_width: f64,
        viewport_width: f64,
    ) -> Option<f64> {
        self.drag_to(pointer_x)?;
        self.drag = DragState::Idle;
        Some(self.clamp(content_width, viewport_width))
    }

    /// Re-run the clamp on the current pan, e.g. after the content width
    /// changed.
    pub fn clamp(&mut self, content_width: f64, viewport_width: f64) -> f64 {
        self.state.pan_x = clamp_pan(
            self.state.pan_x,
            content_width,
            viewport_width,
            self.margin,
        );
        self.state.pan_x
    }

    /// Shift by `dx` as one complete gesture.
    pub fn pan_by(&mut self, dx: f64, content_width: f64, viewport_width: f64) -> f64 {
        self.state.pan_x += dx;
        self.clamp(content_width, viewport_width)
    }

    /// Apply a zoom gesture. The extent is pinned, so the result is always
    /// the fixed scale and the pan is untouched.
    pub fn zoom(&self, factor: f64) -> f64 {
        factor.clamp(SCALE_EXTENT.0, SCALE_EXTENT.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn clamps_past_left_edge_to_margin() {
        assert_eq!(clamp_pan(100.0, 2400.0, 1200.0, 40.0), 40.0);
    }

    #[test]
    fn clamps_past_right_edge() {
        assert_eq!(clamp_pan(-2000.0, 2400.0, 1200.0, 40.0), -1240.0);
    }

    #[test]
    fn accepts_values_in_bounds() {
        assert_eq!(clamp_pan(-600.0, 2400.0, 1200.0, 40.0), -600.0);
        assert_eq!(clamp_pan(40.0, 2400.0, 1200.0, 40.0), 40.0);
        assert_eq!(clamp_pan(-1240.0, 2400.0, 1200.0, 40.0), -1240.0);
    }

    #[test]
    fn narrow_content_pins_to_margin() {
        assert_eq!(clamp_pan(-500.0, 100.0, 1200.0, 40.0), 40.0);
        assert_eq!(clamp_pan(0.0, 100.0, 1200.0, 40.0), 40.0);
    }

    #[test]
    fn drag_follows_pointer_then_clamps_on_release() {
        let mut vp = ViewportController::new(24, 40.0);
        vp.begin_drag(500.0);
        assert!(vp.is_dragging());
        assert_eq!(vp.drag_to(700.0), Some(200.0));
        // Unclamped mid-drag.
        assert_eq!(vp.pan_x(), 200.0);
        assert_eq!(vp.end_drag(700.0, 2400.0, 1200.0), Some(40.0));
        assert_eq!(vp.drag_state(), DragState::Idle);
    }

    #[test]
    fn drag_is_relative_to_the_anchor_pan() {
        let mut vp = ViewportController::new(24, 40.0);
        vp.pan_by(-300.0, 2400.0, 1200.0);
        vp.begin_drag(100.0);
        assert_eq!(vp.end_drag(50.0, 2400.0, 1200.0), Some(-350.0));
    }

    #[test]
    fn move_and_release_without_drag_do_nothing() {
        let mut vp = ViewportController::new(6, 40.0);
        assert_eq!(vp.drag_to(10.0), None);
        assert_eq!(vp.end_drag(10.0, 2400.0, 1200.0), None);
        assert_eq!(vp.pan_x(), 0.0);
    }

    #[test]
    fn zoom_is_pinned() {
        let vp = ViewportController::new(6, 40.0);
        assert_eq!(vp.zoom(2.5), 1.0);
        assert_eq!(vp.zoom(0.1), 1.0);
    }

    #[test]
    fn translate_keeps_top_margin() {
        let mut vp = ViewportController::new(6, 40.0);
        vp.pan_by(-100.0, 2400.0, 1200.0);
        assert_eq!(vp.translate(), Point::new(-100.0, Y_MARGIN));
    }

    proptest! {
        #[test]
        fn clamp_is_idempotent(
            x in -100_000.0f64..100_000.0,
            content in 0.0f64..50_000.0,
            viewport in 1.0f64..5_000.0,
            margin in 0.0f64..200.0,
        ) {
            let once = clamp_pan(x, content, viewport, margin);
            let twice = clamp_pan(once, content, viewport, margin);
            prop_assert_eq!(once, twice);
            prop_assert!(once <= margin);
        }
    }
}
