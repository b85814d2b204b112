//! Crop rectangle drag state machine.
//!
//! The primary pointer draws the crop rectangle: press anchors it, motion
//! stretches it, release finalizes it. The rectangle stays normalized
//! (non-negative size) whatever the drag direction, and remains in place
//! after release until the next press.

use crate::geom::{Point, Rect};

/// Drag state of the primary pointer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        /// Where the press happened (P1).
        anchor: Point,
        /// Latest pointer position (P2).
        cursor: Point,
    },
}

#[derive(Clone, Debug, Default)]
pub struct CropRectEditor {
    state: DragState,
    crop: Rect,
}

impl CropRectEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// The current crop rectangle (in progress or last finalized).
    pub fn crop(&self) -> Rect {
        self.crop
    }

    pub fn pointer_down(&mut self, p: Point) {
        self.state = DragState::Dragging {
            anchor: p,
            cursor: p,
        };
        self.crop = Rect::from_corners(p, p);
    }

    /// Ignored unless a drag is in progress.
    pub fn pointer_move(&mut self, p: Point) {
        if let DragState::Dragging { anchor, .. } = self.state {
            self.state = DragState::Dragging { anchor, cursor: p };
            self.crop = Rect::from_corners(anchor, p);
        }
    }

    /// Ends the drag; returns the finalized rectangle if one was in progress.
    pub fn pointer_up(&mut self, p: Point) -> Option<Rect> {
        let DragState::Dragging { anchor, .. } = self.state else {
            return None;
        };
        self.crop = Rect::from_corners(anchor, p);
        self.state = DragState::Idle;
        Some(self.crop)
    }
}
