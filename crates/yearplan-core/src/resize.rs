//! Drag-to-resize for one column at a time.
//!
//! Pointer moves only change the live width. The width is persisted once,
//! when the drag ends.

use yearplan_model::{ColumnId, MIN_COLUMN_WIDTH};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResizeSession {
    pub column: ColumnId,
    pub anchor_x: i64,
    pub anchor_width: u32,
    pub live_width: u32,
}

#[derive(Clone, Debug, Default)]
pub struct ResizeController {
    session: Option<ResizeSession>,
}

impl ResizeController {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a drag, replacing any drag already in progress.
    pub fn start(&mut self, column: ColumnId, x: i64, current_width: u32) {
        self.session = Some(ResizeSession {
            column,
            anchor_x: x,
            anchor_width: current_width,
            live_width: current_width,
        });
    }

    /// Update the live width for pointer position `x`.
    pub fn drag(&mut self, x: i64) -> Option<(&ColumnId, u32)> {
        let session = self.session.as_mut()?;
        let width = session.anchor_width as i64 + (x - session.anchor_x);
        session.live_width = width.max(MIN_COLUMN_WIDTH as i64).min(u32::MAX as i64) as u32;
        Some((&session.column, session.live_width))
    }

    /// Finish the drag; yields the width to persist.
    pub fn end(&mut self) -> Option<(ColumnId, u32)> {
        self.session.take().map(|s| (s.column, s.live_width))
    }

    /// Drop the drag without persisting anything.
    pub fn abort(&mut self) -> Option<ColumnId> {
        self.session.take().map(|s| s.column)
    }

    pub fn active(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Live width of `column` if it is the one being dragged.
    pub fn live_width(&self, column: &ColumnId) -> Option<u32> {
        self.session
            .as_ref()
            .filter(|s| &s.column == column)
            .map(|s| s.live_width)
    }
}
