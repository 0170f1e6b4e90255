//! Single-slot cell edit session.
//!
//! The whole grid has exactly one `CellEditSession`, so at most one cell can
//! be in `Editing` at a time. Opening a new edit replaces the previous one
//! without saving it.

use crate::command::Ticket;
use yearplan_model::{ColumnId, RowId};

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct EditTarget {
    pub row: RowId,
    pub column: ColumnId,
}

impl EditTarget {
    pub fn new(row: RowId, column: ColumnId) -> Self {
        Self { row, column }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum CellEditSession {
    #[default]
    Idle,
    Editing {
        target: EditTarget,
        draft: String,
        /// Save submitted and not yet reported back.
        pending: Option<Ticket>,
    },
}

impl CellEditSession {
    /// Start editing `target` with the raw persisted value as draft.
    ///
    /// Reopening the cell already being edited keeps its draft. Returns the
    /// target that was being edited before, if it differs.
    pub fn open(&mut self, target: EditTarget, raw: &str) -> Option<EditTarget> {
        if self.target() == Some(&target) {
            return None;
        }
        let previous = match std::mem::take(self) {
            CellEditSession::Editing { target: prev, .. } if prev != target => Some(prev),
            _ => None,
        };
        *self = CellEditSession::Editing {
            target,
            draft: raw.to_string(),
            pending: None,
        };
        previous
    }

    pub fn target(&self) -> Option<&EditTarget> {
        match self {
            CellEditSession::Editing { target, .. } => Some(target),
            CellEditSession::Idle => None,
        }
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            CellEditSession::Editing { draft, .. } => Some(draft),
            CellEditSession::Idle => None,
        }
    }

    /// Mutable draft; `None` while idle or while a save is pending.
    pub fn draft_mut(&mut self) -> Option<&mut String> {
        match self {
            CellEditSession::Editing {
                draft,
                pending: None,
                ..
            } => Some(draft),
            _ => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, CellEditSession::Editing { .. })
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, CellEditSession::Editing { pending: Some(_), .. })
    }

    pub fn is_editing_cell(&self, row: &RowId, column: &ColumnId) -> bool {
        self.target()
            .is_some_and(|t| &t.row == row && &t.column == column)
    }

    /// Discard the draft. Returns whether an edit was open.
    pub fn cancel(&mut self) -> bool {
        std::mem::take(self).is_editing()
    }

    /// Target and draft to save, unless idle or already saving.
    pub fn pending_commit(&self) -> Option<(&EditTarget, &str)> {
        match self {
            CellEditSession::Editing {
                target,
                draft,
                pending: None,
            } => Some((target, draft)),
            _ => None,
        }
    }

    pub fn mark_pending(&mut self, ticket: Ticket) {
        if let CellEditSession::Editing { pending, .. } = self {
            *pending = Some(ticket);
        }
    }

    /// Apply the result of the save submitted as `ticket`.
    ///
    /// Success closes the session. Failure keeps the draft so it can be
    /// retried. Returns whether `ticket` belonged to this session.
    pub fn resolve(&mut self, ticket: Ticket, succeeded: bool) -> bool {
        let CellEditSession::Editing { pending, .. } = self else {
            return false;
        };
        if *pending != Some(ticket) {
            return false;
        }
        if succeeded {
            *self = CellEditSession::Idle;
        } else {
            *pending = None;
        }
        true
    }
}
