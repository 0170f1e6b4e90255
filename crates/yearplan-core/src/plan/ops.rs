use super::YearPlan;
use crate::command::{Command, Completion, Outcome, Snapshot, Target, Ticket};
use crate::error::{Result, YearPlanError};
use crate::notice::Notice;
use crate::session::EditTarget;
use yearplan_model::{ColumnId, ColumnType, Direction, RowId};

impl YearPlan {
    /// Refetch both lists.
    pub fn refresh(&mut self) {
        self.submit(Command::Fetch(Target::Columns));
        self.submit(Command::Fetch(Target::Rows));
    }

    /// Append a column. Refused while another column add is outstanding,
    /// since the new column's order comes from the last fetched list.
    pub fn add_column(&mut self, name: &str, kind: ColumnType) -> Result<Ticket> {
        if self.is_adding(Target::Columns) {
            return Err(YearPlanError::AddInFlight("column"));
        }
        let command = self.columns.add_column(name, kind)?;
        Ok(self.submit(command))
    }

    /// Rename and/or retype a column.
    pub fn update_column(&mut self, id: &ColumnId, name: &str, kind: ColumnType) -> Result<Ticket> {
        let command = self.columns.rename_or_retype(id, name, kind)?;
        Ok(self.submit(command))
    }

    /// Persist a new width. The column renders at that width right away and
    /// falls back to the fetched width if the update fails.
    pub fn resize_column(&mut self, id: &ColumnId, width: i64) -> Result<Ticket> {
        let command = self.columns.resize(id, width)?;
        if let Command::UpdateColumn { patch, .. } = &command {
            if let Some(w) = patch.width {
                self.columns.set_local_width(id, w);
            }
        }
        Ok(self.submit(command))
    }

    /// `None` at a boundary; nothing is sent.
    pub fn move_column(&mut self, id: &ColumnId, direction: Direction) -> Option<Ticket> {
        let command = self.columns.reorder(id, direction)?;
        Some(self.submit(command))
    }

    pub fn delete_column(&mut self, id: &ColumnId) -> Result<Ticket> {
        let command = self.columns.delete(id)?;
        Ok(self.submit(command))
    }

    /// Append a row. Refused while another row add is outstanding.
    pub fn add_row(&mut self) -> Result<Ticket> {
        if self.is_adding(Target::Rows) {
            return Err(YearPlanError::AddInFlight("row"));
        }
        let command = self.rows.add_row(&self.columns)?;
        Ok(self.submit(command))
    }

    pub fn delete_row(&mut self, id: &RowId) -> Result<Ticket> {
        let command = self.rows.delete_row(id)?;
        Ok(self.submit(command))
    }

    /// `None` at a boundary; nothing is sent.
    pub fn move_row(&mut self, id: &RowId, direction: Direction) -> Option<Ticket> {
        let command = self.rows.reorder(id, direction)?;
        Some(self.submit(command))
    }

    /// Open an edit on a cell, drafting from its raw stored value.
    ///
    /// Returns the previously edited cell when it was implicitly cancelled.
    pub fn begin_edit(&mut self, row: &RowId, column: &ColumnId) -> Result<Option<EditTarget>> {
        if !self.columns.contains(column) {
            return Err(YearPlanError::UnknownColumn(column.clone()));
        }
        if self.rows.get(row).is_none() {
            return Err(YearPlanError::UnknownRow(row.clone()));
        }
        let raw = self.rows.raw_value(row, column).to_string();
        let displaced = self
            .edit
            .open(EditTarget::new(row.clone(), column.clone()), &raw);
        if let Some(prev) = &displaced {
            log::debug!("discarded edit of {}/{}", prev.row, prev.column);
        }
        Ok(displaced)
    }

    /// Editable draft, unless idle or a save is pending.
    pub fn draft_mut(&mut self) -> Option<&mut String> {
        self.edit.draft_mut()
    }

    /// Save the draft. The session closes once the save is confirmed.
    ///
    /// `None` when nothing is being edited, a save is already pending, or
    /// the edited row no longer exists (the session is closed then).
    pub fn commit_edit(&mut self) -> Option<Ticket> {
        let (target, draft) = self.edit.pending_commit()?;
        let Some(command) = self
            .rows
            .update_cell(&target.row, &target.column, draft, &self.columns)
        else {
            log::info!("edited row {} is gone; closing edit", target.row);
            self.edit.cancel();
            return None;
        };
        let ticket = self.submit(command);
        self.edit.mark_pending(ticket);
        Some(ticket)
    }

    /// Discard the draft without saving.
    pub fn cancel_edit(&mut self) -> bool {
        self.edit.cancel()
    }

    /// Start dragging the right edge of `column` at pointer position `x`.
    pub fn start_resize(&mut self, column: &ColumnId, x: i64) -> bool {
        let Some(width) = self.columns.width(column) else {
            return false;
        };
        self.resize.start(column.clone(), x, width);
        true
    }

    /// Follow the pointer. Only the local width changes.
    pub fn drag_resize(&mut self, x: i64) -> Option<u32> {
        let (column, width) = self.resize.drag(x)?;
        let column = column.clone();
        self.columns.set_local_width(&column, width);
        Some(width)
    }

    /// Release the drag and persist its final width once.
    pub fn end_resize(&mut self) -> Option<Ticket> {
        let (column, width) = self.resize.end()?;
        match self.resize_column(&column, width as i64) {
            Ok(ticket) => Some(ticket),
            Err(err) => {
                log::warn!("dropping resize of {}: {}", column, err);
                self.columns.clear_local_width(&column);
                None
            }
        }
    }

    /// Cancel the drag; the column goes back to its fetched width.
    pub fn abort_resize(&mut self) -> bool {
        match self.resize.abort() {
            Some(column) => {
                self.columns.clear_local_width(&column);
                true
            }
            None => false,
        }
    }

    /// Apply every completion reported since the last call.
    ///
    /// Returns how many completions were applied.
    pub fn pump(&mut self) -> usize {
        let done = self.poll();
        let count = done.len();
        for completion in done {
            self.apply(completion);
        }
        count
    }

    fn apply(&mut self, completion: Completion) {
        let Completion {
            ticket,
            command,
            outcome,
        } = completion;

        if matches!(command, Command::UpdateRow { .. }) {
            self.edit.resolve(ticket, outcome.persisted());
        }
        if !outcome.persisted() {
            if let Some(column) = command.resized_column() {
                self.columns.clear_local_width(column);
                self.reapply_local_widths();
            }
        }

        match outcome {
            Outcome::Refreshed(snapshot) => {
                self.apply_snapshot(snapshot);
                if let Some(msg) = command.done_message() {
                    self.notices.push(Notice::success(msg));
                }
            }
            Outcome::Failed(err) => {
                log::warn!("{} failed: {}", command.label(), err);
                self.notices
                    .push(Notice::failure(format!("Could not {}: {}", command.label(), err)));
            }
            Outcome::RefreshFailed(err) => {
                log::warn!("refetch after {} failed: {}", command.label(), err);
                if let Some(msg) = command.done_message() {
                    self.notices.push(Notice::success(msg));
                }
                let refetch = Command::Fetch(command.target());
                self.notices
                    .push(Notice::failure(format!("Could not {}: {}", refetch.label(), err)));
            }
        }
    }

    fn apply_snapshot(&mut self, snapshot: Snapshot) {
        match snapshot {
            Snapshot::Columns(columns) => {
                log::info!("applied {} columns", columns.len());
                self.columns.replace(columns);
                self.reapply_local_widths();
                self.close_stale_edit();
            }
            Snapshot::Rows(rows) => {
                log::info!("applied {} rows", rows.len());
                self.rows.replace(rows);
                self.close_stale_edit();
            }
        }
    }

    /// Keep outstanding resizes and an ongoing drag visible over freshly
    /// fetched widths.
    fn reapply_local_widths(&mut self) {
        for (column, width) in self.pending_widths() {
            self.columns.set_local_width(&column, width);
        }
        let Some(session) = self.resize.active() else {
            return;
        };
        let (column, width) = (session.column.clone(), session.live_width);
        self.columns.set_local_width(&column, width);
    }

    /// Close an unsaved edit whose row or column disappeared.
    fn close_stale_edit(&mut self) {
        if self.edit.is_pending() {
            return;
        }
        let Some(target) = self.edit.target() else {
            return;
        };
        if self.rows.get(&target.row).is_none() || !self.columns.contains(&target.column) {
            log::info!("closing edit of removed cell {}/{}", target.row, target.column);
            self.edit.cancel();
        }
    }
}
