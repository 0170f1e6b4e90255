//! Commands sent to the backend and their outcomes.
//!
//! A command is either a plain fetch or one mutation from the collaborator
//! contract. Running a mutation always refetches the list it touched; the
//! refetched snapshot is the only thing the grid ever applies.

use crate::backend::{Backend, ColumnPatch, NewColumn, NewRow, RowPatch};
use crate::error::YearPlanError;
use yearplan_model::{Column, ColumnId, Direction, Row, RowId};

/// Monotonic id of a submitted command.
pub type Ticket = u64;

/// Which list a command reads or invalidates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    Columns,
    Rows,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Fetch(Target),
    AddColumn(NewColumn),
    UpdateColumn { id: ColumnId, patch: ColumnPatch },
    DeleteColumn(ColumnId),
    ReorderColumn { id: ColumnId, direction: Direction },
    AddRow(NewRow),
    UpdateRow { id: RowId, patch: RowPatch },
    DeleteRow(RowId),
    ReorderRow { id: RowId, direction: Direction },
}

impl Command {
    pub fn target(&self) -> Target {
        match self {
            Command::Fetch(target) => *target,
            Command::AddColumn(_)
            | Command::UpdateColumn { .. }
            | Command::DeleteColumn(_)
            | Command::ReorderColumn { .. } => Target::Columns,
            Command::AddRow(_)
            | Command::UpdateRow { .. }
            | Command::DeleteRow(_)
            | Command::ReorderRow { .. } => Target::Rows,
        }
    }

    pub fn is_mutation(&self) -> bool {
        !matches!(self, Command::Fetch(_))
    }

    /// Operation name used in user notices.
    pub fn label(&self) -> &'static str {
        match self {
            Command::Fetch(Target::Columns) => "load columns",
            Command::Fetch(Target::Rows) => "load rows",
            Command::AddColumn(_) => "add column",
            Command::UpdateColumn { patch, .. } if patch.name.is_none() && patch.kind.is_none() => {
                "resize column"
            }
            Command::UpdateColumn { .. } => "update column",
            Command::DeleteColumn(_) => "delete column",
            Command::ReorderColumn { .. } => "move column",
            Command::AddRow(_) => "add row",
            Command::UpdateRow { .. } => "save cell",
            Command::DeleteRow(_) => "delete row",
            Command::ReorderRow { .. } => "move row",
        }
    }

    /// Success notice for a mutation; fetches have none.
    pub fn done_message(&self) -> Option<&'static str> {
        let msg = match self {
            Command::Fetch(_) => return None,
            Command::AddColumn(_) => "Column added",
            Command::UpdateColumn { patch, .. } if patch.name.is_none() && patch.kind.is_none() => {
                "Column resized"
            }
            Command::UpdateColumn { .. } => "Column updated",
            Command::DeleteColumn(_) => "Column deleted",
            Command::ReorderColumn { .. } => "Column moved",
            Command::AddRow(_) => "Row added",
            Command::UpdateRow { .. } => "Cell saved",
            Command::DeleteRow(_) => "Row deleted",
            Command::ReorderRow { .. } => "Row moved",
        };
        Some(msg)
    }

    /// Column whose width this command persists, if any.
    pub fn resized_column(&self) -> Option<&ColumnId> {
        match self {
            Command::UpdateColumn { id, patch } if patch.width.is_some() => Some(id),
            _ => None,
        }
    }

    fn dispatch(&self, backend: &dyn Backend) -> crate::error::Result<()> {
        match self {
            Command::Fetch(_) => Ok(()),
            Command::AddColumn(column) => backend.create_column(column),
            Command::UpdateColumn { id, patch } => backend.update_column(id, patch),
            Command::DeleteColumn(id) => backend.delete_column(id),
            Command::ReorderColumn { id, direction } => backend.reorder_column(id, *direction),
            Command::AddRow(row) => backend.create_row(row),
            Command::UpdateRow { id, patch } => backend.update_row(id, patch),
            Command::DeleteRow(id) => backend.delete_row(id),
            Command::ReorderRow { id, direction } => backend.reorder_row(id, *direction),
        }
    }

    /// Perform the command, then refetch its target list.
    pub fn run(&self, backend: &dyn Backend) -> Outcome {
        log::debug!("dispatching {}", self.label());
        if let Err(err) = self.dispatch(backend) {
            return Outcome::Failed(err);
        }
        let snapshot = match self.target() {
            Target::Columns => backend.list_columns().map(Snapshot::Columns),
            Target::Rows => backend.list_rows().map(Snapshot::Rows),
        };
        match snapshot {
            Ok(snapshot) => Outcome::Refreshed(snapshot),
            Err(err) if self.is_mutation() => Outcome::RefreshFailed(err),
            Err(err) => Outcome::Failed(err),
        }
    }
}

/// A freshly fetched list.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Snapshot {
    Columns(Vec<Column>),
    Rows(Vec<Row>),
}

#[derive(Debug)]
pub enum Outcome {
    /// Mutation (if any) persisted and the list was refetched.
    Refreshed(Snapshot),
    /// Nothing was persisted.
    Failed(YearPlanError),
    /// The mutation persisted but the refetch did not succeed.
    RefreshFailed(YearPlanError),
}

impl Outcome {
    /// Whether the backend accepted the mutation.
    pub fn persisted(&self) -> bool {
        !matches!(self, Outcome::Failed(_))
    }
}

/// A finished command, reported back by an executor.
#[derive(Debug)]
pub struct Completion {
    pub ticket: Ticket,
    pub command: Command,
    pub outcome: Outcome,
}
