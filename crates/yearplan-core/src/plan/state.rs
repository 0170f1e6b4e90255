use crate::backend::Backend;
use crate::command::{Command, Target, Ticket};
use crate::executor::{Executor, Inline, Worker};
use crate::notice::Notices;
use crate::registry::ColumnRegistry;
use crate::resize::ResizeController;
use crate::rows::RowStore;
use crate::session::CellEditSession;
use std::collections::BTreeMap;
use yearplan_model::{ColumnId, ColumnType, CurrencyLocale, NL_NL, RowId};

/// UI-agnostic state of one year plan grid.
///
/// Reads come from the last fetched snapshots. Every mutation goes through
/// the executor and is only reflected after the refetch that follows it has
/// been applied by [`YearPlan::pump`].
pub struct YearPlan {
    pub(crate) columns: ColumnRegistry,
    pub(crate) rows: RowStore,
    pub(crate) edit: CellEditSession,
    pub(crate) resize: ResizeController,
    pub(crate) notices: Notices,
    pub(crate) locale: &'static CurrencyLocale,
    executor: Box<dyn Executor>,
    next_ticket: Ticket,
    /// Submitted commands not yet reported back, by ticket.
    in_flight: BTreeMap<Ticket, Command>,
}

impl YearPlan {
    pub fn new(executor: Box<dyn Executor>) -> Self {
        YearPlan {
            columns: ColumnRegistry::new(),
            rows: RowStore::new(),
            edit: CellEditSession::default(),
            resize: ResizeController::new(),
            notices: Notices::default(),
            locale: &NL_NL,
            executor,
            next_ticket: 1,
            in_flight: BTreeMap::new(),
        }
    }

    /// Grid whose commands complete during the call that issues them.
    pub fn inline<B: Backend + 'static>(backend: B) -> Self {
        Self::new(Box::new(Inline::new(backend)))
    }

    /// Grid whose commands run on a background thread.
    pub fn threaded<B: Backend + Send + 'static>(backend: B) -> Self {
        Self::new(Box::new(Worker::spawn(backend)))
    }

    pub fn with_locale(mut self, locale: &'static CurrencyLocale) -> Self {
        self.locale = locale;
        self
    }

    pub fn columns(&self) -> &ColumnRegistry {
        &self.columns
    }

    pub fn rows(&self) -> &RowStore {
        &self.rows
    }

    pub fn session(&self) -> &CellEditSession {
        &self.edit
    }

    pub fn resize(&self) -> &ResizeController {
        &self.resize
    }

    pub fn notices(&self) -> &Notices {
        &self.notices
    }

    pub fn notices_mut(&mut self) -> &mut Notices {
        &mut self.notices
    }

    pub fn locale(&self) -> &'static CurrencyLocale {
        self.locale
    }

    /// Number of submitted commands that have not completed yet.
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }

    /// Labels of the outstanding commands, oldest first.
    pub fn in_flight_labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.in_flight.values().map(Command::label)
    }

    /// Whether an add of `target` has been submitted and not completed.
    pub fn is_adding(&self, target: Target) -> bool {
        self.in_flight.values().any(|command| match command {
            Command::AddColumn(_) => target == Target::Columns,
            Command::AddRow(_) => target == Target::Rows,
            _ => false,
        })
    }

    /// Widths of resizes that were submitted but have not completed.
    pub(crate) fn pending_widths(&self) -> Vec<(ColumnId, u32)> {
        self.in_flight
            .values()
            .filter_map(|command| match command {
                Command::UpdateColumn { id, patch } => patch.width.map(|w| (id.clone(), w)),
                _ => None,
            })
            .collect()
    }

    /// Rendered width of a column, including any local drag override.
    pub fn column_width(&self, id: &ColumnId) -> Option<u32> {
        self.columns.width(id)
    }

    /// Text shown for a cell.
    ///
    /// The cell being edited shows its raw draft. Otherwise currency cells
    /// are formatted for the locale and text cells show the stored value.
    pub fn display_value(&self, row: &RowId, column: &ColumnId) -> String {
        if self.edit.is_editing_cell(row, column) {
            return self.edit.draft().unwrap_or_default().to_string();
        }
        let raw = self.rows.raw_value(row, column);
        match self.columns.get(column).map(|c| c.kind) {
            Some(ColumnType::Currency) => yearplan_model::format(raw, self.locale),
            _ => raw.to_string(),
        }
    }

    pub(crate) fn submit(&mut self, command: Command) -> Ticket {
        let ticket = self.next_ticket;
        self.next_ticket += 1;
        self.in_flight.insert(ticket, command.clone());
        self.executor.submit(ticket, command);
        ticket
    }

    pub(crate) fn poll(&mut self) -> Vec<crate::command::Completion> {
        let done = self.executor.poll();
        for completion in &done {
            self.in_flight.remove(&completion.ticket);
        }
        done
    }
}
