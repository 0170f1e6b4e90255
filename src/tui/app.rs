//! Application state and logic.
//!
//! This module contains the main [`App`] struct which holds the year plan
//! grid plus cursor position, viewport, prompt buffers and modal UI state.
//! The app operates in different [`Mode`]s (Normal, Edit, Command) similar
//! to Vim's modal editing.

use std::path::PathBuf;
use yearplan_core::storage::write_markdown;
use yearplan_core::{
    ColumnId, ColumnType, Direction, Notice, RowId, Ticket, YearPlan, YearPlanError,
};

use super::keymap::Keymap;

/// Column widths are stored in pixels; the grid draws one cell per 10 px.
pub const PX_PER_CELL: u32 = 10;

/// Step used by the width keys, in pixels.
const WIDTH_STEP_PX: i64 = 10;

/// Modal editing state for the application.
///
/// - [`Normal`](Mode::Normal): Navigate and execute commands
/// - [`Edit`](Mode::Edit): Edit the raw value of one cell
/// - [`Command`](Mode::Command): Enter ex-style commands (`:addcol`, `:q`, etc.)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Edit,
    Command,
}

/// Main application state container.
pub struct App {
    /// Grid state, backend access and the single edit session
    pub plan: YearPlan,
    /// Cursor position (column index in display order)
    pub cursor_col: usize,
    /// Cursor position (row index in display order)
    pub cursor_row: usize,
    /// Viewport offset (column)
    pub viewport_col: usize,
    /// Viewport offset (row)
    pub viewport_row: usize,
    /// Number of visible columns
    pub visible_cols: usize,
    /// Number of visible rows
    pub visible_rows: usize,
    /// Terminal cells available for data columns
    pub grid_width: u16,
    /// Current mode
    pub mode: Mode,
    /// Cursor position within the edit draft (byte offset)
    pub edit_cursor: usize,
    /// Command buffer for command mode
    pub command_buffer: String,
    /// Cursor position within command buffer (byte offset)
    pub command_cursor: usize,
    /// Latest notice or status message
    pub status: Option<Notice>,
    /// Help modal state
    pub help_modal: bool,
    pub help_scroll: usize,
    /// Active keymap
    pub keymap: Keymap,
    /// First `g` of a vim `gg` sequence was pressed
    pub pending_g: bool,
}

impl App {
    /// Create the app and start loading both lists.
    pub fn new(mut plan: YearPlan, keymap: Keymap) -> Self {
        plan.refresh();
        App {
            plan,
            cursor_col: 0,
            cursor_row: 0,
            viewport_col: 0,
            viewport_row: 0,
            visible_cols: 1,
            visible_rows: 20,
            grid_width: 80,
            mode: Mode::Normal,
            edit_cursor: 0,
            command_buffer: String::new(),
            command_cursor: 0,
            status: None,
            help_modal: false,
            help_scroll: 0,
            keymap,
            pending_g: false,
        }
    }

    /// Apply finished backend work. Called once per event loop tick.
    pub fn tick(&mut self) {
        if self.plan.pump() == 0 {
            return;
        }
        if let Some(notice) = self.plan.notices_mut().drain().pop() {
            self.status = Some(notice);
        }
        if self.mode == Mode::Edit && !self.plan.session().is_editing() {
            self.mode = Mode::Normal;
            self.edit_cursor = 0;
        }
        self.clamp_cursor();
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status = Some(Notice::success(message));
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status = Some(Notice::failure(message));
    }

    fn report(&mut self, result: Result<Ticket, YearPlanError>) {
        if let Err(err) = result {
            self.set_error(format!("Error: {}", err));
        }
    }

    pub fn current_column_id(&self) -> Option<ColumnId> {
        self.plan.columns().at(self.cursor_col).map(|c| c.id.clone())
    }

    pub fn current_row_id(&self) -> Option<RowId> {
        self.plan.rows().at(self.cursor_row).map(|r| r.id.clone())
    }

    /// Width of a column in terminal cells, saturating for huge widths.
    pub fn column_cells(&self, col: usize) -> u16 {
        let px = self
            .plan
            .columns()
            .at(col)
            .and_then(|c| self.plan.column_width(&c.id))
            .unwrap_or(0);
        u16::try_from(px / PX_PER_CELL).unwrap_or(u16::MAX).max(1)
    }

    /// Move cursor by delta, clamping to valid range
    pub fn move_cursor(&mut self, dx: i32, dy: i32) {
        let max_col = self.plan.columns().len().saturating_sub(1) as i64;
        let max_row = self.plan.rows().len().saturating_sub(1) as i64;
        self.cursor_col = (self.cursor_col as i64 + dx as i64).clamp(0, max_col) as usize;
        self.cursor_row = (self.cursor_row as i64 + dy as i64).clamp(0, max_row) as usize;
        self.update_viewport();
    }

    fn clamp_cursor(&mut self) {
        self.cursor_col = self
            .cursor_col
            .min(self.plan.columns().len().saturating_sub(1));
        self.cursor_row = self.cursor_row.min(self.plan.rows().len().saturating_sub(1));
        self.update_viewport();
    }

    /// Update viewport to keep cursor visible
    pub fn update_viewport(&mut self) {
        // Vertical scrolling
        if self.cursor_row < self.viewport_row {
            self.viewport_row = self.cursor_row;
        } else if self.cursor_row >= self.viewport_row + self.visible_rows {
            self.viewport_row = self.cursor_row + 1 - self.visible_rows.max(1);
        }

        // Horizontal scrolling; columns have different widths.
        if self.cursor_col < self.viewport_col {
            self.viewport_col = self.cursor_col;
        }
        self.visible_cols = self.columns_fitting(self.viewport_col);
        while self.cursor_col >= self.viewport_col + self.visible_cols
            && self.viewport_col < self.cursor_col
        {
            self.viewport_col += 1;
            self.visible_cols = self.columns_fitting(self.viewport_col);
        }
    }

    /// How many columns starting at `from` fit in the grid width (at least one).
    fn columns_fitting(&self, from: usize) -> usize {
        let mut used: u32 = 0;
        let mut count = 0;
        for col in from..self.plan.columns().len() {
            let needed = self.column_cells(col) as u32 + super::ui::GRID_COLUMN_SPACING as u32;
            if count > 0 && used + needed > self.grid_width as u32 {
                break;
            }
            used += needed;
            count += 1;
        }
        count.max(1)
    }

    pub fn goto_first(&mut self) {
        self.cursor_col = 0;
        self.cursor_row = 0;
        self.update_viewport();
    }

    pub fn goto_last(&mut self) {
        self.cursor_row = self.plan.rows().len().saturating_sub(1);
        self.update_viewport();
    }

    /// Enter edit mode for current cell
    pub fn enter_edit_mode(&mut self) {
        let (Some(row), Some(column)) = (self.current_row_id(), self.current_column_id()) else {
            if self.plan.columns().is_empty() {
                self.set_status("No columns yet. Use :addcol <name>");
            } else {
                self.set_status("No rows yet. Press o or use :addrow");
            }
            return;
        };
        self.edit_cell(&row, &column);
    }

    /// Open an edit on a specific cell, replacing any edit in progress.
    pub fn edit_cell(&mut self, row: &RowId, column: &ColumnId) {
        match self.plan.begin_edit(row, column) {
            Ok(displaced) => {
                if displaced.is_some() {
                    self.set_status("Previous edit discarded");
                }
                self.edit_cursor = self.plan.session().draft().map_or(0, str::len);
                self.mode = Mode::Edit;
            }
            Err(err) => self.set_error(format!("Error: {}", err)),
        }
    }

    /// Save the draft. Edit mode ends once the save is confirmed.
    pub fn commit_edit(&mut self) {
        if self.plan.session().is_pending() {
            self.set_status("Still saving…");
            return;
        }
        match self.plan.commit_edit() {
            Some(_) => self.set_status("Saving…"),
            None => {
                self.mode = Mode::Normal;
                self.edit_cursor = 0;
            }
        }
    }

    pub fn cancel_edit(&mut self) {
        self.plan.cancel_edit();
        self.mode = Mode::Normal;
        self.edit_cursor = 0;
    }

    /// Swap the current column with its neighbor; Up is left.
    pub fn move_column(&mut self, direction: Direction) {
        let Some(id) = self.current_column_id() else {
            return;
        };
        match self.plan.move_column(&id, direction) {
            Some(_) => match direction {
                Direction::Up => self.move_cursor(-1, 0),
                Direction::Down => self.move_cursor(1, 0),
            },
            None => self.set_status(match direction {
                Direction::Up => "Column is already first",
                Direction::Down => "Column is already last",
            }),
        }
    }

    pub fn move_row(&mut self, direction: Direction) {
        let Some(id) = self.current_row_id() else {
            return;
        };
        match self.plan.move_row(&id, direction) {
            Some(_) => match direction {
                Direction::Up => self.move_cursor(0, -1),
                Direction::Down => self.move_cursor(0, 1),
            },
            None => self.set_status(match direction {
                Direction::Up => "Row is already first",
                Direction::Down => "Row is already last",
            }),
        }
    }

    pub fn increase_column_width(&mut self) {
        self.adjust_column_width(WIDTH_STEP_PX);
    }

    pub fn decrease_column_width(&mut self) {
        self.adjust_column_width(-WIDTH_STEP_PX);
    }

    fn adjust_column_width(&mut self, delta: i64) {
        let Some(id) = self.current_column_id() else {
            return;
        };
        let current = self.plan.column_width(&id).unwrap_or(0) as i64;
        let result = self.plan.resize_column(&id, current + delta);
        self.report(result);
    }

    pub fn add_row(&mut self) {
        let result = self.plan.add_row();
        self.report(result);
    }

    pub fn refresh(&mut self) {
        self.plan.refresh();
        self.set_status("Refreshing…");
    }

    pub fn open_help_modal(&mut self) {
        self.help_modal = true;
        self.help_scroll = 0;
    }

    pub fn close_help_modal(&mut self) {
        self.help_modal = false;
    }

    pub fn scroll_help_by(&mut self, delta: i32) {
        self.help_scroll = (self.help_scroll as i64 + delta as i64).max(0) as usize;
    }

    pub fn scroll_help_to_top(&mut self) {
        self.help_scroll = 0;
    }

    pub fn scroll_help_to_end(&mut self) {
        // Clamped against the real content height when drawn.
        self.help_scroll = usize::MAX;
    }

    /// Execute the command in the command buffer.
    ///
    /// Returns `true` if the application should quit.
    pub fn execute_command(&mut self) -> bool {
        let cmd = self.command_buffer.trim().to_string();
        self.command_buffer.clear();
        self.command_cursor = 0;
        self.mode = Mode::Normal;

        let parts: Vec<&str> = cmd.splitn(2, ' ').collect();
        let command = parts[0];
        let args = parts.get(1).map(|s| s.trim()).filter(|s| !s.is_empty());

        match command {
            "q" | "quit" => return true,
            "addcol" | "ac" => match args {
                Some(args) => {
                    let (kind, name) = split_type_prefix(args);
                    let result = self.plan.add_column(name, kind);
                    self.report(result);
                }
                None => self.set_status("Usage: :addcol [text|currency] <name>"),
            },
            "rename" => {
                let Some(column) = self.plan.columns().at(self.cursor_col).cloned() else {
                    self.set_status("No column selected");
                    return false;
                };
                match args {
                    Some(name) => {
                        let result = self.plan.update_column(&column.id, name, column.kind);
                        self.report(result);
                    }
                    None => self.set_status("Usage: :rename <name>"),
                }
            }
            "retype" => {
                let Some(column) = self.plan.columns().at(self.cursor_col).cloned() else {
                    self.set_status("No column selected");
                    return false;
                };
                match args.and_then(ColumnType::parse) {
                    Some(kind) => {
                        let result = self.plan.update_column(&column.id, &column.name, kind);
                        self.report(result);
                    }
                    None => self.set_status("Usage: :retype text|currency"),
                }
            }
            "width" | "cw" => {
                let Some(id) = self.current_column_id() else {
                    self.set_status("No column selected");
                    return false;
                };
                match args.and_then(|a| a.parse::<i64>().ok()) {
                    Some(px) => {
                        let result = self.plan.resize_column(&id, px);
                        self.report(result);
                    }
                    None => self.set_status("Usage: :width <pixels>"),
                }
            }
            "delcol" | "dc" => {
                if let Some(id) = self.current_column_id() {
                    let result = self.plan.delete_column(&id);
                    self.report(result);
                }
            }
            "addrow" | "ar" => self.add_row(),
            "delrow" | "dr" => {
                if let Some(id) = self.current_row_id() {
                    let result = self.plan.delete_row(&id);
                    self.report(result);
                }
            }
            "refresh" | "r" => self.refresh(),
            "export" => match args {
                Some(path) => {
                    let path = PathBuf::from(path);
                    match write_markdown(&path, &self.plan) {
                        Ok(()) => self.set_status(format!("Exported to {}", path.display())),
                        Err(e) => self.set_error(format!("Error: {}", e)),
                    }
                }
                None => self.set_status("Usage: :export <file.md>"),
            },
            "help" | "h" => self.open_help_modal(),
            "" => {}
            _ => {
                self.set_status(format!("Unknown command: {}", command));
            }
        }
        false
    }
}

/// Split an optional leading column type from a column name.
fn split_type_prefix(args: &str) -> (ColumnType, &str) {
    if let Some((first, rest)) = args.split_once(char::is_whitespace) {
        if let Some(kind) = ColumnType::parse(first) {
            let rest = rest.trim();
            if !rest.is_empty() {
                return (kind, rest);
            }
        }
    }
    (ColumnType::Text, args)
}

#[cfg(test)]
mod tests {
    use super::*;
    use yearplan_core::{MemoryBackend, NoticeLevel};

    fn app() -> (App, MemoryBackend) {
        let backend = MemoryBackend::demo();
        let mut app = App::new(YearPlan::inline(backend.clone()), Keymap::Vim);
        app.tick();
        (app, backend)
    }

    fn run(app: &mut App, cmd: &str) -> bool {
        app.command_buffer = cmd.to_string();
        let quit = app.execute_command();
        app.tick();
        quit
    }

    #[test]
    fn addcol_with_type_prefix() {
        let (mut app, _) = app();
        run(&mut app, "addcol currency Subsidie");
        let col = app.plan.columns().at(3).unwrap();
        assert_eq!(col.name, "Subsidie");
        assert_eq!(col.kind, ColumnType::Currency);

        run(&mut app, "addcol Opmerking bij regel");
        let col = app.plan.columns().at(4).unwrap();
        assert_eq!(col.name, "Opmerking bij regel");
        assert_eq!(col.kind, ColumnType::Text);
    }

    #[test]
    fn rename_keeps_type() {
        let (mut app, _) = app();
        app.cursor_col = 2;
        run(&mut app, "rename Budget 2027");
        let col = app.plan.columns().at(2).unwrap();
        assert_eq!(col.name, "Budget 2027");
        assert!(col.is_currency());
    }

    #[test]
    fn retype_requires_known_type() {
        let (mut app, _) = app();
        run(&mut app, "retype money");
        assert!(app.plan.columns().at(0).unwrap().is_currency());
        run(&mut app, "retype number");
        assert_eq!(
            app.status.as_ref().unwrap().message,
            "Usage: :retype text|currency"
        );
    }

    #[test]
    fn width_command_clamps() {
        let (mut app, backend) = app();
        run(&mut app, "width 20");
        assert_eq!(backend.columns()[0].width, 100);
    }

    #[test]
    fn huge_width_saturates_cell_count() {
        let (mut app, backend) = app();
        run(&mut app, "width 99999999999");
        assert_eq!(backend.columns()[0].width, u32::MAX);
        assert_eq!(app.column_cells(0), u16::MAX);

        run(&mut app, "width 655370");
        assert_eq!(app.column_cells(0), u16::MAX);
        run(&mut app, "width 100");
        assert_eq!(app.column_cells(0), 10);
    }

    #[test]
    fn quit_command_returns_true() {
        let (mut app, _) = app();
        assert!(run(&mut app, "q"));
        assert!(!run(&mut app, "bogus"));
        assert_eq!(app.status.as_ref().unwrap().message, "Unknown command: bogus");
    }

    #[test]
    fn boundary_moves_only_show_a_hint() {
        let (mut app, backend) = app();
        let before = backend.requests().len();
        app.move_column(Direction::Up);
        app.move_row(Direction::Up);
        assert_eq!(backend.requests().len(), before);
        assert_eq!(app.status.as_ref().unwrap().message, "Row is already first");
    }

    #[test]
    fn move_column_right_follows_cursor() {
        let (mut app, _) = app();
        app.move_column(Direction::Down);
        app.tick();
        assert_eq!(app.cursor_col, 1);
        assert_eq!(app.plan.columns().at(1).unwrap().name, "Subsysteem");
    }

    #[test]
    fn edit_mode_ends_after_confirmed_save() {
        let (mut app, _) = app();
        app.enter_edit_mode();
        assert_eq!(app.mode, Mode::Edit);
        app.plan.draft_mut().unwrap().push('!');
        app.commit_edit();
        app.tick();
        assert_eq!(app.mode, Mode::Normal);
        assert_eq!(app.status.as_ref().unwrap().message, "Cell saved");
    }

    #[test]
    fn failed_save_stays_in_edit_mode() {
        let (mut app, backend) = app();
        app.enter_edit_mode();
        backend.fail_mutations(1);
        app.commit_edit();
        app.tick();
        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.status.as_ref().unwrap().level, NoticeLevel::Failure);
    }

    #[test]
    fn deleting_rows_clamps_cursor() {
        let (mut app, _) = app();
        app.goto_last();
        run(&mut app, "delrow");
        assert_eq!(app.plan.rows().len(), 2);
        assert_eq!(app.cursor_row, 1);
    }

    #[test]
    fn export_command_writes_file() {
        let (mut app, _) = app();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plan.md");
        run(&mut app, &format!("export {}", path.display()));
        assert!(std::fs::read_to_string(&path).unwrap().contains("Begroting"));
    }
}
