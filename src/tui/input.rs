use crossterm::event::{
    self, Event, KeyCode, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::prelude::*;
use std::io;
use std::time::Duration;

use super::actions::{ApplyResult, apply_action, handle_command_text, handle_edit_text};
use super::app::{App, Mode, PX_PER_CELL};
use super::keymap::{Action, Keymap, translate};
use super::ui;

/// How long to wait for input before checking for finished backend work.
const POLL_INTERVAL: Duration = Duration::from_millis(100);

fn pointer_px(column: u16) -> i64 {
    column as i64 * PX_PER_CELL as i64
}

fn handle_mouse_event(app: &mut App, terminal_area: Rect, mouse: MouseEvent) {
    if app.help_modal {
        return;
    }

    match mouse.kind {
        MouseEventKind::Drag(MouseButton::Left) => {
            app.plan.drag_resize(pointer_px(mouse.column));
            app.update_viewport();
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if app.plan.resize().is_active() {
                app.plan.end_resize();
                app.update_viewport();
            }
        }
        MouseEventKind::Down(MouseButton::Left) => {
            if app.mode == Mode::Command {
                return;
            }
            let [_formula_area, grid_area, _status_area] = ui::split_main_chunks(terminal_area);

            if app.mode == Mode::Normal {
                if let Some(col) = ui::column_edge_at(app, grid_area, mouse.column, mouse.row) {
                    if let Some(column) = app.plan.columns().at(col).map(|c| c.id.clone()) {
                        app.plan.start_resize(&column, pointer_px(mouse.column));
                    }
                    return;
                }
            }

            if let Some((col, row)) = ui::grid_cell_at(app, grid_area, mouse.column, mouse.row) {
                app.cursor_col = col;
                app.cursor_row = row;
                app.update_viewport();
                app.pending_g = false;
                // Clicking another cell while editing moves the edit there.
                if app.mode == Mode::Edit && !app.plan.session().is_pending() {
                    app.enter_edit_mode();
                }
            }
        }
        _ => {}
    }
}

fn handle_help_key(app: &mut App, key: event::KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Char('q') => {
            app.close_help_modal();
        }
        KeyCode::Char('g') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.close_help_modal();
        }
        KeyCode::Down | KeyCode::Char('j') => {
            app.scroll_help_by(1);
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.scroll_help_by(-1);
        }
        KeyCode::PageDown => {
            app.scroll_help_by(12);
        }
        KeyCode::PageUp => {
            app.scroll_help_by(-12);
        }
        KeyCode::Home | KeyCode::Char('g') => {
            app.scroll_help_to_top();
        }
        KeyCode::End | KeyCode::Char('G') => {
            app.scroll_help_to_end();
        }
        _ => {}
    }
}

/// Handle one key press. Returns `ApplyResult::Quit` if the app should exit.
pub(crate) fn handle_key_event(app: &mut App, key: event::KeyEvent) -> ApplyResult {
    // Help modal takes over input
    if app.help_modal {
        handle_help_key(app, key);
        return ApplyResult::Continue;
    }

    // Handle the vim 'gg' sequence (go to first cell)
    if matches!(app.keymap, Keymap::Vim) && app.mode == Mode::Normal {
        if key.code == KeyCode::Char('g') && key.modifiers.is_empty() {
            if app.pending_g {
                app.pending_g = false;
                return apply_action(app, Action::GotoFirst);
            }
            app.pending_g = true;
            return ApplyResult::Continue;
        }
        app.pending_g = false;
    }

    if let Some(action) = translate(&app.keymap, app.mode, key) {
        return apply_action(app, action);
    }

    // Text entry fallbacks (not bound in keymaps).
    match app.mode {
        Mode::Edit => handle_edit_text(app, key),
        Mode::Command => handle_command_text(app, key),
        Mode::Normal => {}
    }
    ApplyResult::Continue
}

pub fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        app.tick();
        terminal.draw(|f| ui::draw(f, app))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        match event::read()? {
            Event::Key(key) => {
                // Only process key press events (Windows reports Press + Release)
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                if handle_key_event(app, key) == ApplyResult::Quit {
                    return Ok(());
                }
            }
            Event::Mouse(mouse) => {
                let size = terminal.size()?;
                let terminal_area = Rect::new(0, 0, size.width, size.height);
                handle_mouse_event(app, terminal_area, mouse);
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEvent;
    use yearplan_core::{MemoryBackend, YearPlan};

    const TERMINAL: Rect = Rect::new(0, 0, 120, 30);

    fn demo_app() -> (App, MemoryBackend) {
        let backend = MemoryBackend::demo();
        let mut app = App::new(YearPlan::inline(backend.clone()), Keymap::Vim);
        app.tick();
        app.grid_width = 110;
        app.visible_rows = 10;
        app.update_viewport();
        (app, backend)
    }

    fn mouse(kind: MouseEventKind, col: u16, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: col,
            row,
            modifiers: KeyModifiers::empty(),
        }
    }

    fn left_click(col: u16, row: u16) -> MouseEvent {
        mouse(MouseEventKind::Down(MouseButton::Left), col, row)
    }

    fn first_body_cell_point(grid_area: Rect) -> (u16, u16) {
        (
            grid_area.x + 1 + ui::ROW_HEADER_WIDTH + ui::GRID_COLUMN_SPACING,
            grid_area.y + 2,
        )
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn click_moves_cursor_and_clears_pending_g() {
        let (mut app, _) = demo_app();
        app.pending_g = true;
        let [_formula, grid_area, _status] = ui::split_main_chunks(TERMINAL);
        let (x, y) = first_body_cell_point(grid_area);

        handle_mouse_event(&mut app, TERMINAL, left_click(x + 21, y + 1));

        assert_eq!((app.cursor_col, app.cursor_row), (1, 1));
        assert!(!app.pending_g);
    }

    #[test]
    fn click_is_ignored_when_modal_open() {
        let (mut app, _) = demo_app();
        app.help_modal = true;
        let [_formula, grid_area, _status] = ui::split_main_chunks(TERMINAL);
        let (x, y) = first_body_cell_point(grid_area);

        handle_mouse_event(&mut app, TERMINAL, left_click(x, y + 2));

        assert_eq!((app.cursor_col, app.cursor_row), (0, 0));
    }

    #[test]
    fn click_while_editing_moves_the_edit() {
        let (mut app, _) = demo_app();
        app.enter_edit_mode();
        let [_formula, grid_area, _status] = ui::split_main_chunks(TERMINAL);
        let (x, y) = first_body_cell_point(grid_area);

        handle_mouse_event(&mut app, TERMINAL, left_click(x, y + 2));

        assert_eq!(app.mode, Mode::Edit);
        assert_eq!(app.plan.session().draft(), Some("Elektra"));
    }

    #[test]
    fn header_drag_resizes_once_on_release() {
        let (mut app, backend) = demo_app();
        let [_formula, grid_area, _status] = ui::split_main_chunks(TERMINAL);
        let (first_x, _) = first_body_cell_point(grid_area);
        let edge = first_x + 20;
        let header_y = grid_area.y + 1;
        let before = backend.requests().len();

        handle_mouse_event(&mut app, TERMINAL, left_click(edge, header_y));
        assert!(app.plan.resize().is_active());
        for x in [edge + 2, edge + 5, edge + 4] {
            handle_mouse_event(&mut app, TERMINAL, mouse(MouseEventKind::Drag(MouseButton::Left), x, header_y));
        }
        assert_eq!(app.plan.column_width(&"col-1".into()), Some(240));
        assert_eq!(backend.requests().len(), before);

        handle_mouse_event(&mut app, TERMINAL, mouse(MouseEventKind::Up(MouseButton::Left), edge + 4, header_y));
        app.tick();

        assert!(!app.plan.resize().is_active());
        assert_eq!(backend.columns()[0].width, 240);
        // One PATCH plus the refetch.
        assert_eq!(backend.requests().len(), before + 2);
    }

    #[test]
    fn escape_aborts_resize_drag() {
        let (mut app, backend) = demo_app();
        let [_formula, grid_area, _status] = ui::split_main_chunks(TERMINAL);
        let (first_x, _) = first_body_cell_point(grid_area);
        let edge = first_x + 20;
        let header_y = grid_area.y + 1;
        let before = backend.requests().len();

        handle_mouse_event(&mut app, TERMINAL, left_click(edge, header_y));
        handle_mouse_event(&mut app, TERMINAL, mouse(MouseEventKind::Drag(MouseButton::Left), edge + 8, header_y));
        assert_eq!(app.plan.column_width(&"col-1".into()), Some(280));

        handle_key_event(&mut app, key(KeyCode::Esc));

        assert!(!app.plan.resize().is_active());
        assert_eq!(app.plan.column_width(&"col-1".into()), Some(200));
        assert_eq!(backend.requests().len(), before);
    }

    #[test]
    fn gg_goes_to_first_cell() {
        let (mut app, _) = demo_app();
        app.cursor_col = 2;
        app.cursor_row = 2;

        handle_key_event(&mut app, key(KeyCode::Char('g')));
        assert!(app.pending_g);
        handle_key_event(&mut app, key(KeyCode::Char('g')));

        assert_eq!((app.cursor_col, app.cursor_row), (0, 0));
    }

    #[test]
    fn help_modal_swallows_keys() {
        let (mut app, _) = demo_app();
        handle_key_event(&mut app, key(KeyCode::Char('?')));
        assert!(app.help_modal);
        handle_key_event(&mut app, key(KeyCode::Char('j')));
        assert_eq!(app.cursor_row, 0);
        handle_key_event(&mut app, key(KeyCode::Esc));
        assert!(!app.help_modal);
    }

    #[test]
    fn command_prompt_runs_on_enter() {
        let (mut app, _) = demo_app();
        handle_key_event(&mut app, key(KeyCode::Char(':')));
        for c in "q".chars() {
            handle_key_event(&mut app, key(KeyCode::Char(c)));
        }
        assert_eq!(handle_key_event(&mut app, key(KeyCode::Enter)), ApplyResult::Quit);
    }
}
