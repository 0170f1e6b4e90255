use crossterm::event::{self, KeyCode, KeyModifiers};

use super::app::{App, Mode};
use super::keymap::Action;

/// Handle text editing operations on a buffer with UTF-8 aware cursor movement.
fn handle_text_input(buffer: &mut String, cursor: &mut usize, key: event::KeyEvent) {
    *cursor = (*cursor).min(buffer.len());
    match key.code {
        KeyCode::Left => {
            if *cursor > 0 {
                let mut new_pos = *cursor - 1;
                while new_pos > 0 && !buffer.is_char_boundary(new_pos) {
                    new_pos -= 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Right => {
            if *cursor < buffer.len() {
                let mut new_pos = *cursor + 1;
                while new_pos < buffer.len() && !buffer.is_char_boundary(new_pos) {
                    new_pos += 1;
                }
                *cursor = new_pos;
            }
        }
        KeyCode::Home => {
            *cursor = 0;
        }
        KeyCode::End => {
            *cursor = buffer.len();
        }
        KeyCode::Backspace | KeyCode::Char('h')
            if key.code == KeyCode::Backspace || key.modifiers.contains(KeyModifiers::CONTROL) =>
        {
            if *cursor > 0 {
                let mut del_start = *cursor - 1;
                while del_start > 0 && !buffer.is_char_boundary(del_start) {
                    del_start -= 1;
                }
                buffer.drain(del_start..*cursor);
                *cursor = del_start;
            }
        }
        KeyCode::Delete => {
            if *cursor < buffer.len() {
                let mut del_end = *cursor + 1;
                while del_end < buffer.len() && !buffer.is_char_boundary(del_end) {
                    del_end += 1;
                }
                buffer.drain(*cursor..del_end);
            }
        }
        KeyCode::Char(c) => {
            if key.modifiers.is_empty() || key.modifiers == KeyModifiers::SHIFT {
                buffer.insert(*cursor, c);
                *cursor += c.len_utf8();
            }
        }
        _ => {}
    }
}

/// Result of applying an action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyResult {
    Continue,
    Quit,
}

/// Apply an action to the application state.
///
/// Returns `ApplyResult::Quit` if the application should exit.
pub fn apply_action(app: &mut App, action: Action) -> ApplyResult {
    match action {
        Action::Cancel => match app.mode {
            Mode::Edit => app.cancel_edit(),
            Mode::Command => {
                app.mode = Mode::Normal;
                app.command_buffer.clear();
                app.command_cursor = 0;
            }
            Mode::Normal => {
                if app.plan.abort_resize() {
                    app.set_status("Resize cancelled");
                }
            }
        },

        Action::EnterEdit => app.enter_edit_mode(),
        Action::CommitEdit => app.commit_edit(),
        Action::EnterCommand => {
            app.mode = Mode::Command;
            app.command_buffer.clear();
            app.command_cursor = 0;
        }
        Action::ExecuteCommand => {
            if app.execute_command() {
                return ApplyResult::Quit;
            }
        }

        Action::Move(dx, dy) => app.move_cursor(dx, dy),
        Action::Page(dir) => {
            let delta = app.visible_rows as i32 * dir;
            app.move_cursor(0, delta);
        }
        Action::HomeCol => {
            app.cursor_col = 0;
            app.update_viewport();
        }
        Action::EndCol => {
            app.cursor_col = app.plan.columns().len().saturating_sub(1);
            app.update_viewport();
        }
        Action::GotoLast => app.goto_last(),
        Action::GotoFirst => app.goto_first(),

        Action::MoveColumn(direction) => app.move_column(direction),
        Action::MoveRow(direction) => app.move_row(direction),
        Action::IncColWidth => app.increase_column_width(),
        Action::DecColWidth => app.decrease_column_width(),
        Action::AddRow => app.add_row(),
        Action::Refresh => app.refresh(),
        Action::OpenHelp => app.open_help_modal(),
        Action::Quit => return ApplyResult::Quit,
    }
    ApplyResult::Continue
}

/// Type into the cell draft. Ignored while the draft is being saved.
pub fn handle_edit_text(app: &mut App, key: event::KeyEvent) {
    let mut cursor = app.edit_cursor;
    if let Some(draft) = app.plan.draft_mut() {
        handle_text_input(draft, &mut cursor, key);
        app.edit_cursor = cursor;
    }
}

pub fn handle_command_text(app: &mut App, key: event::KeyEvent) {
    handle_text_input(&mut app.command_buffer, &mut app.command_cursor, key);
}
