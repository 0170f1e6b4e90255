use crate::tui::app::Mode;
use crate::tui::keymap::Action;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use yearplan_model::Direction;

pub(crate) fn translate_vim(mode: Mode, key: KeyEvent) -> Option<Action> {
    match mode {
        Mode::Normal => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Up | KeyCode::Char('k') => Some(Action::Move(0, -1)),
            KeyCode::Down | KeyCode::Char('j') => Some(Action::Move(0, 1)),
            KeyCode::Left | KeyCode::Char('h') => Some(Action::Move(-1, 0)),
            KeyCode::Right | KeyCode::Char('l') => Some(Action::Move(1, 0)),
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Action::Move(-1, 0)),
            KeyCode::Tab => Some(Action::Move(1, 0)),
            KeyCode::BackTab => Some(Action::Move(-1, 0)),

            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::Home if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::GotoFirst),
            KeyCode::End if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Action::GotoLast),
            KeyCode::Home | KeyCode::Char('0') | KeyCode::Char('^') => Some(Action::HomeCol),
            KeyCode::End | KeyCode::Char('$') => Some(Action::EndCol),
            KeyCode::Char('G') => Some(Action::GotoLast),
            // 'g' is handled specially in input.rs for gg sequence

            KeyCode::Enter | KeyCode::Char('i') => Some(Action::EnterEdit),
            KeyCode::Char(':') => Some(Action::EnterCommand),

            KeyCode::Char('H') => Some(Action::MoveColumn(Direction::Up)),
            KeyCode::Char('L') => Some(Action::MoveColumn(Direction::Down)),
            KeyCode::Char('K') => Some(Action::MoveRow(Direction::Up)),
            KeyCode::Char('J') => Some(Action::MoveRow(Direction::Down)),
            KeyCode::Char('+') | KeyCode::Char('>') => Some(Action::IncColWidth),
            KeyCode::Char('-') | KeyCode::Char('<') => Some(Action::DecColWidth),
            KeyCode::Char('o') => Some(Action::AddRow),
            KeyCode::Char('R') | KeyCode::F(5) => Some(Action::Refresh),
            KeyCode::Char('?') | KeyCode::F(1) => Some(Action::OpenHelp),
            _ => None,
        },

        Mode::Edit => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::CommitEdit),
            _ => None,
        },

        Mode::Command => match key.code {
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::ExecuteCommand),
            _ => None,
        },
    }
}

pub(crate) fn translate_emacs(mode: Mode, key: KeyEvent) -> Option<Action> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match mode {
        Mode::Normal => match key.code {
            // Cancel
            KeyCode::Char('g') if ctrl => Some(Action::Cancel),
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Char('q') if ctrl => Some(Action::Quit),

            // Reordering (before plain arrows so M-arrows win)
            KeyCode::Left if alt => Some(Action::MoveColumn(Direction::Up)),
            KeyCode::Right if alt => Some(Action::MoveColumn(Direction::Down)),
            KeyCode::Up if alt => Some(Action::MoveRow(Direction::Up)),
            KeyCode::Down if alt => Some(Action::MoveRow(Direction::Down)),

            // Movement
            KeyCode::Up => Some(Action::Move(0, -1)),
            KeyCode::Down => Some(Action::Move(0, 1)),
            KeyCode::Left => Some(Action::Move(-1, 0)),
            KeyCode::Right => Some(Action::Move(1, 0)),
            KeyCode::Char('p') if ctrl => Some(Action::Move(0, -1)),
            KeyCode::Char('n') if ctrl => Some(Action::Move(0, 1)),
            KeyCode::Char('b') if ctrl => Some(Action::Move(-1, 0)),
            KeyCode::Char('f') if ctrl => Some(Action::Move(1, 0)),
            KeyCode::PageUp => Some(Action::Page(-1)),
            KeyCode::PageDown => Some(Action::Page(1)),
            KeyCode::Char('v') if ctrl => Some(Action::Page(1)),
            KeyCode::Char('v') if alt => Some(Action::Page(-1)),

            // Tab navigation
            KeyCode::Tab if key.modifiers.contains(KeyModifiers::SHIFT) => Some(Action::Move(-1, 0)),
            KeyCode::Tab => Some(Action::Move(1, 0)),
            KeyCode::BackTab => Some(Action::Move(-1, 0)),

            // Home/End column
            KeyCode::Char('a') if ctrl => Some(Action::HomeCol),
            KeyCode::Char('e') if ctrl => Some(Action::EndCol),
            KeyCode::Home if ctrl => Some(Action::GotoFirst),
            KeyCode::End if ctrl => Some(Action::GotoLast),
            KeyCode::Home => Some(Action::HomeCol),
            KeyCode::End => Some(Action::EndCol),
            KeyCode::Char('<') if alt => Some(Action::GotoFirst),
            KeyCode::Char('>') if alt => Some(Action::GotoLast),

            // Edit
            KeyCode::Enter => Some(Action::EnterEdit),

            // Command prompt
            KeyCode::Char('x') if alt => Some(Action::EnterCommand),
            KeyCode::Char(':') => None, // strict

            // Grid structure
            KeyCode::Char('+') | KeyCode::Char('=') if alt => Some(Action::IncColWidth),
            KeyCode::Char('-') if alt => Some(Action::DecColWidth),
            KeyCode::Char('o') if ctrl => Some(Action::AddRow),
            KeyCode::F(5) => Some(Action::Refresh),
            KeyCode::F(1) => Some(Action::OpenHelp),

            _ => None,
        },

        Mode::Edit => match key.code {
            KeyCode::Char('g') if ctrl => Some(Action::Cancel),
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::CommitEdit),
            _ => None,
        },

        Mode::Command => match key.code {
            KeyCode::Char('g') if ctrl => Some(Action::Cancel),
            KeyCode::Esc => Some(Action::Cancel),
            KeyCode::Enter => Some(Action::ExecuteCommand),
            _ => None,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn key_with(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn vim_reorder_keys() {
        assert_eq!(
            translate_vim(Mode::Normal, key(KeyCode::Char('H'))),
            Some(Action::MoveColumn(Direction::Up))
        );
        assert_eq!(
            translate_vim(Mode::Normal, key(KeyCode::Char('J'))),
            Some(Action::MoveRow(Direction::Down))
        );
    }

    #[test]
    fn vim_edit_mode_only_binds_confirm_and_abort() {
        assert_eq!(translate_vim(Mode::Edit, key(KeyCode::Enter)), Some(Action::CommitEdit));
        assert_eq!(translate_vim(Mode::Edit, key(KeyCode::Esc)), Some(Action::Cancel));
        assert_eq!(translate_vim(Mode::Edit, key(KeyCode::Char('j'))), None);
    }

    #[test]
    fn emacs_is_strict_about_letters() {
        assert_eq!(translate_emacs(Mode::Normal, key(KeyCode::Char('j'))), None);
        assert_eq!(translate_emacs(Mode::Normal, key(KeyCode::Char(':'))), None);
        assert_eq!(
            translate_emacs(Mode::Normal, key_with(KeyCode::Char('n'), KeyModifiers::CONTROL)),
            Some(Action::Move(0, 1))
        );
    }

    #[test]
    fn emacs_alt_arrows_reorder() {
        assert_eq!(
            translate_emacs(Mode::Normal, key_with(KeyCode::Left, KeyModifiers::ALT)),
            Some(Action::MoveColumn(Direction::Up))
        );
        assert_eq!(
            translate_emacs(Mode::Normal, key(KeyCode::Left)),
            Some(Action::Move(-1, 0))
        );
    }
}
