use yearplan_model::Direction;

/// Available keybinding schemes.
///
/// - [`Vim`](Keymap::Vim): hjkl navigation, `:` commands, modal editing
/// - [`Emacs`](Keymap::Emacs): C-n/p/f/b navigation, M-x commands, C-g cancel
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Keymap {
    Vim,
    Emacs,
}

impl Keymap {
    /// Look up a built-in keymap by name, ignoring case.
    pub fn from_name(name: &str) -> Option<Keymap> {
        match name.trim().to_ascii_lowercase().as_str() {
            "vim" => Some(Keymap::Vim),
            "emacs" => Some(Keymap::Emacs),
            _ => None,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Keymap::Vim => "vim",
            Keymap::Emacs => "emacs",
        }
    }

    pub fn status_hint(&self) -> String {
        match self {
            Keymap::Vim => {
                "hjkl:move  i:edit  H/L:move col  K/J:move row  +/-:width  o:add row  R:refresh  ?:help  :q:quit".to_string()
            }
            Keymap::Emacs => {
                "C-n/p/f/b:move  Enter:edit  M-arrows:move col/row  M-+/M--:width  C-o:add row  M-x:cmd  C-g:cancel  C-q:quit".to_string()
            }
        }
    }
}

/// Actions that can be triggered by key presses.
///
/// Actions decouple key handling from application logic. The keymap translates
/// key events into actions, which are then applied to the application state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Action {
    /// Cancel current operation and return to Normal mode.
    Cancel,
    /// Start editing the cell under the cursor.
    EnterEdit,
    /// Save the current edit.
    CommitEdit,
    /// Enter Command mode (`:` prompt).
    EnterCommand,
    /// Execute the command in the command buffer.
    ExecuteCommand,

    /// Move cursor by (dx, dy).
    Move(i32, i32),
    /// Page up (-1) or down (+1).
    Page(i32),
    HomeCol,
    EndCol,
    GotoFirst,
    GotoLast,

    /// Swap the current column with its left (up) or right (down) neighbor.
    MoveColumn(Direction),
    /// Swap the current row with the one above (up) or below (down).
    MoveRow(Direction),
    IncColWidth,
    DecColWidth,
    AddRow,
    Refresh,
    OpenHelp,
    Quit,
}
