//! Help text content for the help modal

use super::keymap::Keymap;

fn lines(text: &[&str]) -> Vec<String> {
    text.iter().map(|s| s.to_string()).collect()
}

/// Get keybinding help text for the current keymap
pub fn get_help_text(keymap: &Keymap) -> Vec<String> {
    match keymap {
        Keymap::Vim => lines(&[
            "Keys",
            "",
            "Navigation:",
            "  h/j/k/l      Move left/down/up/right",
            "  Arrow keys   Move cursor",
            "  PageUp/Down  Scroll by page",
            "  0/$          First/last column",
            "  gg / G       First cell / last row",
            "",
            "Editing:",
            "  i / Enter    Edit cell",
            "  Enter        Save (while editing)",
            "  Esc          Discard edit",
            "",
            "Structure:",
            "  H / L        Move column left/right",
            "  K / J        Move row up/down",
            "  + / -        Widen/narrow column by 10 px",
            "  o            Add row",
            "  Drag header  Resize column",
            "",
            "Other:",
            "  :            Enter command mode",
            "  R / F5       Refresh from backend",
            "  ? / F1       This help",
        ]),
        Keymap::Emacs => lines(&[
            "Keys",
            "",
            "Navigation:",
            "  C-n/C-p      Move down/up",
            "  C-f/C-b      Move right/left",
            "  Arrow keys   Move cursor",
            "  C-v/M-v      Page down/up",
            "  C-a/C-e      First/last column",
            "  M-< / M->    First cell / last row",
            "",
            "Editing:",
            "  Enter        Edit cell / save",
            "  C-g / Esc    Discard edit",
            "",
            "Structure:",
            "  M-Left/Right Move column",
            "  M-Up/Down    Move row",
            "  M-+ / M--    Widen/narrow column by 10 px",
            "  C-o          Add row",
            "  Drag header  Resize column",
            "",
            "Other:",
            "  M-x          Enter command mode",
            "  F5           Refresh from backend",
            "  F1           This help",
            "  C-q          Quit",
        ]),
    }
}

/// Get command help text
pub fn get_commands_help() -> Vec<String> {
    lines(&[
        "Commands",
        "",
        "Columns:",
        "  :addcol [text|currency] <name>  Add column at the end",
        "  :rename <name>                  Rename current column",
        "  :retype text|currency           Change column type",
        "  :width <px>                     Set column width (min 100)",
        "  :delcol                         Delete current column",
        "",
        "Rows:",
        "  :addrow                         Add row at the end",
        "  :delrow                         Delete current row",
        "",
        "Other:",
        "  :refresh                        Reload columns and rows",
        "  :export <file.md>               Write the grid as markdown",
        "  :help                           This help",
        "  :q                              Quit",
        "",
        "Press Esc or q to close",
    ])
}

pub fn get_about_help() -> Vec<String> {
    lines(&[
        "About",
        "",
        "  Shared year plan grid. Every change is sent to the backend and",
        "  shown once the backend has confirmed it.",
        "  Currency cells are edited raw (1250,50) and shown formatted.",
    ])
}
