//! UI rendering

use super::app::{App, Mode};
use super::help::{get_about_help, get_commands_help, get_help_text};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
};

pub(crate) const FORMULA_BAR_HEIGHT: u16 = 3;
pub(crate) const GRID_MIN_HEIGHT: u16 = 10;
pub(crate) const STATUS_BAR_HEIGHT: u16 = 1;
pub(crate) const ROW_HEADER_WIDTH: u16 = 4;
pub(crate) const GRID_COLUMN_SPACING: u16 = 1;

pub(crate) fn split_main_chunks(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(FORMULA_BAR_HEIGHT),
            Constraint::Min(GRID_MIN_HEIGHT),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Inner rectangle of the bordered grid, or `None` if too small to hold a body row.
fn grid_inner(grid_area: Rect) -> Option<Rect> {
    if grid_area.width < 3 || grid_area.height < 4 {
        return None;
    }
    Some(Rect::new(
        grid_area.x + 1,
        grid_area.y + 1,
        grid_area.width - 2,
        grid_area.height - 2,
    ))
}

/// Horizontal extent `[start, end)` of each visible data column.
fn column_spans(app: &App, inner: Rect) -> Vec<(usize, u16, u16)> {
    let inner_right = inner.x.saturating_add(inner.width);
    let mut spans = Vec::new();
    let mut x = inner
        .x
        .saturating_add(ROW_HEADER_WIDTH)
        .saturating_add(GRID_COLUMN_SPACING);

    for offset in 0..app.visible_cols {
        let col = app.viewport_col + offset;
        if col >= app.plan.columns().len() || x >= inner_right {
            break;
        }
        let end = x.saturating_add(app.column_cells(col)).min(inner_right);
        spans.push((col, x, end));
        x = end.saturating_add(GRID_COLUMN_SPACING);
    }
    spans
}

fn contains(inner: Rect, x: u16, y: u16) -> bool {
    x >= inner.x
        && x < inner.x.saturating_add(inner.width)
        && y >= inner.y
        && y < inner.y.saturating_add(inner.height)
}

/// Map a mouse position to a `(column, row)` body cell.
pub(crate) fn grid_cell_at(
    app: &App,
    grid_area: Rect,
    mouse_col: u16,
    mouse_row: u16,
) -> Option<(usize, usize)> {
    let inner = grid_inner(grid_area)?;
    if !contains(inner, mouse_col, mouse_row) {
        return None;
    }

    // Header row contains column names, not data cells.
    if mouse_row == inner.y {
        return None;
    }

    let rel_row = (mouse_row - inner.y - 1) as usize;
    if rel_row >= app.visible_rows {
        return None;
    }
    let row = app.viewport_row.saturating_add(rel_row);
    if row >= app.plan.rows().len() {
        return None;
    }

    column_spans(app, inner)
        .into_iter()
        .find(|(_, start, end)| mouse_col >= *start && mouse_col < *end)
        .map(|(col, _, _)| (col, row))
}

/// Map a mouse position in the header row to the column whose right edge it
/// grabs: the column's last cell or the gap right after it.
pub(crate) fn column_edge_at(
    app: &App,
    grid_area: Rect,
    mouse_col: u16,
    mouse_row: u16,
) -> Option<usize> {
    let inner = grid_inner(grid_area)?;
    if !contains(inner, mouse_col, mouse_row) || mouse_row != inner.y {
        return None;
    }
    column_spans(app, inner)
        .into_iter()
        .find(|(_, _, end)| {
            let last = end.saturating_sub(1);
            mouse_col >= last && mouse_col < end.saturating_add(GRID_COLUMN_SPACING)
        })
        .map(|(col, _, _)| col)
}

/// Draw the application UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let chunks = split_main_chunks(f.area());

    // Update visible dimensions based on actual size
    let grid_area = chunks[1];
    app.grid_width = grid_area
        .width
        .saturating_sub(ROW_HEADER_WIDTH + GRID_COLUMN_SPACING + 2);
    app.visible_rows = (grid_area.height.saturating_sub(3) as usize).max(1); // header + borders
    app.update_viewport();

    draw_formula_bar(f, app, chunks[0]);
    draw_grid(f, app, chunks[1]);
    draw_status_bar(f, app, chunks[2]);

    if app.help_modal {
        draw_help_modal(f, app);
    }
}

fn draw_formula_bar(f: &mut Frame, app: &App, area: Rect) {
    let column = app.plan.columns().at(app.cursor_col);
    let row = app.plan.rows().at(app.cursor_row);
    let cell_name = match column {
        Some(col) => format!("{} · row {}", col.name, app.cursor_row + 1),
        None => "(no columns)".to_string(),
    };

    let content = match app.mode {
        Mode::Edit => {
            let draft = app.plan.session().draft().unwrap_or("");
            let cursor = app.edit_cursor.min(draft.len());
            let (before, after) = draft.split_at(cursor);
            format!("{}: {}│{}", cell_name, before, after)
        }
        Mode::Command => {
            let (before, after) = app.command_buffer.split_at(app.command_cursor);
            format!(":{}│{}", before, after)
        }
        Mode::Normal => match (row, column) {
            (Some(row), Some(col)) => {
                let raw = row.value(&col.id);
                if raw.is_empty() {
                    format!("{}: (empty)", cell_name)
                } else {
                    format!("{}: {}", cell_name, raw)
                }
            }
            _ => cell_name,
        },
    };

    let title = match app.mode {
        Mode::Edit if app.plan.session().is_pending() => " Saving ",
        Mode::Edit => " Edit ",
        Mode::Command => " Command ",
        Mode::Normal => " Cell ",
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .border_style(Style::default().fg(match app.mode {
            Mode::Edit => Color::Yellow,
            Mode::Command => Color::Cyan,
            Mode::Normal => Color::White,
        }));

    let paragraph = Paragraph::new(content).block(block);
    f.render_widget(paragraph, area);
}

fn draw_grid(f: &mut Frame, app: &App, area: Rect) {
    let columns = app.plan.columns();
    let visible: Vec<_> = (app.viewport_col..app.viewport_col + app.visible_cols)
        .filter_map(|i| columns.at(i).map(|c| (i, c)))
        .collect();
    let resizing = app.plan.resize().active().map(|s| &s.column);

    // Build header row
    let mut header_cells = vec![Cell::from(" ")]; // Corner
    for (col, column) in &visible {
        let style = if Some(&column.id) == resizing {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else if *col == app.cursor_col {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        header_cells.push(Cell::from(column.name.clone()).style(style));
    }
    let header = Row::new(header_cells).height(1);

    // Build data rows
    let mut rows = Vec::new();
    for row in app.viewport_row..app.viewport_row + app.visible_rows {
        let Some(record) = app.plan.rows().at(row) else {
            break;
        };

        let row_style = if row == app.cursor_row {
            Style::default()
                .fg(Color::Black)
                .bg(Color::White)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let mut cells = vec![Cell::from(format!("{}", row + 1)).style(row_style)];

        for (col, column) in &visible {
            let display = app.plan.display_value(&record.id, &column.id);
            let editing = app.plan.session().is_editing_cell(&record.id, &column.id);
            let is_cursor = row == app.cursor_row && *col == app.cursor_col;

            let style = if editing {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else if is_cursor {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };

            // Formatted amounts line up on the right; drafts stay raw and left.
            let line = if column.is_currency() && !editing {
                Line::from(display).alignment(Alignment::Right)
            } else {
                Line::from(display)
            };
            cells.push(Cell::from(line).style(style));
        }

        rows.push(Row::new(cells));
    }

    let mut widths = vec![Constraint::Length(ROW_HEADER_WIDTH)]; // Row header
    for (col, _) in &visible {
        widths.push(Constraint::Length(app.column_cells(*col)));
    }

    let title = if columns.is_empty() {
        " Year plan (no columns: :addcol <name>) ".to_string()
    } else {
        format!(" Year plan ({} rows) ", app.plan.rows().len())
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(GRID_COLUMN_SPACING);

    f.render_widget(table, area);
}

fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

fn draw_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let in_flight = app.plan.in_flight();
    let activity = if in_flight > 0 {
        let labels: Vec<_> = app.plan.in_flight_labels().collect();
        format!("  |  busy: {}", labels.join(", "))
    } else {
        String::new()
    };

    let (status, style) = match &app.status {
        Some(notice) if notice.is_failure() || notice.message.starts_with("Error") => (
            format!("{}{}", notice, activity),
            Style::default().fg(Color::Red),
        ),
        Some(notice) => (
            format!("{}{}", notice, activity),
            Style::default().fg(Color::Yellow),
        ),
        None => (
            format!(
                "{} columns, {} rows{}  |  [{}]  |  {}",
                app.plan.columns().len(),
                app.plan.rows().len(),
                activity,
                app.keymap.name(),
                app.keymap.status_hint()
            ),
            Style::default().fg(Color::DarkGray),
        ),
    };

    let paragraph = Paragraph::new(Line::from(vec![Span::styled(status, style)]));
    f.render_widget(paragraph, area);
}

fn section_style(text: &str, title: &str) -> Style {
    if text == title {
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD)
    } else if text.starts_with("  ") {
        Style::default().fg(Color::White)
    } else {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }
}

fn draw_help_modal(f: &mut Frame, app: &mut App) {
    let area = centered_rect(88, 88, f.area());

    let modal_style = Style::default().fg(Color::White).bg(Color::Black);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Year plan help ")
        .border_style(Style::default().fg(Color::Green))
        .style(modal_style);

    let mut lines: Vec<Line> = Vec::new();
    for text in get_about_help() {
        let style = section_style(&text, "About");
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::from(""));
    for text in get_help_text(&app.keymap) {
        let style = section_style(&text, "Keys");
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::from(""));
    for text in get_commands_help() {
        let style = section_style(&text, "Commands");
        lines.push(Line::from(Span::styled(text, style)));
    }

    let viewport_height = area.height.saturating_sub(2) as usize;
    let max_scroll = lines.len().saturating_sub(viewport_height);
    app.help_scroll = app.help_scroll.min(max_scroll);
    let scroll_y = u16::try_from(app.help_scroll).unwrap_or(u16::MAX);

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(modal_style)
        .scroll((scroll_y, 0))
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, area);
    f.render_widget(paragraph, area);
}
