//! Shared UI components (status bar, modal helpers).
//!
//! Contains small building blocks reused by the directory and detail screens.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState, Screen};
use crate::search::SortKey;

/// Render the bottom status bar with mode, counts and paging state.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Modal => "MODAL",
    };
    let screen = match app.screen {
        Screen::Directory => "directory",
        Screen::Detail(_) => "detail",
    };
    let d = &app.directory;
    let paging = if d.is_exhausted() {
        "all pages loaded".to_string()
    } else if d.is_loading() {
        format!("loading page {}", d.page_cursor())
    } else {
        format!("page {} ({} per page)", d.page_cursor(), d.page_size())
    };
    let sort = d
        .sort_key()
        .map(|k| format!("  sort:{}", k.label()))
        .unwrap_or_default();
    let msg = format!(
        "mode: {mode}  screen: {screen}  users:{}/{}  {paging}{sort}  ?: help",
        d.visible().len(),
        d.base().len(),
    );
    let p = Paragraph::new(msg).style(Style::default().fg(app.theme.status_fg).bg(app.theme.status_bg));
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Render a generic informational modal dialog.
pub fn render_info_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Info { message } = state {
        let max_w = area.width.saturating_sub(6).max(30);
        let min_w = 50u16.min(max_w);
        let approx_lines = (message.len() as u16 / (min_w.saturating_sub(4).max(10))).max(1);
        let max_h = area.height.saturating_sub(6).max(5);
        let height = (approx_lines + 4).min(max_h).max(5);
        let rect = centered_rect(min_w, height, area);
        let p = Paragraph::new(message.clone()).wrap(Wrap { trim: false }).block(
            Block::default()
                .title("Info")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Render the sort options sheet with checkboxes, submit button and validation message.
pub fn render_sort_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    let ModalState::SortMenu { selected, error } = state else {
        return;
    };
    let width = 48u16.min(area.width.saturating_sub(4)).max(36);
    let height = if error.is_some() { 11 } else { 8 };
    let rect = centered_rect(width, height, area);

    let marker = |idx: usize| if idx == *selected { "▶ " } else { "  " };
    let checkbox = |key: SortKey| if app.sort_options.is_active(key) { "[x]" } else { "[ ]" };

    let mut lines = vec![
        Line::from(Span::styled("Filter Options", Style::default().add_modifier(Modifier::BOLD))),
        Line::raw(""),
        Line::raw(format!("{}{} Sort by Name", marker(0), checkbox(SortKey::Name))),
        Line::raw(format!("{}{} Sort by Email", marker(1), checkbox(SortKey::Email))),
        Line::from(Span::styled(
            format!("{}[ Submit ]", marker(2)),
            Style::default().fg(app.theme.highlight_fg),
        )),
    ];
    if let Some(err) = error {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            err.title(),
            Style::default().fg(app.theme.error_fg).add_modifier(Modifier::BOLD),
        )));
        lines.push(Line::from(Span::styled(err.to_string(), Style::default().fg(app.theme.error_fg))));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Sort (Space: toggle, Enter: submit, Esc: close)")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal listing the active keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 70u16.min(area.width.saturating_sub(4)).max(40);
    let height = 22u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let section = |title: &'static str| Line::from(Span::styled(title, Style::default().add_modifier(Modifier::BOLD)));
    let row = |label: &str, action: KeyAction| {
        Line::from(vec![
            Span::raw(format!("  {label:<24} ")),
            Span::styled(
                app.keymap.keys_for(action).join(", "),
                Style::default().add_modifier(Modifier::ITALIC),
            ),
        ])
    };

    let lines: Vec<Line> = vec![
        section("Directory"),
        row("Move up / down", KeyAction::MoveUp),
        row("", KeyAction::MoveDown),
        row("Page up", KeyAction::PageUp),
        row("Page down", KeyAction::PageDown),
        row("Search by name", KeyAction::StartSearch),
        row("Clear search", KeyAction::ClearSearch),
        row("Sort options", KeyAction::OpenFilterMenu),
        row("Load more", KeyAction::LoadMore),
        row("Open details", KeyAction::EnterAction),
        Line::raw(""),
        section("Details"),
        row("Open address on map", KeyAction::OpenMap),
        row("Open website", KeyAction::OpenWebsite),
        row("Back", KeyAction::Back),
        Line::raw(""),
        section("General"),
        row("Help", KeyAction::OpenHelp),
        row("Quit", KeyAction::Quit),
        Line::raw(""),
        Line::from(vec![
            Span::raw("Close help: "),
            Span::styled("Esc / Enter", Style::default().add_modifier(Modifier::ITALIC)),
        ]),
    ];

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).scroll((scroll, 0)).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_rect_clamps_to_area() {
        let area = Rect { x: 0, y: 0, width: 20, height: 10 };
        let r = centered_rect(40, 4, area);
        assert_eq!(r, Rect { x: 0, y: 3, width: 20, height: 4 });
    }
}
