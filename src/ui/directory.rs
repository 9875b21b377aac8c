use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::directory::LoadingIndicator;
use crate::app::{AppState, InputMode};

/// Title bar with the search prompt and the sort badge.
pub fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let mut spans = vec![Span::styled(
        "User Directory",
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    )];

    let query = app.search_input.as_str();
    match (app.input_mode, query.is_empty()) {
        (InputMode::Search, _) => {
            spans.push(Span::raw("   Search by name: "));
            spans.push(Span::styled(format!("{query}▏"), Style::default().fg(app.theme.highlight_fg)));
        }
        (_, false) => {
            spans.push(Span::raw("   Search: "));
            spans.push(Span::styled(query.to_string(), Style::default().fg(app.theme.text)));
            spans.push(Span::styled("  (x: clear)", Style::default().fg(app.theme.muted)));
        }
        (_, true) => {
            spans.push(Span::styled("   /: search by name", Style::default().fg(app.theme.muted)));
        }
    }

    spans.push(Span::raw("   f: sort"));
    let badge = app.sort_options.badge_count();
    if badge > 0 {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!(" {badge} "),
            Style::default()
                .fg(app.theme.badge_fg)
                .bg(app.theme.badge_bg)
                .add_modifier(Modifier::BOLD),
        ));
    }

    let p = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .title("user-directory")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

/// The user list, with the error line above it and the loading footer below.
pub fn render_users_list(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if app.directory.loading_indicator() == LoadingIndicator::FullScreen {
        let block = block.title("Users");
        let inner = block.inner(area);
        f.render_widget(block, area);
        let y = inner.y + inner.height / 2;
        let line = Rect { x: inner.x, y, width: inner.width, height: 1.min(inner.height) };
        let p = Paragraph::new("Loading users…")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.highlight_fg));
        f.render_widget(p, line);
        return;
    }

    let error_rows = u16::from(app.directory.error().is_some());
    let parts = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(error_rows), Constraint::Min(3)].as_ref())
        .split(area);

    if let Some(err) = app.directory.error() {
        let p = Paragraph::new(err.to_string())
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.error_fg));
        f.render_widget(p, parts[0]);
    }

    let table_area = parts[1];
    let footer = app.directory.loading_indicator() == LoadingIndicator::Footer;
    // borders + header row, and one row for the footer when it shows
    let body_height = table_area.height.saturating_sub(3 + u16::from(footer)) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let visible = app.directory.visible();
    let start = (app.selected_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(visible.len());
    let slice = visible.get(start..end).unwrap_or(&[]);

    let mut rows: Vec<Row> = slice
        .iter()
        .enumerate()
        .map(|(i, u)| {
            let style = if start + i == app.selected_index {
                Style::default()
                    .fg(app.theme.highlight_fg)
                    .bg(app.theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(app.theme.text)
            };
            Row::new(vec![Cell::from(u.name.clone()), Cell::from(u.email.clone())]).style(style)
        })
        .collect();

    if footer {
        rows.push(Row::new(vec![Cell::from("Loading more…")]).style(Style::default().fg(app.theme.muted)));
    } else if visible.is_empty() {
        let msg = if app.directory.search_query().is_empty() {
            "No users loaded"
        } else {
            "No users match the search"
        };
        rows.push(Row::new(vec![Cell::from(msg)]).style(Style::default().fg(app.theme.muted)));
    }

    let widths = [Constraint::Percentage(45), Constraint::Percentage(55)];
    let header = Row::new(vec!["NAME", "EMAIL"])
        .style(Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD));
    let title = match app.directory.sort_key() {
        Some(key) => format!("Users ({} of {}, sorted by {})", visible.len(), app.directory.base().len(), key.label()),
        None => format!("Users ({} of {})", visible.len(), app.directory.base().len()),
    };

    let table = Table::new(rows, widths)
        .header(header)
        .block(block.title(title))
        .column_spacing(2);
    f.render_widget(table, table_area);
}
