use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::app::AppState;
use crate::app::detail::DetailView;

pub fn render_header(f: &mut Frame, area: Rect, app: &AppState, view: &DetailView) {
    // the title only appears once the loading delay is over
    let title = if view.is_ready() { view.title() } else { "" };
    let p = Paragraph::new(Line::from(vec![
        Span::styled(title.to_string(), Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)),
        Span::styled("   Esc: back", Style::default().fg(app.theme.muted)),
    ]))
    .block(
        Block::default()
            .title("user-directory")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(Style::default().fg(app.theme.header_fg).bg(app.theme.header_bg));
    f.render_widget(p, area);
}

pub fn render_detail(f: &mut Frame, area: Rect, app: &AppState, view: &DetailView) {
    let block = Block::default()
        .title("Details")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border));

    if !view.is_ready() {
        let inner = block.inner(area);
        f.render_widget(block, area);
        let line = Rect {
            x: inner.x,
            y: inner.y + inner.height / 2,
            width: inner.width,
            height: 1.min(inner.height),
        };
        let p = Paragraph::new("Loading…")
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.highlight_fg));
        f.render_widget(p, line);
        return;
    }

    let label = Style::default().add_modifier(Modifier::BOLD).fg(app.theme.text);
    let value = Style::default().fg(app.theme.text);
    let link = Style::default().fg(app.theme.link_fg).add_modifier(Modifier::UNDERLINED);
    let muted = Style::default().fg(app.theme.muted);

    let username = view.user().map(|u| u.username.clone()).unwrap_or_default();
    let map_link = view.resolve_map_link();
    let website_link = view.resolve_website_link();

    let mut lines: Vec<Line> = vec![
        Line::from(Span::styled(username, Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD)))
            .alignment(Alignment::Center),
        Line::raw(""),
    ];
    for (name, text) in view.fields() {
        let style = match name {
            "Website" if website_link.is_some() => link,
            "Address" if map_link.is_some() => link,
            _ => value,
        };
        lines.push(Line::from(vec![Span::styled(format!("{name}: "), label), Span::styled(text, style)]));
    }

    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Company Details",
        Style::default().fg(app.theme.title).add_modifier(Modifier::BOLD),
    )));
    for (name, text) in view.company_fields() {
        lines.push(Line::from(vec![Span::styled(format!("{name}: "), label), Span::styled(text, value)]));
    }

    lines.push(Line::raw(""));
    lines.push(action_hint("m", "open address on map", map_link.is_some(), app));
    lines.push(action_hint("w", "open website", website_link.is_some(), app));
    if map_link.is_none() {
        lines.push(Line::from(Span::styled("(no coordinates for this address)", muted)));
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(p, area);
}

fn action_hint<'a>(key: &'a str, label: &'a str, enabled: bool, app: &AppState) -> Line<'a> {
    let style = if enabled {
        Style::default().fg(app.theme.highlight_fg)
    } else {
        Style::default().fg(app.theme.muted).add_modifier(Modifier::CROSSED_OUT)
    };
    Line::from(vec![Span::styled(format!("[{key}] "), style), Span::styled(label, style)])
}
