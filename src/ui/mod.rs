pub mod components;
pub mod detail;
pub mod directory;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::{AppState, ModalState, Screen};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(5), Constraint::Length(1)].as_ref())
        .split(f.area());

    if let Screen::Detail(view) = &app.screen {
        detail::render_header(f, root[0], app, view);
        detail::render_detail(f, root[1], app, view);
    } else {
        directory::render_header(f, root[0], app);
        directory::render_users_list(f, root[1], app);
    }

    components::render_status_bar(f, root[2], app);

    if app.modal.is_some() {
        render_modal(f, f.area(), app);
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(state) = app.modal.as_ref() else {
        return;
    };
    match state {
        ModalState::SortMenu { .. } => components::render_sort_modal(f, area, app, state),
        ModalState::Help { scroll } => components::render_help_modal(f, area, app, *scroll),
        ModalState::Info { .. } => components::render_info_modal(f, area, app, state),
    }
}
