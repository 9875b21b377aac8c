use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::time::{Duration, Instant};
use tracing::{debug, info};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, ModalState, Screen};
use crate::search::SortKey;
use crate::source::{FetchOutcome, FetchWorker};
use crate::ui;

/// Whether the event loop should keep going.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut AppState,
    worker: &FetchWorker,
) -> Result<()> {
    loop {
        dispatch_requests(app, worker);
        while let Some(outcome) = worker.try_next() {
            app.on_fetch_complete(outcome);
        }
        app.tick(Instant::now());

        terminal.draw(|f| {
            ui::render(f, app);
        })?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(app, key, Instant::now()) == Flow::Quit
        {
            info!("quit requested");
            break;
        }
    }
    Ok(())
}

/// Hand queued page requests to the worker; a dead worker fails the fetch.
pub fn dispatch_requests(app: &mut AppState, worker: &FetchWorker) {
    for req in app.take_requests() {
        if let Err(e) = worker.submit(req) {
            app.on_fetch_complete(FetchOutcome {
                page: req.page,
                result: Err(e),
            });
        }
    }
}

pub fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) -> Flow {
    match app.input_mode {
        InputMode::Search => {
            // chords still reach their bindings, e.g. Ctrl+c quits mid-query
            if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
                && app.keymap.resolve(&key) == Some(KeyAction::Quit)
            {
                return Flow::Quit;
            }
            handle_search_key(app, key);
            Flow::Continue
        }
        InputMode::Modal => {
            handle_modal_key(app, key.code);
            Flow::Continue
        }
        InputMode::Normal => {
            let Some(action) = app.keymap.resolve(&key) else {
                return Flow::Continue;
            };
            if matches!(app.screen, Screen::Detail(_)) {
                handle_detail_action(app, action)
            } else {
                handle_directory_action(app, action, now)
            }
        }
    }
}

fn handle_directory_action(app: &mut AppState, action: KeyAction, now: Instant) -> Flow {
    let page = app.rows_per_page.max(1) as isize;
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenFilterMenu => app.open_modal(ModalState::SortMenu {
            selected: 0,
            error: None,
        }),
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::StartSearch => app.input_mode = InputMode::Search,
        KeyAction::ClearSearch => app.set_search(String::new()),
        KeyAction::EnterAction => app.open_detail(now),
        KeyAction::MoveUp => app.move_selection(-1),
        KeyAction::MoveDown => {
            app.move_selection(1);
            app.load_more_if_near_end();
        }
        KeyAction::PageUp => app.move_selection(-page),
        KeyAction::PageDown => {
            app.move_selection(page);
            app.load_more_if_near_end();
        }
        KeyAction::LoadMore => app.load_more(),
        KeyAction::Back | KeyAction::OpenMap | KeyAction::OpenWebsite | KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_detail_action(app: &mut AppState, action: KeyAction) -> Flow {
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::Back => app.close_detail(),
        KeyAction::OpenMap => app.open_map(),
        KeyAction::OpenWebsite => app.open_website(),
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        _ => {}
    }
    Flow::Continue
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.input_mode = InputMode::Normal,
        KeyCode::Esc => {
            app.set_search(String::new());
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Backspace => {
            let mut q = app.search_input.clone();
            q.pop();
            app.set_search(q);
        }
        KeyCode::Char(c) if !key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            let mut q = app.search_input.clone();
            q.push(c);
            app.set_search(q);
        }
        _ => {}
    }
}

const SORT_MENU_ITEMS: usize = 3;

fn handle_modal_key(app: &mut AppState, code: KeyCode) {
    let Some(state) = app.modal.clone() else {
        app.input_mode = InputMode::Normal;
        return;
    };
    match state {
        ModalState::SortMenu { selected, error } => match code {
            KeyCode::Esc => app.close_modal(),
            KeyCode::Up | KeyCode::Char('k') => {
                app.modal = Some(ModalState::SortMenu {
                    selected: selected.saturating_sub(1),
                    error,
                });
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.modal = Some(ModalState::SortMenu {
                    selected: (selected + 1).min(SORT_MENU_ITEMS - 1),
                    error,
                });
            }
            KeyCode::Char(' ') | KeyCode::Enter => match selected {
                0 | 1 => {
                    let key = if selected == 0 { SortKey::Name } else { SortKey::Email };
                    app.sort_options.toggle(key);
                    debug!(key = key.label(), badge = app.sort_options.badge_count(), "sort option toggled");
                    app.modal = Some(ModalState::SortMenu { selected, error: None });
                }
                _ => app.commit_sort(),
            },
            _ => {}
        },
        ModalState::Help { scroll } => match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => app.close_modal(),
            KeyCode::Up | KeyCode::Char('k') => {
                app.modal = Some(ModalState::Help {
                    scroll: scroll.saturating_sub(1),
                });
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.modal = Some(ModalState::Help {
                    scroll: scroll.saturating_add(1),
                });
            }
            _ => {}
        },
        ModalState::Info { .. } => app.close_modal(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppSettings;
    use crate::error::ValidationError;

    fn press(app: &mut AppState, code: KeyCode) -> Flow {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE), Instant::now())
    }

    #[test]
    fn sort_menu_rejects_double_selection_inside_modal() {
        let mut app = AppState::new(AppSettings::default());
        press(&mut app, KeyCode::Char('f'));
        assert_eq!(app.input_mode, InputMode::Modal);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(
            app.modal,
            Some(ModalState::SortMenu {
                selected: 2,
                error: Some(ValidationError::MultipleSelected)
            })
        );
        assert_eq!(app.sort_options.badge_count(), 2);
        assert_eq!(app.directory.sort_key(), None);
    }

    #[test]
    fn search_mode_filters_live_and_escape_clears() {
        let mut app = AppState::new(AppSettings::default());
        press(&mut app, KeyCode::Char('/'));
        assert_eq!(app.input_mode, InputMode::Search);
        press(&mut app, KeyCode::Char('q'));
        assert_eq!(app.search_input, "q");
        assert_eq!(app.directory.search_query(), "q");
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.directory.search_query(), "");
    }

    #[test]
    fn ctrl_c_in_search_quits_instead_of_typing() {
        let mut app = AppState::new(AppSettings::default());
        press(&mut app, KeyCode::Char('/'));
        press(&mut app, KeyCode::Char('L'));
        let flow = handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Instant::now(),
        );
        assert_eq!(flow, Flow::Quit);
        assert_eq!(app.search_input, "L");

        let flow = handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('a'), KeyModifiers::ALT),
            Instant::now(),
        );
        assert_eq!(flow, Flow::Continue);
        assert_eq!(app.search_input, "L");

        let flow = handle_key(
            &mut app,
            KeyEvent::new(KeyCode::Char('E'), KeyModifiers::SHIFT),
            Instant::now(),
        );
        assert_eq!(flow, Flow::Continue);
        assert_eq!(app.search_input, "LE");
    }

    #[test]
    fn quit_from_normal_mode() {
        let mut app = AppState::new(AppSettings::default());
        assert_eq!(press(&mut app, KeyCode::Char('q')), Flow::Quit);
    }
}
