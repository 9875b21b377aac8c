//! user-directory binary entry point.
//!
//! Parses the command line, starts the fetch worker, initializes the
//! terminal in raw mode, runs the TUI event loop, and restores the terminal
//! state on exit.
//!
use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;

use user_directory::app::config::Cli;
use user_directory::app::keymap::Keymap;
use user_directory::app::{self, AppSettings, AppState, Theme};
use user_directory::error::{Context, Result};
use user_directory::logging::init_logging;
use user_directory::source::{FetchWorker, HttpUserSource};

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> std::io::Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_file.as_deref());

    let source = HttpUserSource::new(cli.source_config())?;
    info!(endpoint = %source.endpoint(), page_size = cli.page_size, "starting");
    let worker = FetchWorker::spawn(source).with_ctx(|| "spawn fetch worker".to_string())?;

    let settings = AppSettings {
        page_size: cli.page_size,
        detail_delay: cli.detail_delay(),
        map_host: cli.map_host.clone(),
        theme: Theme::load_or_init(&cli.theme_path()),
        keymap: Keymap::load_or_init(&cli.keybinds_path()),
    };
    let mut state = AppState::new(settings);

    let mut terminal = init_terminal().with_ctx(|| "init terminal".to_string())?;

    let res = app::run(&mut terminal, &mut state, &worker);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        eprintln!("application error: {err:#}");
    }
    Ok(())
}
