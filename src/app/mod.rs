//! Application state types and entry glue.
//!
//! Defines the enums and structs that model the TUI state, the theme, and
//! the state transitions triggered by fetch completions and timers. Key
//! handling and the event loop live in [`update`] (re-exported as `run`).
//!
pub mod config;
pub mod detail;
pub mod directory;
pub mod keymap;
pub mod sort_options;
pub mod update;

use ratatui::style::Color;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

use crate::model::DEFAULT_MAP_HOST;
use crate::source::{DEFAULT_PAGE_SIZE, FetchOutcome, PageRequest};
use crate::sys::{SystemOpener, UrlOpener};

use detail::{DEFAULT_DETAIL_DELAY, DetailView};
use directory::{DirectoryController, is_near_end};
use keymap::Keymap;
use sort_options::SortOptions;

pub use config::config_file_read_path;

/// Which screen is showing.
#[derive(Clone, Debug)]
pub enum Screen {
    Directory,
    Detail(DetailView),
}

/// Current input mode for key handling.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Modal,
}

/// Color palette for theming the TUI.
#[derive(Clone, Copy, Debug)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_bg: Color,
    pub header_fg: Color,
    pub status_bg: Color,
    pub status_fg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub badge_fg: Color,
    pub badge_bg: Color,
    pub error_fg: Color,
    pub link_fg: Color,
}

impl Theme {
    /// Catppuccin Mocha theme defaults.
    pub fn mocha() -> Self {
        // Palette reference: https://github.com/catppuccin/catppuccin
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),         // text
            muted: Color::Rgb(0x7f, 0x84, 0x9c),        // overlay1
            title: Color::Rgb(0xcb, 0xa6, 0xf7),        // mauve
            border: Color::Rgb(0x58, 0x5b, 0x70),       // surface2
            header_bg: Color::Rgb(0x31, 0x32, 0x44),    // surface0
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),    // lavender
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),    // surface1
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),    // text
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf), // yellow
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a), // surface1
            badge_fg: Color::Rgb(0x1e, 0x1e, 0x2e),     // base
            badge_bg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
            error_fg: Color::Rgb(0xf3, 0x8b, 0xa8),     // red
            link_fg: Color::Rgb(0x89, 0xb4, 0xfa),      // blue
        }
    }

    /// Catppuccin Latte, the light counterpart of `mocha`.
    pub fn latte() -> Self {
        Self {
            text: Color::Rgb(0x4c, 0x4f, 0x69),         // text
            muted: Color::Rgb(0x8c, 0x8f, 0xa1),        // overlay1
            title: Color::Rgb(0x88, 0x39, 0xef),        // mauve
            border: Color::Rgb(0xac, 0xb0, 0xbe),       // surface2
            header_bg: Color::Rgb(0xcc, 0xd0, 0xda),    // surface0
            header_fg: Color::Rgb(0x72, 0x87, 0xfd),    // lavender
            status_bg: Color::Rgb(0xbc, 0xc0, 0xcc),    // surface1
            status_fg: Color::Rgb(0x4c, 0x4f, 0x69),    // text
            highlight_fg: Color::Rgb(0xdf, 0x8e, 0x1d), // yellow
            highlight_bg: Color::Rgb(0xbc, 0xc0, 0xcc), // surface1
            badge_fg: Color::Rgb(0xef, 0xf1, 0xf5),     // base
            badge_bg: Color::Rgb(0xd2, 0x0f, 0x39),     // red
            error_fg: Color::Rgb(0xd2, 0x0f, 0x39),     // red
            link_fg: Color::Rgb(0x1e, 0x66, 0xf5),      // blue
        }
    }

    /// Named palette: "mocha" (dark) or "latte" (light).
    pub fn preset(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "mocha" | "dark" => Some(Self::mocha()),
            "latte" | "light" => Some(Self::latte()),
            _ => None,
        }
    }

    /// Load theme from a simple key=value file.
    ///
    /// A `preset` line picks the base palette (default `mocha`); colour keys
    /// override it wherever they appear in the file.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let base = contents
            .lines()
            .filter_map(|l| l.trim().strip_prefix("preset"))
            .filter_map(|rest| rest.trim_start().strip_prefix('='))
            .find_map(Self::preset);
        let mut theme = base.unwrap_or_else(Self::mocha);

        for raw_line in contents.lines() {
            let line = raw_line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let key = parts.next().map(|s| s.trim()).unwrap_or("");
            let val = parts.next().map(|s| s.trim()).unwrap_or("");
            if key.is_empty() || val.is_empty() {
                continue;
            }
            if let Some(color) = Self::parse_color(val) {
                match key {
                    "text" => theme.text = color,
                    "muted" => theme.muted = color,
                    "title" => theme.title = color,
                    "border" => theme.border = color,
                    "header_bg" => theme.header_bg = color,
                    "header_fg" => theme.header_fg = color,
                    "status_bg" => theme.status_bg = color,
                    "status_fg" => theme.status_fg = color,
                    "highlight_fg" => theme.highlight_fg = color,
                    "highlight_bg" => theme.highlight_bg = color,
                    "badge_fg" => theme.badge_fg = color,
                    "badge_bg" => theme.badge_bg = color,
                    "error_fg" => theme.error_fg = color,
                    "link_fg" => theme.link_fg = color,
                    _ => {}
                }
            }
        }

        Some(theme)
    }

    /// Parse a color from hex ("#RRGGBB" or "RRGGBB") or the special name "reset".
    fn parse_color(s: &str) -> Option<Color> {
        let lower = s.trim().to_ascii_lowercase();
        if lower == "reset" {
            return Some(Color::Reset);
        }
        let hex = lower.strip_prefix('#').unwrap_or(lower.as_str());
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Persist the theme to a config file in key=value format.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-directory theme configuration\n");
        buf.push_str("# Colors: hex as #RRGGBB or RRGGBB, or 'reset'\n");
        buf.push_str("# Base palette for unlisted keys: preset = mocha | latte\n\n");

        fn color_to_str(c: Color) -> String {
            match c {
                Color::Rgb(r, g, b) => format!("#{:02X}{:02X}{:02X}", r, g, b),
                Color::Reset => "reset".to_string(),
                // named colors get a best-effort hex approximation
                Color::Black => "#000000".to_string(),
                Color::Red => "#FF0000".to_string(),
                Color::Green => "#00FF00".to_string(),
                Color::Yellow => "#FFFF00".to_string(),
                Color::Blue => "#0000FF".to_string(),
                Color::Magenta => "#FF00FF".to_string(),
                Color::Cyan => "#00FFFF".to_string(),
                Color::Gray => "#B3B3B3".to_string(),
                Color::DarkGray => "#4D4D4D".to_string(),
                Color::LightRed => "#FF6666".to_string(),
                Color::LightGreen => "#66FF66".to_string(),
                Color::LightYellow => "#FFFF66".to_string(),
                Color::LightBlue => "#6666FF".to_string(),
                Color::LightMagenta => "#FF66FF".to_string(),
                Color::LightCyan => "#66FFFF".to_string(),
                Color::White => "#FFFFFF".to_string(),
                Color::Indexed(_) => "reset".to_string(),
            }
        }

        let mut kv = |k: &str, v: Color| {
            let _ = writeln!(&mut buf, "{} = {}", k, color_to_str(v));
        };

        kv("text", self.text);
        kv("muted", self.muted);
        kv("title", self.title);
        kv("border", self.border);
        kv("header_bg", self.header_bg);
        kv("header_fg", self.header_fg);
        kv("status_bg", self.status_bg);
        kv("status_fg", self.status_fg);
        kv("highlight_fg", self.highlight_fg);
        kv("highlight_bg", self.highlight_bg);
        kv("badge_fg", self.badge_fg);
        kv("badge_bg", self.badge_bg);
        kv("error_fg", self.error_fg);
        kv("link_fg", self.link_fg);

        std::fs::write(path, buf)
    }

    /// Load the theme from `path`, writing the default there first if it is missing.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_else(Self::mocha);
        }
        let t = Self::mocha();
        if let Err(e) = t.write_file(path) {
            warn!(path, error = %e, "could not write default theme");
        }
        t
    }
}

/// Modal dialogs layered over the current screen.
#[derive(Clone, Debug, PartialEq)]
pub enum ModalState {
    /// Sort options sheet; `selected` is 0 = name, 1 = email, 2 = submit.
    SortMenu {
        selected: usize,
        error: Option<crate::error::ValidationError>,
    },
    Help {
        scroll: u16,
    },
    Info {
        message: String,
    },
}

/// Settings the state is built from; see [`config::Cli`].
#[derive(Clone, Debug)]
pub struct AppSettings {
    pub page_size: u32,
    pub detail_delay: Duration,
    pub map_host: String,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            detail_delay: DEFAULT_DETAIL_DELAY,
            map_host: DEFAULT_MAP_HOST.to_string(),
            theme: Theme::mocha(),
            keymap: Keymap::default(),
        }
    }
}

pub struct AppState {
    pub directory: DirectoryController,
    pub sort_options: SortOptions,
    pub screen: Screen,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    pub search_input: String,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub detail_delay: Duration,
    pub map_host: String,
    opener: Box<dyn UrlOpener>,
    outbox: Vec<PageRequest>,
}

impl AppState {
    /// Create the state and queue the first page (screen mount).
    pub fn new(settings: AppSettings) -> Self {
        Self::with_opener(settings, Box::new(SystemOpener))
    }

    pub fn with_opener(settings: AppSettings, opener: Box<dyn UrlOpener>) -> Self {
        let mut app = Self {
            directory: DirectoryController::new(settings.page_size),
            sort_options: SortOptions::default(),
            screen: Screen::Directory,
            selected_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            search_input: String::new(),
            theme: settings.theme,
            keymap: settings.keymap,
            modal: None,
            detail_delay: settings.detail_delay,
            map_host: settings.map_host,
            opener,
            outbox: Vec::new(),
        };
        let first = app.directory.mount();
        app.queue(first);
        app
    }

    fn queue(&mut self, request: Option<PageRequest>) {
        if let Some(req) = request {
            self.outbox.push(req);
        }
    }

    /// Page requests waiting to be handed to the fetch worker.
    pub fn take_requests(&mut self) -> Vec<PageRequest> {
        std::mem::take(&mut self.outbox)
    }

    /// Explicit or proximity-triggered request for the next page.
    pub fn load_more(&mut self) {
        let req = self.directory.load_more();
        self.queue(req);
    }

    /// Trigger a load when the selection is close to the end of the visible list.
    pub fn load_more_if_near_end(&mut self) {
        if is_near_end(self.selected_index, self.directory.visible().len(), self.rows_per_page) {
            self.load_more();
        }
    }

    /// Feed a worker completion into the directory.
    pub fn on_fetch_complete(&mut self, outcome: FetchOutcome) {
        if !self.directory.complete_fetch(outcome) {
            return;
        }
        self.clamp_selection();
        // keep filling the viewport after a successful page; failures wait for the user
        if self.directory.error().is_none() {
            self.load_more_if_near_end();
        }
    }

    pub fn set_search(&mut self, query: String) {
        self.directory.apply_search(&query);
        self.search_input = query;
        self.selected_index = 0;
    }

    /// Validate the sort sheet; on success apply the sort and close the sheet.
    pub fn commit_sort(&mut self) {
        match self.sort_options.commit() {
            Ok(key) => {
                self.directory.apply_sort(key);
                self.selected_index = 0;
                self.close_modal();
            }
            Err(e) => {
                debug!(error = %e, "sort commit rejected");
                if let Some(ModalState::SortMenu { error, .. }) = self.modal.as_mut() {
                    *error = Some(e);
                }
            }
        }
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn selected_user(&self) -> Option<&crate::model::UserRecord> {
        self.directory.visible().get(self.selected_index)
    }

    /// Navigate to the detail screen with the selected record.
    pub fn open_detail(&mut self, now: Instant) {
        let Some(user) = self.selected_user().cloned() else {
            return;
        };
        info!(id = user.id, "opening detail");
        let view = DetailView::initialize(Some(user), self.detail_delay, &self.map_host, now);
        self.screen = Screen::Detail(view);
    }

    /// Leave the detail screen, cancelling its pending delay.
    pub fn close_detail(&mut self) {
        if let Screen::Detail(view) = &mut self.screen {
            view.teardown();
        }
        self.screen = Screen::Directory;
    }

    /// Advance timers.
    pub fn tick(&mut self, now: Instant) {
        if let Screen::Detail(view) = &mut self.screen
            && view.tick(now)
        {
            debug!(title = view.title(), "detail ready");
        }
    }

    pub fn open_map(&mut self) {
        let link = match &self.screen {
            Screen::Detail(view) if view.is_ready() => view.resolve_map_link(),
            _ => None,
        };
        self.open_link(link, "map");
    }

    pub fn open_website(&mut self) {
        let link = match &self.screen {
            Screen::Detail(view) if view.is_ready() => view.resolve_website_link(),
            _ => None,
        };
        self.open_link(link, "website");
    }

    fn open_link(&mut self, link: Option<String>, what: &str) {
        let Some(url) = link else {
            debug!(what, "no link available");
            return;
        };
        info!(url = %url, "opening link");
        if let Err(e) = self.opener.open(&url) {
            warn!(url = %url, error = %e, "failed to open link");
            self.open_modal(ModalState::Info {
                message: format!("Could not open {what}: {e}"),
            });
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        let len = self.directory.visible().len();
        if len == 0 {
            self.selected_index = 0;
            return;
        }
        let max = len - 1;
        self.selected_index = self.selected_index.saturating_add_signed(delta).min(max);
    }

    fn clamp_selection(&mut self) {
        let len = self.directory.visible().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
