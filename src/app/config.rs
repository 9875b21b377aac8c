//! Command-line options and config file locations.
//!
//! Network and presentation settings come from the command line (or the
//! matching environment variables); colours and keybindings live in the
//! `theme.conf` and `keybinds.conf` files next to the binary's config dir.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

use crate::model::DEFAULT_MAP_HOST;
use crate::source::DEFAULT_PAGE_SIZE;
use crate::source::SourceConfig;
use crate::source::http::{DEFAULT_BASE_URL, DEFAULT_LIMIT_PARAM, DEFAULT_PAGE_PARAM, DEFAULT_TIMEOUT_SECS};

const APP_DIR: &str = "user-directory";

#[derive(Parser, Debug, Clone)]
#[command(name = "user-directory", version, about = "Browse a remote user directory in the terminal")]
pub struct Cli {
    /// Base URL of the user service; `/users` is appended.
    #[arg(long, env = "USER_DIRECTORY_BASE_URL", default_value = DEFAULT_BASE_URL)]
    pub base_url: String,

    /// Users requested per page.
    #[arg(long, default_value_t = DEFAULT_PAGE_SIZE, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: u32,

    /// Query parameter carrying the page number.
    #[arg(long, default_value = DEFAULT_PAGE_PARAM)]
    pub page_param: String,

    /// Query parameter carrying the page size.
    #[arg(long, default_value = DEFAULT_LIMIT_PARAM)]
    pub limit_param: String,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Loading delay of the detail screen in milliseconds.
    #[arg(long, default_value_t = 1000)]
    pub detail_delay_ms: u64,

    /// Host used to build map links.
    #[arg(long, default_value = DEFAULT_MAP_HOST)]
    pub map_host: String,

    /// Theme file (default: theme.conf in the config dir).
    #[arg(long)]
    pub theme: Option<PathBuf>,

    /// Keybindings file (default: keybinds.conf in the config dir).
    #[arg(long)]
    pub keybinds: Option<PathBuf>,

    /// Write logs to this file; logging is off otherwise.
    #[arg(long, env = "USER_DIRECTORY_LOG")]
    pub log_file: Option<PathBuf>,
}

impl Cli {
    pub fn source_config(&self) -> SourceConfig {
        SourceConfig {
            base_url: self.base_url.clone(),
            page_param: self.page_param.clone(),
            limit_param: self.limit_param.clone(),
            timeout: Duration::from_secs(self.timeout_secs.max(1)),
        }
    }

    pub fn detail_delay(&self) -> Duration {
        Duration::from_millis(self.detail_delay_ms)
    }

    pub fn theme_path(&self) -> String {
        resolve_config_path(self.theme.as_ref(), "theme.conf")
    }

    pub fn keybinds_path(&self) -> String {
        resolve_config_path(self.keybinds.as_ref(), "keybinds.conf")
    }
}

fn resolve_config_path(explicit: Option<&PathBuf>, name: &str) -> String {
    if let Some(p) = explicit {
        return p.to_string_lossy().to_string();
    }
    config_file_read_path(name).unwrap_or_else(|| config_file_write_path(name))
}

fn config_dir() -> Option<PathBuf> {
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME").filter(|v| !v.is_empty()) {
        return Some(PathBuf::from(xdg).join(APP_DIR));
    }
    std::env::var_os("HOME")
        .filter(|v| !v.is_empty())
        .map(|home| PathBuf::from(home).join(".config").join(APP_DIR))
}

/// Locate an existing config file: working directory first, then the config dir.
pub fn config_file_read_path(name: &str) -> Option<String> {
    let local = PathBuf::from(name);
    if local.exists() {
        return Some(name.to_string());
    }
    let in_dir = config_dir()?.join(name);
    in_dir.exists().then(|| in_dir.to_string_lossy().to_string())
}

/// Where a fresh config file should be written; falls back to the working directory.
pub fn config_file_write_path(name: &str) -> String {
    match config_dir() {
        Some(dir) if std::fs::create_dir_all(&dir).is_ok() => dir.join(name).to_string_lossy().to_string(),
        _ => name.to_string(),
    }
}
