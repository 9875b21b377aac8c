//! Keybinding configuration: parse `keybinds.conf`, provide defaults, and map keys to actions.
//!
//! This module manages keyboard shortcuts for the TUI. It supports:
//! - Loading custom keybindings from a config file (`keybinds.conf`)
//! - Providing sensible defaults if no config is present
//! - Resolving key presses (with modifiers) to semantic actions
//! - Exporting the current keymap back to a file for reference or customization

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Semantic keyboard actions that can be bound to key combinations.
///
/// Multiple key combinations can map to the same action (e.g. both 'j' and
/// the Down arrow move down).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    /// Exit the application.
    Quit,
    /// Open the sort/filter modal.
    OpenFilterMenu,
    /// Display the help modal.
    OpenHelp,
    /// Start typing a search query.
    StartSearch,
    /// Drop the current search query.
    ClearSearch,
    /// Open the detail screen for the selected user.
    EnterAction,
    /// Leave the detail screen.
    Back,
    /// Move up in the list.
    MoveUp,
    /// Move down in the list.
    MoveDown,
    /// Move one page up.
    PageUp,
    /// Move one page down.
    PageDown,
    /// Request the next page from the source.
    LoadMore,
    /// Open the selected user's address on a map.
    OpenMap,
    /// Open the selected user's website.
    OpenWebsite,
    /// Ignore this key.
    Ignore,
}

/// Manages keybinding configuration and key-to-action resolution.
#[derive(Clone, Debug)]
pub struct Keymap {
    /// Canonical mapping from (modifiers, code) to action.
    bindings: std::collections::HashMap<(KeyModifiers, KeyCode), KeyAction>,
}

impl Keymap {
    /// Create a keymap with default keybindings (arrows plus vim-style j/k).
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let mut bindings = std::collections::HashMap::new();
        bindings.insert((M::NONE, Char('q')), KeyAction::Quit);
        bindings.insert((M::CONTROL, Char('c')), KeyAction::Quit);
        bindings.insert((M::NONE, Char('f')), KeyAction::OpenFilterMenu);
        bindings.insert((M::NONE, Char('/')), KeyAction::StartSearch);
        bindings.insert((M::NONE, Char('x')), KeyAction::ClearSearch);
        bindings.insert((M::NONE, Char('?')), KeyAction::OpenHelp);
        bindings.insert((M::NONE, Enter), KeyAction::EnterAction);
        bindings.insert((M::NONE, Esc), KeyAction::Back);
        bindings.insert((M::NONE, Backspace), KeyAction::Back);
        bindings.insert((M::NONE, Up), KeyAction::MoveUp);
        bindings.insert((M::NONE, Down), KeyAction::MoveDown);
        bindings.insert((M::NONE, Char('k')), KeyAction::MoveUp);
        bindings.insert((M::NONE, Char('j')), KeyAction::MoveDown);
        bindings.insert((M::NONE, PageUp), KeyAction::PageUp);
        bindings.insert((M::NONE, PageDown), KeyAction::PageDown);
        bindings.insert((M::NONE, Char('r')), KeyAction::LoadMore);
        bindings.insert((M::NONE, Char('m')), KeyAction::OpenMap);
        bindings.insert((M::NONE, Char('w')), KeyAction::OpenWebsite);
        Self { bindings }
    }

    /// Load a keymap from `path`, writing the defaults there if it does not exist.
    pub fn load_or_init(path: &str) -> Self {
        let p = std::path::Path::new(path);
        if p.exists() {
            return Self::from_file(path).unwrap_or_default();
        }
        let km = Self::default();
        if let Err(e) = km.write_file(path) {
            tracing::warn!(path, error = %e, "could not write default keybindings");
        }
        km
    }

    /// Load a keymap from a configuration file.
    ///
    /// Lines have the form `<Action> = <KeySpec>`; the defaults are kept and
    /// overridden by every valid line. Returns `None` if the file is unreadable.
    pub fn from_file(path: &str) -> Option<Self> {
        let contents = std::fs::read_to_string(path).ok()?;
        let mut map = Self::default();
        for raw in contents.lines() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let mut parts = line.splitn(2, '=');
            let lhs = parts.next().map(|s| s.trim()).unwrap_or("");
            let rhs = parts.next().map(|s| s.trim()).unwrap_or("");
            if lhs.is_empty() || rhs.is_empty() {
                continue;
            }
            if let (Some(action), Some(key)) = (parse_action(lhs), parse_key(rhs)) {
                map.bindings.insert(key, action);
            }
        }
        Some(map)
    }

    /// Write a readable dump of the default bindings to `path`.
    pub fn write_file(&self, path: &str) -> std::io::Result<()> {
        use std::fmt::Write as _;
        let mut buf = String::new();
        buf.push_str("# user-directory keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec examples: q, Ctrl+c, Enter, Esc, Backspace, Up, Down, PageUp, PageDown, /, f, j, k\n");
        buf.push_str("# Actions: Quit, OpenFilterMenu, OpenHelp, StartSearch, ClearSearch, EnterAction, Back, MoveUp, MoveDown, PageUp, PageDown, LoadMore, OpenMap, OpenWebsite, Ignore\n\n");

        let dump = [
            ("q", KeyAction::Quit),
            ("f", KeyAction::OpenFilterMenu),
            ("?", KeyAction::OpenHelp),
            ("/", KeyAction::StartSearch),
            ("x", KeyAction::ClearSearch),
            ("Enter", KeyAction::EnterAction),
            ("Esc", KeyAction::Back),
            ("Up", KeyAction::MoveUp),
            ("Down", KeyAction::MoveDown),
            ("k", KeyAction::MoveUp),
            ("j", KeyAction::MoveDown),
            ("PageUp", KeyAction::PageUp),
            ("PageDown", KeyAction::PageDown),
            ("r", KeyAction::LoadMore),
            ("m", KeyAction::OpenMap),
            ("w", KeyAction::OpenWebsite),
        ];
        for (k, a) in dump {
            let _ = writeln!(&mut buf, "{} = {}", format_action(a), k);
        }

        std::fs::write(path, buf)
    }

    /// Resolve a key event to its action, if bound.
    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        // Some terminals report SHIFT alongside shifted characters like '?'
        let mods = match key.code {
            KeyCode::Char(_) => key.modifiers.difference(KeyModifiers::SHIFT),
            _ => key.modifiers,
        };
        self.bindings.get(&(mods, key.code)).copied()
    }

    /// All keys bound to `action`, formatted for display.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((mods, code), _)| Self::format_key(*mods, *code))
            .collect();
        keys.sort();
        keys
    }

    /// Format a key (modifiers + code) into a human-readable spec like "Ctrl+c".
    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Enter => "Enter".to_string(),
            Esc => "Esc".to_string(),
            Backspace => "Backspace".to_string(),
            Up => "Up".to_string(),
            Down => "Down".to_string(),
            PageUp => "PageUp".to_string(),
            PageDown => "PageDown".to_string(),
            Char(c) => c.to_string(),
            _ => format!("{:?}", code),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{}", base)
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<(KeyModifiers, KeyCode)> {
    use KeyCode::*;
    let s = spec.trim();
    let mut rest = s;
    let mut mods = KeyModifiers::NONE;
    if let Some(after) = s.strip_prefix("Ctrl+") {
        mods |= KeyModifiers::CONTROL;
        rest = after;
    }
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Backspace" => Backspace,
        "Up" => Up,
        "Down" => Down,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}

fn parse_action(s: &str) -> Option<KeyAction> {
    match s.trim() {
        "Quit" => Some(KeyAction::Quit),
        "OpenFilterMenu" => Some(KeyAction::OpenFilterMenu),
        "OpenHelp" => Some(KeyAction::OpenHelp),
        "StartSearch" => Some(KeyAction::StartSearch),
        "ClearSearch" => Some(KeyAction::ClearSearch),
        "EnterAction" => Some(KeyAction::EnterAction),
        "Back" => Some(KeyAction::Back),
        "MoveUp" => Some(KeyAction::MoveUp),
        "MoveDown" => Some(KeyAction::MoveDown),
        "PageUp" => Some(KeyAction::PageUp),
        "PageDown" => Some(KeyAction::PageDown),
        "LoadMore" => Some(KeyAction::LoadMore),
        "OpenMap" => Some(KeyAction::OpenMap),
        "OpenWebsite" => Some(KeyAction::OpenWebsite),
        "Ignore" => Some(KeyAction::Ignore),
        _ => None,
    }
}

pub fn format_action(a: KeyAction) -> &'static str {
    match a {
        KeyAction::Quit => "Quit",
        KeyAction::OpenFilterMenu => "OpenFilterMenu",
        KeyAction::OpenHelp => "OpenHelp",
        KeyAction::StartSearch => "StartSearch",
        KeyAction::ClearSearch => "ClearSearch",
        KeyAction::EnterAction => "EnterAction",
        KeyAction::Back => "Back",
        KeyAction::MoveUp => "MoveUp",
        KeyAction::MoveDown => "MoveDown",
        KeyAction::PageUp => "PageUp",
        KeyAction::PageDown => "PageDown",
        KeyAction::LoadMore => "LoadMore",
        KeyAction::OpenMap => "OpenMap",
        KeyAction::OpenWebsite => "OpenWebsite",
        KeyAction::Ignore => "Ignore",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_resolve_vim_and_arrows() {
        let km = Keymap::default();
        let j = KeyEvent::new(KeyCode::Char('j'), KeyModifiers::NONE);
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::NONE);
        assert_eq!(km.resolve(&j), Some(KeyAction::MoveDown));
        assert_eq!(km.resolve(&down), Some(KeyAction::MoveDown));
        let help = KeyEvent::new(KeyCode::Char('?'), KeyModifiers::SHIFT);
        assert_eq!(km.resolve(&help), Some(KeyAction::OpenHelp));
    }

    #[test]
    fn parses_key_specs() {
        assert_eq!(parse_key("Ctrl+q"), Some((KeyModifiers::CONTROL, KeyCode::Char('q'))));
        assert_eq!(parse_key("PageDown"), Some((KeyModifiers::NONE, KeyCode::PageDown)));
        assert_eq!(parse_key("nope"), None);
        assert_eq!(parse_action("LoadMore"), Some(KeyAction::LoadMore));
    }

    #[test]
    fn keys_for_lists_every_binding() {
        let km = Keymap::default();
        assert_eq!(km.keys_for(KeyAction::Quit), vec!["Ctrl+c".to_string(), "q".to_string()]);
    }
}
