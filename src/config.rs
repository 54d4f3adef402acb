//! User configuration — keybindings, motion settings, and persistence.
//!
//! Stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/folio-stack/config.toml` (default
//! `~/.config/folio-stack/config.toml`).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::stage::StageSettings;

// ───────────────────────────────────────── actions ───────────

/// All configurable user actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    ScrollUp,
    ScrollDown,
    PrevCard,
    NextCard,
    OpenFocused,
    Close,
    Quit,
}

impl Action {
    /// Ordered list of all actions (used for the config file).
    pub const ALL: &[Action] = &[
        Action::ScrollUp,
        Action::ScrollDown,
        Action::PrevCard,
        Action::NextCard,
        Action::OpenFocused,
        Action::Close,
        Action::Quit,
    ];

    /// Human-readable label for the UI.
    pub fn label(self) -> &'static str {
        match self {
            Action::ScrollUp => "Scroll Up",
            Action::ScrollDown => "Scroll Down",
            Action::PrevCard => "Previous Card",
            Action::NextCard => "Next Card",
            Action::OpenFocused => "Open Card",
            Action::Close => "Close",
            Action::Quit => "Quit",
        }
    }

    /// Key used in the config file.
    fn config_key(self) -> &'static str {
        match self {
            Action::ScrollUp => "scroll_up",
            Action::ScrollDown => "scroll_down",
            Action::PrevCard => "prev_card",
            Action::NextCard => "next_card",
            Action::OpenFocused => "open",
            Action::Close => "close",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// A single key binding: key code plus modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    /// Does this binding match a key event?  Only CTRL/ALT/SHIFT modifiers
    /// are compared.
    pub fn matches(&self, event: KeyEvent) -> bool {
        let mask = KeyModifiers::CONTROL | KeyModifiers::ALT | KeyModifiers::SHIFT;
        self.code == event.code && (self.modifiers & mask) == (event.modifiers & mask)
    }

    fn modifier_prefix(&self) -> String {
        let mut s = String::new();
        if self.modifiers.contains(KeyModifiers::CONTROL) {
            s.push_str("Ctrl+");
        }
        if self.modifiers.contains(KeyModifiers::ALT) {
            s.push_str("Alt+");
        }
        if self.modifiers.contains(KeyModifiers::SHIFT) {
            s.push_str("Shift+");
        }
        s
    }

    /// User-friendly display string (e.g. `"↑"`, `"Ctrl+c"`, `"q"`).
    pub fn display(&self) -> String {
        let key = match self.code {
            KeyCode::Up => "↑".into(),
            KeyCode::Down => "↓".into(),
            KeyCode::Left => "←".into(),
            KeyCode::Right => "→".into(),
            KeyCode::Backspace => "Bksp".into(),
            KeyCode::Delete => "Del".into(),
            KeyCode::PageUp => "PgUp".into(),
            KeyCode::PageDown => "PgDn".into(),
            _ => key_name(self.code),
        };
        format!("{}{key}", self.modifier_prefix())
    }

    /// Serialise to config-file format (e.g. `"Shift+Up"`, `"q"`).
    fn to_config_string(&self) -> String {
        format!("{}{}", self.modifier_prefix(), key_name(self.code))
    }

    /// Parse a key string like `"Ctrl+c"`, `"Shift+Up"`, `"q"`, `"Enter"`.
    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let parts: Vec<&str> = s.split('+').collect();
        let (key_part, mods) = parts.split_last()?;

        for part in mods {
            match part.to_lowercase().as_str() {
                "ctrl" => modifiers |= KeyModifiers::CONTROL,
                "alt" => modifiers |= KeyModifiers::ALT,
                "shift" => modifiers |= KeyModifiers::SHIFT,
                _ => return None,
            }
        }

        let code = match key_part.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "left" => KeyCode::Left,
            "right" => KeyCode::Right,
            "enter" | "return" => KeyCode::Enter,
            "esc" | "escape" => KeyCode::Esc,
            "tab" => KeyCode::Tab,
            "backspace" | "bksp" => KeyCode::Backspace,
            "delete" | "del" => KeyCode::Delete,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "space" => KeyCode::Char(' '),
            s if s.starts_with('f') && s.len() > 1 => {
                let n: u8 = s[1..].parse().ok()?;
                KeyCode::F(n)
            }
            _ => {
                let mut chars = key_part.chars();
                let c = chars.next()?;
                if chars.next().is_some() {
                    return None;
                }
                KeyCode::Char(c)
            }
        };

        Some(KeyBind { code, modifiers })
    }
}

fn key_name(code: KeyCode) -> String {
    match code {
        KeyCode::Char(' ') => "Space".into(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Up => "Up".into(),
        KeyCode::Down => "Down".into(),
        KeyCode::Left => "Left".into(),
        KeyCode::Right => "Right".into(),
        KeyCode::Enter => "Enter".into(),
        KeyCode::Esc => "Esc".into(),
        KeyCode::Tab => "Tab".into(),
        KeyCode::Backspace => "Backspace".into(),
        KeyCode::Delete => "Delete".into(),
        KeyCode::Home => "Home".into(),
        KeyCode::End => "End".into(),
        KeyCode::PageUp => "PageUp".into(),
        KeyCode::PageDown => "PageDown".into(),
        KeyCode::F(n) => format!("F{n}"),
        other => format!("{other:?}"),
    }
}

// ───────────────────────────────────────── motion ────────────

/// Scroll and motion settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionConfig {
    pub gap: f32,
    pub edge_padding: f32,
    pub rows_per_card: f32,
    pub guard_ms: u64,
    /// Section snap delay; 0 disables snapping.
    pub snap_ms: u64,
    pub fps: u32,
    /// Rows moved per wheel notch or arrow key.
    pub scroll_step: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        let stage = StageSettings::default();
        Self {
            gap: stage.gap,
            edge_padding: stage.edge_padding,
            rows_per_card: stage.rows_per_card,
            guard_ms: stage.guard.as_millis() as u64,
            snap_ms: stage.snap.as_millis() as u64,
            fps: 30,
            scroll_step: 2.0,
        }
    }
}

impl MotionConfig {
    pub fn stage_settings(&self) -> StageSettings {
        StageSettings {
            gap: self.gap,
            edge_padding: self.edge_padding,
            rows_per_card: self.rows_per_card,
            guard: Duration::from_millis(self.guard_ms),
            snap: Duration::from_millis(self.snap_ms),
            ..StageSettings::default()
        }
    }

    pub fn frame_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / f64::from(self.fps.max(1)))
    }

    /// Apply one `key = value` line.  Returns `false` if `key` is not a
    /// motion setting.  Out-of-range values are clamped, unparsable ones
    /// ignored.
    fn apply(&mut self, key: &str, value: &str) -> bool {
        let float = |v: &str| v.parse::<f32>().ok().filter(|f| f.is_finite());
        match key {
            "gap" => {
                if let Some(v) = float(value) {
                    self.gap = v.clamp(0.1, 10.0);
                }
            }
            "edge_padding" => {
                if let Some(v) = float(value) {
                    self.edge_padding = v.clamp(0.0, 10.0);
                }
            }
            "rows_per_card" => {
                if let Some(v) = float(value) {
                    self.rows_per_card = v.clamp(1.0, 200.0);
                }
            }
            "scroll_step" => {
                if let Some(v) = float(value) {
                    self.scroll_step = v.clamp(0.25, 50.0);
                }
            }
            "guard_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.guard_ms = v.clamp(0, 2000);
                }
            }
            "snap_ms" => {
                if let Ok(v) = value.parse::<u64>() {
                    self.snap_ms = v.min(5000);
                }
            }
            "fps" => {
                if let Ok(v) = value.parse::<u32>() {
                    self.fps = v.clamp(5, 120);
                }
            }
            _ => return false,
        }
        true
    }
}

// ───────────────────────────────────────── config ────────────

/// Application configuration: keybindings and motion settings.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    pub motion: MotionConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bindings: Self::default_bindings(),
            motion: MotionConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        use KeyCode::*;
        let n = KeyModifiers::NONE;
        let mut m = HashMap::new();

        m.insert(ScrollUp, vec![KeyBind::new(Up, n), KeyBind::new(Char('k'), n)]);
        m.insert(ScrollDown, vec![KeyBind::new(Down, n), KeyBind::new(Char('j'), n)]);
        m.insert(PrevCard, vec![KeyBind::new(PageUp, n), KeyBind::new(Char('K'), KeyModifiers::SHIFT)]);
        m.insert(NextCard, vec![KeyBind::new(PageDown, n), KeyBind::new(Char('J'), KeyModifiers::SHIFT)]);
        m.insert(OpenFocused, vec![KeyBind::new(Enter, n), KeyBind::new(Char(' '), n)]);
        m.insert(Close, vec![KeyBind::new(Esc, n), KeyBind::new(Backspace, n)]);
        m.insert(Quit, vec![KeyBind::new(Char('q'), n)]);

        m
    }

    /// Find the action that matches a key event.  When multiple bindings
    /// match, the one with the most modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        let mut best: Option<Action> = None;
        let mut best_mod_count = 0;

        for (&action, binds) in &self.bindings {
            for bind in binds {
                if bind.matches(event) {
                    let mc = bind.modifiers.bits().count_ones();
                    if best.is_none() || mc > best_mod_count {
                        best = Some(action);
                        best_mod_count = mc;
                    }
                }
            }
        }
        best
    }

    /// Short display of the first binding only (for the status bar).
    fn short_binding(&self, action: Action) -> String {
        match self.bindings.get(&action).and_then(|b| b.first()) {
            Some(bind) => bind.display(),
            None => "?".into(),
        }
    }

    /// Build the status-bar hint string from current bindings.
    pub fn status_bar_hint(&self, viewing: bool) -> String {
        if viewing {
            format!(
                "{}/{}: sections | {}/{}: switch item | {}: close | {}: quit",
                self.short_binding(Action::ScrollUp),
                self.short_binding(Action::ScrollDown),
                self.short_binding(Action::PrevCard),
                self.short_binding(Action::NextCard),
                self.short_binding(Action::Close),
                self.short_binding(Action::Quit),
            )
        } else {
            format!(
                "{}/{}: scroll | {}/{}: cards | {}: open | {}: quit",
                self.short_binding(Action::ScrollUp),
                self.short_binding(Action::ScrollDown),
                self.short_binding(Action::PrevCard),
                self.short_binding(Action::NextCard),
                self.short_binding(Action::OpenFocused),
                self.short_binding(Action::Quit),
            )
        }
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from the default location, falling back to defaults.
    pub fn load() -> Self {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => {
                tracing::debug!(path = %path.display(), "loaded config");
                Self::parse(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), "cannot read config: {e}");
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, self.serialise())?;
        Ok(())
    }

    fn parse(s: &str) -> Self {
        let mut config = Self::default();

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim();

            if config.motion.apply(key, value) {
                continue;
            }

            let Some(action) = Action::from_config_key(key) else {
                tracing::debug!(key, "unknown config key");
                continue;
            };

            let parsed: Vec<KeyBind> = value
                .split(',')
                .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                .collect();
            if !parsed.is_empty() {
                config.bindings.insert(action, parsed);
            }
        }

        config
    }

    fn serialise(&self) -> String {
        let m = &self.motion;
        let mut lines = vec![
            "# folio-stack configuration".to_string(),
            String::new(),
            "# Motion".to_string(),
            format!("gap = {}", m.gap),
            format!("edge_padding = {}", m.edge_padding),
            format!("rows_per_card = {}", m.rows_per_card),
            format!("scroll_step = {}", m.scroll_step),
            format!("guard_ms = {}", m.guard_ms),
            format!("snap_ms = {}", m.snap_ms),
            format!("fps = {}", m.fps),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            "# Modifiers: Ctrl+, Alt+, Shift+ (prefix)".to_string(),
            "# Special keys: Up, Down, Left, Right, Enter, Esc, Tab,".to_string(),
            "#   Backspace, Delete, Home, End, PageUp, PageDown, Space, F1-F12".to_string(),
            String::new(),
        ];

        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(|b| b.to_config_string()).collect();
                lines.push(format!("# {}", action.label()));
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/folio-stack/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("folio-stack").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn parses_bindings_and_motion_settings() {
        let config = AppConfig::parse(
            "# comment\n\
             [section headers are ignored]\n\
             gap = 1.5\n\
             snap_ms = 0\n\
             fps = 1000\n\
             edge_padding = nonsense\n\
             quit = Ctrl+c, \"x\"\n\
             next_card = Shift+Down\n\
             bogus = q\n",
        );
        assert_eq!(config.motion.gap, 1.5);
        assert_eq!(config.motion.snap_ms, 0);
        assert_eq!(config.motion.fps, 120);
        assert_eq!(config.motion.edge_padding, MotionConfig::default().edge_padding);

        assert_eq!(
            config.match_key(key(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            Some(Action::Quit)
        );
        assert_eq!(config.match_key(key(KeyCode::Char('x'), KeyModifiers::NONE)), Some(Action::Quit));
        // The old default for `quit` was replaced.
        assert_eq!(config.match_key(key(KeyCode::Char('q'), KeyModifiers::NONE)), None);
        assert_eq!(
            config.match_key(key(KeyCode::Down, KeyModifiers::SHIFT)),
            Some(Action::NextCard)
        );
        assert_eq!(
            config.match_key(key(KeyCode::Down, KeyModifiers::NONE)),
            Some(Action::ScrollDown)
        );
    }

    #[test]
    fn rejects_malformed_keys() {
        assert_eq!(KeyBind::parse("Hyper+x"), None);
        assert_eq!(KeyBind::parse("banana"), None);
        assert_eq!(KeyBind::parse("F5"), Some(KeyBind::new(KeyCode::F(5), KeyModifiers::NONE)));
        assert_eq!(
            KeyBind::parse("alt+pgdn"),
            Some(KeyBind::new(KeyCode::PageDown, KeyModifiers::ALT))
        );
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.motion.gap = 2.25;
        config.motion.snap_ms = 0;
        config
            .bindings
            .insert(Action::Close, vec![KeyBind::new(KeyCode::Char('x'), KeyModifiers::ALT)]);
        config.save_to(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("# Quit\nquit = q"));
        assert!(text.contains("close = Alt+x"));

        let loaded = AppConfig::load_from(&path);
        assert_eq!(loaded.motion, config.motion);
        assert_eq!(loaded.bindings, config.bindings);
    }

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = AppConfig::load_from(&dir.path().join("absent.toml"));
        assert_eq!(loaded.motion, MotionConfig::default());
        assert!(loaded.status_bar_hint(false).contains("Enter: open"));
    }

    #[test]
    fn stage_settings_follow_the_config() {
        let motion = MotionConfig {
            guard_ms: 250,
            snap_ms: 0,
            ..MotionConfig::default()
        };
        let settings = motion.stage_settings();
        assert_eq!(settings.guard, Duration::from_millis(250));
        assert!(settings.snap.is_zero());
        assert_eq!(motion.frame_interval(), Duration::from_secs_f64(1.0 / 30.0));
    }
}
