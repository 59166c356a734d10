use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default)]
    pub key_bindings: KeyBindings,
    /// Milliseconds added or removed by the interval keys.
    #[serde(default = "default_interval_step")]
    pub interval_step_ms: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub toggle_pixel: String,
    pub next_cell: String,
    pub prev_cell: String,
    pub cell_left: String,
    pub cell_right: String,
    pub cell_up: String,
    pub cell_down: String,
    pub clear_cell: String,
    pub reset_display: String,
    pub copy_cell: String,
    pub paste_cell: String,
    pub transmission: String,
    pub number_format: String,
    pub scrolling: String,
    pub buffered: String,
    pub direction: String,
    pub faster: String,
    pub slower: String,
    pub play: String,
    pub code_up: String,
    pub code_down: String,
    pub save: String,
    pub export: String,
    pub quit: String,
    pub confirm: String,
    pub cancel: String,
}

fn default_interval_step() -> u32 {
    50
}

impl Default for EditorConfig {
    fn default() -> Self {
        EditorConfig {
            key_bindings: KeyBindings::default(),
            interval_step_ms: default_interval_step(),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            toggle_pixel: "Space".into(),
            next_cell: "Tab".into(),
            prev_cell: "BackTab".into(),
            cell_left: "Alt-Left".into(),
            cell_right: "Alt-Right".into(),
            cell_up: "Alt-Up".into(),
            cell_down: "Alt-Down".into(),
            clear_cell: "c".into(),
            reset_display: "R".into(),
            copy_cell: "y".into(),
            paste_cell: "p".into(),
            transmission: "t".into(),
            number_format: "f".into(),
            scrolling: "s".into(),
            buffered: "b".into(),
            direction: "d".into(),
            faster: "-".into(),
            slower: "+".into(),
            play: "Enter".into(),
            code_up: "PageUp".into(),
            code_down: "PageDown".into(),
            save: "Ctrl-s".into(),
            export: "e".into(),
            quit: "q".into(),
            confirm: "Enter".into(),
            cancel: "Esc".into(),
        }
    }
}

impl EditorConfig {
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str(&json) {
                Ok(config) => config,
                Err(e) => {
                    warn!("invalid editor config {} ({e}), using defaults", config_path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    fn config_path() -> std::path::PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = std::path::PathBuf::from(home);
        path.push(".config");
        path.push("lcd-glyph-studio");
        path.push("editor.json");
        path
    }
}

fn named_key(name: &str) -> Option<KeyCode> {
    let code = match name {
        "Right" => KeyCode::Right,
        "Left" => KeyCode::Left,
        "Up" => KeyCode::Up,
        "Down" => KeyCode::Down,
        "Enter" => KeyCode::Enter,
        "Esc" => KeyCode::Esc,
        "Space" => KeyCode::Char(' '),
        "Tab" => KeyCode::Tab,
        "BackTab" => KeyCode::BackTab,
        "Backspace" => KeyCode::Backspace,
        "Home" => KeyCode::Home,
        "End" => KeyCode::End,
        "PageUp" => KeyCode::PageUp,
        "PageDown" => KeyCode::PageDown,
        s => {
            // F-key binding: "F1" through "F12" etc.
            if let Some(n) = s.strip_prefix('F').and_then(|rest| rest.parse::<u8>().ok()) {
                return Some(KeyCode::F(n));
            }
            let mut chars = s.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => return None,
            }
        }
    };
    Some(code)
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    let (required, name) = if let Some(rest) = binding.strip_prefix("Alt-") {
        (KeyModifiers::ALT, rest)
    } else if let Some(rest) = binding.strip_prefix("Ctrl-") {
        (KeyModifiers::CONTROL, rest)
    } else {
        (KeyModifiers::NONE, binding)
    };

    let Some(code) = named_key(name) else {
        return false;
    };

    if required != KeyModifiers::NONE {
        return event.modifiers.contains(required) && event.code == code;
    }

    // For non-Ctrl, non-Alt bindings, reject if Ctrl or Alt is held.
    // This prevents plain bindings like "c" from accidentally firing on Alt-c.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }
    event.code == code
}
