use serde::{Deserialize, Serialize};

use crate::dispatch::Keymap;
use crate::hotkey::parse_key_name;
use crate::view_state::{DEFAULT_OPACITY, MAX_OPACITY, MIN_OPACITY};

pub const SETTINGS_FILE: &str = "overtrace.json";

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    /// Key that toggles overlay visibility. If the string does not name a
    /// bindable key, Insert is used.
    pub toggle_key: Option<String>,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
    /// Overlay opacity applied at startup.
    #[serde(default = "default_opacity")]
    pub opacity: f32,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
}

fn default_opacity() -> f32 {
    DEFAULT_OPACITY
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.0
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            toggle_key: Some("Insert".into()),
            debug_logging: false,
            opacity: default_opacity(),
            enable_toasts: true,
            toast_duration: default_toast_duration(),
        }
    }
}

impl Settings {
    /// Load settings from disk. A missing file yields the defaults; any
    /// other read failure (permissions, a directory in the way) is an error
    /// so a broken file is not silently ignored.
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self::default());
            }
            Err(err) => return Err(err.into()),
        };
        if content.is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Build the key table, falling back to the default binding when the
    /// configured toggle key is invalid.
    pub fn keymap(&self) -> Keymap {
        let mut map = Keymap::default();
        if let Some(name) = &self.toggle_key {
            match parse_key_name(name) {
                Some(key) => map.toggle_visible = key,
                None => {
                    tracing::warn!(
                        "configured toggle key '{}' is invalid; using Insert",
                        name
                    );
                }
            }
        }
        map
    }

    pub fn startup_opacity(&self) -> f32 {
        self.opacity.clamp(MIN_OPACITY, MAX_OPACITY)
    }
}
