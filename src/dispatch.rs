use crate::hotkey::{KeyCode, KeyEvent};

/// The state transitions a key event can request. UI widgets funnel through
/// the same actions so hotkeys and the panel share one mutation path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayAction {
    ToggleVisible,
    NextChunk,
    PrevChunk,
    OpacityUp,
    OpacityDown,
    ScaleUp,
    ScaleDown,
    ResetScale,
    ToggleSingleChunk,
    ToggleClickThrough,
}

/// Fixed key-to-action table. Only the visibility toggle is rebindable; the
/// Ctrl modifier is the single chord in the table and routes `+`/`-` to
/// scale instead of opacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Keymap {
    pub toggle_visible: KeyCode,
}

impl Default for Keymap {
    fn default() -> Self {
        Self {
            toggle_visible: KeyCode::Insert,
        }
    }
}

impl Keymap {
    /// Map one key event to at most one action. Key repeat maps again and
    /// again; the transition clamps make that harmless.
    pub fn action_for(&self, event: KeyEvent) -> Option<OverlayAction> {
        if event.key == self.toggle_visible {
            return Some(OverlayAction::ToggleVisible);
        }

        match (event.key, event.modifiers.ctrl) {
            (KeyCode::Right | KeyCode::Up, _) => Some(OverlayAction::NextChunk),
            (KeyCode::Left | KeyCode::Down, _) => Some(OverlayAction::PrevChunk),
            (KeyCode::Plus, true) => Some(OverlayAction::ScaleUp),
            (KeyCode::Plus, false) => Some(OverlayAction::OpacityUp),
            (KeyCode::Minus, true) => Some(OverlayAction::ScaleDown),
            (KeyCode::Minus, false) => Some(OverlayAction::OpacityDown),
            (KeyCode::R, _) => Some(OverlayAction::ResetScale),
            (KeyCode::S, _) => Some(OverlayAction::ToggleSingleChunk),
            (KeyCode::C, _) => Some(OverlayAction::ToggleClickThrough),
            _ => None,
        }
    }
}
