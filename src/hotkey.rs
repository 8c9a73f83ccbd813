use anyhow::Result;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::Arc;

/// Keys the overlay reacts to. Everything else arrives as `Other` and is
/// dropped by the dispatch table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Insert,
    Left,
    Right,
    Up,
    Down,
    Plus,
    Minus,
    R,
    S,
    C,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct KeyModifiers {
    pub ctrl: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: KeyModifiers,
}

/// Parse a key name from the settings file into a bindable key. Returns
/// `None` for anything outside the table.
pub fn parse_key_name(name: &str) -> Option<KeyCode> {
    match name.trim().to_ascii_uppercase().as_str() {
        "INSERT" => Some(KeyCode::Insert),
        "LEFT" | "LEFTARROW" => Some(KeyCode::Left),
        "RIGHT" | "RIGHTARROW" => Some(KeyCode::Right),
        "UP" | "UPARROW" => Some(KeyCode::Up),
        "DOWN" | "DOWNARROW" => Some(KeyCode::Down),
        "PLUS" | "ADD" => Some(KeyCode::Plus),
        "MINUS" | "SUBTRACT" => Some(KeyCode::Minus),
        "R" => Some(KeyCode::R),
        "S" => Some(KeyCode::S),
        "C" => Some(KeyCode::C),
        _ => None,
    }
}

/// Process-wide key capture. The platform backend receives key events no
/// matter which window has focus and only enqueues them; it never mutates
/// state itself. The GUI thread drains the queue once per frame, which keeps
/// every state mutation on a single writer.
#[derive(Debug, Default)]
pub struct GlobalKeyListener {
    receiver: Option<Receiver<KeyEvent>>,
    /// Cleared by the capture thread if the OS hook dies after startup.
    capturing: Arc<AtomicBool>,
    started: bool,
}

impl GlobalKeyListener {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the capture backend. On platforms without a backend this logs
    /// once and returns `Ok`: the app keeps running with panel-only control.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            return Ok(());
        }
        self.started = true;

        #[cfg(target_os = "windows")]
        {
            self.capturing.store(true, Ordering::Relaxed);
            self.receiver = Some(platform::spawn_listener(Arc::clone(&self.capturing)));
        }

        #[cfg(not(target_os = "windows"))]
        {
            tracing::warn!(
                "global key capture is not available on this platform; \
                 hotkeys only work through the control panel"
            );
        }

        Ok(())
    }

    pub fn is_capturing(&self) -> bool {
        self.receiver.is_some() && self.capturing.load(Ordering::Relaxed)
    }

    /// Drain everything the capture thread queued since the last call.
    pub fn drain_events(&self) -> Vec<KeyEvent> {
        let mut events = Vec::new();
        if let Some(rx) = &self.receiver {
            while let Ok(event) = rx.try_recv() {
                events.push(event);
            }
        }
        events
    }
}

#[cfg(target_os = "windows")]
mod platform {
    use super::{KeyCode, KeyEvent, KeyModifiers};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::mpsc::{channel, Receiver};
    use std::sync::Arc;
    use std::thread;

    fn map_key(key: rdev::Key) -> KeyCode {
        use rdev::Key;
        match key {
            Key::Insert => KeyCode::Insert,
            Key::LeftArrow => KeyCode::Left,
            Key::RightArrow => KeyCode::Right,
            Key::UpArrow => KeyCode::Up,
            Key::DownArrow => KeyCode::Down,
            Key::KpPlus | Key::Equal => KeyCode::Plus,
            Key::KpMinus | Key::Minus => KeyCode::Minus,
            Key::KeyR => KeyCode::R,
            Key::KeyS => KeyCode::S,
            Key::KeyC => KeyCode::C,
            _ => KeyCode::Other,
        }
    }

    /// Run `rdev::listen` on its own thread and forward key-down events.
    /// Key repeat is forwarded as-is; the transition rules clamp, so there
    /// is nothing to de-duplicate here. If the hook fails, `capturing` is
    /// cleared so the UI can report the degraded state.
    pub fn spawn_listener(capturing: Arc<AtomicBool>) -> Receiver<KeyEvent> {
        let (tx, rx) = channel::<KeyEvent>();

        thread::spawn(move || {
            let mut ctrl_pressed = false;
            let result = rdev::listen(move |event| match event.event_type {
                rdev::EventType::KeyPress(k) => {
                    if matches!(k, rdev::Key::ControlLeft | rdev::Key::ControlRight) {
                        ctrl_pressed = true;
                        return;
                    }
                    let key = map_key(k);
                    if key != KeyCode::Other {
                        let _ = tx.send(KeyEvent {
                            key,
                            modifiers: KeyModifiers { ctrl: ctrl_pressed },
                        });
                    }
                }
                rdev::EventType::KeyRelease(k) => {
                    if matches!(k, rdev::Key::ControlLeft | rdev::Key::ControlRight) {
                        ctrl_pressed = false;
                    }
                }
                _ => {}
            });

            if let Err(err) = result {
                capturing.store(false, Ordering::Relaxed);
                tracing::warn!(
                    ?err,
                    "global key listener failed; falling back to panel-only control"
                );
            }
        });

        rx
    }
}
