#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use std::path::PathBuf;

use anyhow::{anyhow, Context};

use overtrace::gui::OvertraceApp;
use overtrace::hotkey::GlobalKeyListener;
use overtrace::logging;
use overtrace::session::OverlaySession;
use overtrace::settings::{Settings, SETTINGS_FILE};

fn main() -> anyhow::Result<()> {
    let settings = Settings::load(SETTINGS_FILE).unwrap_or_else(|err| {
        eprintln!("failed to read {SETTINGS_FILE}: {err}; using defaults");
        Settings::default()
    });
    logging::init(settings.debug_logging);

    let mut session = OverlaySession::new();
    if let Some(path) = std::env::args().nth(1).map(PathBuf::from) {
        session
            .load_image(&path)
            .with_context(|| format!("cannot load image '{}'", path.display()))?;
    }

    let mut listener = GlobalKeyListener::new();
    listener.start()?;

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_title("Overtrace")
            .with_inner_size([340.0, 560.0])
            .with_min_inner_size([300.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Overtrace",
        options,
        Box::new(move |_cc| Box::new(OvertraceApp::new(session, settings, listener))),
    )
    .map_err(|err| anyhow!("failed to start GUI: {err}"))
}
