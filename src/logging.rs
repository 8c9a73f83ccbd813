use tracing_subscriber::EnvFilter;

/// The windowing stack logs a lot at info level; keep it at warn so hotkey
/// and calibration traces stay readable.
const QUIET_DEPS: &str = "winit=warn,eframe=warn,egui_glow=warn";

fn default_directives(debug: bool) -> String {
    let level = if debug { "debug" } else { "info" };
    format!("{level},{QUIET_DEPS}")
}

/// Initialise logging. `RUST_LOG` wins when set; otherwise the app logs at
/// `info`, raised to `debug` by the `debug_logging` settings flag.
pub fn init(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(debug)));

    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
