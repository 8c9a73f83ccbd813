pub mod calibration;
pub mod chunker;
pub mod dispatch;
pub mod error;
pub mod gui;
pub mod hotkey;
pub mod logging;
pub mod placement;
pub mod session;
pub mod settings;
pub mod surface;
pub mod view_state;
