use image::RgbaImage;
use overtrace::dispatch::OverlayAction;
use overtrace::error::OverlayError;
use overtrace::session::OverlaySession;
use overtrace::view_state::CalibratedRect;

#[path = "recording_surface.rs"]
mod recording_surface;
use recording_surface::RecordingSurface;

fn session_with_grid(width: u32, height: u32) -> OverlaySession {
    let mut session = OverlaySession::new();
    session
        .load_decoded(RgbaImage::new(width, height))
        .expect("grid should build");
    session
}

#[test]
fn next_chunk_stops_at_the_last_index() {
    // 100x40 splits into 4x2 cells.
    let mut session = session_with_grid(100, 40);
    let mut surface = RecordingSurface::new();
    assert_eq!(session.chunk_count(), 8);

    for _ in 0..20 {
        session
            .apply(OverlayAction::NextChunk, &mut surface)
            .expect("action should apply");
    }
    assert_eq!(session.view.current_index, 7);
}

#[test]
fn prev_chunk_stops_at_zero() {
    let mut session = session_with_grid(100, 40);
    let mut surface = RecordingSurface::new();

    session
        .apply(OverlayAction::NextChunk, &mut surface)
        .expect("action should apply");
    for _ in 0..5 {
        session
            .apply(OverlayAction::PrevChunk, &mut surface)
            .expect("action should apply");
    }
    assert_eq!(session.view.current_index, 0);
}

#[test]
fn set_chunk_clamps_to_the_grid() {
    let mut session = session_with_grid(100, 40);
    session.view.set_chunk(100, session.chunk_count());
    assert_eq!(session.view.current_index, 7);
}

#[test]
fn actions_are_rejected_before_the_first_load() {
    let mut session = OverlaySession::new();
    let mut surface = RecordingSurface::new();

    for action in [
        OverlayAction::NextChunk,
        OverlayAction::ToggleVisible,
        OverlayAction::ToggleClickThrough,
        OverlayAction::ScaleUp,
    ] {
        assert_eq!(
            session.apply(action, &mut surface),
            Err(OverlayError::NoImageLoaded)
        );
    }

    // A rejected action must not reach the surface.
    assert!(surface.visible_calls.is_empty());
    assert!(surface.passthrough_calls.is_empty());
    assert!(session.render().is_none());
}

#[test]
fn reload_resets_position_but_keeps_view_settings() {
    let mut session = session_with_grid(100, 40);
    let mut surface = RecordingSurface::new();

    session.view.set_scale(3.0);
    session.view.set_opacity(0.4);
    session
        .apply(OverlayAction::ToggleSingleChunk, &mut surface)
        .expect("action should apply");
    session.view.set_chunk(5, session.chunk_count());
    session.view.set_calibration(
        5,
        CalibratedRect {
            x: 10.0,
            y: 10.0,
            width: 64.0,
            height: 64.0,
        },
    );

    session
        .load_decoded(RgbaImage::new(64, 64))
        .expect("grid should build");

    assert_eq!(session.view.current_index, 0);
    assert_eq!(session.view.calibration_for(5), None);
    assert_eq!(session.view.scale, 3.0);
    assert_eq!(session.view.opacity, 0.4);
    assert!(session.view.single_chunk);
}
