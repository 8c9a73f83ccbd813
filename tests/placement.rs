use image::RgbaImage;
use overtrace::chunker::ChunkGrid;
use overtrace::placement::render;
use overtrace::view_state::{CalibratedRect, ViewState};

fn grid(width: u32, height: u32) -> ChunkGrid {
    ChunkGrid::build(&RgbaImage::new(width, height)).expect("grid should build")
}

#[test]
fn grid_mode_places_at_offset_scaled() {
    let grid = grid(64, 64);
    let mut view = ViewState::new();
    view.set_offset(50.0, 60.0);
    view.set_scale(2.0);

    let cmd = render(&view, &grid);
    assert_eq!((cmd.x, cmd.y), (50.0, 60.0));
    assert_eq!((cmd.width_px, cmd.height_px), (64.0, 64.0));
    assert_eq!(cmd.alpha, view.opacity);
    assert!(!cmd.passthrough);
}

#[test]
fn calibrated_rect_is_used_directly_in_single_chunk_mode() {
    let grid = grid(64, 64);
    let mut view = ViewState::new();
    view.toggle_single_chunk();
    view.set_calibration(
        0,
        CalibratedRect {
            x: 10.0,
            y: 20.0,
            width: 33.0,
            height: 44.0,
        },
    );
    // Scale must not leak into a calibrated placement.
    view.set_scale(5.0);

    let cmd = render(&view, &grid);
    assert_eq!((cmd.x, cmd.y), (10.0, 20.0));
    assert_eq!((cmd.width_px, cmd.height_px), (33.0, 44.0));
}

#[test]
fn calibration_is_ignored_outside_single_chunk_mode() {
    let grid = grid(64, 64);
    let mut view = ViewState::new();
    view.set_calibration(
        0,
        CalibratedRect {
            x: 10.0,
            y: 20.0,
            width: 33.0,
            height: 44.0,
        },
    );

    let cmd = render(&view, &grid);
    assert_eq!((cmd.x, cmd.y), view.offset);
    assert_eq!((cmd.width_px, cmd.height_px), (32.0, 32.0));
}

#[test]
fn uncalibrated_single_chunk_falls_back_to_the_grid_formula() {
    let grid = grid(64, 64);
    let mut view = ViewState::new();
    view.toggle_single_chunk();
    view.set_scale(3.0);

    let cmd = render(&view, &grid);
    assert_eq!((cmd.x, cmd.y), view.offset);
    assert_eq!((cmd.width_px, cmd.height_px), (96.0, 96.0));
}

#[test]
fn edge_chunks_scale_their_cropped_size() {
    // 40x40 gives 8x8 remainder cells on the right and bottom.
    let grid = grid(40, 40);
    let mut view = ViewState::new();
    view.set_chunk(3, grid.len());
    view.set_scale(2.0);

    let cmd = render(&view, &grid);
    assert_eq!((cmd.chunk.row, cmd.chunk.col), (1, 1));
    assert_eq!((cmd.width_px, cmd.height_px), (16.0, 16.0));
}

#[test]
fn hundred_by_seventy_image_renders_as_expected() {
    let grid = grid(100, 70);
    assert_eq!((grid.cols(), grid.rows()), (4, 3));
    assert_eq!(grid.len(), 12);

    let corner = grid.get(grid.index_of(2, 3)).expect("corner chunk exists");
    assert_eq!((corner.width(), corner.height()), (4, 6));

    let mut view = ViewState::new();
    view.set_scale(3.0);
    view.set_opacity(0.5);

    let cmd = render(&view, &grid);
    assert_eq!(cmd.index, 0);
    assert_eq!((cmd.width_px, cmd.height_px), (96.0, 96.0));
    assert_eq!(cmd.alpha, 0.5);
}

#[test]
fn identical_inputs_yield_identical_commands() {
    let grid = grid(100, 70);
    let mut view = ViewState::new();
    view.set_chunk(4, grid.len());
    view.set_scale(2.5);
    view.set_opacity(0.3);

    assert_eq!(render(&view, &grid), render(&view, &grid));
}
