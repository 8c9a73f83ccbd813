use crate::chunker::{Chunk, ChunkGrid};
use crate::view_state::ViewState;

/// Everything the overlay surface needs for one frame: which pixels to show,
/// where, at what size, and the alpha/passthrough flags to apply.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderCommand<'a> {
    pub index: usize,
    pub chunk: &'a Chunk,
    pub x: f32,
    pub y: f32,
    pub width_px: f32,
    pub height_px: f32,
    pub alpha: f32,
    pub passthrough: bool,
}

/// Compute the screen rectangle and render parameters for the current chunk.
///
/// Pure function of its inputs; callers re-run it after every committed
/// state change and identical inputs always yield an identical command.
///
/// In single-chunk mode a calibrated rectangle wins outright: calibration
/// fixes where on screen the chunk sits, independent of `scale`. Without a
/// calibration for the current index the grid formula is used as a fallback
/// so the chunk stays visible before the first calibration.
pub fn render<'a>(view: &ViewState, grid: &'a ChunkGrid) -> RenderCommand<'a> {
    let index = view.current_index.min(grid.len().saturating_sub(1));
    let chunk = grid.get(index).expect("chunk index is clamped to the grid");

    let calibrated = if view.single_chunk {
        view.calibration_for(index)
    } else {
        None
    };

    let (x, y, width_px, height_px) = match calibrated {
        Some(rect) => (rect.x, rect.y, rect.width, rect.height),
        None => (
            view.offset.0,
            view.offset.1,
            chunk.width() as f32 * view.scale,
            chunk.height() as f32 * view.scale,
        ),
    };

    RenderCommand {
        index,
        chunk,
        x,
        y,
        width_px,
        height_px,
        alpha: view.opacity,
        passthrough: view.click_through,
    }
}
