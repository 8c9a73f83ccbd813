use std::collections::HashMap;

pub const MIN_SCALE: f32 = 1.0;
pub const MAX_SCALE: f32 = 15.0;
pub const MIN_OPACITY: f32 = 0.0;
pub const MAX_OPACITY: f32 = 1.0;

pub const DEFAULT_SCALE: f32 = 1.0;
pub const DEFAULT_OPACITY: f32 = 0.7;
pub const OPACITY_STEP: f32 = 0.1;
pub const SCALE_STEP: f32 = 0.1;

/// Free-floating overlay position used outside single-chunk mode.
pub const DEFAULT_OFFSET: (f32, f32) = (200.0, 200.0);

/// Screen rectangle recorded by calibration for one chunk index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CalibratedRect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// The single source of truth for what the overlay shows and how.
///
/// Transitions clamp at their bounds instead of failing; the "no image
/// loaded" gate lives in the session, which owns the grid and this state
/// together.
#[derive(Debug, Clone)]
pub struct ViewState {
    pub current_index: usize,
    pub scale: f32,
    pub opacity: f32,
    pub click_through: bool,
    pub single_chunk: bool,
    pub visible: bool,
    pub offset: (f32, f32),
    calibrated: HashMap<usize, CalibratedRect>,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            current_index: 0,
            scale: DEFAULT_SCALE,
            opacity: DEFAULT_OPACITY,
            click_through: false,
            single_chunk: false,
            visible: true,
            offset: DEFAULT_OFFSET,
            calibrated: HashMap::new(),
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advance to the next chunk, clamping at the last index (no wrap).
    pub fn next_chunk(&mut self, total: usize) {
        if total == 0 {
            return;
        }
        self.current_index = (self.current_index + 1).min(total - 1);
    }

    /// Step back one chunk, clamping at index 0 (no wrap).
    pub fn prev_chunk(&mut self, _total: usize) {
        self.current_index = self.current_index.saturating_sub(1);
    }

    pub fn set_chunk(&mut self, index: usize, total: usize) {
        if total == 0 {
            return;
        }
        self.current_index = index.min(total - 1);
    }

    pub fn adjust_opacity(&mut self, delta: f32) {
        self.opacity = (self.opacity + delta).clamp(MIN_OPACITY, MAX_OPACITY);
    }

    pub fn set_opacity(&mut self, value: f32) {
        self.opacity = value.clamp(MIN_OPACITY, MAX_OPACITY);
    }

    pub fn adjust_scale(&mut self, delta: f32) {
        self.scale = (self.scale + delta).clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn set_scale(&mut self, value: f32) {
        self.scale = value.clamp(MIN_SCALE, MAX_SCALE);
    }

    pub fn reset_scale(&mut self) {
        self.scale = DEFAULT_SCALE;
    }

    /// Flip single-chunk mode. Any calibrated rectangles are kept so the
    /// mode can be re-entered without recalibrating.
    pub fn toggle_single_chunk(&mut self) -> bool {
        self.single_chunk = !self.single_chunk;
        self.single_chunk
    }

    pub fn toggle_click_through(&mut self) -> bool {
        self.click_through = !self.click_through;
        self.click_through
    }

    pub fn toggle_visible(&mut self) -> bool {
        self.visible = !self.visible;
        self.visible
    }

    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.offset = (x, y);
    }

    pub fn set_calibration(&mut self, index: usize, rect: CalibratedRect) {
        self.calibrated.insert(index, rect);
    }

    pub fn calibration_for(&self, index: usize) -> Option<CalibratedRect> {
        self.calibrated.get(&index).copied()
    }

    /// Reset the parts of the state that are tied to one particular grid.
    /// Scale, opacity and the mode flags survive an image reload; the chunk
    /// index and calibrated rectangles do not, since the grid geometry may
    /// have changed.
    pub fn reset_for_new_grid(&mut self) {
        self.current_index = 0;
        self.calibrated.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn opacity_clamps_under_repeated_adjustment() {
        let mut view = ViewState::new();

        for _ in 0..20 {
            view.adjust_opacity(-OPACITY_STEP);
        }
        assert_eq!(view.opacity, MIN_OPACITY);
        view.adjust_opacity(-OPACITY_STEP);
        assert_eq!(view.opacity, MIN_OPACITY);

        for _ in 0..30 {
            view.adjust_opacity(OPACITY_STEP);
        }
        assert_eq!(view.opacity, MAX_OPACITY);
        view.adjust_opacity(OPACITY_STEP);
        assert_eq!(view.opacity, MAX_OPACITY);
    }

    #[test]
    fn scale_clamps_under_repeated_adjustment() {
        let mut view = ViewState::new();

        for _ in 0..20 {
            view.adjust_scale(-SCALE_STEP);
        }
        assert_eq!(view.scale, MIN_SCALE);

        for _ in 0..200 {
            view.adjust_scale(SCALE_STEP);
        }
        assert_eq!(view.scale, MAX_SCALE);
        view.adjust_scale(SCALE_STEP);
        assert_eq!(view.scale, MAX_SCALE);
    }
}
