use std::path::{Path, PathBuf};

use image::RgbaImage;

use crate::calibration::CalibrationController;
use crate::chunker::ChunkGrid;
use crate::dispatch::OverlayAction;
use crate::error::OverlayError;
use crate::placement::{self, RenderCommand};
use crate::surface::OverlaySurface;
use crate::view_state::{ViewState, OPACITY_STEP, SCALE_STEP};

/// Owns the decoded image, its chunk grid, the view state and the
/// calibration controller for one run of the app.
///
/// Every mutation, whether it comes from a hotkey or a panel widget, goes
/// through this type on the GUI thread, so reads of scale/opacity/placement
/// can never observe a half-applied transition.
pub struct OverlaySession {
    image: Option<RgbaImage>,
    grid: Option<ChunkGrid>,
    source_path: Option<PathBuf>,
    pub view: ViewState,
    pub calibration: CalibrationController,
}

impl Default for OverlaySession {
    fn default() -> Self {
        Self::new()
    }
}

impl OverlaySession {
    pub fn new() -> Self {
        Self {
            image: None,
            grid: None,
            source_path: None,
            view: ViewState::new(),
            calibration: CalibrationController::new(),
        }
    }

    /// Decode an image file and rebuild the grid from it.
    pub fn load_image(&mut self, path: &Path) -> Result<(), OverlayError> {
        if !path.exists() {
            return Err(OverlayError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let decoded = image::open(path).map_err(|err| match err {
            image::ImageError::IoError(io)
                if io.kind() == std::io::ErrorKind::NotFound =>
            {
                OverlayError::FileNotFound {
                    path: path.to_path_buf(),
                }
            }
            other => OverlayError::UnsupportedFormat {
                path: path.to_path_buf(),
                reason: other.to_string(),
            },
        })?;

        self.load_decoded(decoded.to_rgba8())?;
        self.source_path = Some(path.to_path_buf());
        tracing::info!(path = %path.display(), "image loaded");
        Ok(())
    }

    /// Replace the session image with an already-decoded buffer.
    ///
    /// The grid is rebuilt, the chunk index resets to 0 and calibrated
    /// placements are invalidated (chunk geometry may have changed); scale,
    /// opacity and the mode flags carry over. Nothing is touched when the
    /// grid cannot be built.
    pub fn load_decoded(&mut self, image: RgbaImage) -> Result<(), OverlayError> {
        let grid = ChunkGrid::build(&image)?;
        self.image = Some(image);
        self.grid = Some(grid);
        self.source_path = None;
        self.view.reset_for_new_grid();
        Ok(())
    }

    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    pub fn grid(&self) -> Option<&ChunkGrid> {
        self.grid.as_ref()
    }

    pub fn source_path(&self) -> Option<&Path> {
        self.source_path.as_deref()
    }

    pub fn chunk_count(&self) -> usize {
        self.grid.as_ref().map_or(0, ChunkGrid::len)
    }

    pub fn has_image(&self) -> bool {
        self.grid.is_some()
    }

    /// Apply one state transition. Fails with `NoImageLoaded` before the
    /// first load, leaving everything untouched.
    ///
    /// Click-through and visibility changes propagate to the surface from
    /// inside this call, before the caller gets a chance to render, so the
    /// window's pointer behavior is never stale relative to the state.
    pub fn apply(
        &mut self,
        action: OverlayAction,
        surface: &mut dyn OverlaySurface,
    ) -> Result<(), OverlayError> {
        let total = self
            .grid
            .as_ref()
            .ok_or(OverlayError::NoImageLoaded)?
            .len();

        match action {
            OverlayAction::NextChunk => self.view.next_chunk(total),
            OverlayAction::PrevChunk => self.view.prev_chunk(total),
            OverlayAction::OpacityUp => self.view.adjust_opacity(OPACITY_STEP),
            OverlayAction::OpacityDown => self.view.adjust_opacity(-OPACITY_STEP),
            OverlayAction::ScaleUp => self.view.adjust_scale(SCALE_STEP),
            OverlayAction::ScaleDown => self.view.adjust_scale(-SCALE_STEP),
            OverlayAction::ResetScale => self.view.reset_scale(),
            OverlayAction::ToggleSingleChunk => {
                self.view.toggle_single_chunk();
            }
            OverlayAction::ToggleClickThrough => {
                let enabled = self.view.toggle_click_through();
                surface.set_passthrough(enabled);
            }
            OverlayAction::ToggleVisible => {
                let visible = self.view.toggle_visible();
                surface.set_visible(visible);
            }
        }

        Ok(())
    }

    /// Start a calibration pick for the currently selected chunk.
    pub fn begin_calibration(&mut self) -> Result<(), OverlayError> {
        if self.grid.is_none() {
            return Err(OverlayError::NoImageLoaded);
        }
        self.calibration.begin(self.view.current_index)
    }

    /// Commit the active pick into the view state, keyed by the chunk index
    /// that was current when the pick started.
    pub fn commit_calibration(&mut self) -> Result<(), OverlayError> {
        if let Some((index, rect)) = self.calibration.commit()? {
            self.view.set_calibration(index, rect);
        }
        Ok(())
    }

    pub fn cancel_calibration(&mut self) -> Result<(), OverlayError> {
        self.calibration.cancel()
    }

    /// Current render command, or `None` before the first load.
    pub fn render(&self) -> Option<RenderCommand<'_>> {
        self.grid
            .as_ref()
            .map(|grid| placement::render(&self.view, grid))
    }
}
