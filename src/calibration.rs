use crate::error::OverlayError;
use crate::view_state::CalibratedRect;

/// Transient state for one full-screen pick. Exists only while calibration
/// is active and is dropped wholesale on commit or cancel.
#[derive(Debug, Clone, PartialEq)]
pub struct CalibrationSession {
    /// The chunk the pick was started for. Commit always targets this index,
    /// even if navigation moved the current index while the pick was open.
    pub chunk_index: usize,
    pub rect: Option<CalibratedRect>,
}

/// State machine for the full-screen calibration pick:
/// `Idle -> Active -> {commit, cancel} -> Idle`.
///
/// Invalid transitions fail with an error rather than being silently
/// swallowed; the controller tracks the picked rectangle value only and does
/// no rendering math of its own.
#[derive(Debug, Default)]
pub struct CalibrationController {
    session: Option<CalibrationSession>,
}

impl CalibrationController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&CalibrationSession> {
        self.session.as_ref()
    }

    /// Enter the Active state for the given chunk. Re-entrant starts are
    /// rejected.
    pub fn begin(&mut self, chunk_index: usize) -> Result<(), OverlayError> {
        if self.session.is_some() {
            return Err(OverlayError::CalibrationInProgress);
        }
        tracing::debug!(chunk_index, "calibration started");
        self.session = Some(CalibrationSession {
            chunk_index,
            rect: None,
        });
        Ok(())
    }

    /// Track the in-progress pick rectangle.
    pub fn update_rect(&mut self, rect: CalibratedRect) -> Result<(), OverlayError> {
        match self.session.as_mut() {
            Some(session) => {
                session.rect = Some(rect);
                Ok(())
            }
            None => Err(OverlayError::CalibrationNotActive),
        }
    }

    /// Finish the pick and return the target index with its rectangle.
    ///
    /// A degenerate pick (no rectangle, or zero area) commits nothing and
    /// yields `Ok(None)` so a prior calibration for the index stays intact.
    pub fn commit(&mut self) -> Result<Option<(usize, CalibratedRect)>, OverlayError> {
        let session = self
            .session
            .take()
            .ok_or(OverlayError::CalibrationNotActive)?;

        match session.rect {
            Some(rect) if rect.width > 0.0 && rect.height > 0.0 => {
                tracing::debug!(chunk_index = session.chunk_index, "calibration committed");
                Ok(Some((session.chunk_index, rect)))
            }
            _ => {
                tracing::debug!(
                    chunk_index = session.chunk_index,
                    "calibration finished without a usable rectangle"
                );
                Ok(None)
            }
        }
    }

    /// Discard the pick. Any previously committed rectangle for the index is
    /// left untouched.
    pub fn cancel(&mut self) -> Result<(), OverlayError> {
        match self.session.take() {
            Some(session) => {
                tracing::debug!(chunk_index = session.chunk_index, "calibration cancelled");
                Ok(())
            }
            None => Err(OverlayError::CalibrationNotActive),
        }
    }
}
