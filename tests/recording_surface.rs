use overtrace::surface::OverlaySurface;

/// Test double that records every propagation the session makes.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    pub visible_calls: Vec<bool>,
    pub passthrough_calls: Vec<bool>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl OverlaySurface for RecordingSurface {
    fn set_visible(&mut self, visible: bool) {
        self.visible_calls.push(visible);
    }

    fn set_passthrough(&mut self, enabled: bool) {
        self.passthrough_calls.push(enabled);
    }
}
