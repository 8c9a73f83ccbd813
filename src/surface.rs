/// Contract the overlay window has to satisfy beyond plain drawing.
///
/// `set_passthrough` is called synchronously from inside the click-through
/// transition, before any render is dispatched, so the OS sees the new
/// pointer behavior before the next pointer event. `set_visible` likewise
/// propagates immediately; hiding the surface never destroys it.
pub trait OverlaySurface {
    fn set_visible(&mut self, visible: bool);
    fn set_passthrough(&mut self, enabled: bool);
}
