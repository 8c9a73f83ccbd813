use std::collections::HashMap;

use eframe::egui;
use egui_toast::{Toast, ToastKind, ToastOptions, Toasts};

use crate::chunker::{Chunk, CHUNK_SIZE};
use crate::dispatch::{Keymap, OverlayAction};
use crate::hotkey::GlobalKeyListener;
use crate::session::OverlaySession;
use crate::settings::Settings;
use crate::surface::OverlaySurface;
use crate::view_state::{CalibratedRect, MAX_OPACITY, MAX_SCALE, MIN_OPACITY, MIN_SCALE};

const HIGHLIGHT_COLOR: egui::Color32 = egui::Color32::from_rgb(0xff, 0x33, 0x33);
const PIXEL_GRID_COLOR: egui::Color32 = egui::Color32::from_rgb(0x44, 0x44, 0x44);
const PICK_COLOR: egui::Color32 = egui::Color32::from_rgb(0x00, 0xff, 0xff);

/// Pixel grid lines are only worth drawing once a source pixel covers at
/// least this many screen pixels.
const PIXEL_GRID_MIN_STEP: f32 = 4.0;

fn overlay_viewport_id() -> egui::ViewportId {
    egui::ViewportId::from_hash_of("overtrace_overlay")
}

fn pick_viewport_id() -> egui::ViewportId {
    egui::ViewportId::from_hash_of("overtrace_calibration_pick")
}

/// Overlay surface backed by the egui overlay viewport. Visibility and
/// pointer passthrough go out as viewport commands the moment the state
/// transition runs; geometry and alpha follow declaratively each frame.
struct ViewportSurface<'a> {
    ctx: &'a egui::Context,
}

impl OverlaySurface for ViewportSurface<'_> {
    fn set_visible(&mut self, visible: bool) {
        self.ctx
            .send_viewport_cmd_to(overlay_viewport_id(), egui::ViewportCommand::Visible(visible));
    }

    fn set_passthrough(&mut self, enabled: bool) {
        self.ctx.send_viewport_cmd_to(
            overlay_viewport_id(),
            egui::ViewportCommand::MousePassthrough(enabled),
        );
    }
}

pub struct OvertraceApp {
    session: OverlaySession,
    settings: Settings,
    keymap: Keymap,
    listener: GlobalKeyListener,
    toasts: Toasts,
    chunk_textures: HashMap<usize, egui::TextureHandle>,
    preview_texture: Option<egui::TextureHandle>,
    pick_first_corner: Option<egui::Pos2>,
}

impl OvertraceApp {
    pub fn new(session: OverlaySession, settings: Settings, listener: GlobalKeyListener) -> Self {
        let keymap = settings.keymap();
        let mut session = session;
        session.view.set_opacity(settings.startup_opacity());

        Self {
            session,
            keymap,
            listener,
            toasts: Toasts::new()
                .anchor(egui::Align2::RIGHT_BOTTOM, (-10.0, -10.0))
                .direction(egui::Direction::BottomUp),
            chunk_textures: HashMap::new(),
            preview_texture: None,
            pick_first_corner: None,
            settings,
        }
    }

    fn notify_error(&mut self, text: String) {
        if self.settings.enable_toasts {
            self.toasts.add(Toast {
                text: text.into(),
                kind: ToastKind::Error,
                options: ToastOptions::default()
                    .duration_in_seconds(self.settings.toast_duration as f64),
            });
        }
    }

    fn apply_action(&mut self, ctx: &egui::Context, action: OverlayAction) {
        let mut surface = ViewportSurface { ctx };
        if let Err(err) = self.session.apply(action, &mut surface) {
            tracing::debug!(%err, ?action, "action rejected");
            self.notify_error(err.to_string());
        }
    }

    fn drain_hotkeys(&mut self, ctx: &egui::Context) {
        // The pick surface owns the keyboard while calibration is active.
        if self.session.calibration.is_active() {
            let _ = self.listener.drain_events();
            return;
        }

        for event in self.listener.drain_events() {
            if let Some(action) = self.keymap.action_for(event) {
                self.apply_action(ctx, action);
            }
        }
    }

    fn invalidate_textures(&mut self) {
        self.chunk_textures.clear();
        self.preview_texture = None;
    }

    fn load_image_from_dialog(&mut self) {
        let picked = rfd::FileDialog::new()
            .add_filter("Image Files", &["png", "jpg", "jpeg", "bmp", "gif"])
            .pick_file();
        let Some(path) = picked else {
            return;
        };

        match self.session.load_image(&path) {
            Ok(()) => self.invalidate_textures(),
            Err(err) => {
                tracing::warn!(%err, path = %path.display(), "image load failed");
                self.notify_error(err.to_string());
            }
        }
    }

    fn chunk_texture(&mut self, ctx: &egui::Context, index: usize, chunk: &Chunk) -> egui::TextureId {
        if let Some(tex) = self.chunk_textures.get(&index) {
            return tex.id();
        }
        let size = [chunk.width() as usize, chunk.height() as usize];
        let tex = ctx.load_texture(
            format!("chunk_{index}"),
            egui::ColorImage::from_rgba_unmultiplied(size, chunk.pixels.as_raw()),
            egui::TextureOptions::NEAREST,
        );
        let id = tex.id();
        self.chunk_textures.insert(index, tex);
        id
    }

    fn preview_texture(&mut self, ctx: &egui::Context) -> Option<egui::TextureHandle> {
        if self.preview_texture.is_none() {
            let image = self.session.image()?;
            let size = [image.width() as usize, image.height() as usize];
            let tex = ctx.load_texture(
                "preview",
                egui::ColorImage::from_rgba_unmultiplied(size, image.as_raw()),
                egui::TextureOptions::LINEAR,
            );
            self.preview_texture = Some(tex);
        }
        self.preview_texture.clone()
    }

    fn control_panel_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let total = self.session.chunk_count();
        let has_image = self.session.has_image();

        ui.heading("Overtrace");
        if !self.listener.is_capturing() {
            ui.colored_label(
                egui::Color32::YELLOW,
                "Global hotkeys unavailable; use the panel controls.",
            );
        }

        ui.separator();

        ui.add_enabled_ui(has_image, |ui| {
            ui.label("Chunk");
            let mut index = self.session.view.current_index;
            let max_index = total.saturating_sub(1);
            if ui
                .add(egui::Slider::new(&mut index, 0..=max_index))
                .changed()
            {
                self.session.view.set_chunk(index, total);
            }
            if has_image {
                ui.label(format!(
                    "Chunk: {}/{}",
                    self.session.view.current_index + 1,
                    total
                ));
            } else {
                ui.label("Chunk: -/-");
            }

            ui.add_space(8.0);

            ui.label("Opacity");
            let mut opacity = self.session.view.opacity;
            if ui
                .add(egui::Slider::new(&mut opacity, MIN_OPACITY..=MAX_OPACITY))
                .changed()
            {
                self.session.view.set_opacity(opacity);
            }

            ui.label("Scale");
            let mut scale = self.session.view.scale;
            if ui
                .add(egui::Slider::new(&mut scale, MIN_SCALE..=MAX_SCALE))
                .changed()
            {
                self.session.view.set_scale(scale);
            }
        });

        ui.add_space(8.0);

        ui.horizontal(|ui| {
            let mut single = self.session.view.single_chunk;
            if ui
                .add_enabled(has_image, egui::Checkbox::new(&mut single, "Single Chunk Mode"))
                .changed()
            {
                self.apply_action(ctx, OverlayAction::ToggleSingleChunk);
            }

            let calibrate_enabled = has_image && self.session.view.single_chunk;
            if ui
                .add_enabled(calibrate_enabled, egui::Button::new("Calibrate"))
                .clicked()
            {
                if let Err(err) = self.session.begin_calibration() {
                    self.notify_error(err.to_string());
                }
            }

            if ui.button("Load Image").clicked() {
                self.load_image_from_dialog();
            }
        });

        ui.horizontal(|ui| {
            let mut click_through = self.session.view.click_through;
            if ui
                .add_enabled(has_image, egui::Checkbox::new(&mut click_through, "Click-Through"))
                .changed()
            {
                self.apply_action(ctx, OverlayAction::ToggleClickThrough);
            }

            let mut visible = self.session.view.visible;
            if ui
                .add_enabled(has_image, egui::Checkbox::new(&mut visible, "Overlay Visible"))
                .changed()
            {
                self.apply_action(ctx, OverlayAction::ToggleVisible);
            }
        });

        ui.separator();
        self.preview_ui(ctx, ui);
        ui.separator();

        ui.small(
            "Hotkeys:\n\
             \u{2191}\u{2193}: Next/Prev Chunk\n\
             Ctrl +/-: Zoom\n\
             +/-: Opacity\n\
             R: Reset Scale\n\
             C: Click-Through\n\
             S: Single Chunk\n\
             Insert: Toggle Overlay",
        );
    }

    /// Scaled-down image with a highlight over the current chunk.
    fn preview_ui(&mut self, ctx: &egui::Context, ui: &mut egui::Ui) {
        let Some(texture) = self.preview_texture(ctx) else {
            ui.label("No image loaded");
            return;
        };
        let Some(grid) = self.session.grid() else {
            return;
        };

        let image_size = texture.size_vec2();
        let avail = egui::vec2(ui.available_width(), 140.0);
        let scale = (avail.x / image_size.x).min(avail.y / image_size.y).min(1.0);
        let shown = image_size * scale;

        let (rect, _) = ui.allocate_exact_size(shown, egui::Sense::hover());
        let painter = ui.painter_at(rect);
        painter.image(
            texture.id(),
            rect,
            egui::Rect::from_min_max(egui::pos2(0.0, 0.0), egui::pos2(1.0, 1.0)),
            egui::Color32::WHITE,
        );

        if let Some(chunk) = grid.get(self.session.view.current_index) {
            let cell = CHUNK_SIZE as f32 * scale;
            let min = rect.min
                + egui::vec2(chunk.col as f32 * cell, chunk.row as f32 * cell);
            let size = egui::vec2(
                chunk.width() as f32 * scale,
                chunk.height() as f32 * scale,
            );
            painter.rect_stroke(
                egui::Rect::from_min_size(min, size),
                0.0,
                egui::Stroke::new(2.0, HIGHLIGHT_COLOR),
            );
        }
    }

    /// The transparent always-on-top chunk window, driven by the current
    /// render command. Size and position follow the command every frame;
    /// a newer command simply wins over whatever was last shown.
    fn overlay_viewport(&mut self, ctx: &egui::Context) {
        let Some(cmd) = self.session.render() else {
            return;
        };

        let index = cmd.index;
        let chunk_size = (cmd.chunk.width(), cmd.chunk.height());
        let pos = egui::pos2(cmd.x, cmd.y);
        let size = egui::vec2(cmd.width_px.max(1.0), cmd.height_px.max(1.0));
        let alpha = cmd.alpha;
        let passthrough = cmd.passthrough;
        // Dragging repositions the shared offset, so it only applies while
        // the placement actually derives from it.
        let draggable = !passthrough
            && !(self.session.view.single_chunk
                && self.session.view.calibration_for(index).is_some());

        let chunk = cmd.chunk.clone();
        let texture_id = self.chunk_texture(ctx, index, &chunk);
        let view = &mut self.session.view;

        ctx.show_viewport_immediate(
            overlay_viewport_id(),
            egui::ViewportBuilder::default()
                .with_title("Overtrace Overlay")
                .with_decorations(false)
                .with_transparent(true)
                .with_always_on_top()
                .with_resizable(false)
                .with_taskbar(false)
                .with_position(pos)
                .with_inner_size(size)
                .with_mouse_passthrough(passthrough),
            move |ctx, _class| {
                ctx.send_viewport_cmd(egui::ViewportCommand::OuterPosition(pos));
                ctx.send_viewport_cmd(egui::ViewportCommand::InnerSize(size));

                egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, |ui| {
                        let rect = ui.max_rect();
                        let painter = ui.painter_at(rect);
                        let tint = egui::Color32::WHITE.gamma_multiply(alpha);
                        painter.image(
                            texture_id,
                            rect,
                            egui::Rect::from_min_max(
                                egui::pos2(0.0, 0.0),
                                egui::pos2(1.0, 1.0),
                            ),
                            tint,
                        );

                        draw_pixel_grid(&painter, rect, chunk_size, alpha);

                        if draggable {
                            let response = ui.interact(
                                rect,
                                egui::Id::new("overlay_drag"),
                                egui::Sense::drag(),
                            );
                            if response.dragged() {
                                let delta = response.drag_delta();
                                view.set_offset(pos.x + delta.x, pos.y + delta.y);
                            }
                        }
                    });
            },
        );
    }

    /// Full-screen pick surface: two clicks define opposite corners of the
    /// target rectangle, Escape cancels. The controller only ever sees the
    /// rectangle value.
    fn calibration_viewport(&mut self, ctx: &egui::Context) {
        if !self.session.calibration.is_active() {
            self.pick_first_corner = None;
            return;
        }

        let session = &mut self.session;
        let first_corner = &mut self.pick_first_corner;
        let mut pick_error: Option<String> = None;

        ctx.show_viewport_immediate(
            pick_viewport_id(),
            egui::ViewportBuilder::default()
                .with_title("Calibrate")
                .with_decorations(false)
                .with_transparent(true)
                .with_always_on_top()
                .with_fullscreen(true),
            |ctx, _class| {
                egui::CentralPanel::default()
                    .frame(egui::Frame::none())
                    .show(ctx, |ui| {
                        let rect = ui.max_rect();
                        let painter = ui.painter_at(rect);
                        painter.rect_filled(rect, 0.0, egui::Color32::from_black_alpha(60));
                        painter.text(
                            rect.center_top() + egui::vec2(0.0, 24.0),
                            egui::Align2::CENTER_CENTER,
                            "Click two opposite corners of the target area (Esc cancels)",
                            egui::FontId::proportional(16.0),
                            egui::Color32::WHITE,
                        );

                        let (escape, clicked, pointer) = ctx.input(|i| {
                            (
                                i.key_pressed(egui::Key::Escape),
                                i.pointer.primary_clicked(),
                                i.pointer.latest_pos(),
                            )
                        });

                        if escape {
                            *first_corner = None;
                            if let Err(err) = session.cancel_calibration() {
                                pick_error = Some(err.to_string());
                            }
                            return;
                        }

                        if let (Some(first), Some(current)) = (*first_corner, pointer) {
                            let preview = rect_from_corners(first, current);
                            painter.rect_stroke(
                                egui::Rect::from_min_size(
                                    egui::pos2(preview.x, preview.y),
                                    egui::vec2(preview.width, preview.height),
                                ),
                                0.0,
                                egui::Stroke::new(2.0, HIGHLIGHT_COLOR),
                            );
                            if let Err(err) = session.calibration.update_rect(preview) {
                                pick_error = Some(err.to_string());
                            }
                        }

                        if let Some(first) = *first_corner {
                            draw_crosshair(&painter, first);
                        }

                        if clicked {
                            if let Some(point) = pointer {
                                match *first_corner {
                                    None => *first_corner = Some(point),
                                    Some(first) => {
                                        let picked = rect_from_corners(first, point);
                                        *first_corner = None;
                                        let result = session
                                            .calibration
                                            .update_rect(picked)
                                            .and_then(|()| session.commit_calibration());
                                        if let Err(err) = result {
                                            pick_error = Some(err.to_string());
                                        }
                                    }
                                }
                            }
                        }
                    });
            },
        );

        if let Some(err) = pick_error {
            self.notify_error(err);
        }
    }
}

fn rect_from_corners(a: egui::Pos2, b: egui::Pos2) -> CalibratedRect {
    CalibratedRect {
        x: a.x.min(b.x),
        y: a.y.min(b.y),
        width: (a.x - b.x).abs(),
        height: (a.y - b.y).abs(),
    }
}

fn draw_crosshair(painter: &egui::Painter, at: egui::Pos2) {
    let stroke = egui::Stroke::new(2.0, PICK_COLOR);
    painter.line_segment([at - egui::vec2(10.0, 0.0), at + egui::vec2(10.0, 0.0)], stroke);
    painter.line_segment([at - egui::vec2(0.0, 10.0), at + egui::vec2(0.0, 10.0)], stroke);
}

/// Grid lines at source-pixel boundaries over the enlarged chunk.
fn draw_pixel_grid(
    painter: &egui::Painter,
    rect: egui::Rect,
    chunk_size: (u32, u32),
    alpha: f32,
) {
    let (chunk_w, chunk_h) = chunk_size;
    if chunk_w == 0 || chunk_h == 0 {
        return;
    }
    let step_x = rect.width() / chunk_w as f32;
    let step_y = rect.height() / chunk_h as f32;
    if step_x < PIXEL_GRID_MIN_STEP || step_y < PIXEL_GRID_MIN_STEP {
        return;
    }

    let stroke = egui::Stroke::new(1.0, PIXEL_GRID_COLOR.gamma_multiply(alpha));
    for i in 1..chunk_w {
        let x = rect.left() + i as f32 * step_x;
        painter.line_segment([egui::pos2(x, rect.top()), egui::pos2(x, rect.bottom())], stroke);
    }
    for i in 1..chunk_h {
        let y = rect.top() + i as f32 * step_y;
        painter.line_segment([egui::pos2(rect.left(), y), egui::pos2(rect.right(), y)], stroke);
    }
}

impl eframe::App for OvertraceApp {
    fn clear_color(&self, _visuals: &egui::Visuals) -> [f32; 4] {
        // Secondary viewports are transparent; the panel paints its own fill.
        [0.0, 0.0, 0.0, 0.0]
    }

    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.drain_hotkeys(ctx);

        egui::CentralPanel::default().show(ctx, |ui| {
            self.control_panel_ui(ctx, ui);
        });

        if self.session.has_image() && self.session.view.visible {
            self.overlay_viewport(ctx);
        }

        self.calibration_viewport(ctx);
        self.toasts.show(ctx);

        // Hotkeys arrive on their own thread; keep polling even when idle.
        ctx.request_repaint_after(std::time::Duration::from_millis(50));
    }
}
