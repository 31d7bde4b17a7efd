//! egui layer drawn on top of the sprite pass.
//!
//! Two jobs share one egui context: painting game text (menu title, button
//! labels, help line) at world positions, and the F3 debug window. egui
//! rendering is split into phases because `egui_wgpu::Renderer::render()`
//! needs a `RenderPass<'static>` while `begin_render_pass` borrows the encoder:
//!
//!   1. `prepare()` -- run UI logic, produce tessellated primitives
//!   2. `upload()`  -- upload textures and update GPU buffers
//!   3. `paint()`   -- render into a pass created with `forget_lifetime()`
//!   4. `cleanup()` -- free textures egui no longer references

use alien_core::time::TimeState;
use winit::window::Window;

#[derive(Debug, Clone, Default)]
pub struct OverlayStats {
    pub mode_label: String,
    pub body_position: [f32; 2],
    pub vertical_velocity: f32,
    pub on_ground: bool,
    pub sprite_id: String,
    pub platform_count: u32,
    pub draw_calls: u32,
    pub quad_count: u32,
    pub music_enabled: bool,
    pub sound_enabled: bool,
}

/// Text centered on a world-space point. Font size is in world units and
/// scales with the window like the sprites do.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLabel {
    pub text: String,
    pub center: [f32; 2],
    pub font_size: f32,
    pub color: [f32; 4],
}

pub struct DebugOverlay {
    pub egui_ctx: egui::Context,
    pub egui_winit_state: egui_winit::State,
    pub egui_renderer: egui_wgpu::Renderer,
    pub visible: bool,
    world_size: [f32; 2],
}

impl DebugOverlay {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
        world_size: [f32; 2],
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            None,
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            visible: false,
            world_size,
        }
    }

    pub fn set_world_size(&mut self, world_size: [f32; 2]) {
        self.world_size = world_size;
    }

    pub fn handle_window_event(
        &mut self,
        window: &Window,
        event: &winit::event::WindowEvent,
    ) -> bool {
        let response = self.egui_winit_state.on_window_event(window, event);
        // Only claim input while the debug window is up; game text is inert.
        self.visible && response.consumed
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
        log::info!("Debug overlay: {}", if self.visible { "ON" } else { "OFF" });
    }

    pub fn prepare(
        &mut self,
        window: &Window,
        time: &TimeState,
        stats: &OverlayStats,
        labels: &[TextLabel],
    ) -> (Vec<egui::ClippedPrimitive>, egui::TexturesDelta) {
        let raw_input = self.egui_winit_state.take_egui_input(window);
        let world_size = self.world_size;
        let visible = self.visible;
        let full_output = self.egui_ctx.run(raw_input, |ctx| {
            paint_labels(ctx, world_size, labels);
            if visible {
                show_debug_window(ctx, time, stats);
            }
        });

        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        (primitives, full_output.textures_delta)
    }

    /// Upload textures and update buffers. Call before creating the egui render pass.
    pub fn upload(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        primitives: &[egui::ClippedPrimitive],
        textures_delta: &egui::TexturesDelta,
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        for (id, image_delta) in &textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }

        self.egui_renderer
            .update_buffers(device, queue, encoder, primitives, screen_descriptor);
    }

    /// Render into an existing render pass. Call after `upload()`.
    pub fn paint(
        &self,
        render_pass: &mut wgpu::RenderPass<'static>,
        primitives: &[egui::ClippedPrimitive],
        screen_descriptor: &egui_wgpu::ScreenDescriptor,
    ) {
        self.egui_renderer
            .render(render_pass, primitives, screen_descriptor);
    }

    /// Free textures that egui no longer needs. Call after rendering.
    pub fn cleanup(&mut self, textures_delta: &egui::TexturesDelta) {
        for id in &textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}

fn paint_labels(ctx: &egui::Context, world_size: [f32; 2], labels: &[TextLabel]) {
    if labels.is_empty() {
        return;
    }
    let screen = ctx.screen_rect();
    let painter = ctx.layer_painter(egui::LayerId::background());
    for label in labels {
        let (pos, font_size) = world_to_points(label, world_size, [screen.width(), screen.height()]);
        painter.text(
            egui::pos2(screen.min.x + pos[0], screen.min.y + pos[1]),
            egui::Align2::CENTER_CENTER,
            &label.text,
            egui::FontId::proportional(font_size),
            to_color32(label.color),
        );
    }
}

fn show_debug_window(ctx: &egui::Context, time: &TimeState, stats: &OverlayStats) {
    egui::Window::new("Debug")
        .default_pos([10.0, 10.0])
        .show(ctx, |ui| {
            ui.label(format!("FPS: {:.1}", time.smoothed_fps));
            ui.label(format!("Frame time: {:.2} ms", time.smoothed_frame_time_ms));
            ui.label(format!("Steps this frame: {}", time.steps_this_frame));
            ui.label(format!("Total steps: {}", time.fixed_step_count));

            ui.separator();
            ui.label(format!("Mode: {}", stats.mode_label));
            ui.label(format!(
                "Position: ({:.1}, {:.1})",
                stats.body_position[0], stats.body_position[1]
            ));
            ui.label(format!("Vertical velocity: {:.2}", stats.vertical_velocity));
            ui.label(format!("On ground: {}", stats.on_ground));
            ui.label(format!("Sprite: {}", stats.sprite_id));

            ui.separator();
            ui.label(format!("Platforms: {}", stats.platform_count));
            ui.label(format!("Quads: {}", stats.quad_count));
            ui.label(format!("Draw calls: {}", stats.draw_calls));
            ui.label(format!(
                "Music: {} / Sound: {}",
                on_off(stats.music_enabled),
                on_off(stats.sound_enabled)
            ));
        });
}

/// Scale a world-space label into egui points for a screen of `screen_size`.
fn world_to_points(label: &TextLabel, world_size: [f32; 2], screen_size: [f32; 2]) -> ([f32; 2], f32) {
    let sx = screen_size[0] / world_size[0].max(1.0);
    let sy = screen_size[1] / world_size[1].max(1.0);
    (
        [label.center[0] * sx, label.center[1] * sy],
        (label.font_size * sy).max(1.0),
    )
}

fn to_color32(color: [f32; 4]) -> egui::Color32 {
    let channel = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
    egui::Color32::from_rgba_unmultiplied(
        channel(color[0]),
        channel(color[1]),
        channel(color[2]),
        channel(color[3]),
    )
}

fn on_off(enabled: bool) -> &'static str {
    if enabled {
        "on"
    } else {
        "off"
    }
}
