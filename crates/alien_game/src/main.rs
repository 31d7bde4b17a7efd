//! Alien Adventure -- main loop and application entry point.
//!
//! winit drives the event loop via `ApplicationHandler`. All simulation runs
//! inside `RedrawRequested` on a fixed timestep (see `TimeState`):
//!
//!   1. `begin_frame()` -- measure wall-clock delta, feed accumulator
//!   2. `while should_step()` -- edge input and menu clicks go to the mode
//!      driver on the first step, then the controller ticks (Play only)
//!   3. Effects returned by the driver are dispatched to audio or the loop
//!   4. The mode's draw list becomes a sprite mesh plus overlay text
//!
//! Hot reload: the config and level JSON are watched via mtime polling and
//! reloaded at frame boundaries. `R` forces both.

mod animation;
mod audio;
mod config;
mod controller;
mod draw;
mod effect;
mod level;
mod mesh;
mod mode;
mod physics;
mod platform;
#[cfg(test)]
mod replay;

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use wgpu::util::DeviceExt;
use winit::application::ApplicationHandler;
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::window::{Window, WindowId};

use alien_core::input::{InputState, Key, MouseBtn};
use alien_core::time::TimeState;
use alien_core::watch::ContentWatcher;
use alien_devtools::{DebugOverlay, OverlayStats};
use alien_render::{Camera2D, GpuContext, SpritePipeline, SpriteVertex, Texture};
use audio::{AudioSink, NullAudio, RodioAudio};
use config::{load_config_from_path, load_config_or_default, GameConfig, DEFAULT_CONFIG_PATH};
use controller::{CharacterController, ControllerInput};
use level::{load_level_from_path, Level};
use mesh::{SpriteMesh, WHITE_TEXTURE};
use mode::{ModeDriver, BACKGROUND_SPRITE};
use platform::PLATFORM_SPRITE;

struct GpuSpriteTexture {
    #[allow(dead_code)]
    texture: Texture,
    bind_group: wgpu::BindGroup,
}

/// All mutable game state. Constructed lazily in `ApplicationHandler::resumed`
/// once the window and GPU surface are available.
struct GameState {
    window: Arc<Window>,
    gpu: GpuContext,
    time: TimeState,
    input: InputState,
    camera: Camera2D,
    sprite_pipeline: SpritePipeline,
    debug_overlay: DebugOverlay,
    audio: Box<dyn AudioSink>,

    // --- Hot-reloadable content -------------------------------------------------
    config_path: PathBuf,
    config_watcher: ContentWatcher,
    config: GameConfig,
    level_watcher: ContentWatcher,
    level: Level,

    // --- Simulation -------------------------------------------------------------
    controller: CharacterController,
    driver: ModeDriver,

    // --- GPU resources ----------------------------------------------------------
    textures: HashMap<Arc<str>, GpuSpriteTexture>,
    missing_textures: HashSet<String>,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    camera_buffer: wgpu::Buffer,
    camera_bind_group: wgpu::BindGroup,
    mesh_vertex_capacity: usize,
    mesh_index_capacity: usize,
    mesh: SpriteMesh,
}

impl GameState {
    fn new(window: Arc<Window>, config_path: PathBuf, config: GameConfig) -> Self {
        let gpu = GpuContext::new(window.clone());
        let time = TimeState::new(config.tick_rate_hz);
        let physics = config.physics;
        let world_size = [physics.world_width, physics.world_height];
        let sprite_pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);
        let debug_overlay =
            DebugOverlay::new(&gpu.device, gpu.surface_format, &window, world_size);
        let camera = Camera2D::new(world_size[0], world_size[1], gpu.size.0, gpu.size.1);

        let level = load_initial_level(&config.level_path, world_size);
        let level_watcher = ContentWatcher::new(config.level_path.clone());
        let config_watcher = ContentWatcher::new(config_path.clone());

        let audio: Box<dyn AudioSink> = match RodioAudio::new(&config.assets_root) {
            Some(audio) => Box::new(audio),
            None => Box::new(NullAudio),
        };

        let camera_uniform = camera.build_uniform();
        let camera_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Camera Uniform Buffer"),
                contents: bytemuck::cast_slice(&[camera_uniform]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let camera_bind_group =
            sprite_pipeline.create_camera_bind_group(&gpu.device, &camera_buffer);
        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        let mut state = Self {
            window,
            gpu,
            time,
            input: InputState::new(),
            camera,
            sprite_pipeline,
            debug_overlay,
            audio,
            config_path,
            config_watcher,
            controller: CharacterController::new(physics),
            driver: ModeDriver::new(world_size[0], world_size[1], config.audio),
            config,
            level_watcher,
            level,
            textures: HashMap::new(),
            missing_textures: HashSet::new(),
            vertex_buffer,
            index_buffer,
            camera_buffer,
            camera_bind_group,
            mesh_vertex_capacity: 0,
            mesh_index_capacity: 0,
            mesh: SpriteMesh::default(),
        };

        // Startup order matters: textures exist before the first mesh.
        state.ensure_white_texture();
        state.preload_textures();
        state.ensure_mesh_capacity(4, 6);
        state.rebuild_mesh();
        state
    }

    fn reload_config(&mut self, reason: &str) {
        match load_config_from_path(&self.config_path) {
            Ok(config) => {
                let physics = config.physics;
                self.controller.set_config(physics);
                self.driver
                    .set_world_size(physics.world_width, physics.world_height);
                self.camera.world_size = glam::Vec2::new(physics.world_width, physics.world_height);
                self.debug_overlay
                    .set_world_size([physics.world_width, physics.world_height]);
                if config.tick_rate_hz != self.time.tick_rate_hz() {
                    self.time.set_tick_rate(config.tick_rate_hz);
                    log::info!("Tick rate changed to {} Hz", config.tick_rate_hz);
                }

                let level_moved = config.level_path != self.config.level_path;
                self.config = config;
                if level_moved {
                    self.level_watcher = ContentWatcher::new(self.config.level_path.clone());
                    self.reload_level(reason);
                }
                self.preload_textures();
                log::info!("Config reloaded ({reason}): {}", self.config_path.display());
            }
            Err(err) => {
                log::error!("Config reload failed ({reason}): {err}");
            }
        }
    }

    fn reload_level(&mut self, reason: &str) {
        match load_level_from_path(&self.config.level_path) {
            Ok(level) => {
                self.level = level;
                log::info!(
                    "Level reloaded ({reason}): {} ({} platforms)",
                    self.level.level_id,
                    self.level.platforms().len()
                );
            }
            Err(err) => {
                log::error!("Level reload failed ({reason}): {err}");
            }
        }
    }

    fn ensure_white_texture(&mut self) {
        if self.textures.contains_key(WHITE_TEXTURE) {
            return;
        }
        let texture = Texture::white(&self.gpu.device, &self.gpu.queue);
        let bind_group = self
            .sprite_pipeline
            .create_texture_bind_group(&self.gpu.device, &texture);
        self.textures.insert(
            Arc::from(WHITE_TEXTURE),
            GpuSpriteTexture {
                texture,
                bind_group,
            },
        );
    }

    fn preload_textures(&mut self) {
        let ids: Vec<String> = [BACKGROUND_SPRITE, PLATFORM_SPRITE]
            .into_iter()
            .chain(self.config.sprites.all_ids())
            .map(str::to_string)
            .collect();
        for id in &ids {
            self.ensure_texture(id);
        }
    }

    /// Load `assets/images/<id>.png` on first use. Failures are logged once
    /// and the sprite is drawn as a placeholder quad from then on.
    fn ensure_texture(&mut self, sprite_id: &str) {
        if self.textures.contains_key(sprite_id) || self.missing_textures.contains(sprite_id) {
            return;
        }
        let path = self
            .config
            .assets_root
            .join("images")
            .join(format!("{sprite_id}.png"));
        match load_texture_asset(
            &self.gpu.device,
            &self.gpu.queue,
            &self.sprite_pipeline,
            &path,
        ) {
            Ok(texture) => {
                self.textures.insert(Arc::from(sprite_id), texture);
            }
            Err(err) => {
                log::warn!("{err}. Drawing '{sprite_id}' as a flat placeholder.");
                self.missing_textures.insert(sprite_id.to_string());
            }
        }
    }

    fn rebuild_mesh(&mut self) {
        let list = self
            .driver
            .draw(&self.controller, &self.config.sprites, &self.level);
        let ids: Vec<String> = list.sprite_ids().map(str::to_string).collect();
        for id in &ids {
            self.ensure_texture(id);
        }

        let textures = &self.textures;
        let mesh = SpriteMesh::build(&list, |id| textures.contains_key(id));
        self.ensure_mesh_capacity(mesh.vertices.len(), mesh.indices.len());

        if !mesh.vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(&mesh.vertices));
        }
        if !mesh.indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(&mesh.indices));
        }
        self.mesh = mesh;
    }

    fn ensure_mesh_capacity(&mut self, vertex_count: usize, index_count: usize) {
        let needed_vertices = vertex_count.max(1);
        if needed_vertices > self.mesh_vertex_capacity {
            self.mesh_vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.mesh_vertex_capacity);
        }

        let needed_indices = index_count.max(1);
        if needed_indices > self.mesh_index_capacity {
            self.mesh_index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.mesh_index_capacity);
        }
    }

    /// One fixed simulation step. Edge-triggered input is only acted on when
    /// `handle_edges` is set, i.e. on the first step of a frame.
    fn step(&mut self, handle_edges: bool) -> Vec<effect::Effect> {
        let mut effects = Vec::new();

        if handle_edges {
            if self.input.is_mouse_just_pressed(MouseBtn::Left) {
                let pos = self.camera.screen_to_world(self.input.mouse_position);
                effects.extend(self.driver.on_mouse_down(pos));
            }
            for key in self.input.pressed_keys() {
                match key {
                    Key::F3 => self.debug_overlay.toggle(),
                    Key::R => {
                        self.reload_config("manual trigger (R)");
                        self.reload_level("manual trigger (R)");
                    }
                    _ => effects.extend(self.driver.on_key_down(key, &mut self.controller)),
                }
            }
        }

        let input = ControllerInput::sample(&self.input);
        self.driver.update(&mut self.controller, input, &self.level);
        effects
    }

    fn overlay_stats(&self) -> OverlayStats {
        let body = &self.controller.body;
        OverlayStats {
            mode_label: self.driver.mode().label().to_string(),
            body_position: body.position.to_array(),
            vertical_velocity: body.vertical_velocity,
            on_ground: body.on_ground,
            sprite_id: self.controller.sprite_id(&self.config.sprites).to_string(),
            platform_count: self.level.platforms().len() as u32,
            draw_calls: self.mesh.draw_calls.len() as u32,
            quad_count: self.mesh.quad_count() as u32,
            music_enabled: self.driver.settings().music_enabled,
            sound_enabled: self.driver.settings().sound_enabled,
        }
    }

    fn render(&mut self) {
        let camera_uniform = self.camera.build_uniform();
        self.gpu.queue.write_buffer(
            &self.camera_buffer,
            0,
            bytemuck::cast_slice(&[camera_uniform]),
        );

        let Some((output, view)) = self.gpu.begin_frame() else {
            return;
        };

        let stats = self.overlay_stats();
        let (egui_primitives, egui_textures_delta) =
            self.debug_overlay
                .prepare(&self.window, &self.time, &stats, &self.mesh.labels);
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [self.gpu.size.0, self.gpu.size.1],
            pixels_per_point: self.window.scale_factor() as f32,
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Render Encoder"),
            });

        {
            let mut last_bound_texture_key: Option<&Arc<str>> = None;
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            render_pass.set_pipeline(&self.sprite_pipeline.render_pipeline);
            render_pass.set_bind_group(0, &self.camera_bind_group, &[]);
            render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
            render_pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

            for draw in &self.mesh.draw_calls {
                let Some(texture) = self.textures.get(&draw.texture_key) else {
                    continue;
                };
                if last_bound_texture_key != Some(&draw.texture_key) {
                    render_pass.set_bind_group(1, &texture.bind_group, &[]);
                    last_bound_texture_key = Some(&draw.texture_key);
                }
                render_pass.draw_indexed(
                    draw.index_start..(draw.index_start + draw.index_count),
                    0,
                    0..1,
                );
            }
        }

        self.debug_overlay.upload(
            &self.gpu.device,
            &self.gpu.queue,
            &mut encoder,
            &egui_primitives,
            &egui_textures_delta,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view: &view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.debug_overlay
                .paint(&mut egui_pass, &egui_primitives, &screen_descriptor);
        }

        self.debug_overlay.cleanup(&egui_textures_delta);

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();
    }
}

struct App {
    config_path: PathBuf,
    config: GameConfig,
    state: Option<GameState>,
}

impl App {
    fn new(config_path: PathBuf, config: GameConfig) -> Self {
        Self {
            config_path,
            config,
            state: None,
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.state.is_some() {
            return;
        }
        let platform_config = self.config.window.to_platform();
        let window = alien_platform::window::create_window(event_loop, &platform_config);
        log::info!(
            "Window created: {}x{}",
            platform_config.width,
            platform_config.height
        );
        self.state = Some(GameState::new(
            window,
            self.config_path.clone(),
            self.config.clone(),
        ));
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(state) = &self.state {
            state.window.request_redraw();
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        let state = match self.state.as_mut() {
            Some(s) => s,
            None => return,
        };

        let egui_consumed = state
            .debug_overlay
            .handle_window_event(&state.window, &event);

        match event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested, exiting.");
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                let w = physical_size.width;
                let h = physical_size.height;
                if w > 0 && h > 0 {
                    state.gpu.resize(w, h);
                    state.camera.viewport = (w, h);
                    log::info!("Resized to {}x{}", w, h);
                }
            }

            WindowEvent::Focused(false) => state.input.release_all(),

            WindowEvent::KeyboardInput { event, .. } if !egui_consumed => {
                if let PhysicalKey::Code(key_code) = event.physical_key {
                    if let Some(game_key) = map_key(key_code) {
                        match event.state {
                            ElementState::Pressed => state.input.key_down(game_key),
                            ElementState::Released => state.input.key_up(game_key),
                        }
                    }
                }
            }

            WindowEvent::MouseInput {
                state: button_state,
                button,
                ..
            } if !egui_consumed => {
                if let Some(btn) = map_mouse_button(button) {
                    match button_state {
                        ElementState::Pressed => state.input.mouse_down(btn),
                        ElementState::Released => state.input.mouse_up(btn),
                    }
                }
            }

            WindowEvent::CursorMoved { position, .. } => {
                state.input.mouse_position = (position.x, position.y);
            }

            WindowEvent::RedrawRequested => {
                if state.gpu.size.0 == 0 || state.gpu.size.1 == 0 {
                    return;
                }

                state.time.begin_frame();

                // Content reloads happen at the frame boundary, never mid-step.
                if state.config_watcher.should_reload() {
                    state.reload_config("file watcher");
                } else if state.level_watcher.should_reload() {
                    state.reload_level("file watcher");
                }

                let mut edges_consumed = false;
                while state.time.should_step() {
                    let effects = state.step(!edges_consumed);
                    if !edges_consumed {
                        // Clear edges only once a step has seen them, so a
                        // press on a zero-step frame is not lost and a press
                        // on a multi-step frame does not fire twice.
                        state.input.end_frame();
                        edges_consumed = true;
                    }

                    let settings = *state.driver.settings();
                    audio::dispatch(&effects, &settings, state.audio.as_mut());
                    if effect::wants_quit(&effects) {
                        log::info!("Quit requested, exiting.");
                        event_loop.exit();
                        return;
                    }
                }

                state.rebuild_mesh();
                state.render();
            }

            _ => {}
        }
    }
}

fn load_initial_level(path: &Path, world_size: [f32; 2]) -> Level {
    match load_level_from_path(path) {
        Ok(level) => {
            log::info!(
                "Level loaded: {} ({} platforms)",
                level.level_id,
                level.platforms().len()
            );
            level
        }
        Err(err) if err.is_not_found() => {
            log::warn!(
                "Level '{}' not found, using a single ground platform",
                path.display()
            );
            Level::default_ground(world_size[0], world_size[1])
        }
        Err(err) => panic!("Failed to load initial level: {err}"),
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn load_texture_asset(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    pipeline: &SpritePipeline,
    path: &Path,
) -> Result<GpuSpriteTexture, String> {
    let bytes = std::fs::read(path)
        .map_err(|e| format!("Failed to read texture '{}': {e}", path.display()))?;
    let label = path.to_string_lossy();
    let texture = Texture::from_bytes(device, queue, &bytes, &label)
        .map_err(|e| format!("Failed to decode texture '{}': {e}", path.display()))?;
    let bind_group = pipeline.create_texture_bind_group(device, &texture);
    Ok(GpuSpriteTexture {
        texture,
        bind_group,
    })
}

fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Alien Adventure starting...");

    let config_path = PathBuf::from(DEFAULT_CONFIG_PATH);
    let config = load_config_or_default(&config_path)
        .unwrap_or_else(|err| panic!("Failed to load initial config: {err}"));

    let event_loop = EventLoop::new().expect("Failed to create event loop");
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config_path, config);
    event_loop.run_app(&mut app).expect("Event loop error");
}
