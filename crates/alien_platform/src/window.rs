use std::sync::Arc;
use winit::event_loop::ActiveEventLoop;
use winit::window::{Window, WindowAttributes};

pub struct PlatformConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
}

impl Default for PlatformConfig {
    fn default() -> Self {
        Self {
            title: "Alien Adventure Platformer".to_string(),
            width: 800,
            height: 480,
            resizable: true,
        }
    }
}

pub fn create_window(event_loop: &ActiveEventLoop, config: &PlatformConfig) -> Arc<Window> {
    let attrs = WindowAttributes::default()
        .with_title(&config.title)
        .with_resizable(config.resizable)
        .with_inner_size(winit::dpi::LogicalSize::new(config.width, config.height));

    let window = event_loop
        .create_window(attrs)
        .expect("Failed to create window");
    log::debug!("Window scale factor: {}", window.scale_factor());
    Arc::new(window)
}
