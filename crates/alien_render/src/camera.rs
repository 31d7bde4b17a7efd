use glam::{Mat4, Vec2};

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    pub view_proj: [[f32; 4]; 4],
}

/// Fixed-world orthographic camera. The whole world rect is stretched over
/// the viewport with the origin at the top-left and y growing downward, so
/// world units match the game's screen coordinates regardless of window size.
pub struct Camera2D {
    pub world_size: Vec2,
    pub viewport: (u32, u32),
}

impl Camera2D {
    pub fn new(world_width: f32, world_height: f32, viewport_width: u32, viewport_height: u32) -> Self {
        Self {
            world_size: Vec2::new(world_width, world_height),
            viewport: (viewport_width, viewport_height),
        }
    }

    pub fn build_uniform(&self) -> CameraUniform {
        let proj = Mat4::orthographic_rh(
            0.0,
            self.world_size.x,
            self.world_size.y,
            0.0,
            -1.0,
            1.0,
        );

        CameraUniform {
            view_proj: proj.to_cols_array_2d(),
        }
    }

    /// Map a cursor position in physical window pixels to world units.
    pub fn screen_to_world(&self, screen: (f64, f64)) -> Vec2 {
        let w = self.viewport.0.max(1) as f32;
        let h = self.viewport.1.max(1) as f32;
        Vec2::new(
            screen.0 as f32 / w * self.world_size.x,
            screen.1 as f32 / h * self.world_size.y,
        )
    }
}
