use glam::Vec2;

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct SpriteVertex {
    pub position: [f32; 2],
    pub tex_coords: [f32; 2],
    pub color: [f32; 4],
}

impl SpriteVertex {
    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<SpriteVertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                // position
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, position) as wgpu::BufferAddress,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // tex_coords
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, tex_coords) as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x2,
                },
                // color
                wgpu::VertexAttribute {
                    offset: std::mem::offset_of!(SpriteVertex, color) as wgpu::BufferAddress,
                    shader_location: 2,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }

    /// Four corners of an axis-aligned world rect given by its top-left
    /// corner and size, wound top-left, top-right, bottom-right, bottom-left.
    /// Texture v runs downward with world y.
    pub fn quad(top_left: Vec2, size: Vec2, color: [f32; 4]) -> [SpriteVertex; 4] {
        let (l, t) = (top_left.x, top_left.y);
        let (r, b) = (l + size.x, t + size.y);
        [
            SpriteVertex {
                position: [l, t],
                tex_coords: [0.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [r, t],
                tex_coords: [1.0, 0.0],
                color,
            },
            SpriteVertex {
                position: [r, b],
                tex_coords: [1.0, 1.0],
                color,
            },
            SpriteVertex {
                position: [l, b],
                tex_coords: [0.0, 1.0],
                color,
            },
        ]
    }

    /// Index pattern for one quad starting at `base`.
    pub fn quad_indices(base: u32) -> [u32; 6] {
        [base, base + 1, base + 2, base, base + 2, base + 3]
    }
}
