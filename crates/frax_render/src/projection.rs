use glam::Mat4;

#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ProjectionUniform {
    pub view_proj: [[f32; 4]; 4],
}

impl ProjectionUniform {
    /// Pixel coordinates to clip space: origin top-left, y down.
    pub fn screen(width: u32, height: u32) -> Self {
        let proj = Mat4::orthographic_rh(
            0.0,
            width.max(1) as f32,
            height.max(1) as f32,
            0.0,
            -1.0,
            1.0,
        );
        Self {
            view_proj: proj.to_cols_array_2d(),
        }
    }
}
