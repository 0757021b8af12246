//! CPU-side frame geometry.
//!
//! Every draw becomes one quad (4 vertices, 6 indices). Consecutive quads
//! sampling the same texture are merged into a single draw call, so a frame
//! of sprites sharing one sheet costs one `draw_indexed`.

use frax_core::{Color, Rect, Vec2};

use crate::vertex::SpriteVertex;

/// A contiguous run of indices that share the same texture binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DrawCall {
    pub texture_id: u64,
    pub index_start: u32,
    pub index_count: u32,
}

#[derive(Debug, Default)]
pub struct DrawList {
    vertices: Vec<SpriteVertex>,
    indices: Vec<u32>,
    draw_calls: Vec<DrawCall>,
    clear_color: Option<Color>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all queued geometry and the pending clear color.
    pub fn reset(&mut self) {
        self.vertices.clear();
        self.indices.clear();
        self.draw_calls.clear();
        self.clear_color = None;
    }

    /// Clearing wipes everything queued earlier in the frame.
    pub fn clear(&mut self, color: Color) {
        self.reset();
        self.clear_color = Some(color);
    }

    pub fn clear_color(&self) -> Option<Color> {
        self.clear_color
    }

    /// Queue `source` (pixels of a `texture_size` texture) drawn into `dest`.
    ///
    /// `dest.(x, y)` is where the pivot lands, `origin` is the pivot inside
    /// `dest`, and the quad turns `rotation_deg` clockwise around the pivot.
    /// A negative source width or height mirrors the sampled region.
    #[allow(clippy::too_many_arguments)]
    pub fn push_textured(
        &mut self,
        texture_id: u64,
        texture_size: (u32, u32),
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation_deg: f32,
        tint: Color,
    ) {
        let corners = quad_corners(dest, origin, rotation_deg);
        let uvs = source_uvs(source, texture_size);
        self.push_quad(texture_id, corners, uvs, tint);
    }

    /// Queue an axis-aligned quad sampling the whole of `texture_id`.
    pub fn push_rect(&mut self, texture_id: u64, rect: Rect, color: Color) {
        let corners = quad_corners(rect, Vec2::ZERO, 0.0);
        let uvs = [
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ];
        self.push_quad(texture_id, corners, uvs, color);
    }

    fn push_quad(&mut self, texture_id: u64, corners: [Vec2; 4], uvs: [Vec2; 4], tint: Color) {
        let base_index = self.vertices.len() as u32;
        for (corner, uv) in corners.into_iter().zip(uvs) {
            self.vertices.push(SpriteVertex::new(corner, uv, tint));
        }

        let draw_start = self.indices.len() as u32;
        self.indices.extend_from_slice(&[
            base_index,
            base_index + 1,
            base_index + 2,
            base_index,
            base_index + 2,
            base_index + 3,
        ]);

        self.push_draw_call(texture_id, draw_start, 6);
    }

    /// Append a draw call, merging with the previous one when the texture
    /// matches and indices are contiguous.
    fn push_draw_call(&mut self, texture_id: u64, index_start: u32, index_count: u32) {
        if let Some(last) = self.draw_calls.last_mut() {
            let contiguous = last.index_start + last.index_count == index_start;
            if last.texture_id == texture_id && contiguous {
                last.index_count += index_count;
                return;
            }
        }
        self.draw_calls.push(DrawCall {
            texture_id,
            index_start,
            index_count,
        });
    }

    pub fn vertices(&self) -> &[SpriteVertex] {
        &self.vertices
    }

    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    pub fn draw_calls(&self) -> &[DrawCall] {
        &self.draw_calls
    }

    pub fn quad_count(&self) -> usize {
        self.vertices.len() / 4
    }

    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty()
    }
}

/// Corners in top-left, top-right, bottom-right, bottom-left order.
pub fn quad_corners(dest: Rect, origin: Vec2, rotation_deg: f32) -> [Vec2; 4] {
    let local = [
        Vec2::new(-origin.x, -origin.y),
        Vec2::new(dest.w - origin.x, -origin.y),
        Vec2::new(dest.w - origin.x, dest.h - origin.y),
        Vec2::new(-origin.x, dest.h - origin.y),
    ];
    let pivot = dest.position();
    if rotation_deg == 0.0 {
        return local.map(|corner| pivot + corner);
    }
    let rotation = Vec2::from_angle(rotation_deg.to_radians());
    local.map(|corner| pivot + rotation.rotate(corner))
}

/// Normalized texture coordinates for `source`, matching `quad_corners` order.
pub fn source_uvs(source: Rect, texture_size: (u32, u32)) -> [Vec2; 4] {
    let tex_w = texture_size.0.max(1) as f32;
    let tex_h = texture_size.1.max(1) as f32;

    let (left, right) = (source.x, source.x + source.w.abs());
    let (top, bottom) = (source.y, source.y + source.h.abs());
    let (mut u0, mut u1) = (left / tex_w, right / tex_w);
    let (mut v0, mut v1) = (top / tex_h, bottom / tex_h);
    if source.w < 0.0 {
        std::mem::swap(&mut u0, &mut u1);
    }
    if source.h < 0.0 {
        std::mem::swap(&mut v0, &mut v1);
    }

    [
        Vec2::new(u0, v0),
        Vec2::new(u1, v0),
        Vec2::new(u1, v1),
        Vec2::new(u0, v1),
    ]
}
