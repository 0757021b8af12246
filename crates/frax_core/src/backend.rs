//! Seams between the framework core and the windowing/rendering/asset
//! collaborators. `frax_render` and `frax_platform` provide the real
//! implementations; tests plug in recording doubles.

use crate::color::Color;
use crate::error::FraxError;
use crate::geometry::{Rect, Vec2};

/// Immediate-mode drawing surface for the current frame.
pub trait Canvas {
    /// GPU resource type that textured draws sample from.
    type Texture;

    /// Discard everything drawn so far this frame and fill with `color`.
    fn clear_background(&mut self, color: Color);

    fn draw_rectangle(&mut self, rect: Rect, color: Color);

    /// Draw the `source` region of `texture` into `dest`.
    ///
    /// `dest.x/dest.y` is the pivot position and `origin` the pivot offset
    /// inside the destination; the quad rotates clockwise by `rotation`
    /// degrees around the pivot. Negative source width/height mirrors.
    fn draw_texture_pro(
        &mut self,
        texture: &Self::Texture,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    );
}

/// A window plus its frame lifecycle, as driven by a scene loop.
pub trait Backend: Canvas {
    fn begin_drawing(&mut self);

    /// Present the frame and poll window events.
    fn end_drawing(&mut self);

    /// The user asked the window to close (close button, or the configured exit key).
    fn window_should_close(&mut self) -> bool;

    /// Duration of the previous frame in seconds.
    fn frame_time(&self) -> f32;
}

/// Pixel data uploaded by a [`TextureLoader`].
#[derive(Debug)]
pub struct LoadedTexture<T> {
    pub texture: T,
    /// Width of a single frame in pixels.
    pub width: u32,
    /// Height of a single frame in pixels.
    pub height: u32,
    /// Frames are stacked vertically; still images have exactly one.
    pub frame_count: u32,
}

impl<T> LoadedTexture<T> {
    pub fn still(texture: T, width: u32, height: u32) -> Self {
        Self {
            texture,
            width,
            height,
            frame_count: 1,
        }
    }
}

/// Asset source for the texture cache. `load` either returns a complete
/// upload or an error; partial results are never cached.
pub trait TextureLoader {
    type Texture;

    fn load(&mut self, source_id: &str) -> Result<LoadedTexture<Self::Texture>, FraxError>;
}
