//! Rectangular drawable entity: a positioned, sized, rotatable, tinted quad
//! that is either flat-colored or samples a cached texture.

use std::any::Any;
use std::fmt;

use crate::backend::{Canvas, TextureLoader};
use crate::color::Color;
use crate::error::{FraxError, Result};
use crate::geometry::{Rect, Vec2};
use crate::texture_cache::{TextureCache, TextureHandle};

/// Region of the bound texture a sprite samples.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum SourceRect {
    /// The texture's whole extent (its first frame for animated images),
    /// resolved against whatever texture is bound at the time.
    #[default]
    Full,
    /// Explicit pixel region; never overwritten by a texture load.
    Region(Rect),
}

pub struct Sprite<T> {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    /// Degrees, clockwise, around the sprite's center.
    pub rotation: f32,
    pub tint: Color,
    /// Free-form user payload.
    pub data: Option<Box<dyn Any>>,
    texture: Option<TextureHandle<T>>,
    source: SourceRect,
}

fn validate_size(width: f32, height: f32) -> Result<()> {
    let valid = width.is_finite() && height.is_finite() && width > 0.0 && height > 0.0;
    if valid {
        Ok(())
    } else {
        Err(FraxError::InvalidGeometry { width, height })
    }
}

impl<T> Sprite<T> {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Result<Self> {
        Self::with_tint(x, y, w, h, Color::WHITE)
    }

    pub fn with_tint(x: f32, y: f32, w: f32, h: f32, tint: Color) -> Result<Self> {
        validate_size(w, h)?;
        Ok(Self {
            x,
            y,
            w,
            h,
            rotation: 0.0,
            tint,
            data: None,
            texture: None,
            source: SourceRect::Full,
        })
    }

    pub fn from_rect(rect: Rect, tint: Color) -> Result<Self> {
        Self::with_tint(rect.x, rect.y, rect.w, rect.h, tint)
    }

    /// Build a sprite and bind it to `source_id` through `cache` right away.
    pub fn with_texture<L>(
        rect: Rect,
        cache: &mut TextureCache<L>,
        source_id: &str,
        source: SourceRect,
    ) -> Result<Self>
    where
        L: TextureLoader<Texture = T>,
    {
        let mut sprite = Self::from_rect(rect, Color::WHITE)?;
        sprite.source = source;
        sprite.set_texture(cache, source_id)?;
        Ok(sprite)
    }

    /// Bind to the cached texture for `source_id`.
    ///
    /// The new handle is acquired before the old one is released, so a failed
    /// load leaves the current binding intact.
    pub fn set_texture<L>(&mut self, cache: &mut TextureCache<L>, source_id: &str) -> Result<()>
    where
        L: TextureLoader<Texture = T>,
    {
        let handle = cache.acquire(source_id)?;
        self.texture = Some(handle);
        Ok(())
    }

    /// Unbind the texture; the sprite draws as a flat rectangle again.
    pub fn clear_texture(&mut self) -> Option<TextureHandle<T>> {
        self.texture.take()
    }

    pub fn texture(&self) -> Option<&TextureHandle<T>> {
        self.texture.as_ref()
    }

    pub fn is_textured(&self) -> bool {
        self.texture.is_some()
    }

    pub fn source(&self) -> SourceRect {
        self.source
    }

    pub fn set_source(&mut self, source: SourceRect) {
        self.source = source;
    }

    /// The pixel region drawn, or `None` while no texture is bound.
    pub fn source_rect(&self) -> Option<Rect> {
        let texture = self.texture.as_ref()?;
        Some(match self.source {
            SourceRect::Full => texture.frame_rect(0),
            SourceRect::Region(rect) => rect,
        })
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Move the top-left corner; size, rotation and tint are untouched.
    pub fn set_position(&mut self, position: Vec2) {
        self.x = position.x;
        self.y = position.y;
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        self.rect().center()
    }

    pub fn set_center(&mut self, center: Vec2) {
        self.x = center.x - self.w / 2.0;
        self.y = center.y - self.h / 2.0;
    }

    pub fn is_colliding<U>(&self, other: &Sprite<U>) -> bool {
        self.rect().overlaps(&other.rect())
    }

    pub fn set_data<D: Any>(&mut self, value: D) {
        self.data = Some(Box::new(value));
    }

    pub fn data_ref<D: Any>(&self) -> Option<&D> {
        self.data.as_ref()?.downcast_ref()
    }

    pub fn data_mut<D: Any>(&mut self) -> Option<&mut D> {
        self.data.as_mut()?.downcast_mut()
    }

    pub fn draw<C>(&self, canvas: &mut C)
    where
        C: Canvas<Texture = T>,
    {
        self.draw_with_source(canvas, self.source_rect());
    }

    /// Draw sampling `source` instead of the sprite's own source rectangle.
    /// Falls back to the flat rectangle when either is missing.
    pub(crate) fn draw_with_source<C>(&self, canvas: &mut C, source: Option<Rect>)
    where
        C: Canvas<Texture = T>,
    {
        match (&self.texture, source) {
            (Some(texture), Some(source)) => canvas.draw_texture_pro(
                texture.texture(),
                source,
                Rect::new(self.x + self.w / 2.0, self.y + self.h / 2.0, self.w, self.h),
                Vec2::new(self.w / 2.0, self.h / 2.0),
                self.rotation,
                self.tint,
            ),
            _ => canvas.draw_rectangle(self.rect(), self.tint),
        }
    }
}

impl<T> fmt::Debug for Sprite<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sprite")
            .field("rect", &self.rect())
            .field("rotation", &self.rotation)
            .field("tint", &self.tint)
            .field(
                "texture",
                &self.texture.as_ref().map(|texture| texture.source_id()),
            )
            .field("source", &self.source)
            .field("has_data", &self.data.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CountingLoader, DrawOp, FakeTexture, RecordingCanvas};

    fn cache() -> (CountingLoader, TextureCache<CountingLoader>) {
        let loader = CountingLoader::new()
            .with_image("hero.png", 64, 32)
            .with_image("enemy.png", 16, 16);
        (loader.clone(), TextureCache::new(loader))
    }

    #[test]
    fn untextured_sprite_draws_flat_rectangle() {
        let sprite = Sprite::<FakeTexture>::with_tint(1.0, 2.0, 30.0, 40.0, Color::RED)
            .expect("valid geometry");
        let mut canvas = RecordingCanvas::default();
        sprite.draw(&mut canvas);
        assert_eq!(
            canvas.ops,
            vec![DrawOp::Rectangle {
                rect: Rect::new(1.0, 2.0, 30.0, 40.0),
                color: Color::RED,
            }]
        );
    }

    #[test]
    fn clearing_texture_returns_to_flat_path() {
        let (_, mut cache) = cache();
        let mut sprite = Sprite::new(0.0, 0.0, 10.0, 10.0).expect("valid geometry");
        sprite.set_texture(&mut cache, "hero.png").expect("bind");

        let mut canvas = RecordingCanvas::default();
        sprite.draw(&mut canvas);
        assert!(matches!(canvas.ops[0], DrawOp::Texture { .. }));

        assert!(sprite.clear_texture().is_some());
        canvas.ops.clear();
        sprite.draw(&mut canvas);
        assert!(matches!(canvas.ops[0], DrawOp::Rectangle { .. }));
        assert_eq!(sprite.source_rect(), None);
    }

    #[test]
    fn textured_draw_pivots_on_center() {
        let (_, mut cache) = cache();
        let mut sprite = Sprite::with_texture(
            Rect::new(100.0, 50.0, 40.0, 20.0),
            &mut cache,
            "hero.png",
            SourceRect::Full,
        )
        .expect("bind");
        sprite.rotation = 45.0;
        sprite.tint = Color::SKYBLUE;

        let mut canvas = RecordingCanvas::default();
        sprite.draw(&mut canvas);
        assert_eq!(
            canvas.ops,
            vec![DrawOp::Texture {
                source_id: "hero.png".to_string(),
                source: Rect::new(0.0, 0.0, 64.0, 32.0),
                dest: Rect::new(120.0, 60.0, 40.0, 20.0),
                origin: Vec2::new(20.0, 10.0),
                rotation: 45.0,
                tint: Color::SKYBLUE,
            }]
        );
    }

    #[test]
    fn full_source_resolves_to_texture_extent() {
        let (_, mut cache) = cache();
        let sprite = Sprite::with_texture(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            &mut cache,
            "hero.png",
            SourceRect::Full,
        )
        .expect("bind");
        assert_eq!(sprite.source_rect(), Some(Rect::new(0.0, 0.0, 64.0, 32.0)));
    }

    #[test]
    fn explicit_source_survives_load_and_rebind() {
        let (_, mut cache) = cache();
        let region = Rect::new(10.0, 10.0, 8.0, 8.0);
        let mut sprite = Sprite::with_texture(
            Rect::new(0.0, 0.0, 10.0, 10.0),
            &mut cache,
            "hero.png",
            SourceRect::Region(region),
        )
        .expect("bind");
        assert_eq!(sprite.source_rect(), Some(region));

        sprite.set_texture(&mut cache, "enemy.png").expect("rebind");
        assert_eq!(sprite.source_rect(), Some(region));
    }

    #[test]
    fn full_source_follows_rebinding() {
        let (_, mut cache) = cache();
        let mut sprite = Sprite::new(0.0, 0.0, 10.0, 10.0).expect("valid geometry");
        sprite.set_texture(&mut cache, "hero.png").expect("bind");
        sprite.set_texture(&mut cache, "enemy.png").expect("rebind");
        assert_eq!(sprite.source_rect(), Some(Rect::new(0.0, 0.0, 16.0, 16.0)));
    }

    #[test]
    fn rebinding_releases_previous_texture() {
        let (loader, mut cache) = cache();
        let mut sprite = Sprite::new(0.0, 0.0, 10.0, 10.0).expect("valid geometry");
        sprite.set_texture(&mut cache, "hero.png").expect("bind");
        sprite.set_texture(&mut cache, "enemy.png").expect("rebind");

        assert_eq!(loader.freed(), 1);
        assert!(!cache.contains("hero.png"));
        assert_eq!(cache.strong_count("enemy.png"), 1);
    }

    #[test]
    fn failed_rebind_keeps_current_texture() {
        let (_, mut cache) = cache();
        let mut sprite = Sprite::new(0.0, 0.0, 10.0, 10.0).expect("valid geometry");
        sprite.set_texture(&mut cache, "hero.png").expect("bind");

        let err = sprite
            .set_texture(&mut cache, "missing.png")
            .expect_err("missing asset");
        assert!(matches!(err, FraxError::ResourceLoad { .. }));
        let bound = sprite.texture().expect("still bound");
        assert_eq!(bound.source_id(), "hero.png");
    }

    #[test]
    fn shared_textures_outlive_a_single_sprite() {
        let (loader, mut cache) = cache();
        let a = Sprite::with_texture(
            Rect::new(0.0, 0.0, 4.0, 4.0),
            &mut cache,
            "hero.png",
            SourceRect::Full,
        )
        .expect("bind a");
        let b = Sprite::with_texture(
            Rect::new(8.0, 0.0, 4.0, 4.0),
            &mut cache,
            "hero.png",
            SourceRect::Full,
        )
        .expect("bind b");
        assert_eq!(loader.load_calls("hero.png"), 1);

        drop(a);
        assert_eq!(loader.freed(), 0);
        assert!(b.texture().is_some());
        drop(b);
        assert_eq!(loader.freed(), 1);
    }

    #[test]
    fn rejects_degenerate_geometry() {
        for (w, h) in [(0.0, 1.0), (1.0, 0.0), (-2.0, 5.0), (f32::NAN, 1.0), (1.0, f32::INFINITY)] {
            let result = Sprite::<FakeTexture>::new(0.0, 0.0, w, h);
            assert!(
                matches!(result, Err(FraxError::InvalidGeometry { .. })),
                "{w}x{h} should be rejected"
            );
        }
    }

    #[test]
    fn center_round_trips() {
        let rects = [
            (0.0, 0.0, 10.0, 10.0),
            (-35.5, 12.25, 3.0, 90.0),
            (1000.0, -400.0, 0.5, 0.25),
        ];
        for (x, y, w, h) in rects {
            let mut sprite = Sprite::<FakeTexture>::new(x, y, w, h).expect("valid geometry");
            sprite.set_center(sprite.center());
            assert!((sprite.x - x).abs() < 1e-3 && (sprite.y - y).abs() < 1e-3);

            let target = Vec2::new(7.5, -3.25);
            sprite.set_center(target);
            assert!(sprite.center().abs_diff_eq(target, 1e-3));
            assert_eq!(sprite.size(), Vec2::new(w, h));
        }
    }

    #[test]
    fn set_position_only_moves() {
        let mut sprite =
            Sprite::<FakeTexture>::with_tint(0.0, 0.0, 5.0, 6.0, Color::GREEN).expect("valid");
        sprite.rotation = 30.0;
        sprite.set_position(Vec2::new(11.0, 12.0));
        assert_eq!(sprite.rect(), Rect::new(11.0, 12.0, 5.0, 6.0));
        assert_eq!(sprite.position(), Vec2::new(11.0, 12.0));
        assert_eq!(sprite.rotation, 30.0);
        assert_eq!(sprite.tint, Color::GREEN);
    }

    #[test]
    fn collision_is_symmetric_and_open() {
        let a = Sprite::<FakeTexture>::new(0.0, 0.0, 10.0, 10.0).expect("valid");
        let b = Sprite::<FakeTexture>::new(5.0, 5.0, 10.0, 10.0).expect("valid");
        let touching = Sprite::<FakeTexture>::new(10.0, 0.0, 10.0, 10.0).expect("valid");

        assert!(a.is_colliding(&b));
        assert!(b.is_colliding(&a));
        assert!(!a.is_colliding(&touching));
        assert!(!touching.is_colliding(&a));
    }

    #[test]
    fn user_data_is_typed() {
        let mut sprite = Sprite::<FakeTexture>::new(0.0, 0.0, 1.0, 1.0).expect("valid");
        assert!(sprite.data_ref::<u32>().is_none());

        sprite.set_data(3u32);
        assert_eq!(sprite.data_ref::<u32>(), Some(&3));
        assert!(sprite.data_ref::<String>().is_none());

        *sprite.data_mut::<u32>().expect("u32 payload") += 1;
        assert_eq!(sprite.data_ref::<u32>(), Some(&4));
    }
}
