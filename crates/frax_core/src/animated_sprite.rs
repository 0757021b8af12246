//! Sprite backed by a multi-frame image (e.g. an animated GIF).
//!
//! The loader stacks frames vertically into one texture; the animation only
//! keeps a frame index and samples that frame of whatever strip is bound when
//! drawn, so rebinding through `sprite_mut()` can never point past the end of
//! the new image. The inner sprite's own source rectangle is ignored. Timing uses integer microseconds so advancing
//! by the same total duration always lands on the same frame, regardless of
//! how it was split into steps.

use std::time::Duration;

use crate::backend::{Canvas, TextureLoader};
use crate::error::Result;
use crate::geometry::Rect;
use crate::sprite::{SourceRect, Sprite};
use crate::texture_cache::TextureCache;

pub struct AnimatedSprite<T> {
    sprite: Sprite<T>,
    current_frame: u32,
    frame_duration_us: u64,
    elapsed_us: u64,
    looping: bool,
    finished: bool,
}

impl<T> AnimatedSprite<T> {
    /// A zero `frame_duration` is treated as one microsecond.
    pub fn new<L>(
        rect: Rect,
        cache: &mut TextureCache<L>,
        source_id: &str,
        frame_duration: Duration,
    ) -> Result<Self>
    where
        L: TextureLoader<Texture = T>,
    {
        let sprite = Sprite::with_texture(rect, cache, source_id, SourceRect::Full)?;
        Ok(Self {
            sprite,
            current_frame: 0,
            frame_duration_us: duration_us(frame_duration),
            elapsed_us: 0,
            looping: true,
            finished: false,
        })
    }

    /// Rebind to another animated image and restart from frame 0.
    pub fn set_texture<L>(&mut self, cache: &mut TextureCache<L>, source_id: &str) -> Result<()>
    where
        L: TextureLoader<Texture = T>,
    {
        self.sprite.set_texture(cache, source_id)?;
        self.restart();
        Ok(())
    }

    /// Frame count of the bound image, fixed when it was loaded.
    pub fn frame_count(&self) -> u32 {
        self.sprite
            .texture()
            .map_or(1, |texture| texture.frame_count())
    }

    /// Always below `frame_count()`, even after the strip was swapped.
    pub fn current_frame(&self) -> u32 {
        self.current_frame % self.frame_count()
    }

    /// Pixel region of the current frame, or `None` while no texture is bound.
    pub fn source_rect(&self) -> Option<Rect> {
        self.sprite
            .texture()
            .map(|texture| texture.frame_rect(self.current_frame()))
    }

    /// Jump to `index` (wrapping) and reset the frame timer.
    pub fn set_frame(&mut self, index: u32) {
        self.current_frame = index % self.frame_count();
        self.elapsed_us = 0;
        self.finished = false;
    }

    pub fn restart(&mut self) {
        self.set_frame(0);
    }

    pub fn frame_duration(&self) -> Duration {
        Duration::from_micros(self.frame_duration_us)
    }

    pub fn set_frame_duration(&mut self, frame_duration: Duration) {
        self.frame_duration_us = duration_us(frame_duration);
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    /// Non-looping animations stop on their last frame.
    pub fn set_looping(&mut self, looping: bool) {
        self.looping = looping;
    }

    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Advance the animation clock. Returns whether the displayed frame changed.
    pub fn advance(&mut self, dt: Duration) -> bool {
        let frame_count = self.frame_count();
        if frame_count <= 1 || self.finished {
            return false;
        }

        let start = self.current_frame();
        self.current_frame = start;
        let dt_us = u64::try_from(dt.as_micros()).unwrap_or(u64::MAX);
        self.elapsed_us = self.elapsed_us.saturating_add(dt_us);
        let steps = self.elapsed_us / self.frame_duration_us;
        self.elapsed_us %= self.frame_duration_us;

        if self.looping {
            let steps = (steps % frame_count as u64) as u32;
            self.current_frame = (self.current_frame + steps) % frame_count;
        } else {
            let last = frame_count - 1;
            let target = self.current_frame as u64 + steps;
            if target > last as u64 {
                self.current_frame = last;
                self.elapsed_us = 0;
                self.finished = true;
            } else {
                self.current_frame = target as u32;
            }
        }

        self.current_frame != start
    }

    pub fn sprite(&self) -> &Sprite<T> {
        &self.sprite
    }

    pub fn sprite_mut(&mut self) -> &mut Sprite<T> {
        &mut self.sprite
    }

    pub fn draw<C>(&self, canvas: &mut C)
    where
        C: Canvas<Texture = T>,
    {
        self.sprite.draw_with_source(canvas, self.source_rect());
    }
}

fn duration_us(duration: Duration) -> u64 {
    u64::try_from(duration.as_micros()).unwrap_or(u64::MAX).max(1)
}
