pub mod animated_sprite;
pub mod backend;
pub mod color;
pub mod config;
pub mod error;
pub mod geometry;
pub mod input;
pub mod scene;
pub mod sprite;
pub mod texture_cache;
pub mod time;
pub mod tools;

#[cfg(test)]
mod testing;

pub use animated_sprite::AnimatedSprite;
pub use backend::{Backend, Canvas, LoadedTexture, TextureLoader};
pub use color::Color;
pub use config::{load_config_from_path, FraxConfig};
pub use error::{FraxError, Result};
pub use geometry::{Camera2D, Rect, Vec2};
pub use input::{InputState, Key, MouseBtn};
pub use scene::{Scene, SceneLoop, SceneStatus, DEFAULT_BACKGROUND};
pub use sprite::{SourceRect, Sprite};
pub use texture_cache::{CachedTexture, TextureCache, TextureHandle};
pub use time::FrameClock;
