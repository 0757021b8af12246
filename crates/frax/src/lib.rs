//! Frax: a small scene and sprite layer for 2D games.
//!
//! ```no_run
//! use frax::{Color, Frax, FraxConfig, Scene, SceneLoop};
//!
//! struct Game {
//!     scene: Scene,
//! }
//!
//! impl SceneLoop<Frax> for Game {
//!     fn scene(&self) -> &Scene {
//!         &self.scene
//!     }
//!
//!     fn scene_mut(&mut self) -> &mut Scene {
//!         &mut self.scene
//!     }
//! }
//!
//! fn main() -> anyhow::Result<()> {
//!     frax::init_logging(None);
//!     let mut frax = Frax::init(&FraxConfig::default())?;
//!     let code = Game { scene: Scene::new(Color::RAYWHITE) }.run(&mut frax)?;
//!     frax.close();
//!     std::process::exit(code);
//! }
//! ```

mod context;
mod logging;

pub use context::{AnimatedSprite, Frax, Sprite, TextureCache, VERSION};
pub use logging::init_logging;

pub use frax_core::tools::colors_equal;
pub use frax_core::{
    load_config_from_path, Backend, Camera2D, Canvas, Color, FraxConfig, FraxError, FrameClock,
    InputState, Key, MouseBtn, Rect, Scene, SceneLoop, SceneStatus, SourceRect, Vec2,
    DEFAULT_BACKGROUND,
};
pub use frax_render::{FrameStats, GpuTexture};

#[cfg(feature = "audio")]
pub use frax_platform::AudioDevice;
#[cfg(feature = "gui")]
pub use frax_devtools::{GuiWindow, TITLE_BAR_HEIGHT};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_logging_is_idempotent() {
        init_logging(Some("debug"));
        init_logging(Some("error"));
        log::info!("still alive");
    }

    #[test]
    fn version_matches_the_package() {
        assert_eq!(VERSION, env!("CARGO_PKG_VERSION"));
        assert!(!VERSION.is_empty());
    }
}
