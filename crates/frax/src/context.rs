//! The live framework: window, renderer, texture cache and (optionally)
//! audio device and GUI, bundled as one [`Backend`] a scene can run on.

use std::sync::Arc;

use frax_core::{
    tools, Backend, Camera2D, Canvas, Color, FraxConfig, FraxError, FrameClock, InputState, Key,
    Rect, Vec2,
};
use frax_platform::{Platform, WindowConfig};
use frax_render::{FrameStats, GpuTexture, GpuTextureLoader, Renderer};

#[cfg(feature = "audio")]
use frax_platform::AudioDevice;
#[cfg(feature = "gui")]
use frax_devtools::GuiLayer;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub type TextureCache = frax_core::TextureCache<GpuTextureLoader>;
pub type Sprite = frax_core::Sprite<GpuTexture>;
pub type AnimatedSprite = frax_core::AnimatedSprite<GpuTexture>;

// Field order is drop order: GPU resources go before the window they render to.
pub struct Frax {
    textures: TextureCache,
    #[cfg(feature = "gui")]
    gui: GuiLayer,
    renderer: Renderer,
    #[cfg(feature = "audio")]
    audio: AudioDevice,
    clock: FrameClock,
    screen_size: Vec2,
    platform: Platform,
}

impl Frax {
    /// Open the window (and audio device), set up the renderer and the
    /// texture cache. A `0 x 0` size fills the primary monitor.
    pub fn init(config: &FraxConfig) -> Result<Self, FraxError> {
        config.validate()?;
        log::info!("Initializing Frax {VERSION}");

        let mut platform = Platform::new(&WindowConfig::from(config))?;
        let renderer = Renderer::new(Arc::clone(platform.window()), config.vsync)?;

        #[cfg(feature = "audio")]
        let audio = AudioDevice::open()?;

        // Whatever the window system actually granted, not what was asked for.
        let (width, height) = platform.screen_size();
        let screen_size = Vec2::new(width as f32, height as f32);

        platform.set_exit_key(config.exit_key());
        let clock = FrameClock::new(config.target_fps);
        let textures = TextureCache::new(renderer.texture_loader());

        #[cfg(feature = "gui")]
        let gui = GuiLayer::new(renderer.device(), renderer.surface_format(), platform.window());

        log::info!("Screen size: {width}x{height}");
        Ok(Self {
            textures,
            #[cfg(feature = "gui")]
            gui,
            renderer,
            #[cfg(feature = "audio")]
            audio,
            clock,
            screen_size,
            platform,
        })
    }

    /// Release every GPU resource, close the audio device, then the window.
    pub fn close(self) {
        let Self {
            mut textures,
            #[cfg(feature = "gui")]
            gui,
            renderer,
            #[cfg(feature = "audio")]
            audio,
            platform,
            ..
        } = self;

        textures.unpin_all();
        if !textures.is_empty() {
            log::debug!("{} textures still held at close", textures.len());
        }
        drop(textures);
        #[cfg(feature = "gui")]
        drop(gui);
        drop(renderer);

        #[cfg(feature = "audio")]
        audio.close();
        drop(platform);

        log::info!("Frax closed successfully");
    }

    pub fn textures(&self) -> &TextureCache {
        &self.textures
    }

    pub fn textures_mut(&mut self) -> &mut TextureCache {
        &mut self.textures
    }

    pub fn input(&self) -> &InputState {
        self.platform.input()
    }

    /// Drawable size in physical pixels, tracked across resizes.
    pub fn screen_size(&self) -> Vec2 {
        self.screen_size
    }

    /// A camera showing the whole screen with no scrolling.
    pub fn screen_camera(&self) -> Camera2D {
        Camera2D::centered(self.screen_size, self.screen_size / 2.0)
    }

    pub fn set_target_fps(&mut self, target_fps: Option<u32>) {
        self.clock.set_target_fps(target_fps);
    }

    pub fn set_exit_key(&mut self, key: Option<Key>) {
        self.platform.set_exit_key(key);
    }

    pub fn fps(&self) -> f64 {
        self.clock.smoothed_fps
    }

    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    pub fn frame_stats(&self) -> FrameStats {
        self.renderer.last_stats()
    }

    pub fn wasd_movement(&self, sprite: &mut Sprite, speed: f32) {
        tools::wasd_movement(sprite, self.platform.input(), speed);
    }

    pub fn random_position_inside(&self, camera: &Camera2D) -> Vec2 {
        tools::random_position_inside(camera, &mut rand::rng())
    }

    pub fn random_position_outside(&self, camera: &Camera2D, margin: f32) -> Vec2 {
        tools::random_position_outside(camera, self.screen_size, margin, &mut rand::rng())
    }

    #[cfg(feature = "audio")]
    pub fn audio(&self) -> &AudioDevice {
        &self.audio
    }

    /// egui context for the current frame. Only valid between
    /// `begin_drawing` and `end_drawing`, i.e. inside a scene's `draw`.
    #[cfg(feature = "gui")]
    pub fn gui(&self) -> &egui::Context {
        self.gui.ctx()
    }

    #[cfg(feature = "gui")]
    pub fn gui_wants_pointer(&self) -> bool {
        self.gui.wants_pointer()
    }

    fn handle_events(&mut self) {
        if let Some((width, height)) = self.platform.pump_events() {
            self.renderer.resize(width, height);
            if width > 0 && height > 0 {
                self.screen_size = Vec2::new(width as f32, height as f32);
            }
        }

        #[cfg(feature = "gui")]
        for event in self.platform.take_events() {
            self.gui.handle_window_event(self.platform.window(), &event);
        }
    }
}

impl Canvas for Frax {
    type Texture = GpuTexture;

    fn clear_background(&mut self, color: Color) {
        self.renderer.clear(color);
    }

    fn draw_rectangle(&mut self, rect: Rect, color: Color) {
        self.renderer.draw_rectangle(rect, color);
    }

    fn draw_texture_pro(
        &mut self,
        texture: &GpuTexture,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        self.renderer
            .draw_texture(texture, source, dest, origin, rotation, tint);
    }
}

impl Backend for Frax {
    fn begin_drawing(&mut self) {
        self.renderer.begin_frame();
        #[cfg(feature = "gui")]
        self.gui.begin_pass(self.platform.window());
    }

    fn end_drawing(&mut self) {
        #[cfg(feature = "gui")]
        {
            self.gui.end_pass(self.platform.window());
            let gui = &mut self.gui;
            self.renderer.end_frame(|target| {
                gui.paint(
                    target.device,
                    target.queue,
                    target.encoder,
                    target.view,
                    target.size,
                );
            });
        }
        #[cfg(not(feature = "gui"))]
        self.renderer.end_frame(|_| {});

        self.clock.end_frame();
        self.handle_events();
    }

    fn window_should_close(&mut self) -> bool {
        self.platform.should_close()
    }

    fn frame_time(&self) -> f32 {
        self.clock.frame_time()
    }
}
