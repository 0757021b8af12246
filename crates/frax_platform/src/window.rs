//! Window and event pumping.
//!
//! The game owns the frame loop, so instead of handing control to
//! `EventLoop::run_app`, events are pumped once per presented frame. Input
//! state is updated from the pumped events and the raw events are buffered
//! for anything else that wants them (the GUI layer).

use std::sync::Arc;
use std::time::Duration;

use frax_core::{FraxConfig, FraxError, InputState, Key, MouseBtn, Vec2};
use winit::application::ApplicationHandler;
use winit::dpi::{LogicalSize, PhysicalSize, Size};
use winit::event::{ElementState, KeyEvent, MouseButton, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::keyboard::{KeyCode, PhysicalKey};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Window, WindowAttributes, WindowId};

pub struct WindowConfig {
    pub title: String,
    /// `0 x 0` sizes the window to the primary monitor.
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Frax".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

impl From<&FraxConfig> for WindowConfig {
    fn from(config: &FraxConfig) -> Self {
        Self {
            title: config.title.clone(),
            width: config.width,
            height: config.height,
        }
    }
}

impl WindowConfig {
    pub fn fits_display(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

pub struct Platform {
    event_loop: EventLoop<()>,
    app: PlatformApp,
    window: Arc<Window>,
}

impl Platform {
    pub fn new(config: &WindowConfig) -> Result<Self, FraxError> {
        let mut event_loop = EventLoop::new()
            .map_err(|e| FraxError::Platform(format!("Failed to create event loop: {e}")))?;

        let attrs = WindowAttributes::default().with_title(&config.title);
        let mut app = PlatformApp::new(attrs, config);

        // The window is created from inside the first `resumed` callback.
        for _ in 0..MAX_STARTUP_PUMPS {
            if let PumpStatus::Exit(code) =
                event_loop.pump_app_events(Some(Duration::ZERO), &mut app)
            {
                return Err(FraxError::Platform(format!(
                    "Event loop exited during startup with code {code}"
                )));
            }
            if let Some(err) = app.creation_error.take() {
                return Err(FraxError::Platform(format!("Failed to create window: {err}")));
            }
            if app.window.is_some() {
                break;
            }
        }
        let window = app
            .window
            .clone()
            .ok_or_else(|| FraxError::Platform("Window was never created".to_string()))?;

        let size = window.inner_size();
        log::info!("Window '{}' created at {}x{}", config.title, size.width, size.height);

        Ok(Self {
            event_loop,
            app,
            window,
        })
    }

    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Drawable size in physical pixels.
    pub fn screen_size(&self) -> (u32, u32) {
        let size = self.window.inner_size();
        (size.width, size.height)
    }

    pub fn input(&self) -> &InputState {
        &self.app.input
    }

    /// Only one exit key exists at a time; `None` disables it.
    pub fn set_exit_key(&mut self, key: Option<Key>) {
        self.app.exit_key = key;
    }

    pub fn exit_key(&self) -> Option<Key> {
        self.app.exit_key
    }

    /// Close button pressed, exit key hit, or the event loop went away.
    pub fn should_close(&self) -> bool {
        self.app.close_requested
    }

    /// Finish the frame's input and collect new events without blocking.
    /// Returns the latest size if the window was resized.
    pub fn pump_events(&mut self) -> Option<(u32, u32)> {
        self.app.input.end_frame();
        self.app.events.clear();

        if let PumpStatus::Exit(code) = self
            .event_loop
            .pump_app_events(Some(Duration::ZERO), &mut self.app)
        {
            log::info!("Event loop exited with code {code}");
            self.app.close_requested = true;
        }
        self.app.resized.take()
    }

    /// Raw events from the last pump, in arrival order.
    pub fn take_events(&mut self) -> Vec<WindowEvent> {
        std::mem::take(&mut self.app.events)
    }
}

const MAX_STARTUP_PUMPS: usize = 64;

struct PlatformApp {
    attributes: Option<WindowAttributes>,
    fit_display: bool,
    requested: (u32, u32),
    window: Option<Arc<Window>>,
    creation_error: Option<String>,
    input: InputState,
    events: Vec<WindowEvent>,
    exit_key: Option<Key>,
    close_requested: bool,
    resized: Option<(u32, u32)>,
}

impl PlatformApp {
    fn new(attributes: WindowAttributes, config: &WindowConfig) -> Self {
        Self {
            attributes: Some(attributes),
            fit_display: config.fits_display(),
            requested: (config.width, config.height),
            window: None,
            creation_error: None,
            input: InputState::new(),
            events: Vec::new(),
            exit_key: None,
            close_requested: false,
            resized: None,
        }
    }
}

impl ApplicationHandler for PlatformApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some(mut attrs) = self.attributes.take() else {
            return;
        };
        let monitor = if self.fit_display {
            event_loop
                .primary_monitor()
                .or_else(|| event_loop.available_monitors().next())
                .map(|monitor| monitor.size())
        } else {
            None
        };
        match initial_size(self.fit_display, self.requested, monitor) {
            Some(size) => attrs = attrs.with_inner_size(size),
            None => log::warn!("No monitor reported; using the platform default size"),
        }
        match event_loop.create_window(attrs) {
            Ok(window) => self.window = Some(Arc::new(window)),
            Err(e) => self.creation_error = Some(e.to_string()),
        }
    }

    fn window_event(&mut self, _event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                log::info!("Close requested");
                self.close_requested = true;
            }
            WindowEvent::Resized(size) => {
                self.resized = Some((size.width, size.height));
            }
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(key_code),
                        state,
                        repeat,
                        ..
                    },
                ..
            } => {
                if let Some(key) = map_key(*key_code) {
                    match state {
                        ElementState::Pressed => {
                            self.input.key_down(key);
                            if !repeat && self.exit_key == Some(key) {
                                log::info!("Exit key {:?} pressed", key);
                                self.close_requested = true;
                            }
                        }
                        ElementState::Released => self.input.key_up(key),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => {
                if let Some(btn) = map_mouse_button(*button) {
                    match state {
                        ElementState::Pressed => self.input.mouse_down(btn),
                        ElementState::Released => self.input.mouse_up(btn),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.input
                    .mouse_moved(Vec2::new(position.x as f32, position.y as f32));
            }
            _ => {}
        }
        self.events.push(event);
    }
}

/// Inner size to request at creation. A requested size is in logical pixels;
/// fitting the display uses the monitor's physical size as-is. `None` leaves
/// the choice to the platform.
pub fn initial_size(
    fit_display: bool,
    requested: (u32, u32),
    monitor: Option<PhysicalSize<u32>>,
) -> Option<Size> {
    if !fit_display {
        return Some(LogicalSize::new(requested.0, requested.1).into());
    }
    let monitor = monitor?;
    log::info!("Fitting window to monitor: {}x{}", monitor.width, monitor.height);
    Some(monitor.into())
}

pub fn map_key(key_code: KeyCode) -> Option<Key> {
    match key_code {
        KeyCode::ArrowLeft => Some(Key::Left),
        KeyCode::ArrowRight => Some(Key::Right),
        KeyCode::ArrowUp => Some(Key::Up),
        KeyCode::ArrowDown => Some(Key::Down),
        KeyCode::Escape => Some(Key::Escape),
        KeyCode::Space => Some(Key::Space),
        KeyCode::Enter | KeyCode::NumpadEnter => Some(Key::Enter),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Backspace => Some(Key::Backspace),
        KeyCode::F1 => Some(Key::F1),
        KeyCode::F2 => Some(Key::F2),
        KeyCode::F3 => Some(Key::F3),
        KeyCode::F4 => Some(Key::F4),
        KeyCode::KeyW => Some(Key::W),
        KeyCode::KeyA => Some(Key::A),
        KeyCode::KeyS => Some(Key::S),
        KeyCode::KeyD => Some(Key::D),
        KeyCode::KeyQ => Some(Key::Q),
        KeyCode::KeyE => Some(Key::E),
        KeyCode::KeyR => Some(Key::R),
        _ => None,
    }
}

pub fn map_mouse_button(button: MouseButton) -> Option<MouseBtn> {
    match button {
        MouseButton::Left => Some(MouseBtn::Left),
        MouseButton::Right => Some(MouseBtn::Right),
        MouseButton::Middle => Some(MouseBtn::Middle),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wasd_uses_physical_positions() {
        assert_eq!(map_key(KeyCode::KeyW), Some(Key::W));
        assert_eq!(map_key(KeyCode::KeyA), Some(Key::A));
        assert_eq!(map_key(KeyCode::KeyS), Some(Key::S));
        assert_eq!(map_key(KeyCode::KeyD), Some(Key::D));
    }

    #[test]
    fn both_enter_keys_map_to_enter() {
        assert_eq!(map_key(KeyCode::Enter), Some(Key::Enter));
        assert_eq!(map_key(KeyCode::NumpadEnter), Some(Key::Enter));
        assert_eq!(map_key(KeyCode::KeyZ), None);
    }

    #[test]
    fn extra_mouse_buttons_are_ignored() {
        assert_eq!(map_mouse_button(MouseButton::Left), Some(MouseBtn::Left));
        assert_eq!(map_mouse_button(MouseButton::Back), None);
    }

    #[test]
    fn zero_size_means_fit_display() {
        let config = FraxConfig {
            width: 0,
            height: 0,
            ..FraxConfig::default()
        };
        assert!(WindowConfig::from(&config).fits_display());
        assert!(!WindowConfig::default().fits_display());
    }

    #[test]
    fn fit_display_takes_the_monitor_size() {
        let monitor = PhysicalSize::new(1920, 1080);
        assert_eq!(
            initial_size(true, (0, 0), Some(monitor)),
            Some(Size::Physical(PhysicalSize::new(1920, 1080)))
        );
    }

    #[test]
    fn fit_display_without_a_monitor_defers_to_the_platform() {
        assert_eq!(initial_size(true, (0, 0), None), None);
    }

    #[test]
    fn requested_sizes_ignore_the_monitor() {
        assert_eq!(
            initial_size(false, (800, 600), Some(PhysicalSize::new(1920, 1080))),
            Some(Size::Logical(LogicalSize::new(800.0, 600.0)))
        );
    }
}
