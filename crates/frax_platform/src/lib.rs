#[cfg(feature = "audio")]
pub mod audio;
pub mod window;

#[cfg(feature = "audio")]
pub use audio::AudioDevice;
pub use window::{initial_size, map_key, map_mouse_button, Platform, WindowConfig};
