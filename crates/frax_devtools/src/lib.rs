pub mod gui_layer;
pub mod gui_window;

pub use gui_layer::GuiLayer;
pub use gui_window::{GuiWindow, TITLE_BAR_HEIGHT};
