pub mod draw_list;
pub mod gpu_context;
pub mod loader;
pub mod projection;
pub mod renderer;
pub mod sprite_pipeline;
pub mod texture;
pub mod vertex;

pub use draw_list::{DrawCall, DrawList};
pub use gpu_context::GpuContext;
pub use loader::{GpuTexture, GpuTextureLoader};
pub use projection::ProjectionUniform;
pub use renderer::{FrameStats, OverlayTarget, Renderer};
pub use sprite_pipeline::SpritePipeline;
pub use texture::{decode_image, DecodedImage, Texture};
pub use vertex::SpriteVertex;
