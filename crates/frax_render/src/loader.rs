use std::cell::Cell;
use std::rc::Rc;

use frax_core::{FraxError, LoadedTexture, TextureLoader};

use crate::sprite_pipeline::create_texture_bind_group;
use crate::texture::{decode_image, Texture};

/// A texture living on the GPU together with its bind group. Dropping the
/// last reference frees the GPU memory.
pub struct GpuTexture {
    id: u64,
    bind_group: Rc<wgpu::BindGroup>,
    texture: Texture,
}

impl GpuTexture {
    pub(crate) fn new(
        id: u64,
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        texture: Texture,
    ) -> Self {
        let bind_group = create_texture_bind_group(device, layout, &texture);
        Self {
            id,
            bind_group: Rc::new(bind_group),
            texture,
        }
    }

    /// Unique per upload; draw calls batch on it.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Full pixel size, including every stacked animation frame.
    pub fn size(&self) -> (u32, u32) {
        self.texture.size
    }

    pub fn bind_group(&self) -> &Rc<wgpu::BindGroup> {
        &self.bind_group
    }
}

impl std::fmt::Debug for GpuTexture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GpuTexture")
            .field("id", &self.id)
            .field("size", &self.texture.size)
            .finish()
    }
}

/// Reads image files from disk and uploads them. Source ids are file paths.
#[derive(Clone)]
pub struct GpuTextureLoader {
    device: Rc<wgpu::Device>,
    queue: Rc<wgpu::Queue>,
    layout: Rc<wgpu::BindGroupLayout>,
    next_id: Rc<Cell<u64>>,
}

impl GpuTextureLoader {
    pub(crate) fn new(
        device: Rc<wgpu::Device>,
        queue: Rc<wgpu::Queue>,
        layout: Rc<wgpu::BindGroupLayout>,
        next_id: Rc<Cell<u64>>,
    ) -> Self {
        Self {
            device,
            queue,
            layout,
            next_id,
        }
    }

    /// Upload already-decoded RGBA8 pixels as a still texture.
    pub fn upload_rgba8(
        &self,
        rgba: &[u8],
        width: u32,
        height: u32,
        label: &str,
    ) -> Result<GpuTexture, FraxError> {
        let texture = Texture::from_rgba8(&self.device, &self.queue, rgba, width, height, label)?;
        Ok(self.wrap(texture))
    }

    fn wrap(&self, texture: Texture) -> GpuTexture {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        GpuTexture::new(id, &self.device, &self.layout, texture)
    }
}

impl TextureLoader for GpuTextureLoader {
    type Texture = GpuTexture;

    fn load(&mut self, source_id: &str) -> Result<LoadedTexture<GpuTexture>, FraxError> {
        let bytes = std::fs::read(source_id).map_err(|e| FraxError::resource_load(source_id, e))?;
        let image = decode_image(&bytes, source_id)?;
        let texture = Texture::from_decoded(&self.device, &self.queue, &image, source_id)?;
        let texture = self.wrap(texture);

        log::info!(
            "Uploaded '{}' ({}x{}, {} frame{})",
            source_id,
            image.frame_width,
            image.frame_height,
            image.frame_count,
            if image.frame_count == 1 { "" } else { "s" }
        );
        Ok(LoadedTexture {
            texture,
            width: image.frame_width,
            height: image.frame_height,
            frame_count: image.frame_count,
        })
    }
}
