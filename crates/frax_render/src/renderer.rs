//! Frame renderer.
//!
//! Draws are queued into a [`DrawList`] during the frame and streamed to the
//! GPU in one go by `end_frame`: one vertex/index upload, one render pass,
//! one `draw_indexed` per texture run. Flat rectangles sample a 1x1 white
//! texture so they batch with everything else.

use std::cell::Cell;
use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use frax_core::{Color, FraxError, Rect, Vec2};
use wgpu::util::DeviceExt;
use winit::window::Window;

use crate::draw_list::DrawList;
use crate::gpu_context::GpuContext;
use crate::loader::{GpuTexture, GpuTextureLoader};
use crate::projection::ProjectionUniform;
use crate::sprite_pipeline::SpritePipeline;
use crate::texture::Texture;
use crate::vertex::SpriteVertex;

const WHITE_TEXTURE_ID: u64 = 0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub quads: usize,
    pub draw_calls: usize,
}

/// What an overlay pass (e.g. the GUI) needs to draw on top of the frame.
pub struct OverlayTarget<'a> {
    pub device: &'a wgpu::Device,
    pub queue: &'a wgpu::Queue,
    pub encoder: &'a mut wgpu::CommandEncoder,
    pub view: &'a wgpu::TextureView,
    pub size: (u32, u32),
}

pub struct Renderer {
    gpu: GpuContext,
    pipeline: SpritePipeline,
    projection_buffer: wgpu::Buffer,
    projection_bind_group: wgpu::BindGroup,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    vertex_capacity: usize,
    index_capacity: usize,
    white: GpuTexture,
    next_texture_id: Rc<Cell<u64>>,
    draw_list: DrawList,
    /// Bind groups referenced by this frame's draw calls, kept alive until submit.
    bindings: HashMap<u64, Rc<wgpu::BindGroup>>,
    last_stats: FrameStats,
}

impl Renderer {
    pub fn new(window: Arc<Window>, vsync: bool) -> Result<Self, FraxError> {
        let gpu = GpuContext::new(window, vsync)?;
        let pipeline = SpritePipeline::new(&gpu.device, gpu.surface_format);

        let projection = ProjectionUniform::screen(gpu.size.0, gpu.size.1);
        let projection_buffer = gpu
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("Projection Uniform Buffer"),
                contents: bytemuck::cast_slice(&[projection]),
                usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            });
        let projection_bind_group =
            pipeline.create_projection_bind_group(&gpu.device, &projection_buffer);

        let white = Texture::from_rgba8(&gpu.device, &gpu.queue, &[255; 4], 1, 1, "white")?;
        let white = GpuTexture::new(
            WHITE_TEXTURE_ID,
            &gpu.device,
            &pipeline.texture_bind_group_layout,
            white,
        );

        let vertex_buffer = create_vertex_buffer(&gpu.device, 1);
        let index_buffer = create_index_buffer(&gpu.device, 1);

        Ok(Self {
            gpu,
            pipeline,
            projection_buffer,
            projection_bind_group,
            vertex_buffer,
            index_buffer,
            vertex_capacity: 1,
            index_capacity: 1,
            white,
            next_texture_id: Rc::new(Cell::new(WHITE_TEXTURE_ID + 1)),
            draw_list: DrawList::new(),
            bindings: HashMap::new(),
            last_stats: FrameStats::default(),
        })
    }

    /// A loader uploading through this renderer's device. All loaders share
    /// one id sequence.
    pub fn texture_loader(&self) -> GpuTextureLoader {
        GpuTextureLoader::new(
            Rc::clone(&self.gpu.device),
            Rc::clone(&self.gpu.queue),
            Rc::clone(&self.pipeline.texture_bind_group_layout),
            Rc::clone(&self.next_texture_id),
        )
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.gpu.resize(width, height);
        let projection = ProjectionUniform::screen(width, height);
        self.gpu.queue.write_buffer(
            &self.projection_buffer,
            0,
            bytemuck::cast_slice(&[projection]),
        );
    }

    pub fn size(&self) -> (u32, u32) {
        self.gpu.size
    }

    pub fn device(&self) -> &Rc<wgpu::Device> {
        &self.gpu.device
    }

    pub fn queue(&self) -> &Rc<wgpu::Queue> {
        &self.gpu.queue
    }

    pub fn surface_format(&self) -> wgpu::TextureFormat {
        self.gpu.surface_format
    }

    /// Quad and draw call counts of the last presented frame.
    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    pub fn begin_frame(&mut self) {
        self.draw_list.reset();
        self.bindings.clear();
    }

    pub fn clear(&mut self, color: Color) {
        self.draw_list.clear(color);
        self.bindings.clear();
    }

    pub fn draw_rectangle(&mut self, rect: Rect, color: Color) {
        self.draw_list.push_rect(WHITE_TEXTURE_ID, rect, color);
        self.bindings
            .entry(WHITE_TEXTURE_ID)
            .or_insert_with(|| Rc::clone(self.white.bind_group()));
    }

    pub fn draw_texture(
        &mut self,
        texture: &GpuTexture,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        self.draw_list.push_textured(
            texture.id(),
            texture.size(),
            source,
            dest,
            origin,
            rotation,
            tint,
        );
        self.bindings
            .entry(texture.id())
            .or_insert_with(|| Rc::clone(texture.bind_group()));
    }

    /// Submit the queued frame and present it. `overlay` records extra passes
    /// on top of the sprites before submission.
    pub fn end_frame(&mut self, overlay: impl FnOnce(OverlayTarget<'_>)) {
        self.upload_geometry();

        let Some((output, view)) = self.gpu.begin_frame() else {
            self.begin_frame();
            return;
        };

        let mut encoder = self
            .gpu
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frax Frame Encoder"),
            });

        {
            let clear = self.draw_list.clear_color().unwrap_or(Color::BLACK);
            let [r, g, b, a] = clear.to_rgba_f32();
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Sprite Render Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color {
                            r: r as f64,
                            g: g as f64,
                            b: b as f64,
                            a: a as f64,
                        }),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            if !self.draw_list.is_empty() {
                render_pass.set_pipeline(&self.pipeline.render_pipeline);
                render_pass.set_bind_group(0, &self.projection_bind_group, &[]);
                render_pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
                render_pass
                    .set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);

                for draw in self.draw_list.draw_calls() {
                    let Some(bind_group) = self.bindings.get(&draw.texture_id) else {
                        log::warn!("Draw call references unknown texture {}", draw.texture_id);
                        continue;
                    };
                    render_pass.set_bind_group(1, bind_group.as_ref(), &[]);
                    render_pass.draw_indexed(
                        draw.index_start..(draw.index_start + draw.index_count),
                        0,
                        0..1,
                    );
                }
            }
        }

        overlay(OverlayTarget {
            device: &self.gpu.device,
            queue: &self.gpu.queue,
            encoder: &mut encoder,
            view: &view,
            size: self.gpu.size,
        });

        self.gpu.queue.submit(std::iter::once(encoder.finish()));
        output.present();

        self.last_stats = FrameStats {
            quads: self.draw_list.quad_count(),
            draw_calls: self.draw_list.draw_calls().len(),
        };
        self.begin_frame();
    }

    fn upload_geometry(&mut self) {
        let vertices = self.draw_list.vertices();
        let indices = self.draw_list.indices();

        let needed_vertices = vertices.len().max(1);
        if needed_vertices > self.vertex_capacity {
            self.vertex_capacity = needed_vertices.next_power_of_two();
            self.vertex_buffer = create_vertex_buffer(&self.gpu.device, self.vertex_capacity);
        }
        let needed_indices = indices.len().max(1);
        if needed_indices > self.index_capacity {
            self.index_capacity = needed_indices.next_power_of_two();
            self.index_buffer = create_index_buffer(&self.gpu.device, self.index_capacity);
        }

        if !vertices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.vertex_buffer, 0, bytemuck::cast_slice(vertices));
        }
        if !indices.is_empty() {
            self.gpu
                .queue
                .write_buffer(&self.index_buffer, 0, bytemuck::cast_slice(indices));
        }
    }
}

fn create_vertex_buffer(device: &wgpu::Device, vertex_capacity: usize) -> wgpu::Buffer {
    let byte_len = (vertex_capacity * std::mem::size_of::<SpriteVertex>()).max(1) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Vertex Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}

fn create_index_buffer(device: &wgpu::Device, index_capacity: usize) -> wgpu::Buffer {
    // COPY_BUFFER_ALIGNMENT is 4 bytes; u32 indices always satisfy it.
    let byte_len = (index_capacity * std::mem::size_of::<u32>()).max(4) as u64;
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Sprite Index Buffer"),
        size: byte_len,
        usage: wgpu::BufferUsages::INDEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
