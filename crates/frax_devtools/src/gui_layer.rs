//! egui integration for the frame loop.
//!
//! Game code builds UI between `begin_pass` and `end_pass`, in the same
//! place it issues sprite draws. Rendering then needs a split, because
//! `egui_wgpu::Renderer::render()` wants a `RenderPass<'static>` while
//! uploads borrow the encoder:
//!
//!   1. `end_pass()` -- finish the egui pass, tessellate
//!   2. `paint()`    -- upload textures and buffers, render in a new pass with
//!      `forget_lifetime()`, then free textures egui no longer references

use winit::event::WindowEvent;
use winit::window::Window;

struct PendingFrame {
    primitives: Vec<egui::ClippedPrimitive>,
    textures_delta: egui::TexturesDelta,
    pixels_per_point: f32,
}

pub struct GuiLayer {
    egui_ctx: egui::Context,
    egui_winit_state: egui_winit::State,
    egui_renderer: egui_wgpu::Renderer,
    in_pass: bool,
    pending: Option<PendingFrame>,
}

impl GuiLayer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        window: &Window,
    ) -> Self {
        let egui_ctx = egui::Context::default();
        let egui_winit_state = egui_winit::State::new(
            egui_ctx.clone(),
            egui_ctx.viewport_id(),
            window,
            Some(window.scale_factor() as f32),
            None,
            None,
        );
        let egui_renderer = egui_wgpu::Renderer::new(device, surface_format, None, 1, false);

        Self {
            egui_ctx,
            egui_winit_state,
            egui_renderer,
            in_pass: false,
            pending: None,
        }
    }

    pub fn ctx(&self) -> &egui::Context {
        &self.egui_ctx
    }

    /// Returns whether egui consumed the event (e.g. a click on a panel).
    pub fn handle_window_event(&mut self, window: &Window, event: &WindowEvent) -> bool {
        self.egui_winit_state
            .on_window_event(window, event)
            .consumed
    }

    /// Whether the pointer is over egui UI and should not reach the game.
    pub fn wants_pointer(&self) -> bool {
        self.egui_ctx.wants_pointer_input()
    }

    pub fn begin_pass(&mut self, window: &Window) {
        if self.in_pass {
            log::warn!("GUI pass already open; ignoring begin_pass");
            return;
        }
        let raw_input = self.egui_winit_state.take_egui_input(window);
        self.egui_ctx.begin_pass(raw_input);
        self.in_pass = true;
    }

    pub fn end_pass(&mut self, window: &Window) {
        if !self.in_pass {
            return;
        }
        self.in_pass = false;

        let full_output = self.egui_ctx.end_pass();
        self.egui_winit_state
            .handle_platform_output(window, full_output.platform_output);

        let primitives = self
            .egui_ctx
            .tessellate(full_output.shapes, full_output.pixels_per_point);

        // A frame that was never painted still owes its texture uploads.
        let textures_delta = match self.pending.take() {
            Some(unpainted) => {
                let mut delta = unpainted.textures_delta;
                delta.append(full_output.textures_delta);
                delta
            }
            None => full_output.textures_delta,
        };
        self.pending = Some(PendingFrame {
            primitives,
            textures_delta,
            pixels_per_point: full_output.pixels_per_point,
        });
    }

    /// Draw the last finished pass on top of `view`. No-op without one.
    pub fn paint(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        encoder: &mut wgpu::CommandEncoder,
        view: &wgpu::TextureView,
        size_in_pixels: (u32, u32),
    ) {
        let Some(frame) = self.pending.take() else {
            return;
        };
        let screen_descriptor = egui_wgpu::ScreenDescriptor {
            size_in_pixels: [size_in_pixels.0, size_in_pixels.1],
            pixels_per_point: frame.pixels_per_point,
        };

        for (id, image_delta) in &frame.textures_delta.set {
            self.egui_renderer
                .update_texture(device, queue, *id, image_delta);
        }
        self.egui_renderer.update_buffers(
            device,
            queue,
            encoder,
            &frame.primitives,
            &screen_descriptor,
        );

        {
            let mut egui_pass = encoder
                .begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("egui Render Pass"),
                    color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                        view,
                        resolve_target: None,
                        ops: wgpu::Operations {
                            load: wgpu::LoadOp::Load,
                            store: wgpu::StoreOp::Store,
                        },
                    })],
                    depth_stencil_attachment: None,
                    ..Default::default()
                })
                .forget_lifetime();

            self.egui_renderer
                .render(&mut egui_pass, &frame.primitives, &screen_descriptor);
        }

        for id in &frame.textures_delta.free {
            self.egui_renderer.free_texture(id);
        }
    }
}
