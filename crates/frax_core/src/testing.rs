//! Test doubles for the collaborator traits: a loader that counts uploads and
//! frees, and a canvas/backend that records every draw call.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use crate::backend::{Backend, Canvas, LoadedTexture, TextureLoader};
use crate::color::Color;
use crate::error::FraxError;
use crate::geometry::{Rect, Vec2};

#[derive(Debug)]
pub struct FakeTexture {
    pub source_id: String,
    pub serial: u64,
    freed: Rc<Cell<u32>>,
}

impl Drop for FakeTexture {
    fn drop(&mut self) {
        self.freed.set(self.freed.get() + 1);
    }
}

#[derive(Default)]
struct LoaderState {
    images: HashMap<String, (u32, u32, u32)>,
    calls: HashMap<String, u32>,
    next_serial: u64,
}

#[derive(Clone, Default)]
pub struct CountingLoader {
    state: Rc<RefCell<LoaderState>>,
    freed: Rc<Cell<u32>>,
}

impl CountingLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_image(self, source_id: &str, width: u32, height: u32) -> Self {
        self.with_animation(source_id, width, height, 1)
    }

    pub fn with_animation(self, source_id: &str, width: u32, height: u32, frames: u32) -> Self {
        self.state
            .borrow_mut()
            .images
            .insert(source_id.to_string(), (width, height, frames));
        self
    }

    pub fn load_calls(&self, source_id: &str) -> u32 {
        self.state
            .borrow()
            .calls
            .get(source_id)
            .copied()
            .unwrap_or(0)
    }

    /// Textures dropped so far.
    pub fn freed(&self) -> u32 {
        self.freed.get()
    }
}

impl TextureLoader for CountingLoader {
    type Texture = FakeTexture;

    fn load(&mut self, source_id: &str) -> Result<LoadedTexture<FakeTexture>, FraxError> {
        let mut state = self.state.borrow_mut();
        *state.calls.entry(source_id.to_string()).or_insert(0) += 1;
        let Some(&(width, height, frame_count)) = state.images.get(source_id) else {
            return Err(FraxError::resource_load(source_id, "no such asset"));
        };
        state.next_serial += 1;
        Ok(LoadedTexture {
            texture: FakeTexture {
                source_id: source_id.to_string(),
                serial: state.next_serial,
                freed: Rc::clone(&self.freed),
            },
            width,
            height,
            frame_count,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawOp {
    Clear(Color),
    Rectangle {
        rect: Rect,
        color: Color,
    },
    Texture {
        source_id: String,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    },
}

#[derive(Debug, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<DrawOp>,
}

impl Canvas for RecordingCanvas {
    type Texture = FakeTexture;

    fn clear_background(&mut self, color: Color) {
        self.ops.push(DrawOp::Clear(color));
    }

    fn draw_rectangle(&mut self, rect: Rect, color: Color) {
        self.ops.push(DrawOp::Rectangle { rect, color });
    }

    fn draw_texture_pro(
        &mut self,
        texture: &FakeTexture,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        self.ops.push(DrawOp::Texture {
            source_id: texture.source_id.clone(),
            source,
            dest,
            origin,
            rotation,
            tint,
        });
    }
}

/// Frame events in the order the backend saw them.
#[derive(Debug, Clone, PartialEq)]
pub enum FrameEvent {
    Begin,
    Draw(DrawOp),
    End,
}

#[derive(Debug, Default)]
pub struct MockBackend {
    pub events: Vec<FrameEvent>,
    pub frames_presented: u32,
    /// Raise the window close signal once this many frames were presented.
    pub close_after_frames: Option<u32>,
    pub close_polls: u32,
}

impl MockBackend {
    pub fn closing_after(frames: u32) -> Self {
        Self {
            close_after_frames: Some(frames),
            ..Self::default()
        }
    }

    pub fn draws(&self) -> impl Iterator<Item = &DrawOp> {
        self.events.iter().filter_map(|event| match event {
            FrameEvent::Draw(op) => Some(op),
            _ => None,
        })
    }
}

impl Canvas for MockBackend {
    type Texture = FakeTexture;

    fn clear_background(&mut self, color: Color) {
        self.events.push(FrameEvent::Draw(DrawOp::Clear(color)));
    }

    fn draw_rectangle(&mut self, rect: Rect, color: Color) {
        self.events
            .push(FrameEvent::Draw(DrawOp::Rectangle { rect, color }));
    }

    fn draw_texture_pro(
        &mut self,
        texture: &FakeTexture,
        source: Rect,
        dest: Rect,
        origin: Vec2,
        rotation: f32,
        tint: Color,
    ) {
        self.events.push(FrameEvent::Draw(DrawOp::Texture {
            source_id: texture.source_id.clone(),
            source,
            dest,
            origin,
            rotation,
            tint,
        }));
    }
}

impl Backend for MockBackend {
    fn begin_drawing(&mut self) {
        self.events.push(FrameEvent::Begin);
    }

    fn end_drawing(&mut self) {
        self.events.push(FrameEvent::End);
        self.frames_presented += 1;
    }

    fn window_should_close(&mut self) -> bool {
        self.close_polls += 1;
        self.close_after_frames
            .is_some_and(|limit| self.frames_presented >= limit)
    }

    fn frame_time(&self) -> f32 {
        1.0 / 60.0
    }
}
