//! Draggable, collapsible panel whose contents come from a callback.
//!
//! Dragging is driven by the framework's own input state, not egui's, so the
//! panel moves with the same mouse deltas sprites see. Coordinates are
//! physical pixels and converted to egui points when drawn.

use std::sync::atomic::{AtomicU64, Ordering};

use frax_core::{InputState, MouseBtn, Rect, Vec2};

pub const TITLE_BAR_HEIGHT: f32 = 20.0;

static NEXT_WINDOW_ID: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone)]
pub struct GuiWindow {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
    pub title: String,
    pub hidden: bool,
    dragging: bool,
    // Keeps egui state apart for windows sharing a title. Clones share it.
    instance: u64,
}

impl GuiWindow {
    /// New windows start hidden; call `show()` to open one.
    pub fn new(rect: Rect, title: impl Into<String>) -> Self {
        Self {
            x: rect.x,
            y: rect.y,
            w: rect.w,
            h: rect.h,
            title: title.into(),
            hidden: true,
            dragging: false,
            instance: NEXT_WINDOW_ID.fetch_add(1, Ordering::Relaxed),
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }

    pub fn title_bar(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, TITLE_BAR_HEIGHT)
    }

    /// Where callers should start laying out content.
    pub fn content_origin(&self) -> Vec2 {
        Vec2::new(self.x, self.y + TITLE_BAR_HEIGHT)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn egui_id(&self) -> egui::Id {
        egui::Id::new(("frax_gui_window", self.instance))
    }

    pub fn show(&mut self) {
        self.hidden = false;
    }

    pub fn hide(&mut self) {
        self.hidden = true;
        self.dragging = false;
    }

    pub fn toggle(&mut self) {
        if self.hidden {
            self.show();
        } else {
            self.hide();
        }
    }

    /// Start a drag on a left press inside the title bar, follow the mouse
    /// while dragging, stop on release.
    pub fn update(&mut self, input: &InputState) {
        if self.hidden {
            return;
        }

        if !self.dragging
            && input.is_mouse_just_pressed(MouseBtn::Left)
            && self.title_bar().contains(input.mouse_position())
        {
            self.dragging = true;
        }

        if self.dragging {
            let delta = input.mouse_delta();
            self.x += delta.x;
            self.y += delta.y;

            if input.is_mouse_just_released(MouseBtn::Left)
                || !input.is_mouse_held(MouseBtn::Left)
            {
                self.dragging = false;
            }
        }
    }

    /// Render the panel and run `content` with the content origin.
    ///
    /// Does nothing while hidden. Clicking the close box hides the window.
    /// `content` only runs while the panel is expanded.
    pub fn draw(&mut self, ctx: &egui::Context, content: impl FnOnce(&mut egui::Ui, Vec2)) {
        if self.hidden {
            return;
        }

        let pixels_per_point = ctx.pixels_per_point();
        let origin = self.content_origin();
        let mut open = true;
        egui::Window::new(self.title.as_str())
            .id(self.egui_id())
            .current_pos(egui::pos2(
                self.x / pixels_per_point,
                self.y / pixels_per_point,
            ))
            .fixed_size(egui::vec2(
                self.w / pixels_per_point,
                (self.h - TITLE_BAR_HEIGHT).max(0.0) / pixels_per_point,
            ))
            .collapsible(true)
            .movable(false)
            .resizable(false)
            .open(&mut open)
            .show(ctx, |ui| content(ui, origin));

        if !open {
            log::debug!("GUI window '{}' closed", self.title);
            self.hide();
        }
    }
}
