//! Screen-space rectangles and the 2D camera description.
//!
//! Coordinates are y-down with the origin at the top-left of the window,
//! matching how sprites are positioned and how the renderer projects them.

pub use glam::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.w, self.h)
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Overlap test on open intervals: rectangles that only share an edge
    /// do not collide.
    pub fn overlaps(&self, other: &Rect) -> bool {
        self.x < other.x + other.w
            && self.x + self.w > other.x
            && self.y < other.y + other.h
            && self.y + self.h > other.y
    }

    /// Half-open containment, `[x, x + w) x [y, y + h)`.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x
            && point.x < self.x + self.w
            && point.y >= self.y
            && point.y < self.y + self.h
    }
}

/// A 2D view: `target` is the world point shown at screen position `offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera2D {
    pub offset: Vec2,
    pub target: Vec2,
    /// Degrees.
    pub rotation: f32,
    pub zoom: f32,
}

impl Camera2D {
    /// Camera whose target sits in the middle of a `screen_size` viewport.
    pub fn centered(screen_size: Vec2, target: Vec2) -> Self {
        Self {
            offset: screen_size / 2.0,
            target,
            rotation: 0.0,
            zoom: 1.0,
        }
    }

    /// World-space rectangle covered by the view, ignoring rotation and zoom.
    pub fn visible_bounds(&self) -> Rect {
        let min = self.target - self.offset;
        Rect::new(min.x, min.y, self.offset.x * 2.0, self.offset.y * 2.0)
    }
}

impl Default for Camera2D {
    fn default() -> Self {
        Self {
            offset: Vec2::ZERO,
            target: Vec2::ZERO,
            rotation: 0.0,
            zoom: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlap_is_symmetric() {
        let cases = [
            (Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(5.0, 5.0, 10.0, 10.0)),
            (Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(20.0, 0.0, 5.0, 5.0)),
            (Rect::new(-5.0, -5.0, 2.0, 30.0), Rect::new(-4.0, 0.0, 1.0, 1.0)),
            (Rect::new(0.0, 0.0, 10.0, 10.0), Rect::new(10.0, 0.0, 10.0, 10.0)),
        ];
        for (a, b) in cases {
            assert_eq!(a.overlaps(&b), b.overlaps(&a), "{a:?} vs {b:?}");
        }
    }

    #[test]
    fn shared_edge_is_not_an_overlap() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(!a.overlaps(&Rect::new(10.0, 0.0, 10.0, 10.0)));
        assert!(!a.overlaps(&Rect::new(0.0, 10.0, 10.0, 10.0)));
        assert!(a.overlaps(&Rect::new(9.9, 9.9, 10.0, 10.0)));
    }

    #[test]
    fn contains_is_half_open() {
        let r = Rect::new(0.0, 0.0, 10.0, 20.0);
        assert!(r.contains(Vec2::new(0.0, 0.0)));
        assert!(r.contains(Vec2::new(9.99, 19.99)));
        assert!(!r.contains(Vec2::new(10.0, 5.0)));
        assert!(!r.contains(Vec2::new(5.0, 20.0)));
    }

    #[test]
    fn centered_camera_covers_the_screen() {
        let cam = Camera2D::centered(Vec2::new(1920.0, 1080.0), Vec2::new(960.0, 540.0));
        assert_eq!(cam.visible_bounds(), Rect::new(0.0, 0.0, 1920.0, 1080.0));
    }
}
