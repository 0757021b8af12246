//! Keyboard and mouse state with level-triggered (`is_held`) and
//! edge-triggered (`is_just_pressed` / `is_just_released`) queries.
//!
//! The platform layer feeds events in as they arrive; `end_frame()` clears the
//! edge-triggered sets and the mouse delta once the frame has consumed them.

use std::collections::HashSet;
use std::hash::Hash;

use crate::geometry::Vec2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Escape,
    Space,
    Enter,
    Tab,
    Backspace,
    F1,
    F2,
    F3,
    F4,
    W,
    A,
    S,
    D,
    Q,
    E,
    R,
}

impl Key {
    /// Case-insensitive lookup used by config files (`"escape"`, `"q"`, `"f1"`).
    pub fn from_name(name: &str) -> Option<Self> {
        let key = match name.to_ascii_lowercase().as_str() {
            "left" => Key::Left,
            "right" => Key::Right,
            "up" => Key::Up,
            "down" => Key::Down,
            "escape" | "esc" => Key::Escape,
            "space" => Key::Space,
            "enter" | "return" => Key::Enter,
            "tab" => Key::Tab,
            "backspace" => Key::Backspace,
            "f1" => Key::F1,
            "f2" => Key::F2,
            "f3" => Key::F3,
            "f4" => Key::F4,
            "w" => Key::W,
            "a" => Key::A,
            "s" => Key::S,
            "d" => Key::D,
            "q" => Key::Q,
            "e" => Key::E,
            "r" => Key::R,
            _ => return None,
        };
        Some(key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseBtn {
    Left,
    Right,
    Middle,
}

/// Held set plus the transitions seen since the last `end_frame`.
#[derive(Debug, Clone)]
struct ButtonSet<T> {
    down: HashSet<T>,
    pressed: HashSet<T>,
    released: HashSet<T>,
}

impl<T: Copy + Eq + Hash> ButtonSet<T> {
    fn new() -> Self {
        Self {
            down: HashSet::new(),
            pressed: HashSet::new(),
            released: HashSet::new(),
        }
    }

    // OS key repeat sends extra presses; only the first one is an edge.
    fn press(&mut self, button: T) {
        if self.down.insert(button) {
            self.pressed.insert(button);
        }
    }

    fn release(&mut self, button: T) {
        if self.down.remove(&button) {
            self.released.insert(button);
        }
    }

    fn clear_edges(&mut self) {
        self.pressed.clear();
        self.released.clear();
    }
}

#[derive(Debug, Clone)]
pub struct InputState {
    keys: ButtonSet<Key>,
    buttons: ButtonSet<MouseBtn>,
    mouse_position: Vec2,
    mouse_delta: Vec2,
}

impl InputState {
    pub fn new() -> Self {
        Self {
            keys: ButtonSet::new(),
            buttons: ButtonSet::new(),
            mouse_position: Vec2::ZERO,
            mouse_delta: Vec2::ZERO,
        }
    }

    pub fn key_down(&mut self, key: Key) {
        self.keys.press(key);
    }

    pub fn key_up(&mut self, key: Key) {
        self.keys.release(key);
    }

    pub fn mouse_down(&mut self, btn: MouseBtn) {
        self.buttons.press(btn);
    }

    pub fn mouse_up(&mut self, btn: MouseBtn) {
        self.buttons.release(btn);
    }

    /// Record a cursor move; the movement accumulates into `mouse_delta`.
    pub fn mouse_moved(&mut self, position: Vec2) {
        self.mouse_delta += position - self.mouse_position;
        self.mouse_position = position;
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.keys.down.contains(&key)
    }

    pub fn is_just_pressed(&self, key: Key) -> bool {
        self.keys.pressed.contains(&key)
    }

    pub fn is_just_released(&self, key: Key) -> bool {
        self.keys.released.contains(&key)
    }

    pub fn is_mouse_held(&self, btn: MouseBtn) -> bool {
        self.buttons.down.contains(&btn)
    }

    pub fn is_mouse_just_pressed(&self, btn: MouseBtn) -> bool {
        self.buttons.pressed.contains(&btn)
    }

    pub fn is_mouse_just_released(&self, btn: MouseBtn) -> bool {
        self.buttons.released.contains(&btn)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.mouse_position
    }

    /// Cursor movement since the last `end_frame`.
    pub fn mouse_delta(&self) -> Vec2 {
        self.mouse_delta
    }

    pub fn end_frame(&mut self) {
        self.keys.clear_edges();
        self.buttons.clear_edges();
        self.mouse_delta = Vec2::ZERO;
    }
}

impl Default for InputState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_an_edge_then_a_level() {
        let mut input = InputState::new();
        input.key_down(Key::A);
        assert!(input.is_held(Key::A));
        assert!(input.is_just_pressed(Key::A));

        input.end_frame();
        assert!(input.is_held(Key::A));
        assert!(!input.is_just_pressed(Key::A));
    }

    #[test]
    fn repeated_press_while_held_is_not_a_new_edge() {
        let mut input = InputState::new();
        input.key_down(Key::Space);
        input.end_frame();
        input.key_down(Key::Space);
        assert!(!input.is_just_pressed(Key::Space));
    }

    #[test]
    fn release_without_press_is_ignored() {
        let mut input = InputState::new();
        input.key_up(Key::W);
        assert!(!input.is_just_released(Key::W));
        assert!(!input.is_held(Key::W));
    }

    #[test]
    fn press_and_release_in_one_frame_reports_both_edges() {
        let mut input = InputState::new();
        input.key_down(Key::Q);
        input.key_up(Key::Q);
        assert!(input.is_just_pressed(Key::Q));
        assert!(input.is_just_released(Key::Q));
        assert!(!input.is_held(Key::Q));
    }

    #[test]
    fn mouse_buttons_track_separately_from_keys() {
        let mut input = InputState::new();
        input.mouse_down(MouseBtn::Left);
        assert!(input.is_mouse_just_pressed(MouseBtn::Left));
        assert!(!input.is_mouse_held(MouseBtn::Right));

        input.end_frame();
        input.mouse_up(MouseBtn::Left);
        assert!(input.is_mouse_just_released(MouseBtn::Left));
        assert!(!input.is_mouse_held(MouseBtn::Left));
    }

    #[test]
    fn mouse_delta_accumulates_until_end_frame() {
        let mut input = InputState::new();
        input.mouse_moved(Vec2::new(10.0, 10.0));
        input.end_frame();

        input.mouse_moved(Vec2::new(13.0, 8.0));
        input.mouse_moved(Vec2::new(15.0, 9.0));
        assert_eq!(input.mouse_delta(), Vec2::new(5.0, -1.0));
        assert_eq!(input.mouse_position(), Vec2::new(15.0, 9.0));

        input.end_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
    }

    #[test]
    fn key_names_parse_case_insensitively() {
        assert_eq!(Key::from_name("Escape"), Some(Key::Escape));
        assert_eq!(Key::from_name("esc"), Some(Key::Escape));
        assert_eq!(Key::from_name("Q"), Some(Key::Q));
        assert_eq!(Key::from_name("f3"), Some(Key::F3));
        assert_eq!(Key::from_name("hyper"), None);
    }
}
