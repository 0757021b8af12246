//! Small stateless helpers for game code. The facade crate wraps these with
//! live input, screen size and the thread RNG.

use rand::Rng;

use crate::color::Color;
use crate::geometry::{Camera2D, Vec2};
use crate::input::{InputState, Key};
use crate::sprite::Sprite;

/// Packed RGBA equality.
pub fn colors_equal(a: Color, b: Color) -> bool {
    a.to_int() == b.to_int()
}

/// Move by `speed` per held key: W up, A left, S down, D right (y grows down).
/// Opposite keys cancel out.
pub fn wasd_movement<T>(sprite: &mut Sprite<T>, input: &InputState, speed: f32) {
    if input.is_held(Key::W) {
        sprite.y -= speed;
    }
    if input.is_held(Key::A) {
        sprite.x -= speed;
    }
    if input.is_held(Key::S) {
        sprite.y += speed;
    }
    if input.is_held(Key::D) {
        sprite.x += speed;
    }
}

/// Uniform integer-valued point in `[target - offset, target + offset]` per
/// axis, bounds inclusive.
pub fn random_position_inside<R: Rng + ?Sized>(camera: &Camera2D, rng: &mut R) -> Vec2 {
    Vec2::new(
        random_axis(camera.target.x - camera.offset.x, camera.target.x + camera.offset.x, rng),
        random_axis(camera.target.y - camera.offset.y, camera.target.y + camera.offset.y, rng),
    )
}

/// Point in one of the 8 screen-sized cells surrounding the camera view,
/// chosen uniformly, pushed a further `margin` out in that cell's direction.
pub fn random_position_outside<R: Rng + ?Sized>(
    camera: &Camera2D,
    screen_size: Vec2,
    margin: f32,
    rng: &mut R,
) -> Vec2 {
    let direction = neighbour_direction(rng.random_range(0..8));
    let inside = random_position_inside(camera, rng);
    inside + direction * (screen_size + Vec2::splat(margin))
}

/// Row-major 3x3 grid around the view, skipping the centre cell.
fn neighbour_direction(cell: u32) -> Vec2 {
    let cell = if cell >= 4 { cell + 1 } else { cell };
    let column = (cell % 3) as f32 - 1.0;
    let row = (cell / 3) as f32 - 1.0;
    Vec2::new(column, row)
}

fn random_axis<R: Rng + ?Sized>(a: f32, b: f32, rng: &mut R) -> f32 {
    // Integer sampling; fractional bounds truncate toward zero.
    let (a, b) = (a as i64, b as i64);
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.random_range(lo..=hi) as f32
}
