//! 8-bit RGBA color with the usual named palette.

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(from = "[u8; 4]")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba(0, 0, 0, 255);
    pub const BLANK: Color = Color::rgba(0, 0, 0, 0);
    pub const RAYWHITE: Color = Color::rgba(245, 245, 245, 255);
    pub const LIGHTGRAY: Color = Color::rgba(200, 200, 200, 255);
    pub const GRAY: Color = Color::rgba(130, 130, 130, 255);
    pub const DARKGRAY: Color = Color::rgba(80, 80, 80, 255);
    pub const RED: Color = Color::rgba(230, 41, 55, 255);
    pub const ORANGE: Color = Color::rgba(255, 161, 0, 255);
    pub const YELLOW: Color = Color::rgba(253, 249, 0, 255);
    pub const GREEN: Color = Color::rgba(0, 228, 48, 255);
    pub const SKYBLUE: Color = Color::rgba(102, 191, 255, 255);
    pub const BLUE: Color = Color::rgba(0, 121, 241, 255);
    pub const PURPLE: Color = Color::rgba(200, 122, 255, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }

    /// Packs the channels as `0xRRGGBBAA`.
    pub const fn to_int(self) -> u32 {
        ((self.r as u32) << 24) | ((self.g as u32) << 16) | ((self.b as u32) << 8) | self.a as u32
    }

    /// Normalized channels for vertex colors.
    pub fn to_rgba_f32(self) -> [f32; 4] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
            self.a as f32 / 255.0,
        ]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<[u8; 4]> for Color {
    fn from([r, g, b, a]: [u8; 4]) -> Self {
        Self::rgba(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn to_int_packs_rgba_big_endian() {
        assert_eq!(Color::rgba(0x12, 0x34, 0x56, 0x78).to_int(), 0x1234_5678);
        assert_eq!(Color::WHITE.to_int(), 0xFFFF_FFFF);
    }

    #[test]
    fn normalized_channels() {
        let [r, g, b, a] = Color::rgba(255, 0, 51, 255).to_rgba_f32();
        assert_eq!(r, 1.0);
        assert_eq!(g, 0.0);
        assert!((b - 0.2).abs() < 1e-6);
        assert_eq!(a, 1.0);
    }

    #[test]
    fn deserializes_from_array() {
        let color: Color = serde_json::from_str("[10, 20, 30, 40]").expect("valid color");
        assert_eq!(color, Color::rgba(10, 20, 30, 40));
    }

    #[test]
    fn default_is_white() {
        assert_eq!(Color::default(), Color::WHITE);
    }
}
