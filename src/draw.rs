//! Colours and the 2D drawing interface.
//!
//! Renderers paint through [`DrawTarget`], a small canvas-like API in logical
//! pixels. [`DrawList`] records the calls; the GPU backend turns a recorded
//! list into instanced shapes, and tests inspect it directly.
//!
//! ```ignore
//! let mut list = DrawList::new();
//! list.clear(Color::BLACK);
//! list.fill_circle(Vec2::new(10.0, 10.0), 2.0, Color::WHITE);
//! assert_eq!(list.circles().count(), 1);
//! ```

use std::fmt;

use glam::Vec2;
use serde::Deserialize;
use thiserror::Error;

/// An RGBA colour, components in 0.0-1.0 (sRGB encoded).
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid colour `{0}`: expected #rgb, #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

impl Color {
    pub const BLACK: Color = Color::rgba(0.0, 0.0, 0.0, 1.0);
    pub const WHITE: Color = Color::rgba(1.0, 1.0, 1.0, 1.0);
    pub const TRANSPARENT: Color = Color::rgba(0.0, 0.0, 0.0, 0.0);

    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Colour from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::rgba(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Parse a CSS-style hex colour.
    pub fn from_hex(s: &str) -> Result<Self, ColorParseError> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let nibble = |i: usize| {
            u8::from_str_radix(&hex[i..i + 1], 16)
                .map(|v| v * 17)
                .map_err(|_| err())
        };
        match hex.len() {
            3 => Ok(Self::from_rgba8(nibble(0)?, nibble(1)?, nibble(2)?, 255)),
            6 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
            8 => Ok(Self::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
            _ => Err(err()),
        }
    }

    /// Same colour with a different alpha.
    #[inline]
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Same colour with alpha multiplied by `factor`.
    #[inline]
    pub fn fade(self, factor: f32) -> Self {
        Self {
            a: self.a * factor.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Convert the colour channels from sRGB to linear (alpha untouched).
    pub fn to_linear(self) -> Self {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::rgba(channel(self.r), channel(self.g), channel(self.b), self.a)
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Color::from_hex(&s)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let to8 = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        write!(
            f,
            "#{:02x}{:02x}{:02x}{:02x}",
            to8(self.r),
            to8(self.g),
            to8(self.b),
            to8(self.a)
        )
    }
}

/// A canvas-like drawing target in logical pixels.
pub trait DrawTarget {
    /// Clear the whole target.
    fn clear(&mut self, color: Color);

    /// Filled circle.
    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color);

    /// Soft radial gradient from `color` at the centre to transparent at `radius`.
    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Color);

    /// Filled rectangle with rounded corners.
    fn fill_rect(&mut self, origin: Vec2, size: Vec2, corner_radius: f32, color: Color);
}

/// One recorded drawing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Glow {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Rect {
        origin: Vec2,
        size: Vec2,
        corner_radius: f32,
        color: Color,
    },
}

/// Recording [`DrawTarget`].
#[derive(Debug, Clone, Default)]
pub struct DrawList {
    commands: Vec<DrawCommand>,
}

impl DrawList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            commands: Vec::with_capacity(capacity),
        }
    }

    #[inline]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Drop all recorded commands, keeping the allocation.
    pub fn reset(&mut self) {
        self.commands.clear();
    }

    /// The colour of the last `Clear`, if any.
    pub fn clear_color(&self) -> Option<Color> {
        self.commands.iter().rev().find_map(|c| match c {
            DrawCommand::Clear(color) => Some(*color),
            _ => None,
        })
    }

    /// Centres and radii of every recorded circle, in order.
    pub fn circles(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Circle { center, radius, .. } => Some((*center, *radius)),
            _ => None,
        })
    }

    /// Centres and radii of every recorded glow, in order.
    pub fn glows(&self) -> impl Iterator<Item = (Vec2, f32)> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::Glow { center, radius, .. } => Some((*center, *radius)),
            _ => None,
        })
    }
}

impl DrawTarget for DrawList {
    fn clear(&mut self, color: Color) {
        // Anything recorded before a clear is invisible.
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius > 0.0 && color.a > 0.0 {
            self.commands.push(DrawCommand::Circle {
                center,
                radius,
                color,
            });
        }
    }

    fn fill_glow(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius > 0.0 && color.a > 0.0 {
            self.commands.push(DrawCommand::Glow {
                center,
                radius,
                color,
            });
        }
    }

    fn fill_rect(&mut self, origin: Vec2, size: Vec2, corner_radius: f32, color: Color) {
        if size.x > 0.0 && size.y > 0.0 && color.a > 0.0 {
            self.commands.push(DrawCommand::Rect {
                origin,
                size,
                corner_radius: corner_radius.max(0.0),
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_forms() {
        assert_eq!(Color::from_hex("#fff").unwrap(), Color::WHITE);
        assert_eq!(
            Color::from_hex("#ff6b9d").unwrap(),
            Color::from_rgba8(0xff, 0x6b, 0x9d, 0xff)
        );
        let c = Color::from_hex("#00000080").unwrap();
        assert!((c.a - 128.0 / 255.0).abs() < 1e-6);
    }

    #[test]
    fn test_parse_hex_rejects_garbage() {
        assert!(Color::from_hex("ff6b9d").is_err());
        assert!(Color::from_hex("#ff6b9").is_err());
        assert!(Color::from_hex("#gg0000").is_err());
        assert!(Color::from_hex("#ééé").is_err());
    }

    #[test]
    fn test_display_roundtrip() {
        let c = Color::from_hex("#72f7b8").unwrap();
        assert_eq!(c.to_string(), "#72f7b8ff");
    }

    #[test]
    fn test_to_linear_endpoints() {
        let black = Color::BLACK.to_linear();
        let white = Color::WHITE.to_linear();
        assert_eq!(black.r, 0.0);
        assert!((white.r - 1.0).abs() < 1e-6);
        assert!(Color::rgba(0.5, 0.5, 0.5, 1.0).to_linear().r < 0.5);
    }

    #[test]
    fn test_clear_discards_earlier_commands() {
        let mut list = DrawList::new();
        list.fill_circle(Vec2::ZERO, 1.0, Color::WHITE);
        list.clear(Color::BLACK);
        assert_eq!(list.len(), 1);
        assert_eq!(list.clear_color(), Some(Color::BLACK));
    }

    #[test]
    fn test_invisible_shapes_are_skipped() {
        let mut list = DrawList::new();
        list.fill_circle(Vec2::ZERO, 0.0, Color::WHITE);
        list.fill_glow(Vec2::ZERO, 5.0, Color::TRANSPARENT);
        list.fill_rect(Vec2::ZERO, Vec2::new(0.0, 10.0), 0.0, Color::WHITE);
        assert!(list.is_empty());
    }
}
