use std::str::FromStr;

use crate::foundation::error::{StyleError, StyleResult};
use crate::foundation::math::mul_div255_u8;

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Straight (non-premultiplied) ARGB color packed into a `u32` as `0xAARRGGBB`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Color(u32);

impl Color {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self(0x0000_0000);
    /// Opaque black.
    pub const BLACK: Self = Self(0xff00_0000);
    /// Opaque white.
    pub const WHITE: Self = Self(0xffff_ffff);

    /// Wrap a packed `0xAARRGGBB` value.
    pub const fn from_argb(value: u32) -> Self {
        Self(value)
    }

    /// Build from straight RGBA8 channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self(u32::from(a) << 24 | u32::from(r) << 16 | u32::from(g) << 8 | u32::from(b))
    }

    /// Multiply the alpha channel of `color` by `opacity` (clamped to `[0, 1]`).
    pub fn from_color_opacity(color: Color, opacity: f32) -> Self {
        let opacity = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        let a = (f32::from(color.a()) * opacity).round() as u8;
        Self::from_rgba8(color.r(), color.g(), color.b(), a)
    }

    /// Packed `0xAARRGGBB` value.
    pub fn value(self) -> u32 {
        self.0
    }

    /// Red channel.
    pub fn r(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Green channel.
    pub fn g(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Blue channel.
    pub fn b(self) -> u8 {
        self.0 as u8
    }

    /// Alpha channel.
    pub fn a(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Premultiplied RGBA8 bytes.
    pub fn to_premul_rgba8(self) -> [u8; 4] {
        let a = self.a();
        [
            mul_div255_u8(self.r(), a),
            mul_div255_u8(self.g(), a),
            mul_div255_u8(self.b(), a),
            a,
        ]
    }

    /// Parse a CSS-like color: `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb(..)`, `rgba(..)` or a name.
    pub fn parse(src: &str) -> StyleResult<Self> {
        let s = src.trim().to_ascii_lowercase();
        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(|| invalid_color(src));
        }
        if let Some(args) = s.strip_prefix("rgba(").and_then(|r| r.strip_suffix(')')) {
            return parse_rgb_args(args, true).ok_or_else(|| invalid_color(src));
        }
        if let Some(args) = s.strip_prefix("rgb(").and_then(|r| r.strip_suffix(')')) {
            return parse_rgb_args(args, false).ok_or_else(|| invalid_color(src));
        }
        named_color(&s).ok_or_else(|| invalid_color(src))
    }
}

impl FromStr for Color {
    type Err = StyleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

fn invalid_color(src: &str) -> StyleError {
    StyleError::evaluation(format!("invalid color '{src}'"))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    match hex.len() {
        3 => {
            let nib = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).ok().map(|v| v * 17);
            Some(Color::from_rgba8(nib(0)?, nib(1)?, nib(2)?, 255))
        }
        6 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, 255)),
        8 => Some(Color::from_rgba8(byte(0)?, byte(2)?, byte(4)?, byte(6)?)),
        _ => None,
    }
}

fn parse_rgb_args(args: &str, with_alpha: bool) -> Option<Color> {
    let parts: Vec<&str> = args.split(',').map(str::trim).collect();
    let expected = if with_alpha { 4 } else { 3 };
    if parts.len() != expected {
        return None;
    }
    let channel = |s: &str| -> Option<u8> {
        let v: f64 = s.parse().ok()?;
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    let alpha = if with_alpha {
        let a: f64 = parts[3].parse().ok()?;
        (a.clamp(0.0, 1.0) * 255.0).round() as u8
    } else {
        255
    };
    Some(Color::from_rgba8(
        channel(parts[0])?,
        channel(parts[1])?,
        channel(parts[2])?,
        alpha,
    ))
}

fn named_color(name: &str) -> Option<Color> {
    let (r, g, b) = match name {
        "transparent" | "none" => return Some(Color::TRANSPARENT),
        "black" => (0, 0, 0),
        "white" => (255, 255, 255),
        "red" => (255, 0, 0),
        "green" => (0, 128, 0),
        "lime" => (0, 255, 0),
        "blue" => (0, 0, 255),
        "yellow" => (255, 255, 0),
        "orange" => (255, 165, 0),
        "purple" => (128, 0, 128),
        "gray" | "grey" => (128, 128, 128),
        _ => return None,
    };
    Some(Color::from_rgba8(r, g, b, 255))
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
