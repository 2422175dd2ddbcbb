//! Immediate-mode draw commands
//!
//! The full list is rebuilt every frame; hosts replay it onto their 2D surface
//! in order. Coordinates are canvas pixels (origin top-left).

use glam::Vec2;
use serde::Serialize;

/// 8-bit RGBA colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn gray(v: u8) -> Self {
        Self::rgb(v, v, v)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }

    /// Linear blend, `t` clamped to `[0, 1]`
    pub fn lerp(self, other: Rgba, t: f32) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: mix(self.a, other.a),
        }
    }

    /// CSS `rgba()` string for canvas style properties
    pub fn to_css(&self) -> String {
        format!(
            "rgba({}, {}, {}, {:.3})",
            self.r,
            self.g,
            self.b,
            self.a as f32 / 255.0
        )
    }
}

/// Outline style
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Stroke {
    pub color: Rgba,
    pub weight: f32,
}

/// Soft shadow behind a stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Glow {
    pub color: Rgba,
    pub blur: f32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DrawCommand {
    /// Fill the whole surface
    Clear { color: Rgba },
    /// Round-capped line
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgba,
        weight: f32,
        glow: Option<Glow>,
    },
    /// Round dot of diameter `weight`
    Point { at: Vec2, color: Rgba, weight: f32 },
    Circle {
        center: Vec2,
        diameter: f32,
        fill: Option<Rgba>,
        stroke: Option<Stroke>,
    },
    /// Centred text, with an optional offset drop shadow
    Label {
        at: Vec2,
        text: String,
        size: f32,
        color: Rgba,
        shadow: Option<Rgba>,
    },
}

impl DrawCommand {
    pub fn is_line(&self) -> bool {
        matches!(self, DrawCommand::Line { .. })
    }
}
