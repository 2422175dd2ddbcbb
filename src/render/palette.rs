//! Theme colours

use super::commands::Rgba;
use crate::config::Theme;

/// Colours for one theme
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub background: Rgba,
    /// Root stroke colour
    pub start: Rgba,
    /// Stroke colour at `max_level`
    pub end: Rgba,
    pub central_point: Rgba,
    pub anchor_active: Rgba,
    pub anchor_inactive: Rgba,
    pub anchor_hover: Rgba,
    /// Label text and its drop shadow
    pub label: Rgba,
    pub label_shadow: Rgba,
    /// Anchor strokes are drawn in this colour with varying alpha
    pub anchor_stroke: Rgba,
    /// Ring around the hovered anchor
    pub hover_ring: Rgba,
}

/// Debug highlight for pointer-pushed segments
pub const DEBUG_POINTER: Rgba = Rgba::rgb(255, 0, 0);
/// Debug highlight for anchor-attracted segments and pointer probes
pub const DEBUG_ANCHOR: Rgba = Rgba::rgb(0, 255, 0);

pub const DARK: Palette = Palette {
    background: Rgba::gray(0x00),
    start: Rgba::gray(0xFF),
    end: Rgba::gray(0x32),
    central_point: Rgba::gray(0xE6),
    anchor_active: Rgba::gray(0xFF),
    anchor_inactive: Rgba::gray(0x88),
    anchor_hover: Rgba::gray(0xBB),
    label: Rgba::gray(0xFF),
    label_shadow: Rgba::gray(0x00).with_alpha(100),
    anchor_stroke: Rgba::gray(0xFF),
    hover_ring: Rgba::gray(0xFF).with_alpha(150),
};

pub const LIGHT: Palette = Palette {
    background: Rgba::gray(0xFF),
    start: Rgba::gray(0x00),
    end: Rgba::gray(0xCC),
    central_point: Rgba::gray(0x33),
    anchor_active: Rgba::gray(0x00),
    anchor_inactive: Rgba::gray(0x55),
    anchor_hover: Rgba::gray(0x33),
    label: Rgba::gray(0x00),
    label_shadow: Rgba::gray(0xFF).with_alpha(100),
    anchor_stroke: Rgba::gray(0x00),
    hover_ring: Rgba::gray(0x00).with_alpha(150),
};

impl Palette {
    pub fn for_theme(theme: Theme) -> Self {
        match theme {
            Theme::Dark => DARK,
            Theme::Light => LIGHT,
        }
    }

    /// Stroke colour for an ordinary segment at `level`
    pub fn level_color(&self, level: u32, max_level: u32) -> Rgba {
        let t = if max_level == 0 {
            0.0
        } else {
            level as f32 / max_level as f32
        };
        self.start.lerp(self.end, t)
    }
}
