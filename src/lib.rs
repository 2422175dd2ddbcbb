//! Branch Sway - a forest of recursive branches that sway in the wind
//!
//! Core modules:
//! - `sim`: Deterministic simulation (generation, spring/wind physics, traversal)
//! - `render`: Pure paint pass turning segment poses into draw commands
//! - `controller`: Owns the forest and drives one frame per host callback
//! - `platform`: Browser canvas executor for draw commands
//! - `config`: Tunable parameters, themes and navigation anchors

pub mod config;
pub mod controller;
pub mod error;
pub mod platform;
pub mod render;
pub mod sim;

pub use config::{AnchorSpec, Branching, ForestConfig, Theme};
pub use controller::{ForestController, HostEvent, PointerButton, Viewport};
pub use error::ForestError;

use glam::Vec2;

/// Simulation defaults (mirrored by `ForestConfig::default`)
pub mod consts {
    /// Nested subdivision depth. More is slower!
    pub const MAX_LEVEL: u32 = 4;
    /// Roots placed around the scene origin
    pub const ROOT_COUNT: u32 = 30;
    pub const ROOT_LENGTH_MIN: f32 = 30.0;
    pub const ROOT_LENGTH_MAX: f32 = 100.0;
    /// Child length as a fraction of its parent
    pub const CHILD_RATIO_MIN: f32 = 0.7;
    pub const CHILD_RATIO_MAX: f32 = 0.85;

    /// Resistance against displacement (degrees/frame² at saturation)
    pub const SPRING_STRENGTH: f32 = 0.5;
    /// Angular offset (degrees) at which the spring saturates
    pub const SPRING_ANGLE_THRESHOLD: f32 = 10.0;
    /// Noise input advance per frame
    pub const WIND_SPEED: f32 = 0.005;
    /// Wind multiplier at the root (ramps to 1.0 at `MAX_LEVEL`)
    pub const WIND_STRENGTH: f32 = 0.1;
    pub const WIND_JITTER_MIN: f32 = 0.75;
    pub const WIND_JITTER_MAX: f32 = 1.25;
    /// Velocity retained each frame
    pub const DRAG: f32 = 0.95;
    /// Max deviation from rest angle (degrees)
    pub const MAX_BEND: f32 = 45.0;

    pub const POINTER_RADIUS: f32 = 150.0;
    pub const POINTER_STRENGTH: f32 = 1.5;

    /// Active/hovered anchor attraction
    pub const ANCHOR_RADIUS: f32 = 120.0;
    pub const ANCHOR_STRENGTH: f32 = 1.0;
    /// Ordinary roots stay at least this far (degrees) from an anchor
    pub const ANCHOR_GAP: f32 = 15.0;
    /// Anchor disc diameter
    pub const ANCHOR_ITEM_SIZE: f32 = 60.0;

    pub const CENTRAL_POINT_SIZE: f32 = 25.0;
}

/// Re-map `value` from `[start1, stop1]` to `[start2, stop2]`, clamped to the target range
#[inline]
pub fn map_range(value: f32, start1: f32, stop1: f32, start2: f32, stop2: f32) -> f32 {
    if (stop1 - start1).abs() <= f32::EPSILON {
        return start2;
    }
    let t = ((value - start1) / (stop1 - start1)).clamp(0.0, 1.0);
    start2 + (stop2 - start2) * t
}

/// Unit vector for a heading in degrees (0 = +x, clockwise on screen since y points down)
#[inline]
pub fn heading_vector(degrees: f32) -> Vec2 {
    let radians = degrees.to_radians();
    Vec2::new(radians.cos(), radians.sin())
}

/// Smallest absolute difference between two headings in degrees, in `[0, 180]`
#[inline]
pub fn angular_distance(a: f32, b: f32) -> f32 {
    let diff = (a - b).rem_euclid(360.0);
    diff.min(360.0 - diff)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_range_clamps() {
        assert!((map_range(2.0, 0.0, 4.0, 0.1, 1.0) - 0.55).abs() < 1e-6);
        assert_eq!(map_range(9.0, 0.0, 4.0, 0.1, 1.0), 1.0);
        assert_eq!(map_range(-1.0, 0.0, 4.0, 0.1, 1.0), 0.1);
        // Reversed target range
        assert!((map_range(75.0, 0.0, 150.0, 1.5, 0.0) - 0.75).abs() < 1e-6);
    }

    #[test]
    fn test_map_range_degenerate_source() {
        assert_eq!(map_range(3.0, 0.0, 0.0, 0.2, 1.0), 0.2);
    }

    #[test]
    fn test_heading_vector() {
        let v = heading_vector(90.0);
        assert!(v.x.abs() < 1e-6);
        assert!((v.y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_angular_distance_wraps() {
        assert!((angular_distance(350.0, 5.0) - 15.0).abs() < 1e-4);
        assert!((angular_distance(5.0, 350.0) - 15.0).abs() < 1e-4);
        assert!((angular_distance(0.0, 180.0) - 180.0).abs() < 1e-4);
    }
}
