//! External forces: pointer push and anchor attraction
//!
//! Both are measured from a segment's tip in scene space (origin at the
//! canvas centre, y down). Any number of segments may be influenced at once.

use glam::Vec2;

use crate::config::{AnchorTuning, ForestConfig};
use crate::map_range;

/// World-space tip of an anchor segment, refreshed every frame
#[derive(Debug, Clone, PartialEq)]
pub struct AnchorPoint {
    pub id: String,
    pub label: String,
    pub tip: Vec2,
    /// World heading of the anchor segment in degrees
    pub heading: f32,
}

/// Interaction constants resolved from the config
#[derive(Debug, Clone, PartialEq)]
pub struct InteractionParams {
    pub max_level: u32,
    pub pointer_radius: f32,
    pub pointer_strength: f32,
    pub pointer_level_scale: (f32, f32),
    pub anchor_radius: f32,
    pub anchor_strength: f32,
    pub anchor_level_scale: (f32, f32),
    /// Pointer distance (from an anchor tip) that counts as hovering
    pub hover_radius: f32,
    pub anchor: AnchorTuning,
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self::from_config(&ForestConfig::default())
    }
}

impl InteractionParams {
    pub fn from_config(config: &ForestConfig) -> Self {
        Self {
            max_level: config.max_level,
            pointer_radius: config.pointer_radius,
            pointer_strength: config.pointer_strength,
            pointer_level_scale: config.pointer_level_scale,
            anchor_radius: config.anchor_radius,
            anchor_strength: config.anchor_strength,
            anchor_level_scale: config.anchor_level_scale,
            hover_radius: config.anchor_item_size * 1.5,
            anchor: config.anchor_tuning,
        }
    }

    /// Pointer influence radius for a segment
    pub fn pointer_radius_for(&self, is_anchor: bool) -> f32 {
        if is_anchor {
            self.pointer_radius * self.anchor.pointer_radius
        } else {
            self.pointer_radius
        }
    }

    fn level_scale(&self, level: u32, scale: (f32, f32)) -> f32 {
        map_range(level as f32, 0.0, self.max_level as f32, scale.0, scale.1)
    }

    /// Push from the pointer, or `None` when out of range.
    ///
    /// Closer pointers push harder; the sign flips when the pointer is to the
    /// right of the tip so segments bend away from it.
    pub fn pointer_force(&self, tip: Vec2, pointer: Vec2, level: u32, is_anchor: bool) -> Option<f32> {
        let radius = self.pointer_radius_for(is_anchor);
        let distance = tip.distance(pointer);
        if distance >= radius {
            return None;
        }

        let strength = if is_anchor {
            self.pointer_strength * self.anchor.pointer_strength
        } else {
            self.pointer_strength
        };
        let mut force = map_range(distance, 0.0, radius, strength, 0.0);
        if pointer.x > tip.x {
            force = -force;
        }
        Some(force * self.level_scale(level, self.pointer_level_scale))
    }

    /// Pull toward an active/hovered anchor tip, projected onto the segment's heading
    pub fn attraction_force(&self, tip: Vec2, heading: f32, target: Vec2, level: u32) -> Option<f32> {
        let distance = tip.distance(target);
        if distance >= self.anchor_radius {
            return None;
        }

        let to_target = target - tip;
        let bearing = to_target.y.atan2(to_target.x);
        let alignment = (bearing - heading.to_radians()).cos();
        let force = map_range(distance, 0.0, self.anchor_radius, self.anchor_strength, 0.0);
        Some(force * alignment * self.level_scale(level, self.anchor_level_scale))
    }

    /// First anchor whose tip is within hover range of the pointer
    pub fn hovered_anchor<'a>(&self, anchors: &'a [AnchorPoint], pointer: Vec2) -> Option<&'a AnchorPoint> {
        anchors
            .iter()
            .find(|a| a.tip.distance(pointer) < self.hover_radius)
    }
}
