//! Per-segment, per-frame physics
//!
//! Each segment is a damped angular spring forced by wind noise and any
//! external (pointer/anchor) force accumulated before the step. Integration is
//! semi-implicit Euler in units of degrees and frames:
//!
//! ```text
//! velocity *= drag
//! velocity += acceleration
//! angle    += velocity
//! angle     = clamp(angle, rest - max_bend, rest + max_bend)
//! acceleration = 0
//! ```

use super::noise::WindNoise;
use super::segment::Segment;
use crate::config::{AnchorTuning, ForestConfig};
use crate::map_range;

/// Angular state of one segment, detached from the tree
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    pub angle: f32,
    pub rest_angle: f32,
    pub velocity: f32,
}

impl Motion {
    pub fn of(segment: &Segment) -> Self {
        Self {
            angle: segment.angle,
            rest_angle: segment.rest_angle,
            velocity: segment.velocity,
        }
    }
}

/// Physics constants resolved from the config
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsParams {
    pub max_level: u32,
    pub spring_strength: f32,
    pub spring_angle_threshold: f32,
    pub wind_speed: f32,
    pub wind_strength: f32,
    pub drag: f32,
    pub max_bend: f32,
    pub anchor: AnchorTuning,
}

impl Default for PhysicsParams {
    fn default() -> Self {
        Self::from_config(&ForestConfig::default())
    }
}

impl PhysicsParams {
    pub fn from_config(config: &ForestConfig) -> Self {
        Self {
            max_level: config.max_level,
            spring_strength: config.spring_strength,
            spring_angle_threshold: config.spring_angle_threshold,
            wind_speed: config.wind_speed,
            wind_strength: config.wind_strength,
            drag: config.drag,
            max_bend: config.max_bend,
            anchor: config.anchor_tuning,
        }
    }

    /// Deeper, thinner segments sway more; anchors sway half as much
    pub fn wind_multiplier(&self, level: u32, is_anchor: bool) -> f32 {
        let mult = map_range(
            level as f32,
            0.0,
            self.max_level as f32,
            self.wind_strength,
            1.0,
        );
        if is_anchor { mult * self.anchor.wind } else { mult }
    }

    pub fn max_bend_for(&self, is_anchor: bool) -> f32 {
        if is_anchor {
            self.max_bend * self.anchor.max_bend
        } else {
            self.max_bend
        }
    }

    /// Restoring force toward the rest angle, saturating past the threshold
    pub fn spring_force(&self, motion: &Motion, is_anchor: bool) -> f32 {
        let offset = motion.rest_angle - motion.angle;
        if offset == 0.0 {
            return 0.0;
        }
        let distance = offset.abs().min(self.spring_angle_threshold);
        let mut force = map_range(
            distance,
            0.0,
            self.spring_angle_threshold,
            0.0,
            self.spring_strength,
        );
        if is_anchor {
            force *= self.anchor.spring;
        }
        force * offset.signum()
    }

    /// Ambient wind for a segment this frame; `jitter` is the per-frame random factor
    pub fn wind_force<N: WindNoise + ?Sized>(
        &self,
        segment: &Segment,
        frame: u64,
        noise: &N,
        jitter: f32,
    ) -> f32 {
        let mult = self.wind_multiplier(segment.level, segment.is_anchor()) * jitter;
        let t = (frame as f64 + segment.index as f64) * self.wind_speed as f64;
        noise.sample(t) * mult
    }
}

/// Integrate one frame. Pure: the caller supplies the summed acceleration.
pub fn integrate(motion: Motion, acceleration: f32, drag: f32, max_bend: f32) -> Motion {
    let mut velocity = motion.velocity * drag;
    velocity += acceleration;
    let angle = (motion.angle + velocity).clamp(
        motion.rest_angle - max_bend,
        motion.rest_angle + max_bend,
    );
    Motion {
        angle,
        rest_angle: motion.rest_angle,
        velocity,
    }
}

/// Apply wind and spring, then integrate the segment in place.
///
/// External forces must already be accumulated via `Segment::apply_force`.
pub fn step<N: WindNoise + ?Sized>(
    segment: &mut Segment,
    params: &PhysicsParams,
    frame: u64,
    noise: &N,
    jitter: f32,
) {
    let is_anchor = segment.is_anchor();

    let wind = params.wind_force(segment, frame, noise, jitter);
    segment.apply_force(wind);

    let spring = params.spring_force(&Motion::of(segment), is_anchor);
    segment.apply_force(spring);

    let next = integrate(
        Motion::of(segment),
        segment.acceleration,
        params.drag,
        params.max_bend_for(is_anchor),
    );
    segment.angle = next.angle;
    segment.velocity = next.velocity;
    segment.acceleration = 0.0;
}
