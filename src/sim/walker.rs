//! Per-frame forest traversal
//!
//! One depth-first walk per frame. For each segment, in order:
//! 1. chain the parent's post-update transform to find the tip,
//! 2. accumulate pointer and anchor forces measured at that tip,
//! 3. step the physics,
//! 4. record the updated pose,
//! 5. visit the children from the updated tip.
//!
//! A parent therefore always moves before its children, which follow from
//! where the parent ended up this frame. Painting is a separate pure pass over
//! the recorded poses (see `render`).

use glam::Vec2;
use rand::Rng;

use super::interaction::{AnchorPoint, InteractionParams};
use super::noise::WindNoise;
use super::physics::{PhysicsParams, step};
use super::segment::{Forest, Segment};
use crate::heading_vector;

/// A point that attracts nearby segments this frame (an active or hovered anchor tip)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Attractor {
    /// Anchor slot that owns this point; that anchor is not attracted to itself
    pub anchor_slot: usize,
    pub point: Vec2,
}

/// Everything the walk reads besides the forest itself
pub struct StepContext<'a, N: WindNoise + ?Sized> {
    pub physics: &'a PhysicsParams,
    pub interaction: &'a InteractionParams,
    pub noise: &'a N,
    pub frame: u64,
    /// Pointer in scene space (origin at the canvas centre)
    pub pointer: Option<Vec2>,
    pub attractors: &'a [Attractor],
    /// Per-segment random wind factor range
    pub jitter: (f32, f32),
}

/// World-space result of one segment's update
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentPose {
    pub index: u32,
    pub level: u32,
    pub base: Vec2,
    pub tip: Vec2,
    /// World heading in degrees after this frame's step
    pub heading: f32,
    pub length: f32,
    /// Position among the forest's anchor roots, for anchor segments
    pub anchor_slot: Option<usize>,
    /// Pointer-to-tip distance measured before the step
    pub pointer_distance: Option<f32>,
    pub pointer_influenced: bool,
    pub anchor_influenced: bool,
}

/// Advance every segment one frame and return poses in walk (pre-)order
pub fn advance_forest<N: WindNoise + ?Sized, R: Rng + ?Sized>(
    forest: &mut Forest,
    ctx: &StepContext<'_, N>,
    rng: &mut R,
) -> Vec<SegmentPose> {
    let mut poses = Vec::with_capacity(forest.segment_count());
    let mut next_slot = 0;
    for root in &mut forest.roots {
        let slot = if root.is_anchor() {
            next_slot += 1;
            Some(next_slot - 1)
        } else {
            None
        };
        visit(root, Vec2::ZERO, 0.0, slot, ctx, rng, &mut poses);
    }
    poses
}

fn visit<N: WindNoise + ?Sized, R: Rng + ?Sized>(
    segment: &mut Segment,
    base: Vec2,
    parent_heading: f32,
    anchor_slot: Option<usize>,
    ctx: &StepContext<'_, N>,
    rng: &mut R,
    poses: &mut Vec<SegmentPose>,
) {
    let is_anchor = segment.is_anchor();

    // Probe the tip where the segment currently points
    let probe = base + heading_vector(parent_heading + segment.angle) * segment.length;
    let probe_heading = parent_heading + segment.angle;

    let mut pointer_distance = None;
    let mut pointer_influenced = false;
    if let Some(pointer) = ctx.pointer {
        pointer_distance = Some(probe.distance(pointer));
        if let Some(force) = ctx
            .interaction
            .pointer_force(probe, pointer, segment.level, is_anchor)
        {
            segment.apply_force(force);
            pointer_influenced = true;
        }
    }

    let mut anchor_influenced = false;
    for attractor in ctx.attractors {
        if anchor_slot == Some(attractor.anchor_slot) {
            continue;
        }
        if let Some(force) =
            ctx.interaction
                .attraction_force(probe, probe_heading, attractor.point, segment.level)
        {
            segment.apply_force(force);
            anchor_influenced = true;
        }
    }

    let jitter = sample_jitter(rng, ctx.jitter);
    step(segment, ctx.physics, ctx.frame, ctx.noise, jitter);

    let heading = parent_heading + segment.angle;
    let tip = base + heading_vector(heading) * segment.length;
    poses.push(SegmentPose {
        index: segment.index,
        level: segment.level,
        base,
        tip,
        heading,
        length: segment.length,
        anchor_slot,
        pointer_distance,
        pointer_influenced,
        anchor_influenced,
    });

    for child in &mut segment.children {
        visit(child, tip, heading, None, ctx, rng, poses);
    }
}

fn sample_jitter<R: Rng + ?Sized>(rng: &mut R, (lo, hi): (f32, f32)) -> f32 {
    if hi <= lo {
        lo
    } else {
        rng.random_range(lo..hi)
    }
}

/// Tips of the anchor segments, in anchor-slot order
pub fn anchor_points(forest: &Forest, poses: &[SegmentPose]) -> Vec<AnchorPoint> {
    let tags: Vec<_> = forest.anchors().filter_map(|s| s.anchor.as_ref()).collect();
    poses
        .iter()
        .filter_map(|pose| {
            let tag = tags.get(pose.anchor_slot?)?;
            Some(AnchorPoint {
                id: tag.id.clone(),
                label: tag.label.clone(),
                tip: pose.tip,
                heading: pose.heading,
            })
        })
        .collect()
}
