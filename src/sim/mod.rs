//! Deterministic simulation module
//!
//! Generation, physics and traversal live here. This module must stay pure:
//! - Frame-stepped only (one step per animation callback)
//! - Seeded RNG only
//! - Stable iteration order (roots in generation order, subtrees pre-order)
//! - No drawing-surface or platform dependencies

pub mod generator;
pub mod interaction;
pub mod noise;
pub mod physics;
pub mod segment;
pub mod walker;

pub use generator::{generate_forest, root_directions};
pub use interaction::{AnchorPoint, InteractionParams};
pub use noise::{ConstantNoise, PerlinWind, WindNoise};
pub use physics::{Motion, PhysicsParams, integrate, step};
pub use segment::{AnchorTag, Forest, Segment, SegmentIds};
pub use walker::{Attractor, SegmentPose, StepContext, advance_forest, anchor_points};
