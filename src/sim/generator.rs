//! Forest generation
//!
//! Builds a brand new forest from the config and an RNG. Nothing is shared
//! with any previous forest; the same RNG state always yields the same forest.

use rand::Rng;

use super::segment::{AnchorTag, Forest, Segment, SegmentIds};
use crate::angular_distance;
use crate::config::{Branching, ForestConfig};

/// Child angle ranges (degrees, relative to the parent) for 1, 2 and 3 children.
/// Partitioning the spread keeps siblings from bunching up.
const SPREAD_ONE: [(f32, f32); 1] = [(-45.0, 45.0)];
const SPREAD_TWO: [(f32, f32); 2] = [(-45.0, -10.0), (10.0, 45.0)];
const SPREAD_THREE: [(f32, f32); 3] = [(-45.0, -15.0), (-10.0, 10.0), (15.0, 45.0)];

struct Growth<'a, R: Rng + ?Sized> {
    config: &'a ForestConfig,
    ids: &'a mut SegmentIds,
    generation: u64,
    rng: &'a mut R,
}

/// Generate a complete forest: anchor roots first, then ordinary roots filling the gaps
pub fn generate_forest<R: Rng + ?Sized>(
    config: &ForestConfig,
    ids: &mut SegmentIds,
    generation: u64,
    rng: &mut R,
) -> Forest {
    let mut forest = Forest::new(generation);
    let mut growth = Growth {
        config,
        ids,
        generation,
        rng,
    };

    for named in &config.anchors {
        let length = uniform(
            &mut *growth.rng,
            config.root_length_max * config.anchor_tuning.length_min,
            config.root_length_max * config.anchor_tuning.length_max,
        );
        let mut root = Segment::new(growth.ids.next_id(), generation, length, named.angle, 0);
        root.anchor = Some(AnchorTag {
            id: named.id.clone(),
            label: named.label.clone(),
        });
        forest.roots.push(root);
    }

    for angle in root_directions(config) {
        let length = uniform(&mut *growth.rng, config.root_length_min, config.root_length_max);
        let root = grow(&mut growth, length, angle, 0);
        forest.roots.push(root);
    }

    forest
}

/// Headings (degrees) of the ordinary roots.
///
/// Without anchors the roots are evenly spaced. With anchors, the remaining
/// `root_count - anchors` slots are evenly spaced and any slot closer than
/// `anchor_gap` to an anchor is dropped.
pub fn root_directions(config: &ForestConfig) -> Vec<f32> {
    let slots = config
        .root_count
        .saturating_sub(config.anchors.len() as u32);
    if slots == 0 {
        return Vec::new();
    }

    let step = 360.0 / slots as f32;
    (0..slots)
        .map(|i| i as f32 * step)
        .filter(|a| {
            config
                .anchors
                .iter()
                .all(|anchor| angular_distance(*a, anchor.angle) >= config.anchor_gap)
        })
        .collect()
}

/// Build a segment and, below `max_level`, its whole subtree
fn grow<R: Rng + ?Sized>(growth: &mut Growth<'_, R>, length: f32, angle: f32, level: u32) -> Segment {
    let mut segment = Segment::new(growth.ids.next_id(), growth.generation, length, angle, level);
    if level >= growth.config.max_level {
        return segment;
    }

    // Sample every child before descending so siblings share one draw sequence
    let count = branch_count(growth, level);
    let spread: &[(f32, f32)] = match count {
        2 => &SPREAD_TWO,
        3 => &SPREAD_THREE,
        _ => &SPREAD_ONE,
    };
    let plan: Vec<(f32, f32)> = spread
        .iter()
        .map(|(lo, hi)| {
            let child_angle = uniform(&mut *growth.rng, *lo, *hi);
            let ratio = uniform(
                &mut *growth.rng,
                growth.config.child_length_ratio_min,
                growth.config.child_length_ratio_max,
            );
            (child_angle, ratio)
        })
        .collect();

    segment.children = plan
        .into_iter()
        .map(|(child_angle, ratio)| grow(growth, length * ratio, child_angle, level + 1))
        .collect();
    segment
}

fn branch_count<R: Rng + ?Sized>(growth: &mut Growth<'_, R>, level: u32) -> usize {
    match &growth.config.branching {
        Branching::PerLevel(counts) => counts
            .get(level as usize)
            .map(|c| (*c as usize).clamp(1, 3))
            .unwrap_or(1),
        Branching::Random { weights } => {
            // u64 so the sum cannot overflow
            let total: u64 = weights.iter().map(|w| u64::from(*w)).sum();
            if total == 0 {
                return 1;
            }
            let mut roll = growth.rng.random_range(0..total);
            for (i, w) in weights.iter().enumerate() {
                let w = u64::from(*w);
                if roll < w {
                    return i + 1;
                }
                roll -= w;
            }
            1
        }
    }
}

/// Uniform sample in `[lo, hi)`, or `lo` for an empty range
fn uniform<R: Rng + ?Sized>(rng: &mut R, lo: f32, hi: f32) -> f32 {
    if hi <= lo {
        lo
    } else {
        rng.random_range(lo..hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnchorSpec;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn generate(config: &ForestConfig, seed: u64) -> Forest {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut ids = SegmentIds::new();
        generate_forest(config, &mut ids, 1, &mut rng)
    }

    #[test]
    fn test_pinned_shape_end_to_end() {
        let config = ForestConfig {
            max_level: 2,
            root_count: 1,
            branching: Branching::PerLevel(vec![2, 1]),
            ..Default::default()
        };
        let forest = generate(&config, 99);

        assert_eq!(forest.roots.len(), 1);
        let root = &forest.roots[0];
        assert_eq!(root.children.len(), 2);
        for child in &root.children {
            assert_eq!(child.children.len(), 1);
            assert!(child.children[0].children.is_empty());
        }
        assert_eq!(forest.segment_count(), 5);

        let mut levels: Vec<u32> = forest.iter().map(|s| s.level).collect();
        levels.sort();
        assert_eq!(levels, vec![0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_two_children_split_left_and_right() {
        let config = ForestConfig {
            max_level: 1,
            root_count: 1,
            branching: Branching::PerLevel(vec![2]),
            ..Default::default()
        };
        for seed in 0..20 {
            let forest = generate(&config, seed);
            let kids = &forest.roots[0].children;
            assert!((-45.0..-10.0).contains(&kids[0].rest_angle));
            assert!((10.0..45.0).contains(&kids[1].rest_angle));
        }
    }

    #[test]
    fn test_three_children_partition() {
        let config = ForestConfig {
            max_level: 1,
            root_count: 1,
            branching: Branching::PerLevel(vec![3]),
            ..Default::default()
        };
        let forest = generate(&config, 5);
        let kids = &forest.roots[0].children;
        assert_eq!(kids.len(), 3);
        assert!((-45.0..-15.0).contains(&kids[0].angle));
        assert!((-10.0..10.0).contains(&kids[1].angle));
        assert!((15.0..45.0).contains(&kids[2].angle));
    }

    #[test]
    fn test_plain_roots_evenly_spaced() {
        let config = ForestConfig::default();
        let dirs = root_directions(&config);
        assert_eq!(dirs.len(), 30);
        assert!((dirs[1] - 12.0).abs() < 1e-4);
        let forest = generate(&config, 1);
        assert_eq!(forest.roots.len(), 30);
        for root in &forest.roots {
            assert_eq!(root.level, 0);
            assert_eq!(root.angle, root.rest_angle);
            assert!((30.0..100.0).contains(&root.length));
        }
    }

    #[test]
    fn test_anchor_roots() {
        let config = ForestConfig::with_navigation();
        let forest = generate(&config, 11);

        let anchors: Vec<&Segment> = forest.anchors().collect();
        assert_eq!(anchors.len(), 5);
        for (anchor, expected) in anchors.iter().zip(AnchorSpec::navigation()) {
            let tag = anchor.anchor.as_ref().unwrap();
            assert_eq!(tag.id, expected.id);
            assert_eq!(anchor.rest_angle, expected.angle);
            assert!(anchor.children.is_empty());
            assert!((150.0..250.0).contains(&anchor.length));
        }

        for root in forest.roots.iter().filter(|r| !r.is_anchor()) {
            for named in &config.anchors {
                assert!(angular_distance(root.rest_angle, named.angle) >= config.anchor_gap);
            }
        }
    }

    #[test]
    fn test_anchor_gap_drops_close_slots() {
        let config = ForestConfig {
            root_count: 9,
            anchors: vec![AnchorSpec::new("only", "Only", 0.0)],
            ..Default::default()
        };
        // 8 slots at 45 degrees, the one at 0 collides with the anchor
        let dirs = root_directions(&config);
        assert_eq!(dirs, vec![45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0]);
    }

    #[test]
    fn test_same_seed_same_forest() {
        let config = ForestConfig::with_navigation();
        assert_eq!(generate(&config, 1234), generate(&config, 1234));
        assert_ne!(generate(&config, 1234), generate(&config, 4321));
    }

    #[test]
    fn test_indices_unique() {
        let forest = generate(&ForestConfig::default(), 8);
        let mut indices: Vec<u32> = forest.iter().map(|s| s.index).collect();
        let n = indices.len();
        indices.sort();
        indices.dedup();
        assert_eq!(indices.len(), n);
    }

    #[test]
    fn test_weighted_branching_only_ones() {
        let config = ForestConfig {
            root_count: 4,
            branching: Branching::Random { weights: [1, 0, 0] },
            ..Default::default()
        };
        let forest = generate(&config, 77);
        assert!(forest.iter().all(|s| s.children.len() <= 1));
        // Single chain per root: max_level + 1 segments each
        assert_eq!(forest.segment_count(), 4 * 5);
    }

    #[test]
    fn test_huge_weights_do_not_overflow() {
        let config = ForestConfig {
            root_count: 3,
            max_level: 2,
            branching: Branching::Random {
                weights: [u32::MAX, u32::MAX, 0],
            },
            ..Default::default()
        };
        let forest = generate(&config, 13);
        assert!(forest.iter().all(|s| s.children.len() <= 2));
        assert!(
            forest
                .iter()
                .filter(|s| s.level < 2)
                .all(|s| !s.children.is_empty())
        );
    }

    proptest! {
        #[test]
        fn prop_recursion_bound(seed in any::<u64>(), max_level in 0u32..5, roots in 1u32..8) {
            let config = ForestConfig {
                max_level,
                root_count: roots,
                ..Default::default()
            };
            let forest = generate(&config, seed);
            for seg in forest.iter() {
                prop_assert!(seg.level <= max_level);
                if seg.level == max_level {
                    prop_assert!(seg.children.is_empty());
                } else {
                    prop_assert!(!seg.children.is_empty());
                }
                for child in &seg.children {
                    prop_assert_eq!(child.level, seg.level + 1);
                }
            }
        }

        #[test]
        fn prop_children_taper(seed in any::<u64>()) {
            let config = ForestConfig {
                root_count: 12,
                ..ForestConfig::with_navigation()
            };
            let forest = generate(&config, seed);
            for seg in forest.iter() {
                for child in &seg.children {
                    prop_assert!(child.length < seg.length);
                    let ratio = child.length / seg.length;
                    prop_assert!(ratio >= config.child_length_ratio_min - 1e-4);
                    prop_assert!(ratio <= config.child_length_ratio_max + 1e-4);
                }
            }
        }
    }
}
