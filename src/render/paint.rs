//! Paint pass: segment poses to draw commands
//!
//! Pure function of the poses produced by the walker; it never touches the
//! forest, so the same poses always paint the same frame.

use glam::Vec2;

use super::commands::{DrawCommand, Glow, Rgba, Stroke};
use super::palette::{DEBUG_ANCHOR, DEBUG_POINTER, Palette};
use crate::map_range;
use crate::sim::{AnchorPoint, SegmentPose};

/// Label text size in pixels
pub const LABEL_SIZE: f32 = 18.0;
/// Debug probe dot size
const DEBUG_POINT_WEIGHT: f32 = 5.0;

/// Frame-wide paint inputs
#[derive(Debug, Clone)]
pub struct RenderView<'a> {
    pub palette: &'a Palette,
    /// Canvas position of the scene origin (the canvas centre)
    pub origin: Vec2,
    pub max_level: u32,
    pub frame: u64,
    pub debug: bool,
    pub pointer_radius: f32,
    pub anchors: &'a [AnchorPoint],
    pub active_anchor: Option<&'a str>,
    pub hovered_anchor: Option<&'a str>,
    pub anchor_item_size: f32,
    /// Diameter of the dot at the scene origin, if shown
    pub central_point: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AnchorState {
    Active,
    Hovered,
    Idle,
}

impl RenderView<'_> {
    fn anchor_state(&self, anchor: &AnchorPoint) -> AnchorState {
        if self.active_anchor == Some(anchor.id.as_str()) {
            AnchorState::Active
        } else if self.hovered_anchor == Some(anchor.id.as_str()) {
            AnchorState::Hovered
        } else {
            AnchorState::Idle
        }
    }
}

/// Build the complete command list for one frame
pub fn render_frame(poses: &[SegmentPose], view: &RenderView<'_>) -> Vec<DrawCommand> {
    let mut commands = Vec::with_capacity(poses.len() + view.anchors.len() * 3 + 4);
    commands.push(DrawCommand::Clear {
        color: view.palette.background,
    });

    if let Some(hovered) = view
        .hovered_anchor
        .and_then(|id| view.anchors.iter().find(|a| a.id == id))
    {
        commands.push(DrawCommand::Circle {
            center: view.origin + hovered.tip,
            diameter: view.anchor_item_size * 1.8,
            fill: None,
            stroke: Some(Stroke {
                color: view.palette.hover_ring,
                weight: 3.0,
            }),
        });
    }

    for pose in poses {
        let anchor = pose.anchor_slot.and_then(|slot| view.anchors.get(slot));
        paint_segment(&mut commands, pose, anchor, view);
        if let Some(anchor) = anchor {
            paint_anchor(&mut commands, pose, anchor, view);
        }
    }

    if let Some(size) = view.central_point {
        commands.push(DrawCommand::Point {
            at: view.origin,
            color: view.palette.central_point,
            weight: size,
        });
    }

    commands
}

fn paint_segment(
    commands: &mut Vec<DrawCommand>,
    pose: &SegmentPose,
    anchor: Option<&AnchorPoint>,
    view: &RenderView<'_>,
) {
    let (mut color, weight, glow) = match anchor {
        Some(anchor) => anchor_stroke(view.anchor_state(anchor), view.palette),
        None => (
            view.palette.level_color(pose.level, view.max_level),
            map_range(pose.level as f32, 0.0, view.max_level as f32, 5.0, 1.0),
            None,
        ),
    };

    if view.debug {
        if pose.anchor_influenced {
            color = DEBUG_ANCHOR;
        } else if pose.pointer_influenced {
            color = DEBUG_POINTER;
        }
    }

    commands.push(DrawCommand::Line {
        from: view.origin + pose.base,
        to: view.origin + pose.tip,
        color,
        weight,
        glow,
    });

    if view.debug
        && pose
            .pointer_distance
            .is_some_and(|d| d < view.pointer_radius)
    {
        commands.push(DrawCommand::Point {
            at: view.origin + pose.base,
            color: DEBUG_ANCHOR,
            weight: DEBUG_POINT_WEIGHT,
        });
    }
}

fn anchor_stroke(state: AnchorState, palette: &Palette) -> (Rgba, f32, Option<Glow>) {
    let base = palette.anchor_stroke;
    match state {
        AnchorState::Active => (
            base,
            4.5,
            Some(Glow {
                color: base.with_alpha(153),
                blur: 15.0,
            }),
        ),
        AnchorState::Hovered => (
            base.with_alpha(200),
            3.5,
            Some(Glow {
                color: base.with_alpha(102),
                blur: 10.0,
            }),
        ),
        AnchorState::Idle => (base.with_alpha(160), 2.5, None),
    }
}

/// Disc and label at an anchor's tip
fn paint_anchor(
    commands: &mut Vec<DrawCommand>,
    pose: &SegmentPose,
    anchor: &AnchorPoint,
    view: &RenderView<'_>,
) {
    let center = view.origin + pose.tip;
    let size = view.anchor_item_size;
    let palette = view.palette;

    match view.anchor_state(anchor) {
        AnchorState::Active => {
            let pulse = map_range((view.frame as f32 * 0.05).sin(), -1.0, 1.0, 0.9, 1.1);
            commands.push(DrawCommand::Circle {
                center,
                diameter: size * pulse,
                fill: Some(palette.anchor_active),
                stroke: None,
            });
            commands.push(DrawCommand::Circle {
                center,
                diameter: size * pulse * 1.2,
                fill: None,
                stroke: Some(Stroke {
                    color: palette.anchor_active.with_alpha(100),
                    weight: 2.0,
                }),
            });
        }
        AnchorState::Hovered => {
            commands.push(DrawCommand::Circle {
                center,
                diameter: size * 1.1,
                fill: Some(palette.anchor_hover.with_alpha(200)),
                stroke: None,
            });
            commands.push(DrawCommand::Circle {
                center,
                diameter: size * 1.3,
                fill: None,
                stroke: Some(Stroke {
                    color: palette.anchor_hover.with_alpha(150),
                    weight: 2.0,
                }),
            });
        }
        AnchorState::Idle => {
            commands.push(DrawCommand::Circle {
                center,
                diameter: size,
                fill: Some(palette.anchor_inactive.with_alpha(178)),
                stroke: None,
            });
        }
    }

    commands.push(DrawCommand::Label {
        at: center,
        text: anchor.label.clone(),
        size: LABEL_SIZE,
        color: palette.label,
        shadow: Some(palette.label_shadow),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Theme;

    fn pose(index: u32, level: u32, base: Vec2, tip: Vec2) -> SegmentPose {
        SegmentPose {
            index,
            level,
            base,
            tip,
            heading: 0.0,
            length: base.distance(tip),
            anchor_slot: None,
            pointer_distance: None,
            pointer_influenced: false,
            anchor_influenced: false,
        }
    }

    fn view<'a>(palette: &'a Palette, anchors: &'a [AnchorPoint]) -> RenderView<'a> {
        RenderView {
            palette,
            origin: Vec2::new(400.0, 300.0),
            max_level: 4,
            frame: 0,
            debug: false,
            pointer_radius: 150.0,
            anchors,
            active_anchor: None,
            hovered_anchor: None,
            anchor_item_size: 60.0,
            central_point: None,
        }
    }

    fn lines(commands: &[DrawCommand]) -> Vec<(Vec2, Vec2, Rgba, f32)> {
        commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Line {
                    from,
                    to,
                    color,
                    weight,
                    ..
                } => Some((*from, *to, *color, *weight)),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_clear_then_one_line_per_segment() {
        let palette = Palette::for_theme(Theme::Dark);
        let poses = vec![
            pose(1, 0, Vec2::ZERO, Vec2::new(100.0, 0.0)),
            pose(2, 4, Vec2::new(100.0, 0.0), Vec2::new(100.0, 40.0)),
        ];
        let commands = render_frame(&poses, &view(&palette, &[]));

        assert_eq!(
            commands[0],
            DrawCommand::Clear {
                color: palette.background
            }
        );
        let lines = lines(&commands);
        assert_eq!(lines.len(), 2);
        // Offset to canvas space
        assert_eq!(lines[0].0, Vec2::new(400.0, 300.0));
        assert_eq!(lines[0].1, Vec2::new(500.0, 300.0));
        // Root thick and bright, leaf thin and dim
        assert_eq!(lines[0].3, 5.0);
        assert_eq!(lines[0].2, palette.start);
        assert_eq!(lines[1].3, 1.0);
        assert_eq!(lines[1].2, palette.end);
    }

    #[test]
    fn test_debug_highlights_and_probes() {
        let palette = Palette::for_theme(Theme::Dark);
        let mut pushed = pose(1, 1, Vec2::ZERO, Vec2::new(50.0, 0.0));
        pushed.pointer_influenced = true;
        pushed.pointer_distance = Some(20.0);
        let mut pulled = pose(2, 1, Vec2::ZERO, Vec2::new(0.0, 50.0));
        pulled.anchor_influenced = true;
        pulled.pointer_distance = Some(400.0);
        let poses = vec![pushed, pulled];

        let plain = render_frame(&poses, &view(&palette, &[]));
        assert!(lines(&plain).iter().all(|l| l.2 != DEBUG_POINTER));
        assert!(!plain.iter().any(|c| matches!(c, DrawCommand::Point { .. })));

        let mut debug_view = view(&palette, &[]);
        debug_view.debug = true;
        let debug = render_frame(&poses, &debug_view);
        let l = lines(&debug);
        assert_eq!(l[0].2, DEBUG_POINTER);
        assert_eq!(l[1].2, DEBUG_ANCHOR);
        // Only the segment within pointer range gets a probe dot
        let points: Vec<_> = debug
            .iter()
            .filter(|c| matches!(c, DrawCommand::Point { .. }))
            .collect();
        assert_eq!(points.len(), 1);
    }

    #[test]
    fn test_anchor_decorations() {
        let palette = Palette::for_theme(Theme::Dark);
        let anchors = vec![
            AnchorPoint {
                id: "home".into(),
                label: "Home".into(),
                tip: Vec2::new(200.0, 0.0),
                heading: 0.0,
            },
            AnchorPoint {
                id: "work".into(),
                label: "Work".into(),
                tip: Vec2::new(0.0, 200.0),
                heading: 90.0,
            },
        ];
        let mut home = pose(1, 0, Vec2::ZERO, Vec2::new(200.0, 0.0));
        home.anchor_slot = Some(0);
        let mut work = pose(2, 0, Vec2::ZERO, Vec2::new(0.0, 200.0));
        work.anchor_slot = Some(1);
        let poses = vec![home, work];

        let mut v = view(&palette, &anchors);
        v.active_anchor = Some("home");
        v.hovered_anchor = Some("work");
        let commands = render_frame(&poses, &v);

        // Hover ring drawn before the tree
        assert!(matches!(
            commands[1],
            DrawCommand::Circle { fill: None, diameter, .. } if (diameter - 108.0).abs() < 1e-4
        ));

        let labels: Vec<&str> = commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec!["Home", "Work"]);

        let ls = lines(&commands);
        assert_eq!(ls[0].3, 4.5);
        assert_eq!(ls[1].3, 3.5);
        let glows = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { glow: Some(_), .. }))
            .count();
        assert_eq!(glows, 2);

        // Active disc pulses around the item size; frame 0 -> sin(0) -> 1.0
        let active_disc = commands.iter().find_map(|c| match c {
            DrawCommand::Circle {
                fill: Some(fill),
                diameter,
                ..
            } if *fill == palette.anchor_active => Some(*diameter),
            _ => None,
        });
        assert!((active_disc.unwrap() - 60.0).abs() < 1e-4);
    }

    #[test]
    fn test_hover_ring_follows_theme() {
        let palette = Palette::for_theme(Theme::Light);
        let anchors = vec![AnchorPoint {
            id: "contact".into(),
            label: "Contact".into(),
            tip: Vec2::new(-150.0, 0.0),
            heading: 180.0,
        }];
        let mut contact = pose(1, 0, Vec2::ZERO, Vec2::new(-150.0, 0.0));
        contact.anchor_slot = Some(0);

        let mut v = view(&palette, &anchors);
        v.hovered_anchor = Some("contact");
        let commands = render_frame(&[contact], &v);

        match &commands[1] {
            DrawCommand::Circle {
                fill: None,
                stroke: Some(stroke),
                ..
            } => {
                assert_eq!(stroke.color, palette.hover_ring);
                assert_ne!(stroke.color.r, palette.background.r);
            }
            other => panic!("expected hover ring, got {:?}", other),
        }
    }

    #[test]
    fn test_central_point_last() {
        let palette = Palette::for_theme(Theme::Light);
        let mut v = view(&palette, &[]);
        v.central_point = Some(25.0);
        let commands = render_frame(&[], &v);
        assert_eq!(commands.len(), 2);
        assert_eq!(
            commands[1],
            DrawCommand::Point {
                at: Vec2::new(400.0, 300.0),
                color: palette.central_point,
                weight: 25.0
            }
        );
    }
}
