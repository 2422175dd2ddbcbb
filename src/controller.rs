//! Forest controller
//!
//! Owns everything that lives across frames: the forest, the seeded RNG, the
//! wind source, the pointer snapshot and the viewport. Hosts feed it
//! [`HostEvent`]s and call [`ForestController::frame`] once per animation
//! callback.
//!
//! Lifecycle: `Pending -> Running -> (regenerate)* -> TornDown`. The first
//! generation waits until the host reports a non-empty viewport.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::Serialize;

use crate::config::{ForestConfig, Theme};
use crate::error::ForestError;
use crate::render::{DrawCommand, Palette, RenderView, render_frame};
use crate::sim::{
    AnchorPoint, Attractor, Forest, InteractionParams, PerlinWind, PhysicsParams, SegmentIds,
    StepContext, WindNoise, advance_forest, anchor_points, generate_forest,
};

/// Drawing surface size in CSS pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Result<Self, ForestError> {
        if !(width > 0.0 && height > 0.0) {
            return Err(ForestError::ViewportNotReady { width, height });
        }
        Ok(Self { width, height })
    }

    /// Scene origin in canvas coordinates
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Middle,
    Secondary,
}

/// Input from the host shell
#[derive(Debug, Clone, PartialEq)]
pub enum HostEvent {
    /// Pointer position in canvas-local coordinates
    PointerMoved { x: f32, y: f32 },
    PointerLeft,
    Pressed(PointerButton),
    Resized { width: f32, height: f32 },
    ThemeChanged(Theme),
    /// The host navigated; `None` clears the active anchor
    AnchorActivated(Option<String>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Waiting for a usable viewport
    Pending,
    Running,
    TornDown,
}

/// Snapshot of the current forest, for logging and the headless driver
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForestStats {
    pub generation: u64,
    pub frame: u64,
    pub roots: usize,
    pub anchors: usize,
    pub segments: usize,
    pub depth: u32,
    /// Mean and max `|angle - rest_angle|` in degrees
    pub mean_displacement: f32,
    pub max_displacement: f32,
}

pub struct ForestController<N: WindNoise = PerlinWind> {
    config: ForestConfig,
    physics: PhysicsParams,
    interaction: InteractionParams,
    forest: Option<Forest>,
    rng: Pcg32,
    noise: N,
    ids: SegmentIds,
    generation: u64,
    frame: u64,
    /// Canvas-local pointer snapshot
    pointer: Option<Vec2>,
    viewport: Option<Viewport>,
    debug: bool,
    theme: Theme,
    active_anchor: Option<String>,
    hovered_anchor: Option<String>,
    /// Anchor tips from the last frame, in anchor-slot order
    anchor_points: Vec<AnchorPoint>,
    lifecycle: Lifecycle,
}

impl ForestController<PerlinWind> {
    /// Controller with Perlin wind, both seeded from `seed`
    pub fn new(config: ForestConfig, seed: u64) -> Result<Self, ForestError> {
        Self::with_noise(config, seed, PerlinWind::new(seed as u32))
    }
}

impl<N: WindNoise> ForestController<N> {
    pub fn with_noise(config: ForestConfig, seed: u64, noise: N) -> Result<Self, ForestError> {
        config.validate()?;
        log::info!(
            "Forest controller created (seed {}, {} roots, {} anchors, max level {})",
            seed,
            config.root_count,
            config.anchors.len(),
            config.max_level
        );
        Ok(Self {
            physics: PhysicsParams::from_config(&config),
            interaction: InteractionParams::from_config(&config),
            forest: None,
            rng: Pcg32::seed_from_u64(seed),
            noise,
            ids: SegmentIds::new(),
            generation: 0,
            frame: 0,
            pointer: None,
            viewport: None,
            debug: config.debug,
            theme: config.theme,
            active_anchor: None,
            hovered_anchor: None,
            anchor_points: Vec::new(),
            lifecycle: Lifecycle::Pending,
            config,
        })
    }

    pub fn handle_event(&mut self, event: HostEvent) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }

        match event {
            HostEvent::PointerMoved { x, y } => self.pointer = Some(Vec2::new(x, y)),
            HostEvent::PointerLeft => {
                self.pointer = None;
                self.hovered_anchor = None;
            }
            HostEvent::Pressed(PointerButton::Primary) => {
                if let Some(id) = self.hovered_anchor.clone() {
                    log::info!("Anchor activated: {}", id);
                    self.active_anchor = Some(id);
                } else if self.config.regenerate_on_click {
                    self.regenerate();
                }
            }
            HostEvent::Pressed(PointerButton::Middle) => self.toggle_debug(),
            HostEvent::Pressed(PointerButton::Secondary) => {}
            HostEvent::Resized { width, height } => self.resize(width, height),
            HostEvent::ThemeChanged(theme) => self.set_theme(theme),
            HostEvent::AnchorActivated(id) => self.active_anchor = id,
        }
    }

    fn resize(&mut self, width: f32, height: f32) {
        match Viewport::new(width, height) {
            Ok(viewport) => {
                self.viewport = Some(viewport);
                if self.lifecycle == Lifecycle::Pending {
                    self.regenerate();
                }
            }
            Err(e) => {
                // Keep the last good viewport; a pending controller stays pending
                log::warn!("{}, deferring", e);
            }
        }
    }

    /// Replace the whole forest with a freshly generated one
    pub fn regenerate(&mut self) {
        match self.lifecycle {
            Lifecycle::TornDown => return,
            Lifecycle::Pending if self.viewport.is_none() => {
                log::warn!("Surface not ready, deferring generation");
                return;
            }
            _ => {}
        }

        self.generation += 1;
        let forest = generate_forest(&self.config, &mut self.ids, self.generation, &mut self.rng);
        log::info!(
            "Generated forest {} ({} roots, {} segments)",
            self.generation,
            forest.roots.len(),
            forest.segment_count()
        );
        log::debug!(
            "Forest {}: depth {}, {} anchors, next index {}",
            self.generation,
            forest.depth(),
            forest.anchors().count(),
            self.ids.peek()
        );

        self.forest = Some(forest);
        self.anchor_points.clear();
        self.hovered_anchor = None;
        self.lifecycle = Lifecycle::Running;
    }

    pub fn toggle_debug(&mut self) {
        self.debug = !self.debug;
        log::info!("Debug visualization: {}", if self.debug { "on" } else { "off" });
    }

    /// Switch palette; the forest is regenerated to match
    pub fn set_theme(&mut self, theme: Theme) {
        if theme == self.theme {
            return;
        }
        log::info!("Theme changed: {} -> {}", self.theme.as_str(), theme.as_str());
        self.theme = theme;
        self.regenerate();
    }

    /// Drop the forest; the controller ignores everything afterwards
    pub fn teardown(&mut self) {
        if self.lifecycle == Lifecycle::TornDown {
            return;
        }
        self.forest = None;
        self.anchor_points.clear();
        self.lifecycle = Lifecycle::TornDown;
        log::info!("Forest controller torn down after {} frames", self.frame);
    }

    /// Advance one frame and paint it. `None` until the surface is ready and after teardown.
    pub fn frame(&mut self) -> Option<Vec<DrawCommand>> {
        if self.lifecycle != Lifecycle::Running {
            return None;
        }
        let viewport = self.viewport?;
        let forest = self.forest.as_mut()?;
        let origin = viewport.center();
        let pointer = self.pointer.map(|p| p - origin);

        let active = self.active_anchor.as_deref();
        let hovered = self.hovered_anchor.as_deref();
        let attractors: Vec<Attractor> = self
            .anchor_points
            .iter()
            .enumerate()
            .filter(|(_, p)| Some(p.id.as_str()) == active || Some(p.id.as_str()) == hovered)
            .map(|(slot, p)| Attractor {
                anchor_slot: slot,
                point: p.tip,
            })
            .collect();

        let ctx = StepContext {
            physics: &self.physics,
            interaction: &self.interaction,
            noise: &self.noise,
            frame: self.frame,
            pointer,
            attractors: &attractors,
            jitter: (self.config.wind_jitter_min, self.config.wind_jitter_max),
        };
        let poses = advance_forest(forest, &ctx, &mut self.rng);

        self.anchor_points = anchor_points(forest, &poses);
        self.hovered_anchor = pointer
            .and_then(|p| self.interaction.hovered_anchor(&self.anchor_points, p))
            .map(|a| a.id.clone());

        let palette = Palette::for_theme(self.theme);
        let view = RenderView {
            palette: &palette,
            origin,
            max_level: self.config.max_level,
            frame: self.frame,
            debug: self.debug,
            pointer_radius: self.config.pointer_radius,
            anchors: &self.anchor_points,
            active_anchor: self.active_anchor.as_deref(),
            hovered_anchor: self.hovered_anchor.as_deref(),
            anchor_item_size: self.config.anchor_item_size,
            central_point: self
                .config
                .show_central_point
                .then_some(self.config.central_point_size),
        };
        let commands = render_frame(&poses, &view);

        self.frame += 1;
        Some(commands)
    }

    pub fn stats(&self) -> Option<ForestStats> {
        let forest = self.forest.as_ref()?;
        let segments = forest.segment_count();
        let (sum, max) = forest.iter().fold((0.0f32, 0.0f32), |(sum, max), s| {
            let d = s.displacement().abs();
            (sum + d, max.max(d))
        });
        Some(ForestStats {
            generation: forest.generation,
            frame: self.frame,
            roots: forest.roots.len(),
            anchors: forest.anchors().count(),
            segments,
            depth: forest.depth(),
            mean_displacement: if segments == 0 { 0.0 } else { sum / segments as f32 },
            max_displacement: max,
        })
    }

    pub fn forest(&self) -> Option<&Forest> {
        self.forest.as_ref()
    }

    pub fn config(&self) -> &ForestConfig {
        &self.config
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.viewport
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    /// Anchor under the pointer as of the last frame (hosts use it for the cursor)
    pub fn hovered_anchor(&self) -> Option<&str> {
        self.hovered_anchor.as_deref()
    }

    pub fn active_anchor(&self) -> Option<&str> {
        self.active_anchor.as_deref()
    }

    pub fn anchor_points(&self) -> &[AnchorPoint] {
        &self.anchor_points
    }
}
