//! Wind noise sources
//!
//! Wind must vary smoothly with its input so sway is continuous from frame to
//! frame. Samples are in `[0, 1]`.

use noise::{Fbm, MultiFractal, NoiseFn, Perlin};

/// A coherent 1D noise function sampled once per segment per frame
pub trait WindNoise {
    /// Sample at `t`; returns a value in `[0, 1]`.
    ///
    /// `t` grows without bound on long-running pages, so it stays `f64`.
    fn sample(&self, t: f64) -> f32;
}

/// Four-octave Perlin fBm, the usual creative-coding `noise()`
#[derive(Clone)]
pub struct PerlinWind {
    fbm: Fbm<Perlin>,
}

impl PerlinWind {
    pub fn new(seed: u32) -> Self {
        let fbm = Fbm::<Perlin>::new(seed)
            .set_octaves(4)
            .set_persistence(0.5);
        Self { fbm }
    }
}

impl WindNoise for PerlinWind {
    fn sample(&self, t: f64) -> f32 {
        // Second coordinate kept off the lattice so t = 0 isn't a fixed zero
        let v = self.fbm.get([t, 0.37]);
        ((v * 0.5 + 0.5) as f32).clamp(0.0, 1.0)
    }
}

impl std::fmt::Debug for PerlinWind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PerlinWind").finish_non_exhaustive()
    }
}

/// Fixed output; `ConstantNoise(0.0)` disables wind
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConstantNoise(pub f32);

impl WindNoise for ConstantNoise {
    fn sample(&self, _t: f64) -> f32 {
        self.0
    }
}

impl<N: WindNoise + ?Sized> WindNoise for &N {
    fn sample(&self, t: f64) -> f32 {
        (**self).sample(t)
    }
}

impl<N: WindNoise + ?Sized> WindNoise for Box<N> {
    fn sample(&self, t: f64) -> f32 {
        (**self).sample(t)
    }
}
