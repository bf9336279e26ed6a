//! Sub-pixel sample patterns.

use crate::sampling::gen_f64;
use crate::RenderError;
use rand::RngCore;

/// How each pixel is sampled.
///
/// Offsets are in pixel units relative to the pixel center, each in
/// `[-0.5, 0.5)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AntiAlias {
    /// Evenly spaced `x` by `y` grid, deterministic.
    Grid { x: u32, y: u32 },
    /// `n` uniformly jittered samples.
    Random(u32),
}

impl AntiAlias {
    pub fn sample_count(&self) -> u32 {
        match *self {
            AntiAlias::Grid { x, y } => x.saturating_mul(y),
            AntiAlias::Random(n) => n,
        }
    }

    pub fn validate(&self) -> Result<(), RenderError> {
        if self.sample_count() == 0 {
            return Err(RenderError::InvalidConfig(format!(
                "anti-aliasing {self:?} takes no samples"
            )));
        }
        Ok(())
    }

    /// Offset of sample `index`; grid samples run row by row.
    pub fn offset(&self, index: u32, rng: &mut dyn RngCore) -> (f64, f64) {
        match *self {
            AntiAlias::Grid { x, y } => {
                let i = index % x;
                let j = index / x;
                (
                    -0.5 + (i as f64 + 0.5) / x as f64,
                    -0.5 + (j as f64 + 0.5) / y as f64,
                )
            }
            AntiAlias::Random(_) => (gen_f64(rng) - 0.5, gen_f64(rng) - 0.5),
        }
    }
}

impl Default for AntiAlias {
    fn default() -> Self {
        AntiAlias::Grid { x: 2, y: 2 }
    }
}
