// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Geometric height sampling for skip list levels.
//!
//! Every item starts at height 1 and is promoted one level at a time with
//! probability `promote`, stopping at the first failed flip or at
//! `max_height`. Expected height is `1 / (1 - promote)`, independent of how
//! many items the index holds.

use rand::Rng;

use super::config::ConfigError;
use super::config::DEFAULT_MAX_HEIGHT;
use super::config::DEFAULT_PROMOTE;
use super::config::Options;

/// Draws item heights from a truncated geometric distribution.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HeightSampler {
    promote: f64,
    max_height: usize,
}

impl HeightSampler {
    /// Create a sampler. `promote` must lie in (0, 1) and `max_height` must
    /// be at least 1.
    pub fn new(promote: f64, max_height: usize) -> Result<HeightSampler, ConfigError> {
        let options = Options {
            promote,
            max_height,
            seed: None,
        };
        options.validate()?;
        return Ok(HeightSampler { promote, max_height });
    }

    pub fn promote(&self) -> f64 {
        return self.promote;
    }

    pub fn max_height(&self) -> usize {
        return self.max_height;
    }

    /// Draw one height in `1..=max_height`.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let mut height = 1;
        while height < self.max_height && rng.gen_bool(self.promote) {
            height += 1;
        }
        return height;
    }
}

impl Default for HeightSampler {
    fn default() -> Self {
        return HeightSampler {
            promote: DEFAULT_PROMOTE,
            max_height: DEFAULT_MAX_HEIGHT,
        };
    }
}
