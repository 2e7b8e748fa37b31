//! Tower height selection.
//!
//! When a node is inserted it is promoted to each further level with a
//! fixed probability, giving a geometric distribution of heights:
//!
//! ```text
//! height 1: 1 - p
//! height 2: p (1 - p)
//! height 3: p^2 (1 - p)
//! ...
//! ```
//!
//! With the default `p = 0.25` the expected tower holds 1.33 levels.
//! Heights never depend on the element being inserted.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::Config;
use crate::error::ConfigError;

/// Highest tower any node (and the head sentinel) can have.
pub const MAX_LEVEL: usize = 32;

/// Default promotion probability.
pub const DEFAULT_PROBABILITY: f64 = 0.25;

/// Source of tower heights.
///
/// The set owns its generator, so a seeded or scripted generator makes the
/// structure reproducible.
pub trait LevelGenerator {
    /// Height for a new node. The set clamps the result into
    /// `1..=self.max_level()`.
    fn random_height(&mut self) -> usize;

    /// Upper bound on heights, at most [`MAX_LEVEL`].
    fn max_level(&self) -> usize;
}

/// Geometrically distributed heights backed by a [`StdRng`].
#[derive(Clone, Debug)]
pub struct Geometric {
    max_level: usize,
    p: f64,
    rng: StdRng,
}

impl Geometric {
    /// Build a generator from a validated config.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let config = config.clone().validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        return Ok(Geometric {
            max_level: config.max_level,
            p: config.probability,
            rng,
        });
    }

    /// Default parameters, reproducible from `seed`.
    pub fn seeded(seed: u64) -> Self {
        Geometric {
            max_level: MAX_LEVEL,
            p: DEFAULT_PROBABILITY,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn probability(&self) -> f64 {
        self.p
    }
}

impl Default for Geometric {
    /// Default parameters seeded from OS entropy.
    fn default() -> Self {
        Geometric {
            max_level: MAX_LEVEL,
            p: DEFAULT_PROBABILITY,
            rng: StdRng::from_entropy(),
        }
    }
}

impl LevelGenerator for Geometric {
    fn random_height(&mut self) -> usize {
        let mut height = 1;
        while height < self.max_level && self.rng.gen_bool(self.p) {
            height += 1;
        }
        height
    }

    fn max_level(&self) -> usize {
        self.max_level
    }
}
