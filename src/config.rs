//! Construction-time configuration.

use crate::error::ConfigError;
use crate::level::DEFAULT_PROBABILITY;
use crate::level::MAX_LEVEL;

/// Parameters of the height generator.
///
/// ```
/// use rankset::Config;
///
/// let config = Config::default().with_max_level(16).with_seed(42);
/// assert_eq!(config.clone().validate(), Ok(config));
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Highest tower a node may get, in `1..=MAX_LEVEL`.
    pub max_level: usize,
    /// Chance that a node is promoted one more level, in `(0, 1)`.
    pub probability: f64,
    /// Seed for reproducible heights. `None` draws from OS entropy.
    pub seed: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        return Config {
            max_level: MAX_LEVEL,
            probability: DEFAULT_PROBABILITY,
            seed: None,
        };
    }
}

impl Config {
    pub fn with_max_level(mut self, max_level: usize) -> Self {
        self.max_level = max_level;
        self
    }

    pub fn with_probability(mut self, probability: f64) -> Self {
        self.probability = probability;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Check the bounds, returning the config unchanged if they hold.
    pub fn validate(self) -> Result<Self, ConfigError> {
        if self.max_level == 0 || self.max_level > MAX_LEVEL {
            return Err(ConfigError::MaxLevel(self.max_level));
        }
        // Written so that NaN fails too.
        if !(self.probability > 0.0 && self.probability < 1.0) {
            return Err(ConfigError::Probability(self.probability));
        }
        return Ok(self);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.max_level, 32);
        assert_eq!(config.probability, 0.25);
        assert_eq!(config.seed, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn rejects_out_of_bounds() {
        assert_eq!(
            Config::default().with_max_level(0).validate(),
            Err(ConfigError::MaxLevel(0))
        );
        assert_eq!(
            Config::default().with_max_level(33).validate(),
            Err(ConfigError::MaxLevel(33))
        );
        assert_eq!(
            Config::default().with_probability(1.0).validate(),
            Err(ConfigError::Probability(1.0))
        );
        assert!(Config::default().with_probability(f64::NAN).validate().is_err());
    }
}
