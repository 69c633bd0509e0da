// model = "claude-opus-4-5"
// created = "2026-10-19"
// modified = "2026-10-19"
// driver = "Isaac Clayton"

//! Construction options for ordered indices.

use std::error::Error;
use std::fmt;

/// Default chance that a new item is promoted one more level.
pub const DEFAULT_PROMOTE: f64 = 0.25;

/// Default cap on item height. With p = 1/4, 32 levels covers 2^64 items.
pub const DEFAULT_MAX_HEIGHT: usize = 32;

/// Options for [`OrderedIndex::with_options`](super::OrderedIndex::with_options).
#[derive(Clone, Debug, PartialEq)]
pub struct Options {
    /// Probability of each additional level above 1. Must lie in (0, 1).
    pub promote: f64,
    /// Highest level any item may reach. Must be at least 1.
    pub max_height: usize,
    /// Seed for the height generator. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for Options {
    fn default() -> Self {
        return Options {
            promote: DEFAULT_PROMOTE,
            max_height: DEFAULT_MAX_HEIGHT,
            seed: None,
        };
    }
}

impl Options {
    /// Default options with a fixed seed, for reproducible structure.
    pub fn seeded(seed: u64) -> Options {
        return Options {
            seed: Some(seed),
            ..Options::default()
        };
    }

    /// Check that the options describe a usable height distribution.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.promote > 0.0 && self.promote < 1.0) {
            return Err(ConfigError::InvalidPromote(self.promote));
        }
        if self.max_height == 0 {
            return Err(ConfigError::ZeroMaxHeight);
        }
        return Ok(());
    }
}

/// Error returned when options are rejected.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// The promotion probability was not strictly between 0 and 1.
    InvalidPromote(f64),
    /// The maximum height was zero.
    ZeroMaxHeight,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidPromote(p) => {
                return write!(f, "promotion probability {} is outside (0, 1)", p);
            }
            ConfigError::ZeroMaxHeight => {
                return write!(f, "maximum height must be at least 1");
            }
        }
    }
}

impl Error for ConfigError {}
