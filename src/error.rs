//! Error types.
//!
//! Absent keys and out-of-bounds ranks are not errors: lookups return
//! `None` and removals report that nothing was removed.

use std::error::Error;
use std::fmt;

/// Error returned by [`OrderedSet::insert`](crate::OrderedSet::insert).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InsertError<V> {
    /// An element with the same key is already stored. The rejected
    /// element is handed back and the set is unchanged.
    DuplicateKey(V),
}

impl<V> InsertError<V> {
    /// Recover the element that was rejected.
    pub fn into_inner(self) -> V {
        match self {
            InsertError::DuplicateKey(value) => value,
        }
    }
}

impl<V> fmt::Display for InsertError<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InsertError::DuplicateKey(_) => f.write_str("an element with this key is already stored"),
        }
    }
}

impl<V: fmt::Debug> Error for InsertError<V> {}

/// Error returned by [`OrderedSet::validate_range`](crate::OrderedSet::validate_range).
///
/// Range queries and deletions treat an invalid range as empty instead of
/// reporting this error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeError {
    /// `min > max`, or `min == max` with either bound exclusive.
    InvalidRange,
}

impl fmt::Display for RangeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RangeError::InvalidRange => f.write_str("score range is empty"),
        }
    }
}

impl Error for RangeError {}

/// Error returned when a [`Config`](crate::Config) is out of bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// The maximum level must be in `1..=MAX_LEVEL`.
    MaxLevel(usize),
    /// The promotion probability must be in the open interval `(0, 1)`.
    Probability(f64),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MaxLevel(level) => {
                write!(f, "max level {level} is outside 1..={}", crate::level::MAX_LEVEL)
            }
            ConfigError::Probability(p) => write!(f, "probability {p} is outside (0, 1)"),
        }
    }
}

impl Error for ConfigError {}
