//! Rankset - an ordered set addressable by key and by rank.
//!
//! Elements are kept sorted by `(score, key)` in a skip list whose links
//! record how many elements they skip, so rank lookups, rank ranges and
//! score ranges all run in O(log n) expected time. A hash index maps each
//! key to its node for O(1) membership tests.
//!
//! # Quick Start
//!
//! ```
//! use rankset::{Element, OrderedSet, RangeSpec};
//!
//! #[derive(Debug)]
//! struct Player { name: &'static str, points: u32 }
//!
//! impl Element for Player {
//!     type Key = &'static str;
//!     type Score = u32;
//!     fn key(&self) -> &&'static str { &self.name }
//!     fn score(&self) -> u32 { self.points }
//! }
//!
//! let mut board = OrderedSet::new();
//! board.insert(Player { name: "ada", points: 30 }).unwrap();
//! board.insert(Player { name: "bob", points: 10 }).unwrap();
//! board.insert(Player { name: "cyd", points: 20 }).unwrap();
//!
//! assert_eq!(board.rank(&"ada"), Some(3));
//!
//! // Highest two, best first.
//! let top: Vec<_> = board.range_by_rank(1, 2, true).iter().map(|p| p.name).collect();
//! assert_eq!(top, ["ada", "cyd"]);
//!
//! let mid = board.range_by_score(&RangeSpec::inclusive(15, 30));
//! assert_eq!(mid.len(), 2);
//! assert_eq!(board.count_by_score(&RangeSpec::exclusive(10, 30)), 1);
//! ```

pub mod comparator;
pub mod config;
pub mod element;
pub mod error;
pub mod level;
pub mod range;
mod set;

pub use comparator::Comparator;
pub use comparator::FloatScore;
pub use comparator::Natural;
pub use config::Config;
pub use element::Element;
pub use element::Rescore;
pub use element::SetScore;
pub use error::ConfigError;
pub use error::InsertError;
pub use error::RangeError;
pub use level::DEFAULT_PROBABILITY;
pub use level::Geometric;
pub use level::LevelGenerator;
pub use level::MAX_LEVEL;
pub use range::RangeSpec;
pub use set::Iter;
pub use set::NodeRef;
pub use set::OrderedSet;
