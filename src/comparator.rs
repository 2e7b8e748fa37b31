//! Total-order policies for ordered sets.
//!
//! A comparator is bound to a set when it is constructed and never changes.
//! Whatever it implements must be a well-behaved total order:
//!
//! - Consistent: `cmp(a, b)` always returns the same result.
//! - Anti-symmetric: `cmp(a, b) == Less` iff `cmp(b, a) == Greater`.
//! - Transitive: `cmp(a, b) == Less` and `cmp(b, c) == Less` imply
//!   `cmp(a, c) == Less`.
//!
//! - Key-faithful: `cmp_key(a, b) == Equal` iff `a == b` under `Key: Eq`.
//!
//! A comparator that breaks these rules leaves the set in an unspecified
//! (but memory-safe) state. The one exception the set catches is a
//! comparator that ties two distinct keys: an insert that would tie with a
//! stored element on both score and key is rejected as a duplicate.

use std::cmp::Ordering;

use crate::element::Element;

/// Orders scores and keys of `V`.
///
/// Elements are ordered by score, then by key. The set also uses
/// [`cmp_score`](Comparator::cmp_score) to test scores against the bounds
/// of a [`RangeSpec`](crate::RangeSpec).
pub trait Comparator<V: Element> {
    /// Compare two scores.
    fn cmp_score(&self, a: &V::Score, b: &V::Score) -> Ordering;

    /// Compare two keys. Must return `Equal` exactly when the keys are
    /// equal under `Key: Eq`.
    fn cmp_key(&self, a: &V::Key, b: &V::Key) -> Ordering;

    /// Compare two elements: score ascending, ties broken by key ascending.
    fn cmp_elements(&self, a: &V, b: &V) -> Ordering {
        return self
            .cmp_score(&a.score(), &b.score())
            .then_with(|| self.cmp_key(a.key(), b.key()));
    }
}

/// The `Ord` order of scores and keys.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Natural;

impl<V> Comparator<V> for Natural
where
    V: Element,
    V::Score: Ord,
    V::Key: Ord,
{
    fn cmp_score(&self, a: &V::Score, b: &V::Score) -> Ordering {
        a.cmp(b)
    }

    fn cmp_key(&self, a: &V::Key, b: &V::Key) -> Ordering {
        a.cmp(b)
    }
}

/// Floating-point scores ordered by [`f64::total_cmp`], keys by `Ord`.
///
/// `-0.0` sorts before `0.0` and NaNs sort at the extremes, so every score
/// has a place in the order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FloatScore;

impl<V> Comparator<V> for FloatScore
where
    V: Element<Score = f64>,
    V::Key: Ord,
{
    fn cmp_score(&self, a: &f64, b: &f64) -> Ordering {
        a.total_cmp(b)
    }

    fn cmp_key(&self, a: &V::Key, b: &V::Key) -> Ordering {
        a.cmp(b)
    }
}
