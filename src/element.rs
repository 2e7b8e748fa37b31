//! Capabilities an element must expose to live in an [`OrderedSet`].
//!
//! An element carries a stable unique key and a score. The set orders
//! elements by score first and breaks ties by key, so the pair
//! `(score, key)` is always unique inside one set.
//!
//! Neither the key nor the score may change while the element is indexed.
//! The only sanctioned way to move an element is to take it out and put it
//! back, which [`OrderedSet::update_score`] and [`OrderedSet::rescore`] do
//! for elements implementing [`SetScore`] or [`Rescore`].
//!
//! [`OrderedSet`]: crate::OrderedSet
//! [`OrderedSet::update_score`]: crate::OrderedSet::update_score
//! [`OrderedSet::rescore`]: crate::OrderedSet::rescore

use std::hash::Hash;

/// A value that can be stored in an ordered set.
pub trait Element {
    /// Unique identifier, also used as the key of the lookup index.
    type Key: Hash + Eq + Clone;

    /// Primary ordering field.
    type Score: Clone;

    /// The element's key. Must be stable for as long as the element is
    /// stored in a set.
    fn key(&self) -> &Self::Key;

    /// The element's score. Must return the same value for as long as the
    /// element is stored in a set.
    fn score(&self) -> Self::Score;
}

/// Elements whose score can be assigned directly.
pub trait SetScore: Element {
    /// Replace the score. Only called while the element is detached.
    fn set_score(&mut self, score: Self::Score);
}

/// Elements that derive their score from their own state.
///
/// The hook is invoked exactly once per reinsertion, after the element has
/// been detached and before the insert path reads its new score.
pub trait Rescore: Element {
    /// Recompute the score from the element's current state.
    fn recompute_score(&mut self);
}

impl<E: Element> Element for Box<E> {
    type Key = E::Key;
    type Score = E::Score;

    fn key(&self) -> &Self::Key {
        (**self).key()
    }

    fn score(&self) -> Self::Score {
        (**self).score()
    }
}
