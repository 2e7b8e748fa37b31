//! The ordered, rank-indexed set.
//!
//! An [`OrderedSet`] keeps its elements in a skip list ordered by
//! `(score, key)` and indexes them by key in a hash map. Each forward link
//! records how many elements it skips, which turns the usual skip-list
//! search into an O(log n) rank computation.
//!
//! # Operations
//!
//! - `insert(v)` / `remove(key)`: O(log n) expected
//! - `get(key)` / `contains_key(key)`: O(1) expected
//! - `rank(key)` / `node_by_rank(rank)`: O(log n) expected
//! - `range_by_rank` / `range_by_score`: O(log n + m) for m results
//! - `remove_range_by_rank` / `remove_range_by_score`: O(log n + m)
//! - `len()`, `first()`, `last()`: O(1)
//!
//! The set is not synchronized. Share it between threads behind a lock or
//! keep it owned by a single task.

mod dump;
mod iter;
mod node;
mod query;

use std::cmp::Ordering;
use std::fmt;

use rustc_hash::FxHashMap;
use tracing::debug;
use tracing::error;
use tracing::trace;

use crate::comparator::Comparator;
use crate::comparator::Natural;
use crate::config::Config;
use crate::element::Element;
use crate::element::Rescore;
use crate::element::SetScore;
use crate::error::ConfigError;
use crate::error::InsertError;
use crate::level::Geometric;
use crate::level::LevelGenerator;
use crate::level::MAX_LEVEL;

pub use iter::Iter;
pub use node::NodeRef;

use node::Idx;
use node::NIL;
use node::Nodes;

/// An ordered set of elements addressable by key and by rank.
///
/// ```
/// use rankset::{Element, OrderedSet};
///
/// #[derive(Debug)]
/// struct Entry { key: u64, score: u64 }
///
/// impl Element for Entry {
///     type Key = u64;
///     type Score = u64;
///     fn key(&self) -> &u64 { &self.key }
///     fn score(&self) -> u64 { self.score }
/// }
///
/// let mut set = OrderedSet::new();
/// set.insert(Entry { key: 1, score: 10 }).unwrap();
/// set.insert(Entry { key: 2, score: 10 }).unwrap();
/// set.insert(Entry { key: 3, score: 8 }).unwrap();
///
/// assert_eq!(set.rank(&3), Some(1));
/// assert_eq!(set.rank(&2), Some(3));
/// assert_eq!(set.get_by_rank(2).map(|e| e.key), Some(1));
/// assert!(set.insert(Entry { key: 1, score: 0 }).is_err());
/// ```
pub struct OrderedSet<V: Element, C = Natural, G = Geometric> {
    nodes: Nodes<V>,
    index: FxHashMap<V::Key, Idx>,
    cmp: C,
    levels: G,
}

impl<V> OrderedSet<V>
where
    V: Element,
    Natural: Comparator<V>,
{
    /// An empty set using the `Ord` order of scores and keys.
    pub fn new() -> Self {
        Self::with_comparator(Natural)
    }
}

impl<V> Default for OrderedSet<V>
where
    V: Element,
    Natural: Comparator<V>,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<V, C> OrderedSet<V, C>
where
    V: Element,
    C: Comparator<V>,
{
    /// An empty set bound to `cmp`, with default height parameters.
    pub fn with_comparator(cmp: C) -> Self {
        Self::with_generator(cmp, Geometric::default())
    }

    /// An empty set bound to `cmp`, with height parameters from `config`.
    pub fn with_config(cmp: C, config: &Config) -> Result<Self, ConfigError> {
        let levels = Geometric::from_config(config)?;
        return Ok(Self::with_generator(cmp, levels));
    }
}

impl<V, C, G> OrderedSet<V, C, G>
where
    V: Element,
    C: Comparator<V>,
    G: LevelGenerator,
{
    /// An empty set bound to `cmp`, drawing tower heights from `levels`.
    pub fn with_generator(cmp: C, levels: G) -> Self {
        OrderedSet {
            nodes: Nodes::new(),
            index: FxHashMap::default(),
            cmp,
            levels,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.len == 0
    }

    /// Number of levels currently in use.
    pub fn level(&self) -> usize {
        self.nodes.level
    }

    pub fn comparator(&self) -> &C {
        &self.cmp
    }

    /// The lowest element.
    pub fn first(&self) -> Option<NodeRef<'_, V>> {
        self.nodes.at(self.nodes.first())
    }

    /// The highest element.
    pub fn last(&self) -> Option<NodeRef<'_, V>> {
        self.nodes.at(self.nodes.tail)
    }

    pub fn get(&self, key: &V::Key) -> Option<&V> {
        let &idx = self.index.get(key)?;
        Some(&self.nodes.node(idx).value)
    }

    pub fn contains_key(&self, key: &V::Key) -> bool {
        self.index.contains_key(key)
    }

    // --- Insertion and removal ---

    /// Insert an element whose key is not yet present.
    ///
    /// Returns [`InsertError::DuplicateKey`] with the element untouched, and
    /// the set unchanged, if the key is already stored or if a stored
    /// element compares equal to it on both score and key.
    pub fn insert(&mut self, value: V) -> Result<NodeRef<'_, V>, InsertError<V>> {
        if self.index.contains_key(value.key()) {
            return Err(InsertError::DuplicateKey(value));
        }
        let idx = self.link_new(value)?;
        return Ok(NodeRef::new(&self.nodes, idx));
    }

    /// Splice `value` in at its position. The key must not be indexed yet.
    fn link_new(&mut self, value: V) -> Result<Idx, InsertError<V>> {
        let cmp = &self.cmp;
        let mut path = self
            .nodes
            .descend(|_, next| cmp.cmp_elements(next, &value) == Ordering::Less);

        // The comparator may tie keys that the index tells apart.
        let next = self.nodes.forward(path.update[0], 0);
        if next != NIL && cmp.cmp_elements(&self.nodes.node(next).value, &value) == Ordering::Equal {
            debug!(rank = path.rank[0] + 1, "element ties with a stored one, rejected");
            return Err(InsertError::DuplicateKey(value));
        }

        let max_level = self.levels.max_level().clamp(1, MAX_LEVEL);
        let height = self.levels.random_height().clamp(1, max_level);
        let key = value.key().clone();
        let idx = self.nodes.alloc(value, height);
        self.nodes.link(idx, &mut path);
        self.index.insert(key, idx);

        trace!(rank = path.rank[0] + 1, height, len = self.nodes.len, "inserted");
        Ok(idx)
    }

    /// Remove the element stored under `key`.
    ///
    /// Returns `None`, and changes nothing, if the key is absent.
    pub fn remove(&mut self, key: &V::Key) -> Option<V> {
        let &idx = self.index.get(key)?;
        let target = &self.nodes.node(idx).value;
        let cmp = &self.cmp;
        let path = self
            .nodes
            .descend(|_, next| cmp.cmp_elements(next, target) == Ordering::Less);

        // The descent must land right before the indexed node.
        if self.nodes.forward(path.update[0], 0) != idx {
            error!(
                rank = path.rank[0] + 1,
                len = self.nodes.len,
                "key index and order disagree, element left in place"
            );
            return None;
        }

        let value = self.detach(idx, &path.update);
        trace!(rank = path.rank[0] + 1, len = self.nodes.len, "removed");
        Some(value)
    }

    /// Remove the stored element sharing `value`'s key.
    pub fn remove_element(&mut self, value: &V) -> Option<V> {
        self.remove(value.key())
    }

    /// Unlink a node whose predecessors are `update`, drop it from the key
    /// index and hand its element back.
    fn detach(&mut self, idx: Idx, update: &[Idx; MAX_LEVEL]) -> V {
        self.nodes.unlink(idx, update);
        let value = self.nodes.release(idx);
        self.index.remove(value.key());
        value
    }

    /// Move the element stored under `key` to a new score.
    ///
    /// This is a removal followed by a reinsertion, so the element's rank and
    /// neighbours may change. Returns `Ok(None)` if the key is absent.
    ///
    /// If the moved element would tie with another stored element on both
    /// score and key, it stays out of the set and is handed back in
    /// [`InsertError::DuplicateKey`].
    pub fn update_score(
        &mut self,
        key: &V::Key,
        score: V::Score,
    ) -> Result<Option<NodeRef<'_, V>>, InsertError<V>>
    where
        V: SetScore,
    {
        let Some(mut value) = self.remove(key) else {
            return Ok(None);
        };
        value.set_score(score);
        let idx = self.link_new(value)?;
        Ok(Some(NodeRef::new(&self.nodes, idx)))
    }

    /// Detach the element stored under `key`, let it recompute its score,
    /// and put it back. Absent keys and ties behave as in
    /// [`update_score`](Self::update_score).
    pub fn rescore(&mut self, key: &V::Key) -> Result<Option<NodeRef<'_, V>>, InsertError<V>>
    where
        V: Rescore,
    {
        let Some(mut value) = self.remove(key) else {
            return Ok(None);
        };
        value.recompute_score();
        let idx = self.link_new(value)?;
        Ok(Some(NodeRef::new(&self.nodes, idx)))
    }

    /// Drop every element.
    pub fn clear(&mut self) {
        let len = self.nodes.len;
        self.nodes.clear();
        self.index.clear();
        debug!(len, "cleared");
    }

    // --- Rank lookups ---

    /// The 1-based rank of the element stored under `key`.
    pub fn rank(&self, key: &V::Key) -> Option<usize> {
        let &idx = self.index.get(key)?;
        self.rank_of_idx(idx)
    }

    /// The 1-based rank of the stored element sharing `value`'s key.
    pub fn rank_of(&self, value: &V) -> Option<usize> {
        self.rank(value.key())
    }

    fn rank_of_idx(&self, idx: Idx) -> Option<usize> {
        let target = &self.nodes.node(idx).value;
        let path = self
            .nodes
            .descend(|_, next| self.cmp.cmp_elements(next, target) != Ordering::Greater);
        (path.update[0] == idx).then_some(path.rank[0])
    }

    /// The node at 1-based `rank`, `None` if `rank` is 0 or past the end.
    pub fn node_by_rank(&self, rank: usize) -> Option<NodeRef<'_, V>> {
        if rank == 0 || rank > self.nodes.len {
            return None;
        }
        let path = self.nodes.descend(|next_rank, _| next_rank <= rank);
        if path.rank[0] != rank {
            return None;
        }
        self.nodes.at(path.update[0])
    }

    /// The element at 1-based `rank`.
    pub fn get_by_rank(&self, rank: usize) -> Option<&V> {
        self.node_by_rank(rank).map(|node| node.value())
    }
}

impl<V, C, G> fmt::Debug for OrderedSet<V, C, G>
where
    V: Element + fmt::Debug,
    C: Comparator<V>,
    G: LevelGenerator,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Entry {
        key: u64,
        score: u64,
    }

    impl Element for Entry {
        type Key = u64;
        type Score = u64;

        fn key(&self) -> &u64 {
            &self.key
        }

        fn score(&self) -> u64 {
            self.score
        }
    }

    impl SetScore for Entry {
        fn set_score(&mut self, score: u64) {
            self.score = score;
        }
    }

    fn entry(key: u64, score: u64) -> Entry {
        Entry { key, score }
    }

    fn seeded() -> OrderedSet<Entry> {
        let config = Config::default().with_seed(0x5eed);
        OrderedSet::with_config(Natural, &config).unwrap()
    }

    fn keys(set: &OrderedSet<Entry>) -> Vec<u64> {
        set.iter().map(|e| e.key).collect()
    }

    #[test]
    fn empty_set() {
        let set = seeded();
        assert_eq!(set.len(), 0);
        assert!(set.is_empty());
        assert_eq!(set.level(), 1);
        assert!(set.first().is_none());
        assert!(set.last().is_none());
        assert_eq!(set.rank(&1), None);
        assert!(set.node_by_rank(0).is_none());
        assert!(set.node_by_rank(1).is_none());
        set.assert_invariants();
    }

    #[test]
    fn insert_orders_by_score_then_key() {
        let mut set = seeded();
        for (key, score) in [(1, 10), (2, 10), (3, 8), (4, 11)] {
            set.insert(entry(key, score)).unwrap();
        }
        assert_eq!(keys(&set), vec![3, 1, 2, 4]);
        assert_eq!(set.first().unwrap().value().key, 3);
        assert_eq!(set.last().unwrap().value().key, 4);
        set.assert_invariants();
    }

    #[test]
    fn insert_returns_node() {
        let mut set = seeded();
        set.insert(entry(1, 5)).unwrap();
        let node = set.insert(entry(2, 3)).unwrap();
        assert_eq!(node.value(), &entry(2, 3));
        assert!(node.prev().is_none());
        assert_eq!(node.next().unwrap().value().key, 1);
    }

    #[test]
    fn duplicate_key_is_rejected() {
        let mut set = seeded();
        set.insert(entry(1, 5)).unwrap();
        let err = set.insert(entry(1, 99)).unwrap_err();
        assert_eq!(err, InsertError::DuplicateKey(entry(1, 99)));
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(&1), Some(&entry(1, 5)));
        set.assert_invariants();
    }

    #[test]
    fn remove_present_and_absent() {
        let mut set = seeded();
        for key in 0..10 {
            set.insert(entry(key, key * 2)).unwrap();
        }
        assert_eq!(set.remove(&4), Some(entry(4, 8)));
        assert_eq!(set.remove(&4), None);
        assert_eq!(set.remove(&42), None);
        assert_eq!(set.len(), 9);
        assert!(!set.contains_key(&4));
        assert_eq!(set.rank(&5), Some(5));
        set.assert_invariants();
    }

    #[test]
    fn remove_element_uses_key() {
        let mut set = seeded();
        set.insert(entry(7, 1)).unwrap();
        assert_eq!(set.remove_element(&entry(7, 1)), Some(entry(7, 1)));
        assert!(set.is_empty());
        assert_eq!(set.level(), 1);
        set.assert_invariants();
    }

    #[test]
    fn ranks_agree_with_nodes() {
        let mut set = seeded();
        for key in 0..200 {
            set.insert(entry(key, (key * 7919) % 101)).unwrap();
        }
        for rank in 1..=set.len() {
            let key = set.get_by_rank(rank).unwrap().key;
            assert_eq!(set.rank(&key), Some(rank), "rank {rank}");
        }
        assert!(set.node_by_rank(201).is_none());
        set.assert_invariants();
    }

    #[test]
    fn rank_of_reads_key() {
        let mut set = seeded();
        set.insert(entry(1, 1)).unwrap();
        set.insert(entry(2, 2)).unwrap();
        assert_eq!(set.rank_of(&entry(2, 0)), Some(2));
        assert_eq!(set.rank_of(&entry(3, 2)), None);
    }

    #[test]
    fn update_score_moves_element() {
        let mut set = seeded();
        for key in 1..=5 {
            set.insert(entry(key, key * 10)).unwrap();
        }
        let node = set.update_score(&1, 45).unwrap().unwrap();
        assert_eq!(node.value(), &entry(1, 45));
        assert_eq!(keys(&set), vec![2, 3, 4, 1, 5]);
        assert_eq!(set.rank(&1), Some(4));
        assert!(matches!(set.update_score(&9, 0), Ok(None)));
        assert_eq!(set.len(), 5);
        set.assert_invariants();
    }

    #[test]
    fn clear_empties() {
        let mut set = seeded();
        for key in 0..50 {
            set.insert(entry(key, key)).unwrap();
        }
        set.clear();
        assert!(set.is_empty());
        assert_eq!(set.level(), 1);
        assert!(set.get(&3).is_none());
        set.insert(entry(3, 3)).unwrap();
        assert_eq!(set.rank(&3), Some(1));
        set.assert_invariants();
    }

    #[test]
    fn debug_lists_in_order() {
        let mut set = seeded();
        set.insert(entry(2, 1)).unwrap();
        set.insert(entry(1, 2)).unwrap();
        assert_eq!(
            format!("{set:?}"),
            "[Entry { key: 2, score: 1 }, Entry { key: 1, score: 2 }]"
        );
    }
}
