//! Range queries and bulk deletions, by rank and by score.
//!
//! Ranks are 1-based and inclusive at both ends. Score ranges are described
//! by a [`RangeSpec`]; an empty range (see [`OrderedSet::validate_range`])
//! matches nothing.

use std::cmp::Ordering;

use tracing::debug;

use crate::comparator::Comparator;
use crate::element::Element;
use crate::error::RangeError;
use crate::level::LevelGenerator;
use crate::range::RangeSpec;

use super::Iter;
use super::NodeRef;
use super::OrderedSet;
use super::node::NIL;

impl<V, C, G> OrderedSet<V, C, G>
where
    V: Element,
    C: Comparator<V>,
    G: LevelGenerator,
{
    // --- By rank ---

    /// Elements with ranks in `start..=end`, ascending, or descending from
    /// the top when `reverse` is set (rank 1 is then the highest element).
    ///
    /// `start == 0` reads as 1, `end == 0` reads as `len()`, and `end` is
    /// clamped to `len()`.
    pub fn range_by_rank(&self, start: usize, end: usize, reverse: bool) -> Vec<&V> {
        let len = self.len();
        let start = start.max(1);
        let end = if end == 0 { len } else { end.min(len) };
        if start > end {
            return Vec::new();
        }

        let count = end - start + 1;
        if reverse {
            // Mirror onto ascending ranks and walk backwards from the top.
            let (front, back) = (len - end + 1, len - start + 1);
            match (self.node_by_rank(front), self.node_by_rank(back)) {
                (Some(front), Some(back)) => {
                    Iter::new(&self.nodes, front.idx(), back.idx(), count).rev().collect()
                }
                _ => Vec::new(),
            }
        } else {
            match (self.node_by_rank(start), self.node_by_rank(end)) {
                (Some(front), Some(back)) => {
                    Iter::new(&self.nodes, front.idx(), back.idx(), count).collect()
                }
                _ => Vec::new(),
            }
        }
    }

    /// Remove the elements with ranks in `start..=end`, returning how many
    /// were removed. Bounds are resolved once, before anything is removed.
    pub fn remove_range_by_rank(&mut self, start: usize, end: usize) -> usize {
        let start = start.max(1);
        if start > end || start > self.len() {
            return 0;
        }

        let path = self.nodes.descend(|next_rank, _| next_rank < start);
        let mut x = self.nodes.forward(path.update[0], 0);
        let mut rank = start;
        let mut removed = 0;
        while x != NIL && rank <= end {
            let next = self.nodes.forward(x, 0);
            self.detach(x, &path.update);
            removed += 1;
            rank += 1;
            x = next;
        }

        debug!(start, end, removed, len = self.len(), "removed rank range");
        removed
    }

    // --- By score ---

    /// Check that `range` can match anything at all.
    pub fn validate_range(&self, range: &RangeSpec<V::Score>) -> Result<(), RangeError> {
        match self.cmp.cmp_score(&range.min, &range.max) {
            Ordering::Greater => Err(RangeError::InvalidRange),
            Ordering::Equal if range.min_exclusive || range.max_exclusive => {
                Err(RangeError::InvalidRange)
            }
            _ => Ok(()),
        }
    }

    fn above_min(&self, score: &V::Score, range: &RangeSpec<V::Score>) -> bool {
        match self.cmp.cmp_score(score, &range.min) {
            Ordering::Greater => true,
            Ordering::Equal => !range.min_exclusive,
            Ordering::Less => false,
        }
    }

    fn below_max(&self, score: &V::Score, range: &RangeSpec<V::Score>) -> bool {
        match self.cmp.cmp_score(score, &range.max) {
            Ordering::Less => true,
            Ordering::Equal => !range.max_exclusive,
            Ordering::Greater => false,
        }
    }

    /// Whether at least part of the set's score span overlaps `range`.
    ///
    /// A `true` result does not guarantee a match: the range can fall
    /// between two adjacent scores.
    pub fn is_in_range(&self, range: &RangeSpec<V::Score>) -> bool {
        if self.validate_range(range).is_err() {
            return false;
        }
        match (self.first(), self.last()) {
            (Some(first), Some(last)) => {
                self.above_min(&last.value().score(), range)
                    && self.below_max(&first.value().score(), range)
            }
            _ => false,
        }
    }

    /// The lowest element whose score is in `range`.
    pub fn first_in_range(&self, range: &RangeSpec<V::Score>) -> Option<NodeRef<'_, V>> {
        if !self.is_in_range(range) {
            return None;
        }
        let path = self
            .nodes
            .descend(|_, next| !self.above_min(&next.score(), range));
        let first = self.nodes.at(self.nodes.forward(path.update[0], 0))?;
        self.below_max(&first.value().score(), range).then_some(first)
    }

    /// The highest element whose score is in `range`.
    pub fn last_in_range(&self, range: &RangeSpec<V::Score>) -> Option<NodeRef<'_, V>> {
        if !self.is_in_range(range) {
            return None;
        }
        let path = self
            .nodes
            .descend(|_, next| self.below_max(&next.score(), range));
        let last = self.nodes.at(path.update[0])?;
        self.above_min(&last.value().score(), range).then_some(last)
    }

    /// Elements whose score is in `range`, ascending.
    pub fn range_by_score(&self, range: &RangeSpec<V::Score>) -> Vec<&V> {
        let mut values = Vec::new();
        let mut node = self.first_in_range(range);
        while let Some(current) = node {
            if !self.below_max(&current.value().score(), range) {
                break;
            }
            values.push(current.value());
            node = current.next();
        }
        values
    }

    /// Number of elements whose score is in `range`, without visiting them.
    pub fn count_by_score(&self, range: &RangeSpec<V::Score>) -> usize {
        if !self.is_in_range(range) {
            return 0;
        }
        let below = self
            .nodes
            .descend(|_, next| !self.above_min(&next.score(), range))
            .rank[0];
        let through = self
            .nodes
            .descend(|_, next| self.below_max(&next.score(), range))
            .rank[0];
        through.saturating_sub(below)
    }

    /// Remove every element whose score is in `range`, returning how many
    /// were removed.
    pub fn remove_range_by_score(&mut self, range: &RangeSpec<V::Score>) -> usize {
        if self.validate_range(range).is_err() {
            return 0;
        }

        let path = self
            .nodes
            .descend(|_, next| !self.above_min(&next.score(), range));
        let mut x = self.nodes.forward(path.update[0], 0);
        let mut removed = 0;
        while x != NIL && self.below_max(&self.nodes.node(x).value.score(), range) {
            let next = self.nodes.forward(x, 0);
            self.detach(x, &path.update);
            removed += 1;
            x = next;
        }

        debug!(removed, len = self.len(), "removed score range");
        removed
    }
}

#[cfg(test)]
mod tests {
    use crate::comparator::Natural;
    use crate::config::Config;
    use crate::element::Element;
    use crate::range::RangeSpec;
    use crate::set::OrderedSet;

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

    /// Keys 1..=n with score 10 * key.
    fn tens(n: u64) -> OrderedSet<Entry> {
        let config = Config::default().with_seed(n);
        let mut set = OrderedSet::with_config(Natural, &config).unwrap();
        for key in 1..=n {
            set.insert(Entry { key, score: key * 10 }).unwrap();
        }
        set
    }

    fn keys(values: Vec<&Entry>) -> Vec<u64> {
        values.into_iter().map(|e| e.key).collect()
    }

    #[test]
    fn range_by_rank_forward() {
        let set = tens(10);
        assert_eq!(keys(set.range_by_rank(3, 5, false)), vec![3, 4, 5]);
        assert_eq!(keys(set.range_by_rank(0, 2, false)), vec![1, 2]);
        assert_eq!(keys(set.range_by_rank(9, 0, false)), vec![9, 10]);
        assert_eq!(keys(set.range_by_rank(8, 50, false)), vec![8, 9, 10]);
        assert!(set.range_by_rank(6, 5, false).is_empty());
        assert!(set.range_by_rank(11, 20, false).is_empty());
    }

    #[test]
    fn range_by_rank_reverse() {
        let set = tens(10);
        assert_eq!(keys(set.range_by_rank(1, 3, true)), vec![10, 9, 8]);
        assert_eq!(keys(set.range_by_rank(9, 15, true)), vec![2, 1]);
        assert_eq!(set.range_by_rank(0, 0, true).len(), 10);
    }

    #[test]
    fn range_by_rank_empty_set() {
        let set = tens(0);
        assert!(set.range_by_rank(0, 0, false).is_empty());
        assert!(set.range_by_rank(1, 1, true).is_empty());
    }

    #[test]
    fn remove_range_by_rank_middle() {
        let mut set = tens(10);
        assert_eq!(set.remove_range_by_rank(4, 6), 3);
        assert_eq!(keys(set.iter().collect()), vec![1, 2, 3, 7, 8, 9, 10]);
        assert!(!set.contains_key(&5));
        set.assert_invariants();
    }

    #[test]
    fn remove_range_by_rank_clamps() {
        let mut set = tens(5);
        assert_eq!(set.remove_range_by_rank(0, 2), 2);
        assert_eq!(set.remove_range_by_rank(2, 100), 2);
        assert_eq!(keys(set.iter().collect()), vec![3]);
        assert_eq!(set.remove_range_by_rank(2, 1), 0);
        assert_eq!(set.remove_range_by_rank(5, 9), 0);
        set.assert_invariants();
    }

    #[test]
    fn validate_range_bounds() {
        let set = tens(1);
        assert!(set.validate_range(&RangeSpec::inclusive(1, 2)).is_ok());
        assert!(set.validate_range(&RangeSpec::inclusive(2, 2)).is_ok());
        assert!(set.validate_range(&RangeSpec::inclusive(3, 2)).is_err());
        assert!(set.validate_range(&RangeSpec::inclusive(2, 2).exclude_min()).is_err());
        assert!(set.validate_range(&RangeSpec::inclusive(2, 2).exclude_max()).is_err());
    }

    #[test]
    fn is_in_range_checks_extremes() {
        let set = tens(5);
        assert!(set.is_in_range(&RangeSpec::inclusive(0, 10)));
        assert!(set.is_in_range(&RangeSpec::inclusive(50, 60)));
        assert!(!set.is_in_range(&RangeSpec::inclusive(50, 60).exclude_min()));
        assert!(!set.is_in_range(&RangeSpec::inclusive(0, 10).exclude_max()));
        // Overlaps the span but falls between scores.
        assert!(set.is_in_range(&RangeSpec::exclusive(20, 30)));
        assert!(!tens(0).is_in_range(&RangeSpec::inclusive(0, 100)));
    }

    #[test]
    fn first_and_last_in_range() {
        let set = tens(10);
        let range = RangeSpec::inclusive(25, 70).exclude_max();
        assert_eq!(set.first_in_range(&range).unwrap().value().key, 3);
        assert_eq!(set.last_in_range(&range).unwrap().value().key, 6);

        let gap = RangeSpec::exclusive(20, 30);
        assert!(set.first_in_range(&gap).is_none());
        assert!(set.last_in_range(&gap).is_none());
    }

    #[test]
    fn range_by_score_bounds() {
        let set = tens(10);
        assert_eq!(keys(set.range_by_score(&RangeSpec::inclusive(30, 50))), vec![3, 4, 5]);
        assert_eq!(keys(set.range_by_score(&RangeSpec::exclusive(30, 50))), vec![4]);
        assert_eq!(keys(set.range_by_score(&RangeSpec::inclusive(95, 1000))), vec![10]);
        assert!(set.range_by_score(&RangeSpec::inclusive(50, 30)).is_empty());
    }

    #[test]
    fn count_by_score_matches_range() {
        let set = tens(40);
        for (min, max) in [(0, 0), (10, 10), (15, 205), (100, 400), (395, 900), (7, 3)] {
            for (min_ex, max_ex) in [(false, false), (true, false), (false, true), (true, true)] {
                let range = RangeSpec::new(min, max, min_ex, max_ex);
                assert_eq!(
                    set.count_by_score(&range),
                    set.range_by_score(&range).len(),
                    "{range:?}"
                );
            }
        }
    }

    #[test]
    fn remove_range_by_score_exclusive() {
        let mut set = tens(10);
        assert_eq!(set.remove_range_by_score(&RangeSpec::exclusive(20, 60)), 3);
        assert_eq!(keys(set.iter().collect()), vec![1, 2, 6, 7, 8, 9, 10]);
        assert_eq!(set.remove_range_by_score(&RangeSpec::exclusive(20, 20)), 0);
        assert_eq!(set.remove_range_by_score(&RangeSpec::inclusive(90, 10)), 0);
        assert_eq!(set.remove_range_by_score(&RangeSpec::inclusive(0, 1000)), 7);
        assert!(set.is_empty());
        assert_eq!(set.level(), 1);
        set.assert_invariants();
    }
}
