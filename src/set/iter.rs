//! Ordered traversal.

use std::iter::FusedIterator;
use std::ops::ControlFlow;

use crate::comparator::Comparator;
use crate::element::Element;
use crate::level::LevelGenerator;

use super::OrderedSet;
use super::node::Idx;
use super::node::Nodes;

/// Iterator over a run of consecutive elements, walking level-0 links.
///
/// Forward iteration follows forward links from the low end, reverse
/// iteration follows backward links from the high end.
pub struct Iter<'a, V> {
    nodes: &'a Nodes<V>,
    front: Idx,
    back: Idx,
    remaining: usize,
}

impl<'a, V> Iter<'a, V> {
    /// `remaining` nodes from `front` through `back`, both live.
    pub(crate) fn new(nodes: &'a Nodes<V>, front: Idx, back: Idx, remaining: usize) -> Self {
        Iter {
            nodes,
            front,
            back,
            remaining,
        }
    }
}

impl<V> Clone for Iter<'_, V> {
    fn clone(&self) -> Self {
        Iter {
            nodes: self.nodes,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, V> Iterator for Iter<'a, V> {
    type Item = &'a V;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.node(self.front);
        self.front = node.tower[0].forward;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<V> DoubleEndedIterator for Iter<'_, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.nodes.node(self.back);
        self.back = node.backward;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<V> ExactSizeIterator for Iter<'_, V> {}

impl<V> FusedIterator for Iter<'_, V> {}

impl<V, C, G> OrderedSet<V, C, G>
where
    V: Element,
    C: Comparator<V>,
    G: LevelGenerator,
{
    /// All elements in ascending order. Reverse it for descending order.
    pub fn iter(&self) -> Iter<'_, V> {
        Iter::new(&self.nodes, self.nodes.first(), self.nodes.tail, self.nodes.len)
    }

    /// Visit elements in ascending order until `f` breaks.
    ///
    /// ```
    /// use std::ops::ControlFlow;
    /// use rankset::{Element, OrderedSet};
    ///
    /// #[derive(Debug)]
    /// struct Points(u32);
    ///
    /// impl Element for Points {
    ///     type Key = u32;
    ///     type Score = u32;
    ///     fn key(&self) -> &u32 { &self.0 }
    ///     fn score(&self) -> u32 { self.0 }
    /// }
    ///
    /// let mut set = OrderedSet::new();
    /// for n in [5, 1, 9, 3] {
    ///     set.insert(Points(n)).unwrap();
    /// }
    ///
    /// let first_above_four = set.scan(|s| {
    ///     if s.0 > 4 { ControlFlow::Break(s.0) } else { ControlFlow::Continue(()) }
    /// });
    /// assert_eq!(first_above_four, ControlFlow::Break(5));
    /// ```
    pub fn scan<B>(&self, f: impl FnMut(&V) -> ControlFlow<B>) -> ControlFlow<B> {
        self.iter().try_for_each(f)
    }
}

impl<'a, V, C, G> IntoIterator for &'a OrderedSet<V, C, G>
where
    V: Element,
    C: Comparator<V>,
    G: LevelGenerator,
{
    type Item = &'a V;
    type IntoIter = Iter<'a, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use std::ops::ControlFlow;

    use crate::element::Element;
    use crate::level::Geometric;
    use crate::set::OrderedSet;

    #[derive(Debug, PartialEq)]
    struct Item(u32, u32);

    impl Element for Item {
        type Key = u32;
        type Score = u32;

        fn key(&self) -> &u32 {
            &self.0
        }

        fn score(&self) -> u32 {
            self.1
        }
    }

    fn filled(n: u32) -> OrderedSet<Item> {
        let mut set = OrderedSet::with_generator(crate::Natural, Geometric::seeded(3));
        for key in (0..n).rev() {
            set.insert(Item(key, key % 7)).unwrap();
        }
        set
    }

    #[test]
    fn forward_and_backward() {
        let set = filled(20);
        let forward: Vec<_> = set.iter().map(|i| (i.1, i.0)).collect();
        let mut sorted = forward.clone();
        sorted.sort();
        assert_eq!(forward, sorted);

        let mut backward: Vec<_> = set.iter().rev().map(|i| (i.1, i.0)).collect();
        backward.reverse();
        assert_eq!(backward, forward);
    }

    #[test]
    fn exact_size_and_meeting_in_the_middle() {
        let set = filled(5);
        let mut iter = set.iter();
        assert_eq!(iter.len(), 5);
        let low = iter.next().unwrap();
        let high = iter.next_back().unwrap();
        assert_eq!(low, &Item(0, 0));
        assert_eq!(high, &Item(4, 4));
        assert_eq!(iter.len(), 3);
        assert_eq!(iter.count(), 3);
    }

    #[test]
    fn empty_iterates_nothing() {
        let set = filled(0);
        assert_eq!(set.iter().next(), None);
        assert_eq!(set.iter().next_back(), None);
        assert_eq!((&set).into_iter().len(), 0);
    }

    #[test]
    fn scan_stops_early() {
        let set = filled(10);
        let mut seen = 0;
        let result = set.scan(|item| {
            seen += 1;
            if item.1 == 1 {
                ControlFlow::Break(item.0)
            } else {
                ControlFlow::Continue(())
            }
        });
        // Scores are key % 7: 0, 0, 1, ... in order (0,0), (0,7), (1,1).
        assert_eq!(result, ControlFlow::Break(1));
        assert_eq!(seen, 3);

        let all: ControlFlow<()> = set.scan(|_| ControlFlow::Continue(()));
        assert_eq!(all, ControlFlow::Continue(()));
    }
}
