//! Structural dump and invariant checking.

#[cfg(debug_assertions)]
use std::cmp::Ordering;
use std::fmt;

#[cfg(debug_assertions)]
use rustc_hash::FxHashMap;

use crate::comparator::Comparator;
use crate::element::Element;
use crate::level::LevelGenerator;
#[cfg(debug_assertions)]
use crate::level::MAX_LEVEL;

use super::OrderedSet;
use super::node::HEAD;
#[cfg(debug_assertions)]
use super::node::Idx;
use super::node::NIL;
use super::node::Nodes;

impl<V, C, G> OrderedSet<V, C, G>
where
    V: Element + fmt::Debug,
    C: Comparator<V>,
    G: LevelGenerator,
{
    /// Render every level from the highest down, one link per line.
    ///
    /// ```text
    /// level 1
    ///   head span=1
    ///   span=1 value=Entry { key: 3, score: 8 }
    /// level 0
    ///   head span=1
    ///   span=1 value=Entry { key: 3, score: 8 }
    ///   span=0 value=Entry { key: 1, score: 10 }
    /// ```
    ///
    /// For debugging only, the format is not stable.
    pub fn dump(&self) -> String {
        Dump(&self.nodes).to_string()
    }
}

/// Per-level text rendering of the node structure.
struct Dump<'a, V>(&'a Nodes<V>);

impl<V: fmt::Debug> fmt::Display for Dump<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let nodes = self.0;
        for level in (0..nodes.level).rev() {
            writeln!(f, "level {level}")?;
            let mut x = HEAD;
            while x != NIL {
                let link = nodes.tower(x)[level];
                if x == HEAD {
                    writeln!(f, "  head span={}", link.span)?;
                } else {
                    writeln!(f, "  span={} value={:?}", link.span, nodes.node(x).value)?;
                }
                x = link.forward;
            }
        }
        Ok(())
    }
}

impl<V, C, G> OrderedSet<V, C, G>
where
    V: Element,
    C: Comparator<V>,
    G: LevelGenerator,
{
    /// Walk the whole structure and panic on the first broken invariant.
    ///
    /// Checks the order, backward links, tail, length, key index and the
    /// span of every link at every level in use. O(n log n). Compiled to a
    /// no-op without debug assertions.
    #[doc(hidden)]
    #[cfg(debug_assertions)]
    pub fn assert_invariants(&self) {
        let nodes = &self.nodes;
        assert!(
            (1..=MAX_LEVEL).contains(&nodes.level),
            "INVARIANT VIOLATED: level {} out of bounds",
            nodes.level
        );

        // Level 0: order, backward links, index agreement.
        let mut position: FxHashMap<Idx, usize> = FxHashMap::default();
        let mut prev = NIL;
        let mut x = nodes.first();
        let mut rank = 0usize;
        while x != NIL {
            rank += 1;
            let node = nodes.node(x);
            assert_eq!(
                node.backward, prev,
                "INVARIANT VIOLATED: backward link at rank {rank}"
            );
            assert!(
                (1..=nodes.level).contains(&node.tower.len()),
                "INVARIANT VIOLATED: height {} at rank {rank} with level {}",
                node.tower.len(),
                nodes.level
            );
            if prev != NIL {
                assert_eq!(
                    self.cmp.cmp_elements(&nodes.node(prev).value, &node.value),
                    Ordering::Less,
                    "INVARIANT VIOLATED: order at rank {rank}"
                );
            }
            assert_eq!(
                self.index.get(node.value.key()),
                Some(&x),
                "INVARIANT VIOLATED: index entry for rank {rank}"
            );
            position.insert(x, rank);
            prev = x;
            x = node.tower[0].forward;
        }
        assert_eq!(rank, nodes.len, "INVARIANT VIOLATED: walked {rank} nodes, len {}", nodes.len);
        assert_eq!(nodes.tail, prev, "INVARIANT VIOLATED: tail");
        assert_eq!(
            self.index.len(),
            nodes.len,
            "INVARIANT VIOLATED: index holds {} keys, len {}",
            self.index.len(),
            nodes.len
        );
        if nodes.len > 0 {
            assert_ne!(
                nodes.forward(HEAD, nodes.level - 1),
                NIL,
                "INVARIANT VIOLATED: top level {} is empty",
                nodes.level - 1
            );
        }

        // Every level: each span equals the rank distance it covers.
        for level in 0..nodes.level {
            let mut x = HEAD;
            let mut at = 0usize;
            let mut sum = 0usize;
            loop {
                let link = nodes.tower(x)[level];
                let target = if link.forward == NIL {
                    nodes.len
                } else {
                    match position.get(&link.forward) {
                        Some(&target) => target,
                        None => panic!("INVARIANT VIOLATED: level {level} links outside level 0"),
                    }
                };
                assert_eq!(
                    link.span,
                    target - at,
                    "INVARIANT VIOLATED: span at level {level} from rank {at}"
                );
                sum += link.span;
                if link.forward == NIL {
                    break;
                }
                x = link.forward;
                at = target;
            }
            assert_eq!(sum, nodes.len, "INVARIANT VIOLATED: spans at level {level} sum to {sum}");
        }
    }

    #[doc(hidden)]
    #[cfg(not(debug_assertions))]
    #[inline(always)]
    pub fn assert_invariants(&self) {}
}
