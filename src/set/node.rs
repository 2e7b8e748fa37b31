//! Node arena and structural relinking.
//!
//! Nodes live in a slot arena and refer to each other by `u32` index, so
//! the forward and backward chains never form ownership cycles. Vacated
//! slots go on a free list and are reused by later inserts.
//!
//! # Span Semantics
//!
//! Every link at every level carries a span: the number of level-0 nodes
//! the link moves past.
//!
//! - A link to node `y` has span `rank(y) - rank(x)`, always at least 1.
//! - A link to `NIL` counts the nodes after `x`, so the tail's level-0
//!   span is 0.
//! - The head sits at rank 0, so along any level the spans sum to `len`.
//!
//! ```text
//! Level 2: HEAD --------------(3)--------------> C --------(1)------> NIL
//! Level 1: HEAD ----(1)----> A --------(2)-----> C --------(1)------> NIL
//! Level 0: HEAD -(1)-> A -(1)-> B -(1)-> C -(1)-> D -(0)-> NIL
//! ```

use std::fmt;

use smallvec::SmallVec;
use smallvec::smallvec;
use tracing::debug;

use crate::level::MAX_LEVEL;

/// Node index type. u32 halves the size of a link on 64-bit targets.
pub(crate) type Idx = u32;

/// End of a chain, and the backward link of the first node.
pub(crate) const NIL: Idx = Idx::MAX;

/// The head sentinel. It is not stored in the arena.
pub(crate) const HEAD: Idx = Idx::MAX - 1;

/// One forward link of a tower.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Level {
    pub(crate) forward: Idx,
    pub(crate) span: usize,
}

impl Level {
    const EMPTY: Level = Level {
        forward: NIL,
        span: 0,
    };
}

pub(crate) struct Node<V> {
    pub(crate) value: V,
    /// Level-0 predecessor, `NIL` for the first node.
    pub(crate) backward: Idx,
    pub(crate) tower: SmallVec<[Level; 4]>,
}

/// Predecessor at each level of a descent, with the rank reached there.
pub(crate) struct Path {
    pub(crate) update: [Idx; MAX_LEVEL],
    pub(crate) rank: [usize; MAX_LEVEL],
}

impl Path {
    fn new() -> Self {
        Path {
            update: [HEAD; MAX_LEVEL],
            rank: [0; MAX_LEVEL],
        }
    }
}

/// The linked structure: arena, head tower, tail, height and length.
pub(crate) struct Nodes<V> {
    slots: Vec<Option<Node<V>>>,
    free_list: Vec<Idx>,
    head: [Level; MAX_LEVEL],
    pub(crate) tail: Idx,
    /// Number of levels in use, at least 1.
    pub(crate) level: usize,
    pub(crate) len: usize,
}

impl<V> Nodes<V> {
    pub(crate) fn new() -> Self {
        Nodes {
            slots: Vec::new(),
            free_list: Vec::new(),
            head: [Level::EMPTY; MAX_LEVEL],
            tail: NIL,
            level: 1,
            len: 0,
        }
    }

    // --- Node access helpers ---

    pub(crate) fn node(&self, idx: Idx) -> &Node<V> {
        match self.slots.get(idx as usize) {
            Some(Some(node)) => node,
            _ => unreachable!("link to vacant slot {idx}"),
        }
    }

    pub(crate) fn node_mut(&mut self, idx: Idx) -> &mut Node<V> {
        match self.slots.get_mut(idx as usize) {
            Some(Some(node)) => node,
            _ => unreachable!("link to vacant slot {idx}"),
        }
    }

    pub(crate) fn tower(&self, at: Idx) -> &[Level] {
        if at == HEAD {
            &self.head[..]
        } else {
            &self.node(at).tower[..]
        }
    }

    fn tower_mut(&mut self, at: Idx) -> &mut [Level] {
        if at == HEAD {
            &mut self.head[..]
        } else {
            &mut self.node_mut(at).tower[..]
        }
    }

    pub(crate) fn forward(&self, at: Idx, level: usize) -> Idx {
        self.tower(at)[level].forward
    }

    pub(crate) fn first(&self) -> Idx {
        self.head[0].forward
    }

    /// A read-only handle to `idx`, or `None` for `NIL` and the head.
    pub(crate) fn at(&self, idx: Idx) -> Option<NodeRef<'_, V>> {
        if idx == NIL || idx == HEAD {
            return None;
        }
        return Some(NodeRef::new(self, idx));
    }

    // --- Traversal ---

    /// Walk down from the head. At each level, move forward while
    /// `advance(rank_of_next, next)` holds, then record the node reached
    /// and its rank.
    ///
    /// At level 0 the path ends on the last node for which `advance` held
    /// (or the head), and `rank[0]` is that node's exact rank.
    pub(crate) fn descend(&self, mut advance: impl FnMut(usize, &V) -> bool) -> Path {
        let mut path = Path::new();
        let mut x = HEAD;
        let mut rank = 0usize;
        for level in (0..self.level).rev() {
            loop {
                let Level { forward, span } = self.tower(x)[level];
                if forward == NIL || !advance(rank + span, &self.node(forward).value) {
                    break;
                }
                rank += span;
                x = forward;
            }
            path.update[level] = x;
            path.rank[level] = rank;
        }
        path
    }

    // --- Structural mutation ---

    pub(crate) fn alloc(&mut self, value: V, height: usize) -> Idx {
        let node = Node {
            value,
            backward: NIL,
            tower: smallvec![Level::EMPTY; height],
        };
        if let Some(idx) = self.free_list.pop() {
            self.slots[idx as usize] = Some(node);
            idx
        } else {
            let idx = slot_index(self.slots.len());
            self.slots.push(Some(node));
            idx
        }
    }

    /// Vacate a slot that is no longer linked, returning its value.
    pub(crate) fn release(&mut self, idx: Idx) -> V {
        match self.slots.get_mut(idx as usize).and_then(Option::take) {
            Some(node) => {
                self.free_list.push(idx);
                node.value
            }
            None => unreachable!("release of vacant slot {idx}"),
        }
    }

    /// Splice a freshly allocated node in after the predecessors recorded
    /// by a strict descent to its position.
    pub(crate) fn link(&mut self, idx: Idx, path: &mut Path) {
        let height = self.node(idx).tower.len();

        if height > self.level {
            // New levels start at the head and span the whole list.
            for level in self.level..height {
                path.rank[level] = 0;
                path.update[level] = HEAD;
                self.head[level].span = self.len;
            }
            debug!(from = self.level, to = height, "max height grew");
            self.level = height;
        }

        for level in 0..height {
            let pred = path.update[level];
            let skipped = path.rank[0] - path.rank[level];
            let old = self.tower(pred)[level];
            self.tower_mut(idx)[level] = Level {
                forward: old.forward,
                span: old.span - skipped,
            };
            self.tower_mut(pred)[level] = Level {
                forward: idx,
                span: skipped + 1,
            };
        }

        // Links above the new tower now pass over one more node.
        for level in height..self.level {
            self.tower_mut(path.update[level])[level].span += 1;
        }

        let pred = path.update[0];
        self.node_mut(idx).backward = if pred == HEAD { NIL } else { pred };
        match self.forward(idx, 0) {
            NIL => self.tail = idx,
            next => self.node_mut(next).backward = idx,
        }
        self.len += 1;
    }

    /// Unsplice `idx` given its predecessor at every level in use. The slot
    /// stays occupied until [`release`](Self::release).
    pub(crate) fn unlink(&mut self, idx: Idx, update: &[Idx; MAX_LEVEL]) {
        for level in 0..self.level {
            let pred = update[level];
            if self.forward(pred, level) == idx {
                let removed = self.tower(idx)[level];
                let link = &mut self.tower_mut(pred)[level];
                link.span = link.span + removed.span - 1;
                link.forward = removed.forward;
            } else {
                self.tower_mut(pred)[level].span -= 1;
            }
        }

        let backward = self.node(idx).backward;
        match self.forward(idx, 0) {
            NIL => self.tail = backward,
            next => self.node_mut(next).backward = backward,
        }

        let before = self.level;
        while self.level > 1 && self.head[self.level - 1].forward == NIL {
            self.level -= 1;
        }
        if self.level != before {
            debug!(from = before, to = self.level, "max height shrank");
        }
        self.len -= 1;
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
        self.free_list.clear();
        self.head = [Level::EMPTY; MAX_LEVEL];
        self.tail = NIL;
        self.level = 1;
        self.len = 0;
    }
}

/// Index of the slot appended after `len` existing ones. Panics once the
/// index would collide with the sentinels.
fn slot_index(len: usize) -> Idx {
    match Idx::try_from(len) {
        Ok(idx) if idx < HEAD => idx,
        _ => panic!("node arena exhausted at {len} slots"),
    }
}

/// A read-only handle to a stored element and its place in the list.
///
/// Handles borrow the set, so they cannot outlive a mutation.
pub struct NodeRef<'a, V> {
    nodes: &'a Nodes<V>,
    idx: Idx,
}

impl<V> Clone for NodeRef<'_, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<V> Copy for NodeRef<'_, V> {}

impl<'a, V> NodeRef<'a, V> {
    pub(crate) fn new(nodes: &'a Nodes<V>, idx: Idx) -> Self {
        debug_assert!(idx != NIL && idx != HEAD);
        NodeRef { nodes, idx }
    }

    pub(crate) fn idx(&self) -> Idx {
        self.idx
    }

    /// The stored element.
    pub fn value(&self) -> &'a V {
        &self.nodes.node(self.idx).value
    }

    /// The next node in ascending order.
    pub fn next(&self) -> Option<NodeRef<'a, V>> {
        self.nodes.at(self.nodes.forward(self.idx, 0))
    }

    /// The previous node in ascending order.
    pub fn prev(&self) -> Option<NodeRef<'a, V>> {
        self.nodes.at(self.nodes.node(self.idx).backward)
    }

    /// Number of levels this node participates in.
    pub fn height(&self) -> usize {
        self.nodes.node(self.idx).tower.len()
    }

    /// Span of this node's link at `level`, or `None` above its height.
    pub fn span(&self, level: usize) -> Option<usize> {
        self.nodes.node(self.idx).tower.get(level).map(|link| link.span)
    }
}

impl<V: fmt::Debug> fmt::Debug for NodeRef<'_, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("value", self.value())
            .field("height", &self.height())
            .finish()
    }
}
