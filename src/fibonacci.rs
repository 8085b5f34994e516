//! Fibonacci Heap implementation
//!
//! A Fibonacci heap is a mergeable priority queue with:
//! - O(1) amortized insert, decrease_key, and merge
//! - O(log n) amortized extract_min and delete
//!
//! The structure consists of a collection of heap-ordered trees. Roots are linked
//! in a circular doubly linked list, and so is every set of siblings. The heap
//! maintains a reference to the minimum root.
//!
//! # Storage
//!
//! Nodes live in generational arenas (see [`crate::arena`]) and link to each
//! other by [`NodeRef`] rather than by pointer. A [`FibonacciHandle`] is just a
//! copy of the node's reference, so it survives merges, consolidations and
//! cuts unchanged, and becomes detectably stale once its element is removed.
//!
//! # Amortization
//!
//! - `extract_min` promotes the minimum's children to the root list and then
//!   *consolidates*: roots of equal degree are linked until every root degree
//!   is unique. This is where the deferred work of cheap inserts is paid.
//! - `decrease_key` cuts a node whose new priority beats its parent's and then
//!   runs a *cascading cut*: a non-root node may lose one child silently (it
//!   gets marked), a second loss cuts it too. This keeps the degree of every
//!   node logarithmic in the size of its subtree.

use crate::arena::{ArenaSet, NodeRef};
use crate::degree::{self, Degree};
use crate::traits::{DecreaseKeyHeap, Handle, Heap, HeapError};
use log::{debug, trace};
use smallvec::{smallvec, SmallVec};
use std::fmt;

/// Degree slots kept inline during consolidation; covers any heap below
/// `F(65)` elements without touching the allocator
const INLINE_DEGREES: usize = 64;

/// Handle to an element in a Fibonacci heap
///
/// The handle stays valid across merges: after `a.merge(b)`, handles obtained
/// from `b` refer to the same elements inside `a`. Using a handle after its
/// element was removed, or with a heap that never owned it, yields
/// [`HeapError::InvalidHandle`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct FibonacciHandle {
    node: NodeRef,
}

impl Handle for FibonacciHandle {}

#[cfg(test)]
impl FibonacciHandle {
    pub(crate) fn node_ref(&self) -> NodeRef {
        self.node
    }
}

pub(crate) struct Node<T, P> {
    pub(crate) item: T,
    pub(crate) priority: P,
    pub(crate) parent: Option<NodeRef>,
    pub(crate) child: Option<NodeRef>,
    pub(crate) left: NodeRef,
    pub(crate) right: NodeRef,
    pub(crate) degree: Degree,
    pub(crate) marked: bool,
}

impl<T, P> Node<T, P> {
    /// A detached node whose sibling ring holds only itself
    fn singleton(this: NodeRef, priority: P, item: T) -> Self {
        Node {
            item,
            priority,
            parent: None,
            child: None,
            left: this,
            right: this,
            degree: 0,
            marked: false,
        }
    }
}

/// Fibonacci Heap
///
/// # Example
///
/// ```rust
/// use fib_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let a = heap.insert(5, "A");
/// let _b = heap.insert(3, "B");
/// let c = heap.insert(8, "C");
/// assert_eq!(heap.peek(), Some((&3, &"B")));
///
/// heap.decrease_key(&c, 1).unwrap();
/// assert_eq!(heap.min_handle(), Some(c));
///
/// assert_eq!(heap.delete(&a), Ok((5, "A")));
/// assert_eq!(heap.extract_min(), Some((1, "C")));
/// assert_eq!(heap.extract_min(), Some((3, "B")));
/// assert_eq!(heap.extract_min(), None);
/// ```
pub struct FibonacciHeap<T, P: Ord> {
    pub(crate) nodes: ArenaSet<Node<T, P>>,
    pub(crate) min: Option<NodeRef>,
}

impl<T, P: Ord> Default for FibonacciHeap<T, P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, P: Ord> FibonacciHeap<T, P> {
    /// Creates an empty heap
    pub fn new() -> Self {
        Self {
            nodes: ArenaSet::new(),
            min: None,
        }
    }

    /// Creates an empty heap with room for `capacity` elements
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: ArenaSet::with_capacity(capacity),
            min: None,
        }
    }

    /// Number of elements in the heap
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.min.is_none()
    }

    /// Inserts an element as a new singleton tree in the root list. O(1).
    pub fn insert(&mut self, priority: P, item: T) -> FibonacciHandle {
        let node = self
            .nodes
            .insert_with(|this| Node::singleton(this, priority, item));

        match self.min {
            Some(min) => {
                self.splice_before(min, node);
                if self.nodes[node].priority < self.nodes[min].priority {
                    self.min = Some(node);
                }
            }
            None => self.min = Some(node),
        }

        self.check_invariants("insert");
        FibonacciHandle { node }
    }

    /// Handle of the current minimum, without removing it. O(1).
    pub fn min_handle(&self) -> Option<FibonacciHandle> {
        self.min.map(|node| FibonacciHandle { node })
    }

    /// Minimum priority and its item, without removing it. O(1).
    pub fn peek(&self) -> Option<(&P, &T)> {
        self.min.map(|min| {
            let node = &self.nodes[min];
            (&node.priority, &node.item)
        })
    }

    /// Removes and returns the minimum element. Amortized O(log n).
    pub fn extract_min(&mut self) -> Option<(P, T)> {
        let min = self.min?;
        let removed = self.remove_root(min);
        self.check_invariants("extract_min");
        Some(removed)
    }

    /// Lowers the priority of the element behind `handle`. Amortized O(1).
    ///
    /// # Errors
    ///
    /// - [`HeapError::PriorityNotDecreased`] if `new_priority` is not strictly
    ///   less than the current priority; nothing is modified.
    /// - [`HeapError::InvalidHandle`] if the handle is stale or foreign.
    pub fn decrease_key(
        &mut self,
        handle: &FibonacciHandle,
        new_priority: P,
    ) -> Result<(), HeapError> {
        let x = self.resolve(handle)?;
        if new_priority >= self.nodes[x].priority {
            debug!("decrease_key rejected: priority not decreased");
            return Err(HeapError::PriorityNotDecreased);
        }
        self.nodes[x].priority = new_priority;

        if let Some(parent) = self.nodes[x].parent {
            if self.nodes[x].priority < self.nodes[parent].priority {
                self.cut(x, parent);
                self.cascading_cut(parent);
            }
        }

        // A node that still has a parent is no smaller than that parent, so
        // only a root can win here
        if let Some(min) = self.min {
            if self.nodes[x].priority < self.nodes[min].priority {
                self.min = Some(x);
            }
        }

        self.check_invariants("decrease_key");
        Ok(())
    }

    /// Removes the element behind `handle` from wherever it sits.
    ///
    /// The node is cut from its parent (with cascading cut), its children are
    /// promoted to the root list and it is unlinked. Only when it was the
    /// minimum does the heap consolidate to find the new minimum. No sentinel
    /// priority is involved, so any total order works.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::InvalidHandle`] if the handle is stale or foreign,
    /// including when the same handle is deleted twice.
    pub fn delete(&mut self, handle: &FibonacciHandle) -> Result<(P, T), HeapError> {
        let x = self.resolve(handle)?;

        if let Some(parent) = self.nodes[x].parent {
            self.cut(x, parent);
            self.cascading_cut(parent);
        }

        let removed = self.remove_root(x);
        self.check_invariants("delete");
        Ok(removed)
    }

    /// Moves every element of `other` into this heap. O(1) in the number of
    /// elements.
    ///
    /// The two root rings are spliced together with four link updates.
    /// `other` is consumed; its handles stay valid and now refer into `self`.
    pub fn merge(&mut self, other: Self) {
        let FibonacciHeap {
            nodes,
            min: other_min,
        } = other;

        let Some(b) = other_min else {
            return;
        };
        let Some(a) = self.min else {
            *self = FibonacciHeap {
                nodes,
                min: other_min,
            };
            return;
        };

        trace!(
            "merge: {} + {} elements, {} + {} arenas",
            self.nodes.len(),
            nodes.len(),
            self.nodes.arena_count(),
            nodes.arena_count()
        );
        self.nodes.absorb(nodes);

        let a_right = self.nodes[a].right;
        let b_left = self.nodes[b].left;
        self.nodes[a].right = b;
        self.nodes[b].left = a;
        self.nodes[b_left].right = a_right;
        self.nodes[a_right].left = b_left;

        if self.nodes[b].priority < self.nodes[a].priority {
            self.min = Some(b);
        }

        self.check_invariants("merge");
    }

    /// Removes every element; all outstanding handles become invalid
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.min = None;
    }

    /// Returns true if `handle` names an element currently in this heap
    pub fn contains(&self, handle: &FibonacciHandle) -> bool {
        self.nodes.contains(handle.node)
    }

    /// Priority and item of the element behind `handle`
    pub fn get(&self, handle: &FibonacciHandle) -> Option<(&P, &T)> {
        self.nodes
            .get(handle.node)
            .map(|node| (&node.priority, &node.item))
    }

    /// Mutable access to the item behind `handle`. The priority can only be
    /// changed through [`decrease_key`](Self::decrease_key).
    pub fn get_item_mut(&mut self, handle: &FibonacciHandle) -> Option<&mut T> {
        self.nodes.get_mut(handle.node).map(|node| &mut node.item)
    }

    /// Handles of the root list in ring order, starting at the minimum
    pub fn roots(&self) -> Vec<FibonacciHandle> {
        self.min
            .map(|min| self.ring(min))
            .unwrap_or_default()
            .into_iter()
            .map(|node| FibonacciHandle { node })
            .collect()
    }

    /// Handles of the direct children of the element behind `handle`
    pub fn children(&self, handle: &FibonacciHandle) -> Result<Vec<FibonacciHandle>, HeapError> {
        let x = self.resolve(handle)?;
        Ok(self.nodes[x]
            .child
            .map(|child| self.ring(child))
            .unwrap_or_default()
            .into_iter()
            .map(|node| FibonacciHandle { node })
            .collect())
    }

    /// Handle of the parent, or `None` for a root
    pub fn parent(&self, handle: &FibonacciHandle) -> Result<Option<FibonacciHandle>, HeapError> {
        let x = self.resolve(handle)?;
        Ok(self.nodes[x].parent.map(|node| FibonacciHandle { node }))
    }

    /// Number of children of the element behind `handle`
    pub fn degree(&self, handle: &FibonacciHandle) -> Result<usize, HeapError> {
        let x = self.resolve(handle)?;
        Ok(self.nodes[x].degree as usize)
    }

    /// Whether the element behind `handle` has lost a child since it last
    /// became a non-root. Always false for roots.
    pub fn is_marked(&self, handle: &FibonacciHandle) -> Result<bool, HeapError> {
        let x = self.resolve(handle)?;
        Ok(self.nodes[x].marked)
    }

    /// Drains the heap in non-decreasing priority order
    pub fn into_sorted_vec(mut self) -> Vec<(P, T)> {
        let mut out = Vec::with_capacity(self.len());
        while let Some(entry) = self.extract_min() {
            out.push(entry);
        }
        out
    }

    fn resolve(&self, handle: &FibonacciHandle) -> Result<NodeRef, HeapError> {
        if self.nodes.contains(handle.node) {
            Ok(handle.node)
        } else {
            debug!("rejected invalid handle {:?}", handle.node);
            Err(HeapError::InvalidHandle)
        }
    }

    /// Members of the ring containing `start`, beginning with `start`
    pub(crate) fn ring(&self, start: NodeRef) -> Vec<NodeRef> {
        let mut members = vec![start];
        let mut current = self.nodes[start].right;
        while current != start {
            members.push(current);
            current = self.nodes[current].right;
        }
        members
    }

    /// Inserts the detached node `x` into `anchor`'s ring, just left of `anchor`
    fn splice_before(&mut self, anchor: NodeRef, x: NodeRef) {
        let anchor_left = self.nodes[anchor].left;
        self.nodes[x].right = anchor;
        self.nodes[x].left = anchor_left;
        self.nodes[anchor_left].right = x;
        self.nodes[anchor].left = x;
    }

    /// Takes `x` out of its ring and leaves it as a self-loop
    fn unlink(&mut self, x: NodeRef) {
        let left = self.nodes[x].left;
        let right = self.nodes[x].right;
        self.nodes[left].right = right;
        self.nodes[right].left = left;
        self.nodes[x].left = x;
        self.nodes[x].right = x;
    }

    /// Adds the detached node `x` to the root list. Does not compare against
    /// the minimum except when the root list was empty.
    fn add_root(&mut self, x: NodeRef) {
        let node = &mut self.nodes[x];
        node.parent = None;
        node.marked = false;
        match self.min {
            Some(min) => self.splice_before(min, x),
            None => {
                let node = &mut self.nodes[x];
                node.left = x;
                node.right = x;
                self.min = Some(x);
            }
        }
    }

    /// Removes the root `x`: promotes its children, unlinks it, frees it, and
    /// consolidates if it was the minimum
    fn remove_root(&mut self, x: NodeRef) -> (P, T) {
        if let Some(child) = self.nodes[x].child.take() {
            for c in self.ring(child) {
                self.nodes[c].left = c;
                self.nodes[c].right = c;
                self.nodes[c].parent = None;
                self.nodes[c].marked = false;
                self.splice_before(x, c);
            }
            self.nodes[x].degree = 0;
        }

        let was_min = self.min == Some(x);
        let next = self.nodes[x].right;
        self.unlink(x);
        let node = self
            .nodes
            .remove(x)
            .unwrap_or_else(|| panic!("dangling node reference {x:?}"));

        // Removing any other root leaves the minimum in place: the promoted
        // children are no smaller than x, which is no smaller than the minimum
        if was_min {
            if next == x {
                self.min = None;
            } else {
                self.min = Some(next);
                self.consolidate();
            }
        }

        (node.priority, node.item)
    }

    /// Links roots of equal degree until all root degrees are distinct, then
    /// rebuilds the root list and recomputes the minimum
    fn consolidate(&mut self) {
        let Some(start) = self.min else {
            return;
        };
        let roots = self.ring(start);
        trace!("consolidate: {} roots, {} elements", roots.len(), self.len());

        let mut table: SmallVec<[Option<NodeRef>; INLINE_DEGREES]> =
            smallvec![None; degree::table_size(self.len())];

        for mut x in roots {
            self.nodes[x].left = x;
            self.nodes[x].right = x;

            let mut d = self.nodes[x].degree as usize;
            loop {
                if d == table.len() {
                    table.push(None);
                }
                let Some(y) = table[d].take() else {
                    break;
                };
                // The occupant keeps its place as parent unless x is strictly
                // smaller, so ties resolve the same way every time
                let (parent, child) = if self.nodes[x].priority < self.nodes[y].priority {
                    (x, y)
                } else {
                    (y, x)
                };
                self.heap_link(child, parent);
                x = parent;
                d += 1;
            }
            table[d] = Some(x);
        }

        self.min = None;
        let mut remaining = 0usize;
        for root in table.into_iter().flatten() {
            self.add_root(root);
            remaining += 1;
            if let Some(min) = self.min {
                if self.nodes[root].priority < self.nodes[min].priority {
                    self.min = Some(root);
                }
            }
        }
        trace!("consolidate: {} roots after", remaining);
    }

    /// Makes the detached root `child` a child of `parent`
    fn heap_link(&mut self, child: NodeRef, parent: NodeRef) {
        match self.nodes[parent].child {
            Some(first) => self.splice_before(first, child),
            None => {
                self.nodes[parent].child = Some(child);
                self.nodes[child].left = child;
                self.nodes[child].right = child;
            }
        }
        let c = &mut self.nodes[child];
        c.parent = Some(parent);
        c.marked = false;
        let p = &mut self.nodes[parent];
        p.degree += 1;
    }

    /// Cuts `x` from its parent `parent` and moves it to the root list
    fn cut(&mut self, x: NodeRef, parent: NodeRef) {
        trace!("cut {:?} from {:?}", x, parent);
        let right = self.nodes[x].right;
        if right == x {
            self.nodes[parent].child = None;
        } else {
            if self.nodes[parent].child == Some(x) {
                self.nodes[parent].child = Some(right);
            }
            self.unlink(x);
        }
        let p = &mut self.nodes[parent];
        p.degree -= 1;

        self.add_root(x);
    }

    /// Walks up from `y`: marks the first unmarked non-root and stops, cutting
    /// every marked ancestor on the way
    fn cascading_cut(&mut self, mut y: NodeRef) {
        while let Some(parent) = self.nodes[y].parent {
            if !self.nodes[y].marked {
                self.nodes[y].marked = true;
                return;
            }
            trace!("cascading cut at {:?}", y);
            self.cut(y, parent);
            y = parent;
        }
    }

    #[cfg(feature = "validate-ops")]
    fn check_invariants(&self, op: &str) {
        if let Err(violation) = self.validate() {
            panic!("heap invariant violated after {op}: {violation}");
        }
    }

    #[cfg(not(feature = "validate-ops"))]
    #[inline(always)]
    fn check_invariants(&self, _op: &str) {}
}

/// Merges two heaps into a new one. Both inputs are consumed and every handle
/// from either of them stays valid in the result.
pub fn union<T, P: Ord>(mut first: FibonacciHeap<T, P>, second: FibonacciHeap<T, P>) -> FibonacciHeap<T, P> {
    first.merge(second);
    first
}

impl<T, P: Ord> Heap<T, P> for FibonacciHeap<T, P> {
    fn new() -> Self {
        FibonacciHeap::new()
    }

    fn is_empty(&self) -> bool {
        FibonacciHeap::is_empty(self)
    }

    fn len(&self) -> usize {
        FibonacciHeap::len(self)
    }

    fn push(&mut self, priority: P, item: T) {
        let _ = self.insert(priority, item);
    }

    fn peek(&self) -> Option<(&P, &T)> {
        FibonacciHeap::peek(self)
    }

    fn pop(&mut self) -> Option<(P, T)> {
        self.extract_min()
    }

    fn merge(&mut self, other: Self) {
        FibonacciHeap::merge(self, other)
    }
}

impl<T, P: Ord> DecreaseKeyHeap<T, P> for FibonacciHeap<T, P> {
    type Handle = FibonacciHandle;

    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle {
        self.insert(priority, item)
    }

    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError> {
        FibonacciHeap::decrease_key(self, handle, new_priority)
    }

    fn remove(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError> {
        self.delete(handle)
    }
}

impl<T, P: Ord> FromIterator<(P, T)> for FibonacciHeap<T, P> {
    fn from_iter<I: IntoIterator<Item = (P, T)>>(iter: I) -> Self {
        let mut heap = FibonacciHeap::new();
        heap.extend(iter);
        heap
    }
}

impl<T, P: Ord> Extend<(P, T)> for FibonacciHeap<T, P> {
    fn extend<I: IntoIterator<Item = (P, T)>>(&mut self, iter: I) {
        for (priority, item) in iter {
            self.insert(priority, item);
        }
    }
}

/// Prints one tree as `priority[child, child, ...]`
struct TreeFmt<'a, T, P: Ord> {
    heap: &'a FibonacciHeap<T, P>,
    root: NodeRef,
}

impl<T, P: Ord + fmt::Debug> fmt::Debug for TreeFmt<'_, T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = &self.heap.nodes[self.root];
        write!(f, "{:?}", node.priority)?;
        if node.marked {
            write!(f, "*")?;
        }
        if let Some(child) = node.child {
            let children = self.heap.ring(child);
            f.debug_list()
                .entries(children.into_iter().map(|root| TreeFmt {
                    heap: self.heap,
                    root,
                }))
                .finish()?;
        }
        Ok(())
    }
}

impl<T, P: Ord + fmt::Debug> fmt::Debug for FibonacciHeap<T, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let roots = self.min.map(|min| self.ring(min)).unwrap_or_default();
        f.debug_struct("FibonacciHeap")
            .field("len", &self.len())
            .field(
                "roots",
                &roots
                    .into_iter()
                    .map(|root| TreeFmt { heap: self, root })
                    .collect::<Vec<_>>(),
            )
            .finish()
    }
}
