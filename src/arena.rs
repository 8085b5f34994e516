//! Generational node arenas backing the Fibonacci heap
//!
//! Nodes live in [`slotmap`] arenas and refer to each other through
//! [`NodeRef`] values instead of pointers. A `NodeRef` pairs the arena's
//! globally unique [`ArenaId`] with a generational [`NodeKey`], which gives
//! the heap two properties for free:
//!
//! - **Stale detection**: once a node is removed its slot version is bumped,
//!   so any `NodeRef` still pointing at it no longer resolves.
//! - **Foreign detection**: a `NodeRef` minted by another heap names an arena
//!   this heap does not own, so it does not resolve either.
//!
//! # Merging without relabelling
//!
//! An [`ArenaSet`] owns a *home* arena (where new nodes are allocated) plus any
//! arenas absorbed from other heaps. [`ArenaSet::absorb`] moves whole arenas
//! across, so a node keeps its `NodeRef` for its entire life regardless of how
//! many merges it goes through. The side owning fewer arenas is always the one
//! that moves, which keeps the total work over any merge sequence at
//! O(k log k) for k heaps and independent of the number of elements.

use rustc_hash::FxHashMap;
use slotmap::{new_key_type, SlotMap};
use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

new_key_type! {
    /// Generational key of a node inside one arena
    pub struct NodeKey;
}

/// Process-wide unique identifier of one arena
///
/// Identifiers are never reused, so a reference into a dropped arena can never
/// be mistaken for a reference into a newer one.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, PartialOrd, Ord)]
pub struct ArenaId(u64);

impl ArenaId {
    fn fresh() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        ArenaId(NEXT.fetch_add(1, Ordering::Relaxed))
    }
}

/// Location of a node: which arena, and which generational slot inside it
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeRef {
    arena: ArenaId,
    key: NodeKey,
}

impl NodeRef {
    /// The arena this reference points into
    pub fn arena(&self) -> ArenaId {
        self.arena
    }
}

/// A set of arenas owned by a single heap
///
/// Indexing with a `NodeRef` that does not resolve panics, the same way slice
/// indexing does. Internal links are always live; anything coming from outside
/// (a caller's handle) must be checked with [`ArenaSet::contains`] or
/// [`ArenaSet::get`] first.
#[derive(Debug)]
pub struct ArenaSet<N> {
    home_id: ArenaId,
    home: SlotMap<NodeKey, N>,
    absorbed: FxHashMap<ArenaId, SlotMap<NodeKey, N>>,
    len: usize,
}

impl<N> Default for ArenaSet<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> ArenaSet<N> {
    /// Creates an empty set with a fresh home arena
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty set whose home arena can hold `capacity` nodes
    /// without reallocating
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            home_id: ArenaId::fresh(),
            home: SlotMap::with_capacity_and_key(capacity),
            absorbed: FxHashMap::default(),
            len: 0,
        }
    }

    /// Number of live nodes across all arenas
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of arenas currently owned (home included)
    pub fn arena_count(&self) -> usize {
        1 + self.absorbed.len()
    }

    /// Allocates a node in the home arena
    ///
    /// The closure receives the node's own reference, which lets a node start
    /// out linked to itself.
    pub fn insert_with(&mut self, f: impl FnOnce(NodeRef) -> N) -> NodeRef {
        let arena = self.home_id;
        let key = self.home.insert_with_key(|key| f(NodeRef { arena, key }));
        self.len += 1;
        NodeRef { arena, key }
    }

    fn arena(&self, id: ArenaId) -> Option<&SlotMap<NodeKey, N>> {
        if id == self.home_id {
            Some(&self.home)
        } else {
            self.absorbed.get(&id)
        }
    }

    fn arena_mut(&mut self, id: ArenaId) -> Option<&mut SlotMap<NodeKey, N>> {
        if id == self.home_id {
            Some(&mut self.home)
        } else {
            self.absorbed.get_mut(&id)
        }
    }

    /// Returns true if `r` names a live node owned by this set
    pub fn contains(&self, r: NodeRef) -> bool {
        self.arena(r.arena)
            .is_some_and(|arena| arena.contains_key(r.key))
    }

    pub fn get(&self, r: NodeRef) -> Option<&N> {
        self.arena(r.arena)?.get(r.key)
    }

    pub fn get_mut(&mut self, r: NodeRef) -> Option<&mut N> {
        self.arena_mut(r.arena)?.get_mut(r.key)
    }

    /// Removes a node, invalidating every copy of `r`
    ///
    /// An absorbed arena that becomes empty is released.
    pub fn remove(&mut self, r: NodeRef) -> Option<N> {
        let node = self.arena_mut(r.arena)?.remove(r.key)?;
        self.len -= 1;
        if r.arena != self.home_id
            && self.absorbed.get(&r.arena).is_some_and(|arena| arena.is_empty())
        {
            self.absorbed.remove(&r.arena);
        }
        Some(node)
    }

    /// Removes every node and releases all absorbed arenas
    pub fn clear(&mut self) {
        self.home.clear();
        self.absorbed.clear();
        self.len = 0;
    }

    /// Takes ownership of every arena in `other`
    ///
    /// All references into `other` stay valid and now resolve in `self`.
    pub fn absorb(&mut self, mut other: Self) {
        if other.absorbed.len() > self.absorbed.len() {
            std::mem::swap(self, &mut other);
        }
        let Self {
            home_id,
            home,
            absorbed,
            len,
        } = other;

        if !home.is_empty() {
            self.absorbed.insert(home_id, home);
        }
        self.absorbed
            .extend(absorbed.into_iter().filter(|(_, arena)| !arena.is_empty()));
        self.len += len;
    }
}

impl<N> Index<NodeRef> for ArenaSet<N> {
    type Output = N;

    fn index(&self, r: NodeRef) -> &N {
        match self.get(r) {
            Some(node) => node,
            None => panic!("dangling node reference {r:?}"),
        }
    }
}

impl<N> IndexMut<NodeRef> for ArenaSet<N> {
    fn index_mut(&mut self, r: NodeRef) -> &mut N {
        match self.get_mut(r) {
            Some(node) => node,
            None => panic!("dangling node reference {r:?}"),
        }
    }
}
