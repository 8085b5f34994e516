//! Common traits for heap data structures
//!
//! This module provides a two-tier trait hierarchy:
//!
//! - [`Heap`]: Base trait with a `BinaryHeap`-like API (`push`/`peek`/`pop`/`merge`)
//! - [`DecreaseKeyHeap`]: Extended trait adding handle-based operations
//!   (`push_with_handle`, `decrease_key`, `remove`)
//!
//! Graph algorithms such as Prim's and Dijkstra's are written against
//! [`DecreaseKeyHeap`], since decrease-key dominates their cost profile.

use thiserror::Error;

/// Error type for handle-based heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The new priority is not strictly less than the current priority.
    /// The heap is left unchanged.
    #[error("new priority is not less than current priority")]
    PriorityNotDecreased,
    /// The handle does not refer to an element of this heap, either because
    /// the element was removed or because the handle came from another heap
    #[error("handle is no longer valid (element was removed or belongs to another heap)")]
    InvalidHandle,
}

/// A handle to an element in the heap
///
/// Handles are opaque, cheap to copy, and stay valid until the element they
/// name is removed.
pub trait Handle: Clone + PartialEq + Eq {}

/// Base trait for heap/priority queue data structures
///
/// Unlike `BinaryHeap`, which stores values directly, these heaps store
/// `(priority, item)` pairs to separate the ordering key from the data.
/// They are min-heaps.
///
/// # Example
///
/// ```rust
/// use fib_heap::Heap;
/// use fib_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// heap.push(3, "three");
/// heap.push(1, "one");
/// heap.push(2, "two");
///
/// assert_eq!(heap.peek(), Some((&1, &"one")));
/// assert_eq!(heap.pop(), Some((1, "one")));
/// ```
pub trait Heap<T, P: Ord> {
    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Inserts an element with the given priority
    fn push(&mut self, priority: P, item: T);

    /// Returns the minimum priority and associated item without removing it
    fn peek(&self) -> Option<(&P, &T)>;

    /// Removes and returns the minimum priority and associated item
    fn pop(&mut self) -> Option<(P, T)>;

    /// Merges another heap into this one, consuming the other heap
    fn merge(&mut self, other: Self);
}

/// Extended heap trait with handle-based operations
///
/// # Example
///
/// ```rust
/// use fib_heap::{DecreaseKeyHeap, Heap};
/// use fib_heap::fibonacci::FibonacciHeap;
///
/// let mut heap = FibonacciHeap::new();
/// let handle = heap.push_with_handle(10, "item");
/// heap.decrease_key(&handle, 5).unwrap();
/// assert_eq!(heap.peek(), Some((&5, &"item")));
/// assert_eq!(heap.remove(&handle), Ok((5, "item")));
/// ```
pub trait DecreaseKeyHeap<T, P: Ord>: Heap<T, P> {
    /// The handle type for this heap
    type Handle: Handle;

    /// Inserts an element with the given priority, returning a handle
    fn push_with_handle(&mut self, priority: P, item: T) -> Self::Handle;

    /// Decreases the priority of the element identified by the handle
    ///
    /// # Errors
    /// - [`HeapError::PriorityNotDecreased`] if `new_priority` is not strictly
    ///   less than the current priority
    /// - [`HeapError::InvalidHandle`] if the handle does not name a live element
    fn decrease_key(&mut self, handle: &Self::Handle, new_priority: P) -> Result<(), HeapError>;

    /// Removes the element identified by the handle, wherever it sits
    ///
    /// # Errors
    /// Returns [`HeapError::InvalidHandle`] if the handle does not name a live
    /// element, which includes removing the same handle twice.
    fn remove(&mut self, handle: &Self::Handle) -> Result<(P, T), HeapError>;
}
